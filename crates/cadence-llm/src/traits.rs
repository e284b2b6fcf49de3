use crate::error::Result;
use crate::types::{AssistantThread, MessageList, Run, ThreadMessage};
use async_trait::async_trait;
use serde::Serialize;

/// Operations of the hosted assistant API that the relay depends on.
///
/// Every call is a single HTTP round-trip; nothing here retries or polls.
#[async_trait]
pub trait AssistantsClient: Send + Sync {
    /// Create an empty thread
    async fn create_thread(&self) -> Result<AssistantThread>;

    /// Append a message to a thread
    async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> Result<ThreadMessage>;

    /// Start a run of an assistant against a thread
    async fn create_run(&self, thread_id: &str, request: CreateRunRequest) -> Result<Run>;

    /// Fetch the current state of a run
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// List messages of a thread
    async fn list_messages(&self, thread_id: &str, query: ListMessagesQuery) -> Result<MessageList>;
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest {
    pub role: &'static str,
    pub content: String,
}

impl CreateMessageRequest {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRunRequest {
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
}

impl CreateRunRequest {
    pub fn new(assistant_id: impl Into<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            additional_instructions: None,
        }
    }

    pub fn additional_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.additional_instructions = Some(instructions.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMessagesQuery {
    pub limit: u32,
    pub order: SortOrder,
}

impl ListMessagesQuery {
    /// Newest first
    pub fn newest(limit: u32) -> Self {
        Self {
            limit,
            order: SortOrder::Desc,
        }
    }

    pub fn oldest(limit: u32) -> Self {
        Self {
            limit,
            order: SortOrder::Asc,
        }
    }
}

impl Default for ListMessagesQuery {
    fn default() -> Self {
        Self::newest(20)
    }
}
