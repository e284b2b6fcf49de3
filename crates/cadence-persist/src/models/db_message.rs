use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database-agnostic mirror of a thread message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DBMessage {
    pub id: String,
    /// Vendor message id, when the message was read back from the vendor
    pub message_id: Option<String>,
    pub thread_id: String,
    pub user_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl DBMessage {
    pub fn user(
        thread_id: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: MessageRole::User,
            ..Self::blank(thread_id, user_id, content)
        }
    }

    pub fn assistant(
        thread_id: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: MessageRole::Assistant,
            ..Self::blank(thread_id, user_id, content)
        }
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    fn blank(
        thread_id: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message_id: None,
            thread_id: thread_id.into(),
            user_id: user_id.into(),
            role: MessageRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}
