use cadence_persist::{ThreadPurpose, ThreadRecord};
use serde::Serialize;

use crate::extract::MissionMap;

/// One user message to relay to the assistant
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub user_id: String,
    /// Absent means "start a new thread"
    pub thread_id: Option<String>,
    pub assistant_id: String,
    pub message: String,
    pub additional_instructions: Option<String>,
    pub purpose: ThreadPurpose,
}

impl TurnInput {
    pub fn new(
        user_id: impl Into<String>,
        assistant_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            thread_id: None,
            assistant_id: assistant_id.into(),
            message: message.into(),
            additional_instructions: None,
            purpose: ThreadPurpose::default(),
        }
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.additional_instructions = Some(instructions.into());
        self
    }

    pub fn with_purpose(mut self, purpose: ThreadPurpose) -> Self {
        self.purpose = purpose;
        self
    }
}

/// Result of a fully relayed turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutput {
    pub thread_id: String,
    pub run_id: String,
    pub reply: String,
    /// The reply carried a completion marker
    pub completed: bool,
    pub content_ideas: Vec<String>,
    pub mission_map: Option<MissionMap>,
}

/// A message appended and a run started, not yet polled
#[derive(Debug, Clone, Serialize)]
pub struct StartedTurn {
    pub thread_id: String,
    pub message_id: String,
    pub run_id: String,
}

#[derive(Debug, Clone)]
pub struct OpenedThread {
    pub record: ThreadRecord,
    pub created: bool,
}
