use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a thread is used for. One user can hold one live thread per purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadPurpose {
    Strategy,
    ContentPlan,
    ContentPlanning,
}

impl ThreadPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadPurpose::Strategy => "strategy",
            ThreadPurpose::ContentPlan => "content_plan",
            ThreadPurpose::ContentPlanning => "content_planning",
        }
    }
}

impl Default for ThreadPurpose {
    fn default() -> Self {
        ThreadPurpose::Strategy
    }
}

impl fmt::Display for ThreadPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThreadPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strategy" => Ok(ThreadPurpose::Strategy),
            "content_plan" => Ok(ThreadPurpose::ContentPlan),
            "content_planning" => Ok(ThreadPurpose::ContentPlanning),
            other => Err(format!("unknown thread purpose: {}", other)),
        }
    }
}

/// Local record mapping a vendor thread to its owner.
///
/// Written once when the thread is created or first seen; never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub thread_id: String,
    pub user_id: String,
    pub purpose: ThreadPurpose,
    pub assistant_id: String,
    pub created_at: DateTime<Utc>,
}

impl ThreadRecord {
    pub fn new(
        thread_id: impl Into<String>,
        user_id: impl Into<String>,
        purpose: ThreadPurpose,
        assistant_id: impl Into<String>,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            user_id: user_id.into(),
            purpose,
            assistant_id: assistant_id.into(),
            created_at: Utc::now(),
        }
    }
}
