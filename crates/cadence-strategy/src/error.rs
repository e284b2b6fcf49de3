use cadence_llm::{AssistantError, RunError, RunStatus};
use cadence_persist::PersistError;
use thiserror::Error;

/// A turn that could not be completed.
///
/// Carries the thread id whenever one was known (created or reused) so the
/// caller can retry the same conversation.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct TurnError {
    pub thread_id: Option<String>,
    #[source]
    pub kind: TurnErrorKind,
}

#[derive(Debug, Error)]
pub enum TurnErrorKind {
    #[error("assistant API error: {0}")]
    Vendor(#[from] AssistantError),

    #[error("run {run_id} ended with status {status}{}", last_error_suffix(.last_error))]
    RunFailed {
        run_id: String,
        status: RunStatus,
        last_error: Option<RunError>,
    },

    #[error("run {run_id} did not complete after {attempts} polls")]
    TimedOut { run_id: String, attempts: u32 },

    #[error("run {run_id} requires action, which is not supported")]
    ActionRequired { run_id: String },

    #[error("run completed without an assistant reply")]
    NoReply,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Persist(#[from] PersistError),
}

fn last_error_suffix(last_error: &Option<RunError>) -> String {
    match last_error {
        Some(err) => format!(" ({})", err),
        None => String::new(),
    }
}

impl TurnError {
    pub fn new(thread_id: Option<String>, kind: impl Into<TurnErrorKind>) -> Self {
        Self {
            thread_id,
            kind: kind.into(),
        }
    }

    /// Error for a known thread
    pub fn on_thread(thread_id: &str, kind: impl Into<TurnErrorKind>) -> Self {
        Self::new(Some(thread_id.to_string()), kind)
    }
}

pub type Result<T> = std::result::Result<T, TurnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_failed_message() {
        let err = TurnError::on_thread(
            "thread_1",
            TurnErrorKind::RunFailed {
                run_id: "run_1".into(),
                status: RunStatus::Failed,
                last_error: Some(RunError {
                    code: "rate_limit_exceeded".into(),
                    message: "slow down".into(),
                }),
            },
        );
        assert_eq!(
            err.to_string(),
            "run run_1 ended with status failed (rate_limit_exceeded: slow down)"
        );
        assert_eq!(err.thread_id.as_deref(), Some("thread_1"));
    }
}
