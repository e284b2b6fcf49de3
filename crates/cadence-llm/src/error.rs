use thiserror::Error;

/// Failures talking to the assistant vendor.
///
/// None of these are retried by the client; callers decide what to do.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// The vendor answered with a non-2xx status.
    #[error("Assistant API error ({status}) during {operation}: {message}")]
    Api {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("HTTP transport error during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl AssistantError {
    /// HTTP status reported by the vendor, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            AssistantError::Api { status, .. } => Some(*status),
            AssistantError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
