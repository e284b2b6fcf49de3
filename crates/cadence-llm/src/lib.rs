pub mod types;
pub mod traits;
pub mod config;
pub mod error;
pub mod openai;

pub use traits::{AssistantsClient, CreateMessageRequest, CreateRunRequest, ListMessagesQuery, SortOrder};
pub use config::{ClientFactory, OpenAIConfig};
pub use error::{AssistantError, Result};
pub use openai::OpenAIAssistantsClient;
pub use types::{
    AssistantThread, MessageContent, MessageList, MessageRole, Run, RunError, RunStatus,
    ThreadMessage,
};
