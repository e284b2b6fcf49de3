pub mod thread;
pub mod run;
pub mod message;

pub use thread::AssistantThread;
pub use run::{Run, RunError, RunStatus};
pub use message::{MessageContent, MessageList, MessageRole, MessageText, ThreadMessage};
