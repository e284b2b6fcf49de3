mod db_message;
mod db_thread;
mod artifact;

// Export database-agnostic models
pub use db_message::{DBMessage, MessageRole};
pub use db_thread::{ThreadPurpose, ThreadRecord};
pub use artifact::{ArtifactDocument, ArtifactKind, ContentIdea};
