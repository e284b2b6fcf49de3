use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ArtifactDocument, ArtifactKind, ContentIdea, DBMessage, ThreadPurpose, ThreadRecord};

/// Trait for database persistence operations
///
/// Implementations provide database-specific CRUD operations. There are no
/// transactions or locks; every call stands on its own.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Insert a thread record unless one with the same thread id exists.
    ///
    /// Returns `true` when a record was inserted.
    async fn ensure_thread(&self, record: ThreadRecord) -> Result<bool>;

    /// Get a thread record by vendor thread id
    async fn get_thread(&self, thread_id: &str) -> Result<Option<ThreadRecord>>;

    /// Newest thread of a user for a purpose
    async fn latest_thread(
        &self,
        user_id: &str,
        purpose: ThreadPurpose,
    ) -> Result<Option<ThreadRecord>>;

    /// Append a mirrored message
    async fn save_message(&self, message: DBMessage) -> Result<()>;

    /// Mirrored messages of a thread, oldest first
    async fn get_messages(&self, thread_id: &str, limit: Option<i64>) -> Result<Vec<DBMessage>>;

    /// Store a batch of content ideas
    async fn save_content_ideas(&self, ideas: Vec<ContentIdea>) -> Result<()>;

    /// Content ideas of a user, newest batch first, batch order preserved
    async fn list_content_ideas(&self, user_id: &str) -> Result<Vec<ContentIdea>>;

    /// Store an artifact document
    async fn save_artifact(&self, artifact: ArtifactDocument) -> Result<()>;

    /// Newest artifact document of a kind for a user
    async fn latest_artifact(
        &self,
        user_id: &str,
        kind: ArtifactKind,
    ) -> Result<Option<ArtifactDocument>>;

    /// Cheap round-trip used by health checks
    async fn ping(&self) -> Result<()>;
}
