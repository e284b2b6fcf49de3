use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{ArtifactDocument, ArtifactKind, ContentIdea, DBMessage, ThreadPurpose, ThreadRecord};
use crate::trait_client::PersistenceClient;

#[derive(Default)]
struct Tables {
    threads: Vec<ThreadRecord>,
    messages: Vec<DBMessage>,
    ideas: Vec<ContentIdea>,
    artifacts: Vec<ArtifactDocument>,
}

/// In-memory storage for tests and local development.
///
/// Rows are kept in insertion order, which doubles as the tie-breaker when
/// timestamps are equal.
#[derive(Default)]
pub struct InMemoryPersistenceClient {
    tables: RwLock<Tables>,
}

impl InMemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of thread records, for assertions in tests
    pub async fn thread_count(&self) -> usize {
        self.tables.read().await.threads.len()
    }
}

#[async_trait]
impl PersistenceClient for InMemoryPersistenceClient {
    async fn ensure_thread(&self, record: ThreadRecord) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.threads.iter().any(|t| t.thread_id == record.thread_id) {
            return Ok(false);
        }
        tables.threads.push(record);
        Ok(true)
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<ThreadRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.threads.iter().find(|t| t.thread_id == thread_id).cloned())
    }

    async fn latest_thread(
        &self,
        user_id: &str,
        purpose: ThreadPurpose,
    ) -> Result<Option<ThreadRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .threads
            .iter()
            .filter(|t| t.user_id == user_id && t.purpose == purpose)
            // max_by_key keeps the last maximum, so ties go to the newest insert
            .max_by_key(|t| t.created_at)
            .cloned())
    }

    async fn save_message(&self, message: DBMessage) -> Result<()> {
        self.tables.write().await.messages.push(message);
        Ok(())
    }

    async fn get_messages(&self, thread_id: &str, limit: Option<i64>) -> Result<Vec<DBMessage>> {
        let tables = self.tables.read().await;
        let mut messages: Vec<DBMessage> = tables
            .messages
            .iter()
            .filter(|m| m.thread_id == thread_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);

        // Keep the most recent `limit`, still oldest first
        if let Some(limit) = limit {
            let limit = limit.max(0) as usize;
            if messages.len() > limit {
                messages.drain(..messages.len() - limit);
            }
        }
        Ok(messages)
    }

    async fn save_content_ideas(&self, ideas: Vec<ContentIdea>) -> Result<()> {
        self.tables.write().await.ideas.extend(ideas);
        Ok(())
    }

    async fn list_content_ideas(&self, user_id: &str) -> Result<Vec<ContentIdea>> {
        let tables = self.tables.read().await;
        let mut ideas: Vec<ContentIdea> = tables
            .ideas
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();
        ideas.sort_by(|a, b| {
            b.generated_at
                .cmp(&a.generated_at)
                .then(a.position.cmp(&b.position))
        });
        Ok(ideas)
    }

    async fn save_artifact(&self, artifact: ArtifactDocument) -> Result<()> {
        self.tables.write().await.artifacts.push(artifact);
        Ok(())
    }

    async fn latest_artifact(
        &self,
        user_id: &str,
        kind: ArtifactKind,
    ) -> Result<Option<ArtifactDocument>> {
        let tables = self.tables.read().await;
        Ok(tables
            .artifacts
            .iter()
            .filter(|a| a.user_id == user_id && a.kind == kind)
            .max_by_key(|a| a.created_at)
            .cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_ensure_thread_is_idempotent() {
        let store = InMemoryPersistenceClient::new();
        let record = ThreadRecord::new("thread_1", "user_1", ThreadPurpose::Strategy, "asst_1");

        assert!(store.ensure_thread(record.clone()).await.unwrap());
        assert!(!store.ensure_thread(record).await.unwrap());
        assert_eq!(store.thread_count().await, 1);
    }

    #[tokio::test]
    async fn test_latest_thread_filters_by_purpose() {
        let store = InMemoryPersistenceClient::new();
        store
            .ensure_thread(ThreadRecord::new("t_plan", "u", ThreadPurpose::ContentPlan, "a"))
            .await
            .unwrap();
        store
            .ensure_thread(ThreadRecord::new("t_old", "u", ThreadPurpose::Strategy, "a"))
            .await
            .unwrap();
        store
            .ensure_thread(ThreadRecord::new("t_new", "u", ThreadPurpose::Strategy, "a"))
            .await
            .unwrap();

        let latest = store.latest_thread("u", ThreadPurpose::Strategy).await.unwrap().unwrap();
        assert_eq!(latest.thread_id, "t_new");
        assert!(store.latest_thread("other", ThreadPurpose::Strategy).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_messages_limit_keeps_most_recent() {
        let store = InMemoryPersistenceClient::new();
        for i in 0..5 {
            store
                .save_message(DBMessage::user("t", "u", format!("m{}", i)))
                .await
                .unwrap();
        }

        let messages = store.get_messages("t", Some(2)).await.unwrap();
        let contents: Vec<_> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m4"]);
    }

    #[tokio::test]
    async fn test_content_ideas_keep_batch_order() {
        let store = InMemoryPersistenceClient::new();
        let batch = ContentIdea::batch("u", "t", vec!["b".to_string(), "a".to_string()]);
        store.save_content_ideas(batch).await.unwrap();

        let ideas: Vec<_> = store
            .list_content_ideas("u")
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.idea)
            .collect();
        assert_eq!(ideas, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_latest_artifact_by_kind() {
        let store = InMemoryPersistenceClient::new();
        store
            .save_artifact(ArtifactDocument::new("u", ArtifactKind::MissionMap, json!({"v": 1})))
            .await
            .unwrap();
        store
            .save_artifact(ArtifactDocument::new("u", ArtifactKind::MissionMap, json!({"v": 2})))
            .await
            .unwrap();

        let latest = store
            .latest_artifact("u", ArtifactKind::MissionMap)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.data["v"], 2);
        assert!(store
            .latest_artifact("u", ArtifactKind::DeepProfile)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_latest_thread_prefers_newest_insert_on_tie() {
        let store = InMemoryPersistenceClient::new();
        let old = ThreadRecord::new("t_old", "u", ThreadPurpose::Strategy, "a");
        let mut new = ThreadRecord::new("t_new", "u", ThreadPurpose::Strategy, "a");
        new.created_at = old.created_at;

        store.ensure_thread(old).await.unwrap();
        store.ensure_thread(new).await.unwrap();

        let latest = store.latest_thread("u", ThreadPurpose::Strategy).await.unwrap().unwrap();
        assert_eq!(latest.thread_id, "t_new");
    }

    #[tokio::test]
    async fn test_latest_artifact_prefers_newest_insert_on_tie() {
        let store = InMemoryPersistenceClient::new();
        let first = ArtifactDocument::new("u", ArtifactKind::MissionMap, json!({"v": 1}));
        let mut second = ArtifactDocument::new("u", ArtifactKind::MissionMap, json!({"v": 2}));
        second.created_at = first.created_at;

        store.save_artifact(first).await.unwrap();
        store.save_artifact(second).await.unwrap();

        let latest = store
            .latest_artifact("u", ArtifactKind::MissionMap)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.data["v"], 2);
    }
}
