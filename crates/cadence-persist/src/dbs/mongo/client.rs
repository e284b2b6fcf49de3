use async_trait::async_trait;
use bson::doc;
use mongodb::Client;

use crate::dbs::mongo::models::{MongoArtifact, MongoContentIdea, MongoMessage};
use crate::dbs::mongo::repositories::{
    MongoArtifactRepository, MongoIdeaRepository, MongoMessageRepository, MongoThreadRepository,
};
use crate::error::{PersistError, Result};
use crate::models::{
    ArtifactDocument, ArtifactKind, ContentIdea, DBMessage, ThreadPurpose, ThreadRecord,
};
use crate::trait_client::PersistenceClient;

pub struct MongoPersistenceClient {
    client: Client,
    database: String,
    thread_repo: MongoThreadRepository,
    message_repo: MongoMessageRepository,
    idea_repo: MongoIdeaRepository,
    artifact_repo: MongoArtifactRepository,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB and create client
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        tracing::info!(database = %database, "connected to MongoDB");

        Ok(Self {
            thread_repo: MongoThreadRepository::new(&client, database),
            message_repo: MongoMessageRepository::new(&client, database),
            idea_repo: MongoIdeaRepository::new(&client, database),
            artifact_repo: MongoArtifactRepository::new(&client, database),
            database: database.to_string(),
            client,
        })
    }
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    async fn ensure_thread(&self, record: ThreadRecord) -> Result<bool> {
        self.thread_repo.ensure_thread(record.into()).await
    }

    async fn get_thread(&self, thread_id: &str) -> Result<Option<ThreadRecord>> {
        let thread = self.thread_repo.get_thread(thread_id).await?;
        Ok(thread.map(Into::into))
    }

    async fn latest_thread(
        &self,
        user_id: &str,
        purpose: ThreadPurpose,
    ) -> Result<Option<ThreadRecord>> {
        let thread = self.thread_repo.latest_thread(user_id, purpose).await?;
        Ok(thread.map(Into::into))
    }

    async fn save_message(&self, message: DBMessage) -> Result<()> {
        let mongo_message: MongoMessage = message.into();
        self.message_repo.save_message(mongo_message).await
    }

    async fn get_messages(&self, thread_id: &str, limit: Option<i64>) -> Result<Vec<DBMessage>> {
        let messages = self.message_repo.get_messages(thread_id, limit).await?;
        Ok(messages.into_iter().map(Into::into).collect())
    }

    async fn save_content_ideas(&self, ideas: Vec<ContentIdea>) -> Result<()> {
        let ideas: Vec<MongoContentIdea> = ideas.into_iter().map(Into::into).collect();
        self.idea_repo.save_ideas(ideas).await
    }

    async fn list_content_ideas(&self, user_id: &str) -> Result<Vec<ContentIdea>> {
        let ideas = self.idea_repo.list_ideas(user_id).await?;
        Ok(ideas.into_iter().map(Into::into).collect())
    }

    async fn save_artifact(&self, artifact: ArtifactDocument) -> Result<()> {
        let artifact = MongoArtifact::try_from(artifact)?;
        self.artifact_repo.save_artifact(artifact).await
    }

    async fn latest_artifact(
        &self,
        user_id: &str,
        kind: ArtifactKind,
    ) -> Result<Option<ArtifactDocument>> {
        let artifact = self.artifact_repo.latest_artifact(user_id, kind).await?;
        Ok(artifact.map(Into::into))
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
