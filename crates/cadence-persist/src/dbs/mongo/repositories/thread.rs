use bson::doc;
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoThread;
use crate::error::Result;
use crate::models::ThreadPurpose;

#[derive(Clone)]
pub struct MongoThreadRepository {
    collection: Collection<MongoThread>,
}

impl MongoThreadRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("assistant_threads");
        Self { collection }
    }

    /// Insert the thread unless its thread id is already recorded.
    ///
    /// Returns `true` when the upsert created the document.
    pub async fn ensure_thread(&self, thread: MongoThread) -> Result<bool> {
        let filter = doc! { "thread_id": &thread.thread_id };
        let update = doc! { "$setOnInsert": bson::to_document(&thread)? };
        let result = self
            .collection
            .update_one(filter, update)
            .upsert(true)
            .await?;
        Ok(result.upserted_id.is_some())
    }

    pub async fn get_thread(&self, thread_id: &str) -> Result<Option<MongoThread>> {
        let filter = doc! { "thread_id": thread_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Newest thread for a user and purpose
    pub async fn latest_thread(
        &self,
        user_id: &str,
        purpose: ThreadPurpose,
    ) -> Result<Option<MongoThread>> {
        let filter = doc! { "user_id": user_id, "purpose": purpose.as_str() };
        Ok(self
            .collection
            .find_one(filter)
            .sort(doc! { "created_at": -1 })
            .await?)
    }
}
