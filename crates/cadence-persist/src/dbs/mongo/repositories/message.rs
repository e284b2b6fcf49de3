use bson::doc;
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoMessage;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<MongoMessage>,
}

impl MongoMessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("assistant_messages");
        Self { collection }
    }

    pub async fn save_message(&self, message: MongoMessage) -> Result<()> {
        self.collection.insert_one(&message).await?;
        Ok(())
    }

    /// Messages for a thread, oldest first. With a limit, only the most
    /// recent `limit` messages are returned.
    pub async fn get_messages(
        &self,
        thread_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<MongoMessage>> {
        let filter = doc! { "thread_id": thread_id };

        let Some(limit) = limit else {
            let messages = self
                .collection
                .find(filter)
                .sort(doc! { "created_at": 1 })
                .await?
                .try_collect()
                .await?;
            return Ok(messages);
        };

        let mut messages: Vec<MongoMessage> = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        messages.reverse();
        Ok(messages)
    }
}
