use bson::doc;
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoContentIdea;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoIdeaRepository {
    collection: Collection<MongoContentIdea>,
}

impl MongoIdeaRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("content_ideas");
        Self { collection }
    }

    pub async fn save_ideas(&self, ideas: Vec<MongoContentIdea>) -> Result<()> {
        if ideas.is_empty() {
            return Ok(());
        }
        self.collection.insert_many(ideas).await?;
        Ok(())
    }

    pub async fn list_ideas(&self, user_id: &str) -> Result<Vec<MongoContentIdea>> {
        let filter = doc! { "user_id": user_id };
        let ideas = self
            .collection
            .find(filter)
            .sort(doc! { "generated_at": -1, "position": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(ideas)
    }
}
