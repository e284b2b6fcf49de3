use bson::doc;
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoArtifact;
use crate::error::Result;
use crate::models::ArtifactKind;

#[derive(Clone)]
pub struct MongoArtifactRepository {
    collection: Collection<MongoArtifact>,
}

impl MongoArtifactRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("strategy_artifacts");
        Self { collection }
    }

    pub async fn save_artifact(&self, artifact: MongoArtifact) -> Result<()> {
        self.collection.insert_one(&artifact).await?;
        Ok(())
    }

    pub async fn latest_artifact(
        &self,
        user_id: &str,
        kind: ArtifactKind,
    ) -> Result<Option<MongoArtifact>> {
        let filter = doc! { "user_id": user_id, "kind": kind.as_str() };
        Ok(self
            .collection
            .find_one(filter)
            .sort(doc! { "created_at": -1 })
            .await?)
    }
}
