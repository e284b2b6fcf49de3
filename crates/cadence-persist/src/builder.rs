use std::sync::Arc;

use crate::error::Result;
use crate::memory::InMemoryPersistenceClient;
use crate::trait_client::PersistenceClient;

const DEFAULT_DATABASE: &str = "cadence";

/// Picks a persistence backend.
///
/// With a MongoDB URI (and the `mongodb` feature) a Mongo client is built;
/// otherwise everything lives in memory for the lifetime of the process.
pub struct PersistClientBuilder {
    mongodb_uri: Option<String>,
    database: Option<String>,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            mongodb_uri: None,
            database: None,
        }
    }

    pub fn mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        self.mongodb_uri = (!uri.trim().is_empty()).then_some(uri);
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = Some(db.into());
        self
    }

    pub async fn build(self) -> Result<Arc<dyn PersistenceClient>> {
        let database = self
            .database
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        match self.mongodb_uri {
            #[cfg(feature = "mongodb")]
            Some(uri) => {
                let client = crate::dbs::mongo::MongoPersistenceClient::connect(&uri, &database).await?;
                Ok(Arc::new(client))
            }
            #[cfg(not(feature = "mongodb"))]
            Some(_) => {
                tracing::warn!(
                    database = %database,
                    "MongoDB URI set but the mongodb feature is disabled; using in-memory storage"
                );
                Ok(Arc::new(InMemoryPersistenceClient::new()))
            }
            None => {
                tracing::info!("no MongoDB URI configured; using in-memory storage");
                Ok(Arc::new(InMemoryPersistenceClient::new()))
            }
        }
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_without_uri_uses_memory() {
        let client = PersistClientBuilder::new()
            .mongodb_uri("   ")
            .database("test")
            .build()
            .await
            .unwrap();

        client.ping().await.unwrap();
        assert!(client.get_thread("missing").await.unwrap().is_none());
    }
}
