pub mod models;
pub mod trait_client;
pub mod memory;
pub mod error;
pub mod builder;
#[cfg(feature = "mongodb")]
pub mod dbs;

pub use models::{
    ArtifactDocument, ArtifactKind, ContentIdea, DBMessage, MessageRole, ThreadPurpose,
    ThreadRecord,
};
pub use trait_client::PersistenceClient;
pub use memory::InMemoryPersistenceClient;
pub use error::{PersistError, Result};
pub use builder::PersistClientBuilder;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
