pub mod artifact;
pub mod idea;
pub mod message;
pub mod thread;

pub use artifact::MongoArtifactRepository;
pub use idea::MongoIdeaRepository;
pub use message::MongoMessageRepository;
pub use thread::MongoThreadRepository;
