pub mod types;
pub mod completion;
pub mod extract;
pub mod instructions;
pub mod sleeper;
pub mod error;
pub mod orchestrator;
pub mod builder;

pub use types::{OpenedThread, OrchestratorConfig, PollConfig, StartedTurn, TurnInput, TurnOutput};
pub use completion::{has_completion_marker, TurnState};
pub use extract::{Extraction, ExtractionStrategy, Extractor, MissionMap, Phase};
pub use instructions::{CreatorProfile, InstructionsBuilder, StrategyContext};
pub use sleeper::{NoopSleeper, Sleeper, TokioSleeper};
pub use error::{Result, TurnError, TurnErrorKind};
pub use orchestrator::StrategyOrchestrator;
pub use builder::OrchestratorBuilder;
