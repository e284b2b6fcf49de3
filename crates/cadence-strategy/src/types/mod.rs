pub mod config;
pub mod turn;

pub use config::{OrchestratorConfig, PollConfig};
pub use turn::{OpenedThread, StartedTurn, TurnInput, TurnOutput};
