use std::sync::Arc;

use cadence_persist::PersistenceClient;
use cadence_strategy::StrategyOrchestrator;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The orchestrator is stateless between requests and created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: Arc<dyn PersistenceClient>,
    pub orchestrator: Arc<StrategyOrchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: StrategyOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            persist: Arc::clone(orchestrator.persistence()),
            orchestrator: Arc::new(orchestrator),
        }
    }
}
