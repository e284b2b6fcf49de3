use std::sync::Arc;

use cadence_llm::AssistantsClient;
use cadence_persist::{InMemoryPersistenceClient, PersistenceClient};

use crate::error::{Result, TurnError, TurnErrorKind};
use crate::extract::Extractor;
use crate::orchestrator::StrategyOrchestrator;
use crate::sleeper::{Sleeper, TokioSleeper};
use crate::types::OrchestratorConfig;

/// Builder for constructing a StrategyOrchestrator with optional components
pub struct OrchestratorBuilder {
    client: Option<Arc<dyn AssistantsClient>>,
    persistence: Option<Arc<dyn PersistenceClient>>,
    extractor: Option<Extractor>,
    sleeper: Option<Arc<dyn Sleeper>>,
    config: OrchestratorConfig,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            persistence: None,
            extractor: None,
            sleeper: None,
            config: OrchestratorConfig::default(),
        }
    }

    /// Set the assistant API client
    pub fn client(mut self, client: Arc<dyn AssistantsClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the storage backend. Defaults to in-memory storage.
    pub fn persistence(mut self, persistence: Arc<dyn PersistenceClient>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Replace the sleep between polls
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<StrategyOrchestrator> {
        let client = self.client.ok_or_else(|| {
            TurnError::new(None, TurnErrorKind::Config("assistant client is required".to_string()))
        })?;

        Ok(StrategyOrchestrator::new(
            client,
            self.persistence
                .unwrap_or_else(|| Arc::new(InMemoryPersistenceClient::new())),
            self.extractor.unwrap_or_default(),
            self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            self.config,
        ))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
