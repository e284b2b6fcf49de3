// Configuration for the assistant client, plus a small factory so callers can
// hold the client behind `Arc<dyn AssistantsClient>`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AssistantError, Result};
use crate::traits::AssistantsClient;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const ASSISTANTS_BETA: &str = "assistants=v2";

/// Configuration for the OpenAI Assistants API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL for the API (defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Value of the `OpenAI-Beta` header selecting the API revision
    #[serde(default = "default_beta")]
    pub beta: String,
}

fn default_beta() -> String {
    ASSISTANTS_BETA.to_string()
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            beta: default_beta(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_beta(mut self, beta: impl Into<String>) -> Self {
        self.beta = beta.into();
        self
    }

    /// Base URL without a trailing slash
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(OPENAI_API_BASE)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AssistantError::InvalidConfig(
                "API key is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Factory for creating assistant clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_client(config: OpenAIConfig) -> Result<Arc<dyn AssistantsClient>> {
        let client = crate::openai::OpenAIAssistantsClient::from_config(config)?;
        Ok(Arc::new(client))
    }
}
