use config::{Config as ConfigLoader, ConfigBuilder, ConfigError, File};
use config::builder::DefaultState;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use cadence_llm::OpenAIConfig;
use cadence_persist::ThreadPurpose;
use cadence_strategy::{OrchestratorConfig, PollConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub mongodb: MongoDbConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: Option<String>,
    #[serde(default)]
    pub openai_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole request, including run polling
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoDbConfig {
    pub database: String,
}

impl Default for MongoDbConfig {
    fn default() -> Self {
        Self {
            database: "cadence".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Assistant used for strategy threads
    #[serde(default)]
    pub assistant_id: String,
    /// Assistant for content-plan threads; falls back to `assistant_id`
    #[serde(default)]
    pub content_plan_assistant_id: Option<String>,
    /// Override of the vendor API base URL
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
    #[serde(default = "default_message_limit")]
    pub message_limit: u32,
}

const MAX_POLL_INTERVAL_MS: u64 = 60_000;

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_poll_attempts() -> u32 {
    30
}

fn default_message_limit() -> u32 {
    20
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            assistant_id: String::new(),
            content_plan_assistant_id: None,
            base_url: None,
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            message_limit: default_message_limit(),
        }
    }
}

impl AssistantConfig {
    /// Assistant that serves threads of `purpose`
    pub fn assistant_for(&self, purpose: ThreadPurpose) -> &str {
        match purpose {
            ThreadPurpose::ContentPlan | ThreadPurpose::ContentPlanning => self
                .content_plan_assistant_id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or(&self.assistant_id),
            ThreadPurpose::Strategy => &self.assistant_id,
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::new()
            .with_poll(
                PollConfig::new()
                    .with_max_attempts(self.max_poll_attempts)
                    .with_interval(Duration::from_millis(self.poll_interval_ms)),
            )
            .with_message_limit(self.message_limit)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Environment variables that override file settings
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_REQUEST_TIMEOUT_SECS", "server.request_timeout_secs"),
    ("MONGODB_DATABASE", "mongodb.database"),
    ("ASSISTANT_ID", "assistant.assistant_id"),
    ("ASSISTANT_CONTENT_PLAN_ID", "assistant.content_plan_assistant_id"),
    ("ASSISTANT_BASE_URL", "assistant.base_url"),
    ("ASSISTANT_POLL_INTERVAL_MS", "assistant.poll_interval_ms"),
    ("ASSISTANT_MAX_POLL_ATTEMPTS", "assistant.max_poll_attempts"),
    ("ASSISTANT_MESSAGE_LIMIT", "assistant.message_limit"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, MONGODB_, ASSISTANT_, LOG_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            // 1. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 2. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        // 3. Environment variables override everything
        let builder = apply_env_overrides(builder, |name| std::env::var(name).ok())?;

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        cfg.mongodb_uri = std::env::var("MONGODB_URI")
            .ok()
            .filter(|uri| !uri.trim().is_empty());

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Reject configurations the relay cannot serve requests with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.openai_api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "OPENAI_API_KEY environment variable is required".to_string(),
            ));
        }
        if self.assistant.assistant_id.trim().is_empty() {
            return Err(ConfigError::Message(
                "assistant.assistant_id (ASSISTANT_ID) is required".to_string(),
            ));
        }
        if self.assistant.max_poll_attempts == 0 {
            return Err(ConfigError::Message(
                "assistant.max_poll_attempts must be at least 1".to_string(),
            ));
        }
        if self.assistant.poll_interval_ms > MAX_POLL_INTERVAL_MS {
            return Err(ConfigError::Message(format!(
                "assistant.poll_interval_ms must be at most {}",
                MAX_POLL_INTERVAL_MS
            )));
        }
        Ok(())
    }

    pub fn openai_config(&self) -> OpenAIConfig {
        let mut config = OpenAIConfig::new(self.openai_api_key.clone());
        if let Some(base_url) = &self.assistant.base_url {
            config = config.with_base_url(base_url.clone());
        }
        config
    }

    /// Request timeout, never shorter than the polling budget
    pub fn request_timeout(&self) -> Duration {
        let configured = Duration::from_secs(self.server.request_timeout_secs);
        let polling = self.assistant.orchestrator_config().poll.budget();
        configured.max(polling.saturating_add(Duration::from_secs(15)))
    }
}

fn apply_env_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for &(var, key) in ENV_OVERRIDES {
        builder = builder.set_override_option(key, lookup(var))?;
    }
    Ok(builder)
}
