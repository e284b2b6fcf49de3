use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cadence_api::{build_router, config::Config, state::AppState};
use cadence_llm::ClientFactory;
use cadence_persist::PersistClientBuilder;
use cadence_strategy::StrategyOrchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    tracing::info!("Starting Cadence API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize assistant client
    let client = ClientFactory::create_client(config.openai_config())?;

    // Initialize persistence client
    let persistence = PersistClientBuilder::new()
        .mongodb_uri(config.mongodb_uri.clone().unwrap_or_default())
        .database(&config.mongodb.database)
        .build()
        .await?;

    let orchestrator = StrategyOrchestrator::builder()
        .client(client)
        .persistence(persistence)
        .config(config.assistant.orchestrator_config())
        .build()?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, orchestrator));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
