pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    handlers::strategy_chat,
    middleware::logging,
    routes::{artifacts, health, messages, runs, threads},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Blocking turn
        .route("/strategy-chat", post(strategy_chat::strategy_chat))
        // Threads
        .route("/threads", post(threads::open_thread))
        .route("/threads/latest", get(threads::latest_thread))
        // Messages and runs
        .route(
            "/threads/:thread_id/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route("/threads/:thread_id/runs/:run_id", get(runs::check_run))
        // Artifacts
        .route("/users/:user_id/content-ideas", get(artifacts::list_content_ideas))
        .route("/users/:user_id/mission-map", get(artifacts::latest_mission_map))
        // Docs
        .route("/api-docs/openapi.json", get(openapi::openapi_json));

    let timeout = state.config.request_timeout();

    api_routes
        .layer(axum_middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            cors = cors.allow_origin(origins);
        }

        cors
    } else {
        CorsLayer::new()
    }
}
