use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Returns the health status of the API and its storage backend
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let mut services = HashMap::new();

    match state.persist.ping().await {
        Ok(()) => services.insert("storage".to_string(), "connected".to_string()),
        Err(e) => {
            tracing::warn!("Storage health check failed: {}", e);
            services.insert("storage".to_string(), "disconnected".to_string())
        }
    };

    let assistant = if state.config.assistant.assistant_id.is_empty() {
        "unconfigured"
    } else {
        "configured"
    };
    services.insert("assistant".to_string(), assistant.to_string());

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    }))
}
