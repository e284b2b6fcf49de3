use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use cadence_persist::ThreadRecord;

use super::{parse_purpose, require};
use crate::{
    error::{ApiError, ApiResult, ErrorBody},
    state::AppState,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct OpenThreadRequest {
    #[serde(default, alias = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub purpose: Option<String>,
    /// Overrides the configured assistant
    #[serde(default, alias = "assistantId")]
    pub assistant_id: Option<String>,
    /// Continue this vendor thread instead of resuming or creating one
    #[serde(default, alias = "threadId")]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OpenThreadResponse {
    pub success: bool,
    pub thread_id: String,
    pub purpose: String,
    pub created: bool,
}

#[derive(Debug, Deserialize)]
pub struct LatestThreadQuery {
    #[serde(default, alias = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub purpose: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ThreadResponse {
    pub success: bool,
    pub thread_id: String,
    pub user_id: String,
    pub purpose: String,
    pub assistant_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ThreadRecord> for ThreadResponse {
    fn from(record: ThreadRecord) -> Self {
        Self {
            success: true,
            thread_id: record.thread_id,
            user_id: record.user_id,
            purpose: record.purpose.to_string(),
            assistant_id: record.assistant_id,
            created_at: record.created_at,
        }
    }
}

/// Resume or create the thread for a user and purpose
#[utoipa::path(
    post,
    path = "/threads",
    request_body = OpenThreadRequest,
    responses(
        (status = 201, description = "Thread created", body = OpenThreadResponse),
        (status = 200, description = "Existing thread resumed", body = OpenThreadResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 502, description = "Assistant API error", body = ErrorBody)
    ),
    tag = "threads"
)]
pub async fn open_thread(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<OpenThreadRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<OpenThreadResponse>)> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    require("user_id", &req.user_id)?;
    let purpose = parse_purpose(req.purpose.as_deref())?;

    let assistant_id = req
        .assistant_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| state.config.assistant.assistant_for(purpose).to_string());

    let opened = state
        .orchestrator
        .open_thread(&req.user_id, purpose, &assistant_id, req.thread_id.as_deref())
        .await?;

    let status = if opened.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(OpenThreadResponse {
            success: true,
            thread_id: opened.record.thread_id,
            purpose: opened.record.purpose.to_string(),
            created: opened.created,
        }),
    ))
}

/// Newest thread of a user for a purpose
#[utoipa::path(
    get,
    path = "/threads/latest",
    params(
        ("user_id" = String, Query, description = "Owner of the thread"),
        ("purpose" = Option<String>, Query, description = "strategy (default), content_plan or content_planning")
    ),
    responses(
        (status = 200, description = "Thread record", body = ThreadResponse),
        (status = 404, description = "No thread yet", body = ErrorBody)
    ),
    tag = "threads"
)]
pub async fn latest_thread(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LatestThreadQuery>,
) -> ApiResult<Json<ThreadResponse>> {
    require("user_id", &query.user_id)?;
    let purpose = parse_purpose(query.purpose.as_deref())?;

    let record = state
        .persist
        .latest_thread(&query.user_id, purpose)
        .await?
        .ok_or_else(|| {
            ApiError::ThreadNotFound(format!("no {} thread for user {}", purpose, query.user_id))
        })?;

    Ok(Json(record.into()))
}
