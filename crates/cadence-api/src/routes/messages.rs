use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use cadence_persist::DBMessage;
use cadence_strategy::{CreatorProfile, InstructionsBuilder, StrategyContext};

use super::{parse_purpose, require, resolve_assistant};
use crate::{
    error::{ApiError, ApiResult, ErrorBody},
    state::AppState,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SendMessageRequest {
    #[serde(default, alias = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "onboardingData")]
    #[schema(value_type = Option<Object>)]
    pub onboarding: Option<CreatorProfile>,
    #[serde(default, alias = "strategyData")]
    #[schema(value_type = Option<Object>)]
    pub strategy: Option<StrategyContext>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SendMessageResponse {
    pub success: bool,
    pub thread_id: String,
    pub message_id: String,
    pub run_id: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageSource {
    /// Mirrored copy in local storage
    #[default]
    Local,
    /// Read through to the assistant API
    Remote,
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    #[serde(default)]
    pub source: MessageSource,
    pub limit: Option<u32>,
}

/// Message as returned by the list endpoint, regardless of source
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub id: String,
    pub role: String,
    pub content: String,
    /// Unix seconds
    pub created_at: i64,
}

impl From<DBMessage> for MessageResponse {
    fn from(msg: DBMessage) -> Self {
        let role = match msg.role {
            cadence_persist::MessageRole::User => "user",
            cadence_persist::MessageRole::Assistant => "assistant",
        };
        Self {
            id: msg.message_id.unwrap_or(msg.id),
            role: role.to_string(),
            content: msg.content,
            created_at: msg.created_at.timestamp(),
        }
    }
}

impl From<cadence_llm::ThreadMessage> for MessageResponse {
    fn from(msg: cadence_llm::ThreadMessage) -> Self {
        let role = match msg.role {
            cadence_llm::MessageRole::User => "user",
            cadence_llm::MessageRole::Assistant => "assistant",
        };
        Self {
            content: msg.text(),
            id: msg.id,
            role: role.to_string(),
            created_at: msg.created_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ListMessagesResponse {
    pub success: bool,
    pub messages: Vec<MessageResponse>,
}

/// Append a user message and start a run without waiting for it
#[utoipa::path(
    post,
    path = "/threads/{thread_id}/messages",
    params(
        ("thread_id" = String, Path, description = "Vendor thread ID")
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Run started", body = SendMessageResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 502, description = "Assistant API error", body = ErrorBody)
    ),
    tag = "messages"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> ApiResult<Json<SendMessageResponse>> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    require("user_id", &req.user_id)?;
    require("message", &req.message)?;

    let purpose = parse_purpose(req.purpose.as_deref())?;
    let assistant_id = resolve_assistant(&state, Some(thread_id.as_str()), purpose).await;

    let instructions = InstructionsBuilder::new()
        .profile(req.onboarding)
        .strategy(req.strategy)
        .extra(req.instructions)
        .build();

    let started = state
        .orchestrator
        .start_turn(
            &thread_id,
            &req.user_id,
            &assistant_id,
            &req.message,
            Some(instructions),
        )
        .await?;

    Ok(Json(SendMessageResponse {
        success: true,
        thread_id: started.thread_id,
        message_id: started.message_id,
        run_id: started.run_id,
    }))
}

/// List messages of a thread
///
/// `source=local` (default) reads the mirrored copy, oldest first.
/// `source=remote` reads the newest page from the assistant API.
#[utoipa::path(
    get,
    path = "/threads/{thread_id}/messages",
    params(
        ("thread_id" = String, Path, description = "Vendor thread ID"),
        ("source" = Option<String>, Query, description = "local (default) or remote"),
        ("limit" = Option<u32>, Query, description = "Maximum number of messages")
    ),
    responses(
        (status = 200, description = "Messages", body = ListMessagesResponse),
        (status = 502, description = "Assistant API error", body = ErrorBody)
    ),
    tag = "messages"
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> ApiResult<Json<ListMessagesResponse>> {
    let limit = query.limit.map(|l| l.clamp(1, 100));

    let messages: Vec<MessageResponse> = match query.source {
        MessageSource::Local => state
            .persist
            .get_messages(&thread_id, limit.map(i64::from))
            .await?
            .into_iter()
            .map(Into::into)
            .collect(),
        MessageSource::Remote => state
            .orchestrator
            .remote_messages(&thread_id, limit)
            .await?
            .data
            .into_iter()
            .map(Into::into)
            .collect(),
    };

    Ok(Json(ListMessagesResponse {
        success: true,
        messages,
    }))
}
