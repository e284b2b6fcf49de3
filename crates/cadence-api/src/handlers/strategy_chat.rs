use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use cadence_strategy::{CreatorProfile, InstructionsBuilder, MissionMap, StrategyContext, TurnInput};

use crate::{
    error::{ApiError, ApiResult, ErrorBody},
    routes::{parse_purpose, require, resolve_assistant},
    state::AppState,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StrategyChatRequest {
    #[serde(default, alias = "userId")]
    pub user_id: String,
    /// Continue this vendor thread; a new one is created when absent
    #[serde(default, alias = "threadId")]
    pub thread_id: Option<String>,
    #[serde(default, alias = "userMessage")]
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
pub struct StrategyChatResponse {
    pub success: bool,
    pub thread_id: String,
    pub run_id: String,
    /// Assistant reply text
    pub message: String,
    /// The reply carried a completion marker
    pub completed: bool,
    pub content_ideas: Vec<String>,
    #[schema(value_type = Option<Object>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission_map: Option<MissionMap>,
}

/// Run one full strategy turn and wait for the assistant's reply
///
/// Appends the message, starts a run with the creator's profile as extra
/// instructions, polls it to a terminal status and returns the newest
/// assistant message. Content ideas and the mission map are extracted once
/// the reply marks the conversation as complete.
#[utoipa::path(
    post,
    path = "/strategy-chat",
    request_body = StrategyChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = StrategyChatResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 422, description = "Run requires tool outputs", body = ErrorBody),
        (status = 502, description = "Assistant API error or failed run", body = ErrorBody),
        (status = 504, description = "Run did not finish in time", body = ErrorBody)
    ),
    tag = "strategy"
)]
pub async fn strategy_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StrategyChatRequest>, JsonRejection>,
) -> ApiResult<Json<StrategyChatResponse>> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    require("user_id", &req.user_id)?;
    require("message", &req.message)?;
    let purpose = parse_purpose(req.purpose.as_deref())?;

    let thread_id = req.thread_id.filter(|id| !id.trim().is_empty());
    let assistant_id = resolve_assistant(&state, thread_id.as_deref(), purpose).await;

    let instructions = InstructionsBuilder::new()
        .profile(req.onboarding)
        .strategy(req.strategy)
        .extra(req.instructions)
        .build();

    let mut input = TurnInput::new(&req.user_id, assistant_id, &req.message)
        .with_instructions(instructions)
        .with_purpose(purpose);
    if let Some(thread_id) = thread_id {
        input = input.with_thread_id(thread_id);
    }

    let output = state.orchestrator.run_turn(input).await?;

    Ok(Json(StrategyChatResponse {
        success: true,
        thread_id: output.thread_id,
        run_id: output.run_id,
        message: output.reply,
        completed: output.completed,
        content_ideas: output.content_ideas,
        mission_map: output.mission_map,
    }))
}
