use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use cadence_llm::Run;

use crate::{
    error::{ApiResult, ErrorBody},
    state::AppState,
};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RunStatusResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub run: Run,
}

/// Single status read of a run, no polling
#[utoipa::path(
    get,
    path = "/threads/{thread_id}/runs/{run_id}",
    params(
        ("thread_id" = String, Path, description = "Vendor thread ID"),
        ("run_id" = String, Path, description = "Vendor run ID")
    ),
    responses(
        (status = 200, description = "Current run state", body = RunStatusResponse),
        (status = 502, description = "Assistant API error", body = ErrorBody)
    ),
    tag = "runs"
)]
pub async fn check_run(
    State(state): State<Arc<AppState>>,
    Path((thread_id, run_id)): Path<(String, String)>,
) -> ApiResult<Json<RunStatusResponse>> {
    let run = state.orchestrator.check_run(&thread_id, &run_id).await?;
    Ok(Json(RunStatusResponse { success: true, run }))
}
