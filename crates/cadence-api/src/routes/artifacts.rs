use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use cadence_persist::{ArtifactKind, ContentIdea};

use crate::{
    error::{ApiResult, ErrorBody},
    state::AppState,
};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ContentIdeaResponse {
    pub idea: String,
    pub thread_id: String,
    pub position: u32,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ContentIdea> for ContentIdeaResponse {
    fn from(idea: ContentIdea) -> Self {
        Self {
            idea: idea.idea,
            thread_id: idea.thread_id,
            position: idea.position,
            generated_at: idea.generated_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ContentIdeasResponse {
    pub success: bool,
    pub content_ideas: Vec<ContentIdeaResponse>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MissionMapResponse {
    pub success: bool,
    #[schema(value_type = Option<Object>)]
    pub mission_map: Option<serde_json::Value>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Content ideas stored for a user, newest batch first
#[utoipa::path(
    get,
    path = "/users/{user_id}/content-ideas",
    params(
        ("user_id" = String, Path, description = "Creator ID")
    ),
    responses(
        (status = 200, description = "Stored ideas", body = ContentIdeasResponse),
        (status = 500, description = "Storage error", body = ErrorBody)
    ),
    tag = "artifacts"
)]
pub async fn list_content_ideas(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ContentIdeasResponse>> {
    let ideas = state.persist.list_content_ideas(&user_id).await?;

    Ok(Json(ContentIdeasResponse {
        success: true,
        content_ideas: ideas.into_iter().map(Into::into).collect(),
    }))
}

/// Latest mission map of a user; `mission_map` is null when none was extracted yet
#[utoipa::path(
    get,
    path = "/users/{user_id}/mission-map",
    params(
        ("user_id" = String, Path, description = "Creator ID")
    ),
    responses(
        (status = 200, description = "Latest mission map", body = MissionMapResponse),
        (status = 500, description = "Storage error", body = ErrorBody)
    ),
    tag = "artifacts"
)]
pub async fn latest_mission_map(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<MissionMapResponse>> {
    let artifact = state
        .persist
        .latest_artifact(&user_id, ArtifactKind::MissionMap)
        .await?;

    let (mission_map, created_at) = match artifact {
        Some(doc) => (Some(doc.data), Some(doc.created_at)),
        None => (None, None),
    };

    Ok(Json(MissionMapResponse {
        success: true,
        mission_map,
        created_at,
    }))
}
