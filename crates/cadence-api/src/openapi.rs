use axum::Json;
use utoipa::OpenApi;

use crate::{
    error::ErrorBody,
    handlers::strategy_chat,
    routes::{artifacts, health, messages, runs, threads},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Cadence API", description = "Strategy chat relay for creators"),
    paths(
        health::health_check,
        strategy_chat::strategy_chat,
        threads::open_thread,
        threads::latest_thread,
        messages::send_message,
        messages::list_messages,
        runs::check_run,
        artifacts::list_content_ideas,
        artifacts::latest_mission_map,
    ),
    components(schemas(
        ErrorBody,
        health::HealthResponse,
        strategy_chat::StrategyChatRequest,
        strategy_chat::StrategyChatResponse,
        threads::OpenThreadRequest,
        threads::OpenThreadResponse,
        threads::ThreadResponse,
        messages::SendMessageRequest,
        messages::SendMessageResponse,
        messages::MessageResponse,
        messages::ListMessagesResponse,
        runs::RunStatusResponse,
        artifacts::ContentIdeaResponse,
        artifacts::ContentIdeasResponse,
        artifacts::MissionMapResponse,
    )),
    tags(
        (name = "health", description = "Liveness and dependency status"),
        (name = "strategy", description = "Blocking strategy turns"),
        (name = "threads", description = "Thread lifecycle"),
        (name = "messages", description = "Non-blocking message steps"),
        (name = "runs", description = "Run status"),
        (name = "artifacts", description = "Extracted content ideas and mission maps")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
