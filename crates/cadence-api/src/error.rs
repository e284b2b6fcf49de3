use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use cadence_strategy::{TurnError, TurnErrorKind};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Persistence error: {0}")]
    Persist(#[from] cadence_persist::PersistError),

    #[error(transparent)]
    Turn(#[from] TurnError),
}

/// Failure payload shared by every endpoint
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Vendor run status, when a run ended badly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            thread_id: None,
            status: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::ThreadNotFound(_) => (StatusCode::NOT_FOUND, ErrorBody::new(self.to_string())),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorBody::new(self.to_string())),
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Storage error"),
                )
            }
            ApiError::Turn(err) => turn_error_response(err),
        };

        (status, Json(body)).into_response()
    }
}

fn turn_error_response(err: TurnError) -> (StatusCode, ErrorBody) {
    let message = err.to_string();
    let mut body = ErrorBody::new(message);
    body.thread_id = err.thread_id.clone();

    let status = match &err.kind {
        TurnErrorKind::Vendor(e) => {
            tracing::error!(thread_id = ?err.thread_id, vendor_status = ?e.status(), "Assistant API error: {}", e);
            StatusCode::BAD_GATEWAY
        }
        TurnErrorKind::RunFailed { status, .. } => {
            tracing::error!(thread_id = ?err.thread_id, "Run failed: {}", err);
            body.status = Some(status.to_string());
            StatusCode::BAD_GATEWAY
        }
        TurnErrorKind::NoReply => {
            tracing::error!(thread_id = ?err.thread_id, "{}", err);
            StatusCode::BAD_GATEWAY
        }
        TurnErrorKind::TimedOut { .. } => {
            tracing::error!(thread_id = ?err.thread_id, "Run timed out: {}", err);
            body.status = Some("timeout".to_string());
            StatusCode::GATEWAY_TIMEOUT
        }
        TurnErrorKind::ActionRequired { .. } => {
            tracing::error!(thread_id = ?err.thread_id, "{}", err);
            body.status = Some("requires_action".to_string());
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TurnErrorKind::Config(msg) => {
            tracing::error!("Config error: {}", msg);
            body.error = "Configuration error".to_string();
            StatusCode::INTERNAL_SERVER_ERROR
        }
        TurnErrorKind::Persist(e) => {
            tracing::error!("Persistence error: {}", e);
            body.error = "Storage error".to_string();
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, body)
}

pub type ApiResult<T> = Result<T, ApiError>;
