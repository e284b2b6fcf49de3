pub mod artifacts;
pub mod health;
pub mod messages;
pub mod runs;
pub mod threads;

use cadence_persist::ThreadPurpose;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Parse an optional purpose tag, defaulting to `strategy`
pub(crate) fn parse_purpose(purpose: Option<&str>) -> ApiResult<ThreadPurpose> {
    match purpose.map(str::trim).filter(|p| !p.is_empty()) {
        Some(purpose) => purpose.parse().map_err(ApiError::BadRequest),
        None => Ok(ThreadPurpose::default()),
    }
}

pub(crate) fn require(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}

/// Assistant recorded for the thread, else the configured one for `purpose`
pub(crate) async fn resolve_assistant(
    state: &AppState,
    thread_id: Option<&str>,
    purpose: ThreadPurpose,
) -> String {
    if let Some(thread_id) = thread_id {
        match state.persist.get_thread(thread_id).await {
            Ok(Some(record)) if !record.assistant_id.is_empty() => return record.assistant_id,
            Ok(_) => {}
            Err(e) => tracing::warn!(thread_id = %thread_id, "Thread lookup failed: {}", e),
        }
    }
    state.config.assistant.assistant_for(purpose).to_string()
}
