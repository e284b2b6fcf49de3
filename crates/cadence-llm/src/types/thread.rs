use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Conversation handle owned by the assistant vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantThread {
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}
