use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One content idea extracted from an assistant reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentIdea {
    pub id: String,
    pub user_id: String,
    pub thread_id: String,
    pub idea: String,
    /// Position inside the batch it was extracted with
    pub position: u32,
    pub generated_at: DateTime<Utc>,
}

impl ContentIdea {
    /// Build a batch sharing one `generated_at`, keeping the input order
    pub fn batch(
        user_id: &str,
        thread_id: &str,
        ideas: impl IntoIterator<Item = String>,
    ) -> Vec<Self> {
        let generated_at = Utc::now();
        ideas
            .into_iter()
            .enumerate()
            .map(|(position, idea)| Self {
                id: uuid::Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                thread_id: thread_id.to_string(),
                idea,
                position: position as u32,
                generated_at,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    MissionMap,
    DeepProfile,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::MissionMap => "mission_map",
            ArtifactKind::DeepProfile => "deep_profile",
        }
    }
}

/// Per-user JSON document (mission map, deep profile). The newest of a kind wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDocument {
    pub id: String,
    pub user_id: String,
    pub kind: ArtifactKind,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ArtifactDocument {
    pub fn new(user_id: impl Into<String>, kind: ArtifactKind, data: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            kind,
            data,
            created_at: Utc::now(),
        }
    }
}
