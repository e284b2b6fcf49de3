use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    ArtifactDocument, ArtifactKind, ContentIdea, DBMessage, MessageRole, ThreadPurpose,
    ThreadRecord,
};

/// MongoDB-specific thread record. The vendor thread id is the natural key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThread {
    pub thread_id: String,
    pub user_id: String,
    pub purpose: ThreadPurpose,
    pub assistant_id: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub thread_id: String,
    pub user_id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoContentIdea {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub thread_id: String,
    pub idea: String,
    pub position: u32,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoArtifact {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub kind: ArtifactKind,
    pub data: bson::Bson,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

// Conversions between database-agnostic and MongoDB-specific models

impl From<ThreadRecord> for MongoThread {
    fn from(record: ThreadRecord) -> Self {
        Self {
            thread_id: record.thread_id,
            user_id: record.user_id,
            purpose: record.purpose,
            assistant_id: record.assistant_id,
            created_at: record.created_at,
        }
    }
}

impl From<MongoThread> for ThreadRecord {
    fn from(thread: MongoThread) -> Self {
        Self {
            thread_id: thread.thread_id,
            user_id: thread.user_id,
            purpose: thread.purpose,
            assistant_id: thread.assistant_id,
            created_at: thread.created_at,
        }
    }
}

impl From<DBMessage> for MongoMessage {
    fn from(msg: DBMessage) -> Self {
        Self {
            id: msg.id,
            message_id: msg.message_id,
            thread_id: msg.thread_id,
            user_id: msg.user_id,
            role: msg.role,
            content: msg.content,
            created_at: msg.created_at,
        }
    }
}

impl From<MongoMessage> for DBMessage {
    fn from(msg: MongoMessage) -> Self {
        Self {
            id: msg.id,
            message_id: msg.message_id,
            thread_id: msg.thread_id,
            user_id: msg.user_id,
            role: msg.role,
            content: msg.content,
            created_at: msg.created_at,
        }
    }
}

impl From<ContentIdea> for MongoContentIdea {
    fn from(idea: ContentIdea) -> Self {
        Self {
            id: idea.id,
            user_id: idea.user_id,
            thread_id: idea.thread_id,
            idea: idea.idea,
            position: idea.position,
            generated_at: idea.generated_at,
        }
    }
}

impl From<MongoContentIdea> for ContentIdea {
    fn from(idea: MongoContentIdea) -> Self {
        Self {
            id: idea.id,
            user_id: idea.user_id,
            thread_id: idea.thread_id,
            idea: idea.idea,
            position: idea.position,
            generated_at: idea.generated_at,
        }
    }
}

impl TryFrom<ArtifactDocument> for MongoArtifact {
    type Error = bson::ser::Error;

    fn try_from(artifact: ArtifactDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: artifact.id,
            user_id: artifact.user_id,
            kind: artifact.kind,
            data: bson::to_bson(&artifact.data)?,
            created_at: artifact.created_at,
        })
    }
}

impl From<MongoArtifact> for ArtifactDocument {
    fn from(artifact: MongoArtifact) -> Self {
        Self {
            id: artifact.id,
            user_id: artifact.user_id,
            kind: artifact.kind,
            data: artifact.data.into_relaxed_extjson(),
            created_at: artifact.created_at,
        }
    }
}
