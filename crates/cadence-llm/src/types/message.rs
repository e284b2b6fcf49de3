use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A message as the vendor stores it on a thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: String,
    #[serde(default)]
    pub thread_id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<MessageContent>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

impl ThreadMessage {
    /// Concatenated text of all text parts (non-text parts are skipped)
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                MessageContent::Text { text } => Some(text.value.as_str()),
                MessageContent::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}

/// Content part of a thread message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: MessageText },
    /// Image files, refusals and anything else we do not render
    #[serde(other)]
    Other,
}

impl MessageContent {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            text: MessageText {
                value: value.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageText {
    pub value: String,
}

/// Page of messages returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageList {
    pub data: Vec<ThreadMessage>,
    #[serde(default)]
    pub first_id: Option<String>,
    #[serde(default)]
    pub last_id: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl MessageList {
    /// Most recent assistant message. Ties on `created_at` (second resolution)
    /// go to the one listed first, which is the newest for a `desc` page.
    pub fn latest_assistant(&self) -> Option<&ThreadMessage> {
        self.data
            .iter()
            .filter(|m| m.is_assistant())
            .min_by_key(|m| std::cmp::Reverse(m.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_skips_non_text_parts() {
        let json = r#"{
            "id": "msg_1",
            "thread_id": "thread_1",
            "role": "assistant",
            "created_at": 10,
            "content": [
                {"type": "image_file", "image_file": {"file_id": "file_1"}},
                {"type": "text", "text": {"value": "Hello", "annotations": []}}
            ]
        }"#;
        let message: ThreadMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.content.len(), 2);
        assert_eq!(message.text(), "Hello");
    }

    #[test]
    fn test_latest_assistant_uses_created_at() {
        let list = MessageList {
            data: vec![
                ThreadMessage {
                    id: "old".into(),
                    thread_id: "t".into(),
                    role: MessageRole::Assistant,
                    content: vec![MessageContent::text("first")],
                    created_at: 1,
                    run_id: None,
                },
                ThreadMessage {
                    id: "user".into(),
                    thread_id: "t".into(),
                    role: MessageRole::User,
                    content: vec![MessageContent::text("hi")],
                    created_at: 3,
                    run_id: None,
                },
                ThreadMessage {
                    id: "new".into(),
                    thread_id: "t".into(),
                    role: MessageRole::Assistant,
                    content: vec![MessageContent::text("second")],
                    created_at: 2,
                    run_id: None,
                },
            ],
            first_id: None,
            last_id: None,
            has_more: false,
        };

        assert_eq!(list.latest_assistant().unwrap().id, "new");
    }
}
