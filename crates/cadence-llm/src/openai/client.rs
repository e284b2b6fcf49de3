// OpenAI Assistants v2 client (HTTP direct, no SDK)

use crate::config::OpenAIConfig;
use crate::error::{AssistantError, Result};
use crate::traits::{AssistantsClient, CreateMessageRequest, CreateRunRequest, ListMessagesQuery};
use crate::types::{AssistantThread, MessageList, Run, ThreadMessage};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;

const OPENAI_BETA: HeaderName = HeaderName::from_static("openai-beta");

pub struct OpenAIAssistantsClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIAssistantsClient {
    /// Create a client against the public API with the default beta header
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(OpenAIConfig::new(api_key))
    }

    pub fn from_config(config: OpenAIConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|_| AssistantError::InvalidConfig("Invalid API key format".to_string()))?,
        );
        headers.insert(
            OPENAI_BETA,
            HeaderValue::from_str(&config.beta)
                .map_err(|_| AssistantError::InvalidConfig("Invalid beta header".to_string()))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AssistantError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.resolved_base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|source| AssistantError::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(operation, status = status.as_u16(), "Assistant API call failed");
            return Err(AssistantError::Api {
                operation,
                status: status.as_u16(),
                message: vendor_error_message(&body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| AssistantError::Transport { operation, source })?;

        serde_json::from_str(&body).map_err(|e| AssistantError::Decode {
            operation,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl AssistantsClient for OpenAIAssistantsClient {
    async fn create_thread(&self) -> Result<AssistantThread> {
        let request = self
            .http_client
            .post(format!("{}/threads", self.base_url))
            .json(&serde_json::json!({}));

        let thread: AssistantThread = self.send("create thread", request).await?;
        tracing::debug!(thread_id = %thread.id, "Created assistant thread");
        Ok(thread)
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> Result<ThreadMessage> {
        let request = self
            .http_client
            .post(format!("{}/threads/{}/messages", self.base_url, thread_id))
            .json(&request);

        self.send("create message", request).await
    }

    async fn create_run(&self, thread_id: &str, request: CreateRunRequest) -> Result<Run> {
        let request = self
            .http_client
            .post(format!("{}/threads/{}/runs", self.base_url, thread_id))
            .json(&request);

        let run: Run = self.send("create run", request).await?;
        tracing::debug!(thread_id, run_id = %run.id, status = %run.status, "Created run");
        Ok(run)
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let request = self
            .http_client
            .get(format!("{}/threads/{}/runs/{}", self.base_url, thread_id, run_id));

        self.send("retrieve run", request).await
    }

    async fn list_messages(&self, thread_id: &str, query: ListMessagesQuery) -> Result<MessageList> {
        let request = self
            .http_client
            .get(format!("{}/threads/{}/messages", self.base_url, thread_id))
            .query(&[
                ("limit", query.limit.to_string()),
                ("order", query.order.as_str().to_string()),
            ]);

        self.send("list messages", request).await
    }
}

#[derive(Deserialize)]
struct VendorErrorBody {
    error: VendorErrorDetail,
}

#[derive(Deserialize)]
struct VendorErrorDetail {
    message: String,
}

/// Pull `error.message` out of a vendor error body, falling back to the raw text
fn vendor_error_message(body: &str) -> String {
    match serde_json::from_str::<VendorErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_error_message_parsed() {
        let body = r#"{"error": {"message": "No thread found with id 'thread_x'.", "type": "invalid_request_error"}}"#;
        assert_eq!(vendor_error_message(body), "No thread found with id 'thread_x'.");
    }

    #[test]
    fn test_vendor_error_message_raw_fallback() {
        assert_eq!(vendor_error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(vendor_error_message(""), "empty response body");
    }
}
