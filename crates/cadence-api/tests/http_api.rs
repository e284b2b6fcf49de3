use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use cadence_api::{build_router, config::Config, state::AppState};
use cadence_llm::{
    AssistantThread, AssistantsClient, CreateMessageRequest, CreateRunRequest, ListMessagesQuery,
    MessageContent, MessageList, MessageRole, Run, RunStatus, ThreadMessage,
};
use cadence_persist::{InMemoryPersistenceClient, PersistenceClient};
use cadence_strategy::{NoopSleeper, StrategyOrchestrator};

/// Assistant API double whose runs always end in `status`
struct FakeAssistant {
    status: RunStatus,
    reply: String,
    threads: AtomicUsize,
    instructions: Mutex<Vec<Option<String>>>,
}

impl FakeAssistant {
    fn new(status: RunStatus, reply: &str) -> Arc<Self> {
        Arc::new(Self {
            status,
            reply: reply.to_string(),
            threads: AtomicUsize::new(0),
            instructions: Mutex::new(Vec::new()),
        })
    }

    fn run(&self, thread_id: &str, status: RunStatus) -> Run {
        Run {
            id: "run_1".into(),
            thread_id: thread_id.into(),
            assistant_id: "asst_test".into(),
            status,
            last_error: None,
            created_at: 0,
        }
    }
}

#[async_trait]
impl AssistantsClient for FakeAssistant {
    async fn create_thread(&self) -> cadence_llm::Result<AssistantThread> {
        let n = self.threads.fetch_add(1, Ordering::SeqCst);
        Ok(AssistantThread {
            id: format!("thread_{}", n),
            object: "thread".into(),
            created_at: 0,
            metadata: None,
        })
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> cadence_llm::Result<ThreadMessage> {
        Ok(ThreadMessage {
            id: "msg_user".into(),
            thread_id: thread_id.into(),
            role: MessageRole::User,
            content: vec![MessageContent::text(request.content)],
            created_at: 1,
            run_id: None,
        })
    }

    async fn create_run(
        &self,
        thread_id: &str,
        request: CreateRunRequest,
    ) -> cadence_llm::Result<Run> {
        self.instructions
            .lock()
            .unwrap()
            .push(request.additional_instructions);
        Ok(self.run(thread_id, RunStatus::Queued))
    }

    async fn retrieve_run(&self, thread_id: &str, _run_id: &str) -> cadence_llm::Result<Run> {
        Ok(self.run(thread_id, self.status))
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        _query: ListMessagesQuery,
    ) -> cadence_llm::Result<MessageList> {
        Ok(MessageList {
            data: vec![ThreadMessage {
                id: "msg_reply".into(),
                thread_id: thread_id.into(),
                role: MessageRole::Assistant,
                content: vec![MessageContent::text(self.reply.clone())],
                created_at: 5,
                run_id: Some("run_1".into()),
            }],
            first_id: None,
            last_id: None,
            has_more: false,
        })
    }
}

fn test_config(max_poll_attempts: u32) -> Config {
    let toml = format!(
        r#"
        [assistant]
        assistant_id = "asst_test"
        poll_interval_ms = 10
        max_poll_attempts = {}
        "#,
        max_poll_attempts
    );
    let mut config: Config = toml::from_str(&toml).unwrap();
    config.openai_api_key = "sk-test".into();
    config
}

fn app_with(client: Arc<FakeAssistant>, store: Arc<dyn PersistenceClient>, attempts: u32) -> Router {
    let config = test_config(attempts);
    let orchestrator = StrategyOrchestrator::builder()
        .client(client)
        .persistence(store)
        .sleeper(Arc::new(NoopSleeper))
        .config(config.assistant.orchestrator_config())
        .build()
        .unwrap();
    build_router(Arc::new(AppState::new(config, orchestrator)))
}

fn app(client: Arc<FakeAssistant>) -> Router {
    app_with(client, Arc::new(InMemoryPersistenceClient::new()), 30)
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

const COMPLETED_REPLY: &str = "Your strategy is ready!\n[CONTENT_IDEAS]\n- Post a morning routine\n- React to a trend\n[/CONTENT_IDEAS]";

#[tokio::test]
async fn test_health_reports_services() {
    let (status, body) = send(app(FakeAssistant::new(RunStatus::Completed, "hi")), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["storage"], "connected");
    assert_eq!(body["services"]["assistant"], "configured");
}

#[tokio::test]
async fn test_strategy_chat_returns_reply_and_ideas() {
    let client = FakeAssistant::new(RunStatus::Completed, COMPLETED_REPLY);
    let store = Arc::new(InMemoryPersistenceClient::new());
    let app = app_with(client.clone(), store.clone(), 30);

    let (status, body) = send(
        app.clone(),
        "POST",
        "/strategy-chat",
        Some(json!({
            "user_id": "user_1",
            "message": "I film cooking videos",
            "onboarding": {"niche_topic": "cooking", "content_types": ["reels"]}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["thread_id"], "thread_0");
    assert_eq!(body["run_id"], "run_1");
    assert_eq!(body["completed"], true);
    assert_eq!(
        body["content_ideas"],
        json!(["Post a morning routine", "React to a trend"])
    );

    let instructions = client.instructions.lock().unwrap().clone();
    let rendered = instructions[0].as_deref().unwrap();
    assert!(rendered.contains("cooking"));

    let (status, body) = send(app, "GET", "/users/user_1/content-ideas", None).await;
    assert_eq!(status, StatusCode::OK);
    let ideas = body["content_ideas"].as_array().unwrap();
    assert_eq!(ideas.len(), 2);
    assert_eq!(ideas[0]["idea"], "Post a morning routine");
    assert_eq!(store.thread_count().await, 1);
}

#[tokio::test]
async fn test_strategy_chat_accepts_camel_case_aliases() {
    let client = FakeAssistant::new(RunStatus::Completed, "What is your niche?");
    let (status, body) = send(
        app(client),
        "POST",
        "/strategy-chat",
        Some(json!({
            "userId": "user_1",
            "threadId": "thread_existing",
            "userMessage": "Hello",
            "onboardingData": {"creatorMission": "teach"}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["thread_id"], "thread_existing");
    assert_eq!(body["message"], "What is your niche?");
    assert_eq!(body["completed"], false);
    assert_eq!(body["content_ideas"], json!([]));
    assert!(body.get("mission_map").is_none());
}

#[tokio::test]
async fn test_strategy_chat_accepts_raw_onboarding_row() {
    let client = FakeAssistant::new(RunStatus::Completed, "What is your niche?");
    let (status, body) = send(
        app(client.clone()),
        "POST",
        "/strategy-chat",
        Some(json!({
            "userId": "user_1",
            "userMessage": "Hello",
            "onboardingData": {
                "niche_topic": "fitness",
                "content_types": null,
                "creator_style": null,
                "creator_mission": null
            },
            "strategyData": {"strategy_type": null}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let instructions = client.instructions.lock().unwrap().clone();
    let rendered = instructions[0].as_deref().unwrap();
    assert!(rendered.contains("- Niche: fitness"));
    assert!(rendered.contains("No strategy data available."));
}

#[tokio::test]
async fn test_strategy_chat_rejects_missing_message() {
    let client = FakeAssistant::new(RunStatus::Completed, "hi");
    let (status, body) = send(
        app(client.clone()),
        "POST",
        "/strategy-chat",
        Some(json!({"user_id": "user_1", "message": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("message"));
    assert_eq!(client.threads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_strategy_chat_rejects_unknown_purpose() {
    let (status, _) = send(
        app(FakeAssistant::new(RunStatus::Completed, "hi")),
        "POST",
        "/strategy-chat",
        Some(json!({"user_id": "u", "message": "m", "purpose": "marketing"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_strategy_chat_times_out() {
    let client = FakeAssistant::new(RunStatus::InProgress, "never");
    let (status, body) = send(
        app_with(client, Arc::new(InMemoryPersistenceClient::new()), 3),
        "POST",
        "/strategy-chat",
        Some(json!({"user_id": "user_1", "thread_id": "thread_slow", "message": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], "timeout");
    assert_eq!(body["thread_id"], "thread_slow");
}

#[tokio::test]
async fn test_strategy_chat_failed_run_is_bad_gateway() {
    let client = FakeAssistant::new(RunStatus::Failed, "never");
    let (status, body) = send(
        app(client),
        "POST",
        "/strategy-chat",
        Some(json!({"user_id": "user_1", "message": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["thread_id"], "thread_0");
}

#[tokio::test]
async fn test_latest_thread_lifecycle() {
    let client = FakeAssistant::new(RunStatus::Completed, "hi");
    let app = app(client);

    let (status, body) = send(app.clone(), "GET", "/threads/latest?user_id=user_1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        app.clone(),
        "POST",
        "/threads",
        Some(json!({"userId": "user_1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created"], true);
    let thread_id = body["thread_id"].as_str().unwrap().to_string();

    let (status, body) = send(app.clone(), "POST", "/threads", Some(json!({"user_id": "user_1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);
    assert_eq!(body["thread_id"], thread_id.as_str());

    let (status, body) = send(app, "GET", "/threads/latest?user_id=user_1&purpose=strategy", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["thread_id"], thread_id.as_str());
    assert_eq!(body["assistant_id"], "asst_test");
}

#[tokio::test]
async fn test_message_step_then_run_status() {
    let client = FakeAssistant::new(RunStatus::InProgress, "hi");
    let app = app(client);

    let (status, body) = send(
        app.clone(),
        "POST",
        "/threads/thread_x/messages",
        Some(json!({"user_id": "user_1", "message": "Next question"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message_id"], "msg_user");
    assert_eq!(body["run_id"], "run_1");

    let (status, body) = send(app.clone(), "GET", "/threads/thread_x/runs/run_1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["run"]["status"], "in_progress");

    let (status, body) = send(app.clone(), "GET", "/threads/thread_x/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Next question");

    let (status, body) = send(app, "GET", "/threads/thread_x/messages?source=remote&limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][0]["id"], "msg_reply");
}

#[tokio::test]
async fn test_mission_map_endpoint() {
    let reply = "Done! [STRATEGY_COMPLETE]\n```json\n{\"phases\":[{\"name\":\"Foundation\",\"weekly_focus\":\"Hooks\",\"platforms\":[\"TikTok\"]}]}\n```";
    let client = FakeAssistant::new(RunStatus::Completed, reply);
    let app = app(client);

    let (_, body) = send(app.clone(), "GET", "/users/user_1/mission-map", None).await;
    assert_eq!(body["success"], true);
    assert!(body["mission_map"].is_null());

    let (status, body) = send(
        app.clone(),
        "POST",
        "/strategy-chat",
        Some(json!({"user_id": "user_1", "message": "Finish it"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mission_map"]["phases"][0]["name"], "Foundation");

    let (status, body) = send(app, "GET", "/users/user_1/mission-map", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mission_map"]["phases"][0]["weekly_focus"], json!(["Hooks"]));
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let (status, body) = send(
        app(FakeAssistant::new(RunStatus::Completed, "hi")),
        "GET",
        "/api-docs/openapi.json",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/strategy-chat").is_some());
    assert!(body["paths"].get("/threads/{thread_id}/runs/{run_id}").is_some());
}
