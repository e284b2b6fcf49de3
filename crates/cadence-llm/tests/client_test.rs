use cadence_llm::{
    AssistantError, AssistantsClient, CreateMessageRequest, CreateRunRequest, ListMessagesQuery,
    OpenAIAssistantsClient, OpenAIConfig, RunStatus,
};
use mockito::Matcher;
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> OpenAIAssistantsClient {
    OpenAIAssistantsClient::from_config(OpenAIConfig::new("test-key").with_base_url(server.url()))
        .unwrap()
}

#[tokio::test]
async fn test_create_thread_sends_auth_and_beta_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/threads")
        .match_header("authorization", "Bearer test-key")
        .match_header("openai-beta", "assistants=v2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "thread_abc", "object": "thread", "created_at": 1700000000, "metadata": {}}"#)
        .create_async()
        .await;

    let thread = client_for(&server).create_thread().await.unwrap();

    assert_eq!(thread.id, "thread_abc");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_message_posts_user_role() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/threads/thread_abc/messages")
        .match_body(Matcher::PartialJson(json!({"role": "user", "content": "Help me plan"})))
        .with_status(200)
        .with_body(
            json!({
                "id": "msg_1",
                "thread_id": "thread_abc",
                "role": "user",
                "created_at": 1700000001,
                "content": [{"type": "text", "text": {"value": "Help me plan", "annotations": []}}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let message = client_for(&server)
        .create_message("thread_abc", CreateMessageRequest::user("Help me plan"))
        .await
        .unwrap();

    assert_eq!(message.id, "msg_1");
    assert_eq!(message.text(), "Help me plan");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_run_includes_additional_instructions() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/threads/thread_abc/runs")
        .match_body(Matcher::PartialJson(json!({
            "assistant_id": "asst_1",
            "additional_instructions": "Be brief"
        })))
        .with_status(200)
        .with_body(
            json!({
                "id": "run_1",
                "thread_id": "thread_abc",
                "assistant_id": "asst_1",
                "status": "queued",
                "created_at": 1700000002
            })
            .to_string(),
        )
        .create_async()
        .await;

    let run = client_for(&server)
        .create_run(
            "thread_abc",
            CreateRunRequest::new("asst_1").additional_instructions("Be brief"),
        )
        .await
        .unwrap();

    assert_eq!(run.status, RunStatus::Queued);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_messages_passes_limit_and_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/threads/thread_abc/messages")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "20".into()),
            Matcher::UrlEncoded("order".into(), "desc".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "object": "list",
                "data": [
                    {
                        "id": "msg_2",
                        "thread_id": "thread_abc",
                        "role": "assistant",
                        "created_at": 1700000010,
                        "content": [{"type": "text", "text": {"value": "Here you go", "annotations": []}}]
                    }
                ],
                "first_id": "msg_2",
                "last_id": "msg_2",
                "has_more": false
            })
            .to_string(),
        )
        .create_async()
        .await;

    let list = client_for(&server)
        .list_messages("thread_abc", ListMessagesQuery::newest(20))
        .await
        .unwrap();

    assert_eq!(list.latest_assistant().unwrap().text(), "Here you go");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_success_maps_to_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/threads/thread_abc/runs/run_missing")
        .with_status(404)
        .with_body(r#"{"error": {"message": "No run found with id 'run_missing'.", "type": "invalid_request_error"}}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .retrieve_run("thread_abc", "run_missing")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err {
        AssistantError::Api { operation, message, .. } => {
            assert_eq!(operation, "retrieve run");
            assert!(message.contains("run_missing"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/threads")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client_for(&server).create_thread().await.unwrap_err();
    assert!(matches!(err, AssistantError::Decode { .. }));
}
