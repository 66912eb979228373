use std::time::{Duration, Instant};

use mockito::{Matcher, Server};
use quita_assistant::{
    AssistantBackend, AssistantError, MessageRole, OpenAIAssistantClient, RunOutcome, ToolResult,
};
use serde_json::json;

fn client_for(server: &Server) -> OpenAIAssistantClient {
    OpenAIAssistantClient::new("sk-test", "asst_test")
        .unwrap()
        .with_base_url(server.url())
        .with_poll_interval(Duration::from_millis(20))
}

#[tokio::test]
async fn create_thread_returns_backend_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/threads")
        .match_header("openai-beta", "assistants=v2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "thread_abc", "object": "thread"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let thread_id = client.create_thread().await.unwrap();

    assert_eq!(thread_id, "thread_abc");
    mock.assert_async().await;
}

#[tokio::test]
async fn add_message_posts_user_role() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/threads/thread_1/messages")
        .match_body(Matcher::Json(json!({
            "role": "user",
            "content": "Quanto gastei?"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "msg_1"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    client
        .add_message("thread_1", "Quanto gastei?")
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn run_polls_until_completed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/threads/thread_1/runs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "run_1", "status": "queued"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/threads/thread_1/runs/run_1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "run_1", "status": "completed"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client
        .run("thread_1", Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Completed { run_id: "run_1".to_string() });
}

#[tokio::test]
async fn run_surfaces_pending_invocations() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/threads/thread_1/runs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "run_2",
                "status": "requires_action",
                "required_action": {
                    "type": "submit_tool_outputs",
                    "submit_tool_outputs": {
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": {
                                "name": "add_expense",
                                "arguments": "{\"amount\": 12.5}"
                            }
                        }]
                    }
                }
            }"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let outcome = client
        .run("thread_1", Duration::from_secs(5))
        .await
        .unwrap();

    match outcome {
        RunOutcome::RequiresAction { run_id, invocations } => {
            assert_eq!(run_id, "run_2");
            assert_eq!(invocations.len(), 1);
            assert_eq!(invocations[0].name, "add_expense");
            assert_eq!(invocations[0].arguments, "{\"amount\": 12.5}");
        }
        other => panic!("expected requires_action, got {:?}", other),
    }
}

#[tokio::test]
async fn terminal_failure_is_an_error_not_an_outcome() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/threads/thread_1/runs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "run_3", "status": "expired"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let error = client
        .run("thread_1", Duration::from_secs(5))
        .await
        .unwrap_err();

    match error {
        AssistantError::RunFailed { run_id, status } => {
            assert_eq!(run_id, "run_3");
            assert_eq!(status, "expired");
        }
        other => panic!("expected RunFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn run_times_out_within_one_extra_poll_interval() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/threads/thread_1/runs")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "run_4", "status": "queued"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/threads/thread_1/runs/run_4")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "run_4", "status": "in_progress"}"#)
        .create_async()
        .await;

    let max_wait = Duration::from_millis(200);
    let poll_interval = Duration::from_millis(50);
    let client = OpenAIAssistantClient::new("sk-test", "asst_test")
        .unwrap()
        .with_base_url(server.url())
        .with_poll_interval(poll_interval);

    let started = Instant::now();
    let error = client.run("thread_1", max_wait).await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(error, AssistantError::Timeout { .. }));
    // Bounded by max_wait plus one polling interval (plus test slack).
    assert!(elapsed < max_wait + poll_interval + Duration::from_millis(300));
}

#[tokio::test]
async fn submit_tool_results_batches_all_outputs() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/threads/thread_1/runs/run_5/submit_tool_outputs")
        .match_body(Matcher::Json(json!({
            "tool_outputs": [
                {"tool_call_id": "call_1", "output": "{\"success\":true}"},
                {"tool_call_id": "call_2", "output": "{\"error\":\"Erro na execução\",\"message\":\"boom\"}"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "run_5", "status": "queued"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let results = vec![
        ToolResult::ok("call_1", "{\"success\":true}"),
        ToolResult::error("call_2", "Erro na execução", "boom"),
    ];
    client
        .submit_tool_results("thread_1", "run_5", &results)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn latest_messages_concatenates_text_blocks() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/threads/thread_1/messages")
        .match_query(Matcher::UrlEncoded("limit".into(), "1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "data": [{
                    "id": "msg_9",
                    "role": "assistant",
                    "content": [
                        {"type": "text", "text": {"value": "Você gastou ", "annotations": []}},
                        {"type": "text", "text": {"value": "R$ 42,00 em Alimentação.", "annotations": []}}
                    ]
                }]
            }"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let messages = client.latest_messages("thread_1", 1).await.unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::Assistant);
    assert_eq!(messages[0].text, "Você gastou R$ 42,00 em Alimentação.");
}

#[tokio::test]
async fn api_errors_carry_status_and_detail() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/threads")
        .with_status(401)
        .with_body(r#"{"error": {"message": "Incorrect API key"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let error = client.create_thread().await.unwrap_err();

    match error {
        AssistantError::Api { status, detail } => {
            assert_eq!(status, 401);
            assert!(detail.contains("Incorrect API key"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
