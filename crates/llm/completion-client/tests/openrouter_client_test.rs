//! Integration tests for [`completion_client::OpenRouterClient`] against a mockito server.
//!
//! Covers: request shape (auth header, model, messages, system prompt), reply extraction,
//! non-success status and malformed payloads, and `complete` recording into history.

use completion_client::{complete, CompletionError, LlmClient, OpenRouterClient};
use conversation::{History, HistoryEntry, Role};
use mockito::Matcher;
use serde_json::json;

const API_KEY: &str = "sk-or-test-key-123456";

fn client_for(server: &mockito::ServerGuard) -> OpenRouterClient {
    OpenRouterClient::new(API_KEY.to_string())
        .with_base_url(server.url())
        .with_model("google/gemma-7b-it")
}

fn reply_body(content: &str) -> String {
    json!({
        "id": "gen-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

/// **Test: 200 with a valid payload returns the reply; request carries bearer auth, model and history.**
#[tokio::test]
async fn test_complete_success_sends_history_and_returns_reply() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", format!("Bearer {API_KEY}").as_str())
        .match_body(Matcher::Json(json!({
            "model": "google/gemma-7b-it",
            "messages": [
                { "role": "user", "content": "What is Rust?" },
                { "role": "assistant", "content": "A language." },
                { "role": "user", "content": "Is it fast?" }
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(reply_body("Yes, very."))
        .create_async()
        .await;

    let history = vec![
        HistoryEntry::user("What is Rust?"),
        HistoryEntry::assistant("A language."),
        HistoryEntry::user("Is it fast?"),
    ];
    let reply = client_for(&server).complete(&history).await.unwrap();

    assert_eq!(reply, "Yes, very.");
    mock.assert_async().await;
}

/// **Test: the system prompt is prepended to the request.**
#[tokio::test]
async fn test_system_prompt_is_prepended() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({
            "messages": [
                { "role": "system", "content": "Answer briefly." },
                { "role": "user", "content": "hi" }
            ]
        })))
        .with_status(200)
        .with_body(reply_body("hello"))
        .create_async()
        .await;

    let client = client_for(&server).with_system_prompt_opt(Some("Answer briefly.".to_string()));
    let reply = client.complete(&[HistoryEntry::user("hi")]).await.unwrap();

    assert_eq!(reply, "hello");
    mock.assert_async().await;
}

/// **Test: a non-success status is a Remote error carrying status and body.**
#[tokio::test]
async fn test_non_success_status_is_remote_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"No auth credentials found"}}"#)
        .expect(1)
        .create_async()
        .await;

    let err = client_for(&server)
        .complete(&[HistoryEntry::user("hi")])
        .await
        .unwrap_err();

    match err {
        CompletionError::Remote { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("No auth credentials"));
        }
        other => panic!("expected Remote, got {other:?}"),
    }
    // Exactly one request: failures are not retried.
    mock.assert_async().await;
}

/// **Test: 200 without choices[0].message.content is a malformed payload.**
#[tokio::test]
async fn test_missing_reply_field_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .complete(&[HistoryEntry::user("hi")])
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::MalformedPayload(_)));
}

/// **Test: 200 with a non-JSON body is a malformed payload.**
#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let err = client_for(&server)
        .complete(&[HistoryEntry::user("hi")])
        .await
        .unwrap_err();

    assert!(matches!(err, CompletionError::MalformedPayload(_)));
}

/// **Test: `complete` appends exactly one assistant entry on success and nothing on failure.**
#[tokio::test]
async fn test_complete_records_reply_only_on_success() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(reply_body("first answer"))
        .create_async()
        .await;

    let client = client_for(&server);
    let mut history = History::with_limit(10);
    history.push(HistoryEntry::user("q1"));

    let reply = complete(&client, &mut history).await.unwrap();
    assert_eq!(reply, "first answer");
    assert_eq!(history.len(), 2);
    assert_eq!(history.last().map(|e| e.role), Some(Role::Assistant));
    ok.remove_async().await;

    let _fail = server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .create_async()
        .await;
    history.push(HistoryEntry::user("q2"));
    let before = history.to_vec();

    let err = complete(&client, &mut history).await.unwrap_err();
    assert!(matches!(err, CompletionError::Remote { status: 503, .. }));
    assert_eq!(history.to_vec(), before);
}
