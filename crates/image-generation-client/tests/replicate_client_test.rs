//! Tests for [`image_generation_client::ReplicateClient`] against a mockito server, and one
//! end-to-end [`JobPoller`] run over HTTP.

use std::sync::Arc;
use std::time::Duration;

use image_generation_client::{
    JobError, JobPoller, PollConfig, PredictionBackend, PredictionRequest, PredictionStatus,
    ReplicateClient,
};
use mockito::Matcher;
use serde_json::json;

const TOKEN: &str = "r8_test_token";

fn client_for(server: &mockito::ServerGuard) -> ReplicateClient {
    ReplicateClient::new(TOKEN.to_string()).with_base_url(server.url())
}

/// **Test: 201 returns the job id; request carries Token auth, version and input.**
#[tokio::test]
async fn test_create_returns_id_on_201() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/predictions")
        .match_header("authorization", format!("Token {TOKEN}").as_str())
        .match_body(Matcher::Json(json!({
            "version": "sdxl-version",
            "input": { "prompt": "a red fox" }
        })))
        .with_status(201)
        .with_body(r#"{"id":"abc123","status":"starting","output":null}"#)
        .create_async()
        .await;

    let id = client_for(&server)
        .create(&PredictionRequest::text_to_image("sdxl-version", "a red fox"))
        .await
        .unwrap();

    assert_eq!(id, "abc123");
    mock.assert_async().await;
}

/// **Test: anything but 201 on creation is a Submit error, even another 2xx.**
#[tokio::test]
async fn test_create_non_201_is_submit_error() {
    let mut server = mockito::Server::new_async().await;
    for status in [200, 400, 422] {
        let mock = server
            .mock("POST", "/predictions")
            .with_status(status)
            .with_body(r#"{"detail":"Invalid version"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .create(&PredictionRequest::text_to_image("bad", "x"))
            .await
            .unwrap_err();

        match err {
            JobError::Submit { status: got, body } => {
                assert_eq!(got as usize, status);
                assert!(body.contains("Invalid version"));
            }
            other => panic!("expected Submit, got {other:?}"),
        }
        mock.remove_async().await;
    }
}

/// **Test: fetch parses status and output from the job-status endpoint.**
#[tokio::test]
async fn test_fetch_parses_prediction() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/predictions/abc123")
        .match_header("authorization", format!("Token {TOKEN}").as_str())
        .with_status(200)
        .with_body(r#"{"id":"abc123","status":"succeeded","output":["https://out/1.png"]}"#)
        .create_async()
        .await;

    let prediction = client_for(&server).fetch("abc123").await.unwrap();

    assert_eq!(prediction.status, PredictionStatus::Succeeded);
    assert_eq!(prediction.output, Some(json!(["https://out/1.png"])));
}

/// **Test: a status body without `id` parses; the requested id is filled in.**
#[tokio::test]
async fn test_fetch_status_body_without_id() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/predictions/abc")
        .with_status(200)
        .with_body(r#"{"status":"succeeded","output":["https://out/1.png"]}"#)
        .create_async()
        .await;

    let prediction = client_for(&server).fetch("abc").await.unwrap();

    assert_eq!(prediction.id, "abc");
    assert_eq!(prediction.status, PredictionStatus::Succeeded);
    assert_eq!(prediction.output, Some(json!(["https://out/1.png"])));
}

/// **Test: a non-success status from the job-status endpoint is a Poll error.**
#[tokio::test]
async fn test_fetch_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/predictions/gone")
        .with_status(404)
        .with_body(r#"{"detail":"Not found."}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch("gone").await.unwrap_err();

    assert!(matches!(err, JobError::Poll { status: 404, .. }));
}

/// **Test: full submit + poll over HTTP; the edit request sends image and prompt.**
#[tokio::test]
async fn test_poller_over_http() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/predictions")
        .match_body(Matcher::PartialJson(json!({
            "input": { "image": "https://files/photo.jpg", "prompt": "add snow" }
        })))
        .with_status(201)
        .with_body(r#"{"id":"edit-1","status":"starting"}"#)
        .create_async()
        .await;
    let status = server
        .mock("GET", "/predictions/edit-1")
        .with_status(200)
        .with_body(r#"{"id":"edit-1","status":"succeeded","output":"https://out/edited.png"}"#)
        .expect(1)
        .create_async()
        .await;

    let poller = JobPoller::new(
        Arc::new(client_for(&server)),
        PollConfig {
            interval: Duration::from_millis(10),
            max_attempts: 5,
        },
    );
    let url = poller
        .run_job(&PredictionRequest::image_edit(
            "edit-version",
            "https://files/photo.jpg",
            "add snow",
        ))
        .await
        .unwrap();

    assert_eq!(url, "https://out/edited.png");
    create.assert_async().await;
    status.assert_async().await;
}
