use crate::e2e::helpers;

use helpers::speech_mocks::SpeechScript;
use helpers::{TestContext, TestOptions};
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_both_backends_when_ready(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["remote"]["provider"], "elevenlabs");
    assert_eq!(body["remote"]["configured"], true);
    assert_eq!(body["local_speech"], "available");
}

#[tokio::test]
async fn it_should_stay_ready_with_only_local_speech() {
    let ctx = TestContext::with_options(TestOptions {
        api_key: None,
        ..TestOptions::default()
    })
    .await
    .unwrap();

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("remote")["configured"], false);
    assert_eq!(response.field("local_speech"), "available");
}

#[tokio::test]
async fn it_should_not_be_ready_without_any_backend() {
    let ctx = TestContext::with_options(TestOptions {
        api_key: Some("YOUR_API_KEY_HERE".to_string()),
        speech: SpeechScript::Unsupported,
        ..TestOptions::default()
    })
    .await
    .unwrap();

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.field("status"), "not_ready");
    assert_eq!(response.field("local_speech"), "unavailable");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_health_responses(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    let response = ctx.client.get("/health/ready").await.unwrap();
    response.assert_header_exists("x-request-id");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_handle_concurrent_health_checks(ctx: &TestContext) {
    let mut futures = Vec::new();
    for _ in 0..10 {
        let client = ctx.client.clone();
        futures.push(async move { client.get("/health").await });
    }

    let results = futures::future::join_all(futures).await;

    for result in results {
        result.unwrap().assert_status(StatusCode::OK);
    }
}
