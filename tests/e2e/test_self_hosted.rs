use crate::e2e::helpers;

use helpers::fixtures::{text_of_length, FAKE_MP3, INDONESIAN_TEXT};
use helpers::{TestContext, TestOptions};
use hyper::StatusCode;
use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;
use tts_studio::infrastructure::config::RemoteProvider;

async fn self_hosted_context() -> TestContext {
    TestContext::with_options(TestOptions {
        provider: RemoteProvider::SelfHosted,
        ..TestOptions::default()
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn it_should_generate_hosted_audio_and_proxy_the_download() {
    let mut ctx = self_hosted_context().await;
    let audio_url = format!("{}/audio/tts_1700000000.wav", ctx.remote.url());

    let generate = ctx
        .remote
        .mock("POST", "/generate")
        .match_body(Matcher::PartialJson(json!({
            "text": INDONESIAN_TEXT,
            "model": "indonesia",
            "speed": 1.0
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "audio_url": audio_url,
                "filename": "tts_1700000000.wav",
                "text_length": INDONESIAN_TEXT.len()
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let audio = ctx
        .remote
        .mock("GET", "/audio/tts_1700000000.wav")
        .with_status(200)
        .with_header("content-type", "audio/wav")
        .with_body(FAKE_MP3)
        .expect(1)
        .create_async()
        .await;

    let response = ctx
        .client
        .post("/api/tts/generate", &json!({ "text": INDONESIAN_TEXT }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("source"), "remote");
    assert_eq!(response.field("audio"), "remote");
    assert_eq!(response.field("audio_url"), audio_url.as_str());
    generate.assert_async().await;

    let session = ctx.client.get("/api/session").await.unwrap();
    let body = session.body.as_ref().unwrap();
    assert_eq!(body["panel"]["audio_url"], audio_url.as_str());
    assert_eq!(body["session"]["controls"]["download"], true);

    let download = ctx.client.get("/api/tts/download").await.unwrap();
    download.assert_status(StatusCode::OK);
    assert_eq!(download.header("content-type").unwrap(), "audio/wav");
    assert!(download
        .header("content-disposition")
        .unwrap()
        .contains("filename=\"tts-"));
    assert_eq!(download.body_bytes, FAKE_MP3);
    audio.assert_async().await;
}

#[tokio::test]
async fn it_should_enforce_the_self_hosted_length_ceiling() {
    let mut ctx = self_hosted_context().await;
    let mock = ctx
        .remote
        .mock("POST", "/generate")
        .expect(0)
        .create_async()
        .await;

    let response = ctx
        .client
        .post("/api/tts/generate", &json!({ "text": text_of_length(1001) }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE)
        .assert_error_message("maximum is 1000");
    mock.assert_async().await;
}

#[tokio::test]
async fn it_should_fall_back_with_the_backend_error_message() {
    let mut ctx = self_hosted_context().await;
    ctx.remote
        .mock("POST", "/generate")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(json!({ "success": false, "error": "Model not loaded" }).to_string())
        .create_async()
        .await;

    let response = ctx
        .client
        .post("/api/tts/generate", &json!({ "text": INDONESIAN_TEXT }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("fallback_used"), true);

    let session = ctx.client.get("/api/session").await.unwrap();
    let status = session.body.as_ref().unwrap()["panel"]["status"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(status.contains("Model not loaded"), "status was {}", status);
}

#[tokio::test]
async fn it_should_report_a_failed_audio_fetch_on_download() {
    let mut ctx = self_hosted_context().await;
    let audio_url = format!("{}/audio/missing.wav", ctx.remote.url());
    ctx.remote
        .mock("POST", "/generate")
        .with_status(200)
        .with_body(json!({ "success": true, "audio_url": audio_url }).to_string())
        .create_async()
        .await;
    ctx.remote
        .mock("GET", "/audio/missing.wav")
        .with_status(404)
        .create_async()
        .await;

    ctx.client
        .post("/api/tts/generate", &json!({ "text": INDONESIAN_TEXT }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let download = ctx.client.get("/api/tts/download").await.unwrap();
    download
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("404");
}

#[tokio::test]
async fn it_should_list_backend_models_as_voices() {
    let mut ctx = self_hosted_context().await;
    ctx.remote
        .mock("GET", "/models")
        .with_status(200)
        .with_body(json!({ "models": ["indonesia", "english"] }).to_string())
        .create_async()
        .await;

    let response = ctx.client.get("/api/voices").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.field("provider"), "self_hosted");
    let voices = response.field("voices").as_array().unwrap();
    assert_eq!(voices.len(), 2);
    assert_eq!(voices[0]["id"], "indonesia");
    assert_eq!(voices[0]["language"], "id");
    assert_eq!(voices[1]["language"], "en");
}
