use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::domain::tts::Orchestrator;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready when at least one backend can produce speech
pub async fn health_ready(State(orchestrator): State<Arc<Orchestrator>>) -> impl IntoResponse {
    let remote = orchestrator.remote();
    let remote_configured = remote.is_configured();
    let local_available = orchestrator.speech().is_available().await;

    let status = if remote_configured || local_available {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ready" } else { "not_ready" },
            "remote": {
                "provider": remote.provider(),
                "configured": remote_configured
            },
            "local_speech": if local_available { "available" } else { "unavailable" }
        })),
    )
}
