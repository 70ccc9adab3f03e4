use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::tts::{
        LanguageCode, Orchestrator, OrchestratorApi, Outcome, PanelState, PanelView,
        SessionSnapshot, SynthesisMode, SynthesisRequest, SynthesisSource, Trigger,
        VoiceDescriptor, VoiceSelection,
    },
    error::{AppError, AppResult},
};

/// Body of POST /api/tts/generate and /api/tts/preview
#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<SynthesisMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SynthesizeResponse {
    pub status: &'static str,
    pub source: SynthesisSource,
    pub fallback_used: bool,
    pub char_count: usize,
    pub audio: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    pub download_available: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionSnapshot,
    pub panel: PanelView,
}

#[derive(Debug, Deserialize)]
pub struct VoicesQuery {
    pub mode: Option<SynthesisMode>,
}

#[derive(Debug, Serialize)]
pub struct VoicesResponse {
    pub mode: SynthesisMode,
    pub provider: &'static str,
    pub voices: Vec<VoiceDescriptor>,
}

pub struct StudioController {
    orchestrator: Arc<Orchestrator>,
    panel_state: Arc<PanelState>,
}

impl StudioController {
    pub fn new(orchestrator: Arc<Orchestrator>, panel_state: Arc<PanelState>) -> Self {
        Self {
            orchestrator,
            panel_state,
        }
    }

    /// POST /api/tts/generate - Convert the full text to speech
    pub async fn generate(
        State(controller): State<Arc<StudioController>>,
        Json(request): Json<SynthesizeRequest>,
    ) -> AppResult<Json<SynthesizeResponse>> {
        controller.run(Trigger::Generate, request).await
    }

    /// POST /api/tts/preview - Speak the beginning of the text with preview settings
    pub async fn preview(
        State(controller): State<Arc<StudioController>>,
        Json(request): Json<SynthesizeRequest>,
    ) -> AppResult<Json<SynthesizeResponse>> {
        controller.run(Trigger::Preview, request).await
    }

    /// POST /api/tts/clear - Reset text, audio and messages
    pub async fn clear(State(controller): State<Arc<StudioController>>) -> AppResult<StatusCode> {
        if controller.orchestrator.clear() {
            Ok(StatusCode::NO_CONTENT)
        } else {
            Err(AppError::Conflict(
                "Cannot clear while a synthesis request is in progress".to_string(),
            ))
        }
    }

    /// GET /api/tts/download - Offer the current audio as a timestamped file
    pub async fn download(
        State(controller): State<Arc<StudioController>>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let artifact = controller.orchestrator.download().await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&artifact.content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("audio/mpeg")),
        );
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&format!(
                "attachment; filename=\"{}\"",
                artifact.filename
            ))
            .map_err(|e| AppError::Internal(e.to_string()))?,
        );

        Ok((StatusCode::OK, headers, Body::from(artifact.bytes)))
    }

    /// GET /api/session - Current state of the controls
    pub async fn session(State(controller): State<Arc<StudioController>>) -> Json<SessionResponse> {
        Json(SessionResponse {
            session: controller.orchestrator.snapshot(),
            panel: controller.panel_state.view(),
        })
    }

    /// GET /api/voices?mode=remote|local - Voices offered for a mode
    pub async fn voices(
        State(controller): State<Arc<StudioController>>,
        Query(query): Query<VoicesQuery>,
    ) -> AppResult<Json<VoicesResponse>> {
        let mode = query.mode.unwrap_or_default();
        let (provider, voices) = match mode {
            SynthesisMode::Remote => {
                let remote = controller.orchestrator.remote();
                (remote.provider(), remote.voices().await?)
            }
            SynthesisMode::Local => ("native", controller.orchestrator.speech().voices().await?),
        };

        Ok(Json(VoicesResponse {
            mode,
            provider,
            voices,
        }))
    }

    async fn run(
        &self,
        trigger: Trigger,
        request: SynthesizeRequest,
    ) -> AppResult<Json<SynthesizeResponse>> {
        let language = request
            .language
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .map(str::parse::<LanguageCode>)
            .transpose()
            .map_err(AppError::BadRequest)?;

        let mut synthesis = SynthesisRequest::new(request.text, request.mode.unwrap_or_default())
            .with_voice(
                request
                    .voice
                    .as_deref()
                    .map(VoiceSelection::parse)
                    .unwrap_or_default(),
            )
            .with_rate(request.rate.unwrap_or(1.0));
        if let Some(language) = language {
            synthesis = synthesis.with_language(language);
        }

        match self.orchestrator.trigger(trigger, synthesis).await? {
            Outcome::Ready(result) => Ok(Json(SynthesizeResponse {
                status: "ready",
                source: result.source,
                fallback_used: result.fallback_used,
                char_count: result.char_count,
                audio: result.audio.kind(),
                audio_url: result.audio.url().map(str::to_string),
                download_available: result.audio.is_downloadable(),
            })),
            Outcome::Ignored => Err(AppError::Conflict(
                "A synthesis request is already in progress".to_string(),
            )),
        }
    }
}
