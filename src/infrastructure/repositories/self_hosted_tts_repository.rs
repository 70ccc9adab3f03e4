use super::tts_repository::{RemoteSynthesisRequest, RemoteTtsRepository};
use crate::domain::tts::{
    self_hosted_catalog, self_hosted_model, AudioHandle, SynthesisError, VoiceDescriptor,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const GENERATE_PATH: &str = "/generate";
const MODELS_PATH: &str = "/models";

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub text: &'a str,
    pub model: &'a str,
    pub speed: f32,
}

/// Envelope returned by the backend for both success and failure
#[derive(Debug, Deserialize)]
pub struct GenerateEnvelope {
    pub success: bool,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub text_length: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

/// Client for a user-hosted synthesis backend (e.g. Coqui TTS behind a tunnel)
pub struct SelfHostedTtsRepository {
    http_client: reqwest::Client,
    base_url: Option<String>,
    model: String,
}

impl SelfHostedTtsRepository {
    pub fn new(http_client: reqwest::Client, base_url: Option<String>, model: String) -> Self {
        let base_url = base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        Self {
            http_client,
            base_url,
            model,
        }
    }

    fn base_url(&self) -> Result<&str, SynthesisError> {
        self.base_url.as_deref().ok_or_else(|| {
            SynthesisError::Configuration("Remote backend URL is not configured".to_string())
        })
    }

    fn failure_message(envelope: Option<GenerateEnvelope>, fallback: String) -> String {
        envelope.and_then(|e| e.error).unwrap_or(fallback)
    }
}

#[async_trait]
impl RemoteTtsRepository for SelfHostedTtsRepository {
    fn provider(&self) -> &'static str {
        "self_hosted"
    }

    fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    async fn synthesize(
        &self,
        request: &RemoteSynthesisRequest,
    ) -> Result<AudioHandle, SynthesisError> {
        let base_url = self.base_url()?;
        let model = request.voice.name().unwrap_or(&self.model);
        let body = GenerateRequest {
            text: &request.text,
            model,
            speed: request.rate,
        };

        tracing::info!(
            provider = "self_hosted",
            base_url = base_url,
            model = model,
            speed = request.rate,
            text_length = request.text.len(),
            "Calling self-hosted backend"
        );

        let response = self
            .http_client
            .post(format!("{}{}", base_url, GENERATE_PATH))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Self-hosted backend unreachable");
                SynthesisError::Remote(format!("Backend request failed: {}", e))
            })?;

        let status = response.status();
        let envelope = response.json::<GenerateEnvelope>().await;

        if !status.is_success() {
            let message =
                Self::failure_message(envelope.ok(), format!("Backend error: {}", status.as_u16()));
            tracing::error!(status = status.as_u16(), error = %message, "Self-hosted backend failed");
            return Err(SynthesisError::Remote(message));
        }

        let envelope = envelope
            .map_err(|e| SynthesisError::Remote(format!("Invalid backend response: {}", e)))?;

        if !envelope.success {
            let message =
                Self::failure_message(Some(envelope), "Failed to generate audio".to_string());
            return Err(SynthesisError::Remote(message));
        }

        let url = envelope
            .audio_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| SynthesisError::Remote("Backend returned no audio URL".to_string()))?;

        tracing::info!(
            provider = "self_hosted",
            audio_url = %url,
            text_length = ?envelope.text_length,
            "TTS synthesis completed"
        );

        Ok(AudioHandle::Remote {
            url,
            filename: envelope.filename,
        })
    }

    async fn voices(&self) -> Result<Vec<VoiceDescriptor>, SynthesisError> {
        let base_url = self.base_url()?;
        let result = async {
            self.http_client
                .get(format!("{}{}", base_url, MODELS_PATH))
                .send()
                .await?
                .error_for_status()?
                .json::<ModelsResponse>()
                .await
        }
        .await;

        match result {
            Ok(response) => Ok(response
                .models
                .iter()
                .map(|model| self_hosted_model(model))
                .collect()),
            Err(e) => {
                tracing::warn!(error = %e, "Could not list backend models, using defaults");
                Ok(self_hosted_catalog())
            }
        }
    }
}
