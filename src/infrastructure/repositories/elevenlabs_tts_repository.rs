use super::tts_repository::{RemoteSynthesisRequest, RemoteTtsRepository};
use crate::domain::tts::{
    elevenlabs_catalog, is_normal_rate, AudioHandle, SynthesisError, VoiceDescriptor,
    VoiceSelection,
};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";
pub const ELEVENLABS_MODEL_ID: &str = "eleven_multilingual_v2";

/// Value shipped in sample configs; treated as "no key"
const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

#[derive(Debug, Serialize, PartialEq)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl VoiceSettings {
    pub fn for_request(preview: bool) -> Self {
        if preview {
            Self {
                stability: 0.5,
                similarity_boost: 0.75,
                style: 0.2,
                use_speaker_boost: true,
            }
        } else {
            Self {
                stability: 0.7,
                similarity_boost: 0.8,
                style: 0.3,
                use_speaker_boost: true,
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ElevenLabsRequestBody {
    pub text: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

/// Wrap text in a prosody tag unless the rate is normal
pub fn apply_rate_markup(text: &str, rate: f32) -> String {
    if is_normal_rate(rate) {
        text.to_string()
    } else {
        format!(
            "<speak><prosody rate=\"{}\">{}</prosody></speak>",
            rate, text
        )
    }
}

/// ElevenLabs implementation of the remote TTS repository
pub struct ElevenLabsTtsRepository {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model_id: String,
    default_voice: String,
}

impl ElevenLabsTtsRepository {
    pub fn new(
        http_client: reqwest::Client,
        base_url: String,
        api_key: Option<String>,
        model_id: String,
        default_voice: String,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model_id,
            default_voice,
        }
    }

    fn api_key(&self) -> Result<&str, SynthesisError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => Ok(key),
            _ => Err(SynthesisError::Configuration(
                "ElevenLabs API key is not configured".to_string(),
            )),
        }
    }

    fn voice_id<'a>(&'a self, selection: &'a VoiceSelection) -> &'a str {
        selection.name().unwrap_or(&self.default_voice)
    }

    fn build_body(&self, request: &RemoteSynthesisRequest) -> ElevenLabsRequestBody {
        ElevenLabsRequestBody {
            text: apply_rate_markup(&request.text, request.rate),
            model_id: self.model_id.clone(),
            voice_settings: VoiceSettings::for_request(request.preview),
        }
    }
}

#[async_trait]
impl RemoteTtsRepository for ElevenLabsTtsRepository {
    fn provider(&self) -> &'static str {
        "elevenlabs"
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    async fn synthesize(
        &self,
        request: &RemoteSynthesisRequest,
    ) -> Result<AudioHandle, SynthesisError> {
        let api_key = self.api_key()?;
        let voice_id = self.voice_id(&request.voice);
        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.base_url,
            urlencoding::encode(voice_id)
        );
        let body = self.build_body(request);
        let start_time = std::time::Instant::now();

        tracing::info!(
            provider = "elevenlabs",
            voice = voice_id,
            model = %self.model_id,
            rate = request.rate,
            preview = request.preview,
            text_length = request.text.len(),
            "Calling ElevenLabs text-to-speech"
        );

        let response = self
            .http_client
            .post(&url)
            .header("Accept", "audio/mpeg")
            .header("Content-Type", "application/json")
            .header("xi-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, voice = voice_id, "ElevenLabs request failed");
                SynthesisError::Remote(format!("ElevenLabs request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %error_text,
                "ElevenLabs returned an error status"
            );
            return Err(SynthesisError::Remote(format!(
                "API Error: {}",
                status.as_u16()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("audio/mpeg")
            .to_string();

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Remote(format!("Failed to read audio: {}", e)))?
            .to_vec();

        if audio_bytes.is_empty() {
            return Err(SynthesisError::Remote(
                "Audio generation returned an empty payload".to_string(),
            ));
        }

        tracing::info!(
            provider = "elevenlabs",
            voice = voice_id,
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_bytes.len(),
            "TTS synthesis completed"
        );

        Ok(AudioHandle::Clip {
            bytes: Arc::new(audio_bytes),
            content_type,
        })
    }

    async fn voices(&self) -> Result<Vec<VoiceDescriptor>, SynthesisError> {
        Ok(elevenlabs_catalog())
    }
}
