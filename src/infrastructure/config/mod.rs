use crate::domain::tts::{
    LanguageCode, OrchestratorPolicy, COMMERCIAL_MAX_TEXT_LENGTH, DEFAULT_ELEVENLABS_VOICE,
    SELF_HOSTED_MAX_TEXT_LENGTH,
};
use crate::domain::tts::orchestrator::PREVIEW_LENGTH;
use crate::infrastructure::repositories::elevenlabs_tts_repository::{
    ELEVENLABS_BASE_URL, ELEVENLABS_MODEL_ID,
};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub remote_provider: RemoteProvider,
    // ElevenLabs
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_model_id: String,
    pub elevenlabs_default_voice: String,
    // Self-hosted backend
    pub remote_backend_url: Option<String>,
    pub remote_backend_model: String,
    // Orchestration policy
    pub max_text_length: usize,
    pub preview_length: usize,
    pub fallback_to_local: bool,
    pub default_language: LanguageCode,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RemoteProvider {
    ElevenLabs,
    SelfHosted,
}

impl RemoteProvider {
    /// Input ceiling each variant ships with
    pub fn default_max_text_length(&self) -> usize {
        match self {
            RemoteProvider::ElevenLabs => COMMERCIAL_MAX_TEXT_LENGTH,
            RemoteProvider::SelfHosted => SELF_HOSTED_MAX_TEXT_LENGTH,
        }
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let remote_provider = match env::var("REMOTE_PROVIDER")
            .unwrap_or_else(|_| "elevenlabs".to_string())
            .to_lowercase()
            .as_str()
        {
            "self_hosted" | "self-hosted" | "coqui" => RemoteProvider::SelfHosted,
            _ => RemoteProvider::ElevenLabs,
        };

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            remote_provider,
            elevenlabs_api_key: optional_var("ELEVENLABS_API_KEY"),
            elevenlabs_base_url: env::var("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|_| ELEVENLABS_BASE_URL.to_string()),
            elevenlabs_model_id: env::var("ELEVENLABS_MODEL_ID")
                .unwrap_or_else(|_| ELEVENLABS_MODEL_ID.to_string()),
            elevenlabs_default_voice: env::var("ELEVENLABS_DEFAULT_VOICE")
                .unwrap_or_else(|_| DEFAULT_ELEVENLABS_VOICE.to_string()),
            remote_backend_url: optional_var("REMOTE_BACKEND_URL"),
            remote_backend_model: env::var("REMOTE_BACKEND_MODEL")
                .unwrap_or_else(|_| "indonesia".to_string()),
            max_text_length: match optional_var("MAX_TEXT_LENGTH") {
                Some(value) => value.parse()?,
                None => remote_provider.default_max_text_length(),
            },
            preview_length: match optional_var("PREVIEW_LENGTH") {
                Some(value) => value.parse()?,
                None => PREVIEW_LENGTH,
            },
            fallback_to_local: optional_var("FALLBACK_TO_LOCAL")
                .map(|value| parse_flag(&value))
                .unwrap_or(true),
            default_language: env::var("DEFAULT_LANGUAGE")
                .unwrap_or_else(|_| "id".to_string())
                .parse::<LanguageCode>()?,
        };

        Ok(config)
    }

    pub fn policy(&self) -> OrchestratorPolicy {
        OrchestratorPolicy {
            max_text_length: self.max_text_length,
            preview_length: self.preview_length,
            fallback_to_local: self.fallback_to_local,
            default_language: self.default_language,
        }
    }
}
