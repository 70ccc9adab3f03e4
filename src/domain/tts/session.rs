use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Validating,
    InFlight,
    Ready,
    Failed,
}

impl SessionState {
    /// Generate, preview and clear are disabled only while a request is in flight
    pub fn accepts_triggers(&self) -> bool {
        *self != SessionState::InFlight
    }
}

/// Playable result of a synthesis
#[derive(Debug, Clone, PartialEq)]
pub enum AudioHandle {
    /// Binary audio returned by the commercial API
    Clip {
        bytes: Arc<Vec<u8>>,
        content_type: String,
    },
    /// Audio hosted by a self-hosted backend
    Remote {
        url: String,
        filename: Option<String>,
    },
    /// Local utterance, already vocalized by the platform
    Spoken,
}

impl AudioHandle {
    pub fn is_downloadable(&self) -> bool {
        !matches!(self, AudioHandle::Spoken)
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            AudioHandle::Remote { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AudioHandle::Clip { .. } => "clip",
            AudioHandle::Remote { .. } => "remote",
            AudioHandle::Spoken => "spoken",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisSource {
    Remote,
    Local,
}

#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub audio: AudioHandle,
    pub source: SynthesisSource,
    pub fallback_used: bool,
    pub char_count: usize,
}

/// State owned by the orchestrator for the lifetime of a session
#[derive(Debug)]
pub struct Session {
    pub state: SessionState,
    pub audio: Option<AudioHandle>,
    pub last_error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            audio: None,
            last_error: None,
        }
    }
}

impl Session {
    pub fn downloadable_audio(&self) -> Option<&AudioHandle> {
        match self.state {
            SessionState::Ready => self.audio.as_ref().filter(|a| a.is_downloadable()),
            _ => None,
        }
    }
}
