//! Platform speech backends

use crate::domain::tts::{LanguageCode, SynthesisError, VoiceDescriptor, VoiceSelection};
use async_trait::async_trait;

// Native TTS backend using the tts crate (cross-platform)
pub mod native;

pub use native::NativeSpeechBackend;

/// A single request to vocalize a span of text
#[derive(Debug, Clone)]
pub struct Utterance {
    pub text: String,
    pub language: LanguageCode,
    /// Multiplier over the platform's normal rate
    pub rate: f32,
    pub voice: VoiceSelection,
}

#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Speak the utterance and resolve once the platform reports it finished
    ///
    /// # Errors
    /// `UnsupportedCapability` when the platform has no speech engine,
    /// `Playback` when the engine faults or stops mid-utterance
    async fn speak(&self, utterance: Utterance) -> Result<(), SynthesisError>;

    /// Voices installed on the platform
    async fn voices(&self) -> Result<Vec<VoiceDescriptor>, SynthesisError>;

    async fn is_available(&self) -> bool {
        self.voices().await.is_ok()
    }
}
