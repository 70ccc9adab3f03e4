use crate::domain::tts::{AudioHandle, LanguageCode, SynthesisError, VoiceDescriptor, VoiceSelection};
use async_trait::async_trait;

/// Parameters for a single remote synthesis call
#[derive(Debug, Clone)]
pub struct RemoteSynthesisRequest {
    pub text: String,
    pub voice: VoiceSelection,
    pub rate: f32,
    pub language: LanguageCode,
    /// Preview requests use lighter voice settings
    pub preview: bool,
}

/// Repository for remote TTS synthesis.
/// Abstracts the hosted provider (ElevenLabs, a self-hosted Coqui backend, ...)
///
/// Implementations perform exactly one outbound call per `synthesize`; the
/// caller owns any fallback decision.
#[async_trait]
pub trait RemoteTtsRepository: Send + Sync {
    /// Short provider name used in logs and health output
    fn provider(&self) -> &'static str;

    /// Whether the key or endpoint this provider needs is present
    fn is_configured(&self) -> bool;

    /// Synthesize text and return a playable audio reference
    ///
    /// # Errors
    /// `Configuration` when the key/endpoint is missing, `Remote` on a
    /// non-success status, an empty payload or a failure envelope
    async fn synthesize(&self, request: &RemoteSynthesisRequest)
        -> Result<AudioHandle, SynthesisError>;

    /// Voices (or models) this provider offers
    async fn voices(&self) -> Result<Vec<VoiceDescriptor>, SynthesisError>;
}
