use super::controls::{Affordance, ControlPanel, UiEffect};
use super::dto::{character_count, SynthesisMode, SynthesisRequest, Trigger, VoiceSelection};
use super::error::SynthesisError;
use super::language::{build_detector, detect_language, LanguageCode};
use super::session::{AudioHandle, Session, SessionState, SynthesisResult, SynthesisSource};
use crate::infrastructure::download::{AudioDownloader, DownloadArtifact};
use crate::infrastructure::repositories::{RemoteSynthesisRequest, RemoteTtsRepository};
use crate::infrastructure::speech::{SpeechBackend, Utterance};
use async_trait::async_trait;
use chrono::Utc;
use lingua::LanguageDetector;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// Input ceiling of the commercial-API variant
pub const COMMERCIAL_MAX_TEXT_LENGTH: usize = 5000;
/// Input ceiling of the self-hosted variant
pub const SELF_HOSTED_MAX_TEXT_LENGTH: usize = 1000;
pub const PREVIEW_LENGTH: usize = 100;

const PREVIEW_ELLIPSIS: &str = "...";

#[derive(Debug, Clone)]
pub struct OrchestratorPolicy {
    pub max_text_length: usize,
    pub preview_length: usize,
    pub fallback_to_local: bool,
    pub default_language: LanguageCode,
}

impl Default for OrchestratorPolicy {
    fn default() -> Self {
        Self {
            max_text_length: COMMERCIAL_MAX_TEXT_LENGTH,
            preview_length: PREVIEW_LENGTH,
            fallback_to_local: true,
            default_language: LanguageCode::Indonesian,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Ready(SynthesisResult),
    /// The trigger arrived while its control was disabled
    Ignored,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ControlStates {
    pub generate: bool,
    pub preview: bool,
    pub clear: bool,
    pub download: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub controls: ControlStates,
}

/// Settles the session as Failed when a dispatched trigger is dropped
/// before it reaches `settle`, e.g. when the HTTP client disconnects.
struct InFlightGuard<'a> {
    orchestrator: &'a Orchestrator,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(orchestrator: &'a Orchestrator) -> Self {
        Self {
            orchestrator,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Synthesis request dropped while in flight, releasing controls");
            let _ = self.orchestrator.settle(Err(SynthesisError::Cancelled));
        }
    }
}

pub struct Orchestrator {
    remote: Arc<dyn RemoteTtsRepository>,
    speech: Arc<dyn SpeechBackend>,
    downloader: Arc<AudioDownloader>,
    panel: ControlPanel,
    policy: OrchestratorPolicy,
    language_detector: LanguageDetector,
    session: Mutex<Session>,
}

impl Orchestrator {
    pub fn new(
        remote: Arc<dyn RemoteTtsRepository>,
        speech: Arc<dyn SpeechBackend>,
        downloader: Arc<AudioDownloader>,
        panel: ControlPanel,
        policy: OrchestratorPolicy,
    ) -> Self {
        Self {
            remote,
            speech,
            downloader,
            panel,
            policy,
            language_detector: build_detector(),
            session: Mutex::new(Session::default()),
        }
    }

    pub fn policy(&self) -> &OrchestratorPolicy {
        &self.policy
    }

    pub fn remote(&self) -> &Arc<dyn RemoteTtsRepository> {
        &self.remote
    }

    pub fn speech(&self) -> &Arc<dyn SpeechBackend> {
        &self.speech
    }
}

#[async_trait]
pub trait OrchestratorApi: Send + Sync {
    /// Run a generate or preview trigger to completion.
    ///
    /// - Ignored while another request is in flight
    /// - Validates text and rate before anything is dispatched
    /// - Remote failures fall back once to local speech when the policy allows
    ///
    /// Every error is also surfaced on the control panel.
    async fn trigger(
        &self,
        trigger: Trigger,
        request: SynthesisRequest,
    ) -> Result<Outcome, SynthesisError>;

    /// Build a download artifact from the audio held by this session
    async fn download(&self) -> Result<DownloadArtifact, SynthesisError>;
}

#[async_trait]
impl OrchestratorApi for Orchestrator {
    async fn trigger(
        &self,
        trigger: Trigger,
        request: SynthesisRequest,
    ) -> Result<Outcome, SynthesisError> {
        let text = match self.begin(trigger, &request)? {
            Some(text) => text,
            None => return Ok(Outcome::Ignored),
        };
        let guard = InFlightGuard::new(self);

        let language = self.resolve_language(&request, &text);
        let char_count = character_count(&text);

        tracing::info!(
            trigger = ?trigger,
            mode = ?request.mode,
            language = %language,
            voice = %request.voice,
            rate = request.rate,
            char_count = char_count,
            "Synthesis dispatched"
        );

        let result = match request.mode {
            SynthesisMode::Remote => {
                self.synthesize_remote(trigger, &request, text, language)
                    .await
            }
            SynthesisMode::Local => self
                .speak_locally(text, language, request.rate, request.voice.clone())
                .await
                .map(|_| SynthesisResult {
                    audio: AudioHandle::Spoken,
                    source: SynthesisSource::Local,
                    fallback_used: false,
                    char_count,
                }),
        };

        guard.disarm();
        self.settle(result).map(Outcome::Ready)
    }

    async fn download(&self) -> Result<DownloadArtifact, SynthesisError> {
        let audio = {
            let session = self.session.lock();
            if !self.panel.is_enabled(Affordance::Download, &session) {
                return Err(SynthesisError::NoAudio);
            }
            session
                .downloadable_audio()
                .cloned()
                .ok_or(SynthesisError::NoAudio)?
        };

        let artifact = self
            .downloader
            .artifact(&audio, Utc::now())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Download failed");
                self.panel.apply(UiEffect::ErrorShown(e.to_string()));
                e
            })?;

        tracing::info!(
            filename = %artifact.filename,
            size_bytes = artifact.bytes.len(),
            "Download prepared"
        );
        Ok(artifact)
    }
}

impl Orchestrator {
    /// Clear the text, audio and messages. Ignored while a request is in flight.
    pub fn clear(&self) -> bool {
        {
            let mut session = self.session.lock();
            if !self.panel.is_enabled(Affordance::Clear, &session) {
                return false;
            }
            *session = Session::default();
        }
        self.panel.apply(UiEffect::TextCleared);
        self.panel.apply(UiEffect::AudioHidden);
        self.panel.apply(UiEffect::ErrorHidden);
        true
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock();
        SessionSnapshot {
            state: session.state,
            audio: session.audio.as_ref().map(AudioHandle::kind),
            last_error: session.last_error.clone(),
            controls: ControlStates {
                generate: self.panel.is_enabled(Affordance::Generate, &session),
                preview: self.panel.is_enabled(Affordance::Preview, &session),
                clear: self.panel.is_enabled(Affordance::Clear, &session),
                download: self.panel.is_enabled(Affordance::Download, &session),
            },
        }
    }

    /// Idle -> Validating -> InFlight, atomically with respect to other triggers.
    /// Returns the text to synthesize, or `None` when the trigger is ignored.
    fn begin(
        &self,
        trigger: Trigger,
        request: &SynthesisRequest,
    ) -> Result<Option<String>, SynthesisError> {
        let affordance = match trigger {
            Trigger::Generate => Affordance::Generate,
            Trigger::Preview => Affordance::Preview,
        };

        let mut session = self.session.lock();
        if !self.panel.is_enabled(affordance, &session) {
            tracing::debug!(
                trigger = ?trigger,
                state = ?session.state,
                "Trigger ignored, control disabled"
            );
            return Ok(None);
        }

        session.state = SessionState::Validating;
        match self.validate(trigger, request) {
            Ok(text) => {
                session.state = SessionState::InFlight;
                session.audio = None;
                session.last_error = None;
                drop(session);

                self.panel.apply(UiEffect::ControlsLocked);
                self.panel.apply(UiEffect::ErrorHidden);
                self.panel.apply(UiEffect::AudioHidden);
                self.panel.apply(UiEffect::LoadingShown);
                Ok(Some(text))
            }
            Err(e) => {
                session.state = SessionState::Idle;
                session.audio = None;
                session.last_error = Some(e.to_string());
                drop(session);

                tracing::info!(error = %e, "Synthesis request rejected");
                self.panel.apply(UiEffect::ErrorShown(e.to_string()));
                Err(e)
            }
        }
    }

    fn validate(&self, trigger: Trigger, request: &SynthesisRequest) -> Result<String, SynthesisError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(SynthesisError::EmptyInput);
        }

        let length = character_count(text);
        if length > self.policy.max_text_length {
            return Err(SynthesisError::InputTooLong {
                length,
                max: self.policy.max_text_length,
            });
        }

        if !request.rate.is_finite() || request.rate <= 0.0 {
            return Err(SynthesisError::InvalidRate(request.rate));
        }

        match trigger {
            Trigger::Preview if length > self.policy.preview_length => {
                let mut preview: String = text.chars().take(self.policy.preview_length).collect();
                preview.push_str(PREVIEW_ELLIPSIS);
                Ok(preview)
            }
            _ => Ok(text.to_string()),
        }
    }

    fn resolve_language(&self, request: &SynthesisRequest, text: &str) -> LanguageCode {
        if let Some(language) = request.language {
            return language;
        }
        match detect_language(&self.language_detector, text) {
            Some(language) => language,
            None => {
                tracing::warn!(
                    fallback = %self.policy.default_language,
                    "Could not detect language, using default"
                );
                self.policy.default_language
            }
        }
    }

    async fn synthesize_remote(
        &self,
        trigger: Trigger,
        request: &SynthesisRequest,
        text: String,
        language: LanguageCode,
    ) -> Result<SynthesisResult, SynthesisError> {
        let char_count = character_count(&text);
        let remote_request = RemoteSynthesisRequest {
            text,
            voice: request.voice.clone(),
            rate: request.rate,
            language,
            preview: trigger == Trigger::Preview,
        };

        let remote_error = match self.remote.synthesize(&remote_request).await {
            Ok(audio) => {
                return Ok(SynthesisResult {
                    audio,
                    source: SynthesisSource::Remote,
                    fallback_used: false,
                    char_count,
                })
            }
            Err(e) => e,
        };

        if !self.policy.fallback_to_local {
            return Err(remote_error);
        }

        tracing::warn!(
            provider = self.remote.provider(),
            error = %remote_error,
            "Remote synthesis failed, falling back to local speech"
        );
        self.panel.apply(UiEffect::StatusShown(format!(
            "{}. Using local speech instead.",
            remote_error
        )));

        self.speak_locally(
            remote_request.text,
            language,
            request.rate,
            VoiceSelection::Auto,
        )
        .await?;

        Ok(SynthesisResult {
            audio: AudioHandle::Spoken,
            source: SynthesisSource::Local,
            fallback_used: true,
            char_count,
        })
    }

    async fn speak_locally(
        &self,
        text: String,
        language: LanguageCode,
        rate: f32,
        voice: VoiceSelection,
    ) -> Result<(), SynthesisError> {
        let start_time = std::time::Instant::now();
        self.speech
            .speak(Utterance {
                text,
                language,
                rate,
                voice,
            })
            .await?;
        tracing::info!(
            latency_ms = start_time.elapsed().as_millis(),
            "Local speech completed"
        );
        Ok(())
    }

    /// InFlight -> Ready | Failed; controls are released either way
    fn settle(
        &self,
        result: Result<SynthesisResult, SynthesisError>,
    ) -> Result<SynthesisResult, SynthesisError> {
        {
            let mut session = self.session.lock();
            match &result {
                Ok(r) => {
                    session.state = SessionState::Ready;
                    session.audio = Some(r.audio.clone());
                }
                Err(e) => {
                    session.state = SessionState::Failed;
                    session.last_error = Some(e.to_string());
                }
            }
        }

        self.panel.apply(UiEffect::LoadingHidden);
        match &result {
            Ok(r) => {
                tracing::info!(
                    source = ?r.source,
                    fallback_used = r.fallback_used,
                    audio = r.audio.kind(),
                    "Synthesis ready"
                );
                self.panel.apply(UiEffect::AudioShown {
                    kind: r.audio.kind(),
                    url: r.audio.url().map(str::to_string),
                    downloadable: r.audio.is_downloadable(),
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "Synthesis failed");
                self.panel.apply(UiEffect::ErrorShown(e.to_string()));
            }
        }
        self.panel.apply(UiEffect::ControlsReleased);

        result
    }
}
