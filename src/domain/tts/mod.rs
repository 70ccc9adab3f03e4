pub mod controls;
pub mod dto;
pub mod error;
pub mod language;
pub mod orchestrator;
pub mod session;
pub mod voices;

pub use controls::{Affordance, ControlPanel, ControlSurface, PanelState, PanelView, UiEffect};
pub use dto::{
    character_count, is_normal_rate, SynthesisMode, SynthesisRequest, Trigger, VoiceSelection,
};
pub use error::SynthesisError;
pub use language::LanguageCode;
pub use orchestrator::{
    Orchestrator, OrchestratorApi, OrchestratorPolicy, Outcome, SessionSnapshot,
    COMMERCIAL_MAX_TEXT_LENGTH, SELF_HOSTED_MAX_TEXT_LENGTH,
};
pub use session::{AudioHandle, SessionState, SynthesisResult, SynthesisSource};
pub use voices::{
    elevenlabs_catalog, select_voice, self_hosted_catalog, self_hosted_model, Gender,
    VoiceDescriptor, DEFAULT_ELEVENLABS_VOICE,
};
