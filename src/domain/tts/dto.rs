use super::language::LanguageCode;
use serde::{Deserialize, Serialize};

/// Which backend produces the audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisMode {
    Local,
    #[default]
    Remote,
}

/// User voice choice. `auto` picks by language, `default` leaves the platform default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VoiceSelection {
    #[default]
    Auto,
    Default,
    Named(String),
}

impl VoiceSelection {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "default" => VoiceSelection::Default,
            "auto" => VoiceSelection::Auto,
            name => VoiceSelection::Named(name.to_string()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            VoiceSelection::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for VoiceSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceSelection::Auto => write!(f, "auto"),
            VoiceSelection::Default => write!(f, "default"),
            VoiceSelection::Named(name) => write!(f, "{}", name),
        }
    }
}

/// The control that started a synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Generate,
    Preview,
}

#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: VoiceSelection,
    pub rate: f32,
    pub mode: SynthesisMode,
    pub language: Option<LanguageCode>,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, mode: SynthesisMode) -> Self {
        Self {
            text: text.into(),
            voice: VoiceSelection::Auto,
            rate: 1.0,
            mode,
            language: None,
        }
    }

    pub fn with_voice(mut self, voice: VoiceSelection) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_language(mut self, language: LanguageCode) -> Self {
        self.language = Some(language);
        self
    }
}

/// Rate equal to normal speed, within float noise
pub fn is_normal_rate(rate: f32) -> bool {
    (rate - 1.0).abs() < f32::EPSILON
}

/// Character count as shown next to the text input
pub fn character_count(text: &str) -> usize {
    text.chars().count()
}
