use super::dto::VoiceSelection;
use super::language::LanguageCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    pub id: String,
    pub name: String,
    /// Locale tag as reported by the source, e.g. `en`, `id-ID`
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl VoiceDescriptor {
    pub fn new(id: &str, name: &str, language: &str, gender: Option<Gender>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            language: language.to_string(),
            gender,
        }
    }
}

pub const DEFAULT_ELEVENLABS_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";

/// Voices offered for the commercial API
pub fn elevenlabs_catalog() -> Vec<VoiceDescriptor> {
    vec![
        VoiceDescriptor::new("21m00Tcm4TlvDq8ikWAM", "Rachel", "en", Some(Gender::Female)),
        VoiceDescriptor::new("pNInz6obpgDQGcFmaJgB", "Adam", "en", Some(Gender::Male)),
        VoiceDescriptor::new("XB0fDUnXU5powFXDhCwa", "Matilda", "en", Some(Gender::Female)),
    ]
}

/// Models a self-hosted backend usually ships with
pub fn self_hosted_catalog() -> Vec<VoiceDescriptor> {
    ["indonesia", "english", "multilingual"]
        .iter()
        .map(|model| self_hosted_model(model))
        .collect()
}

pub fn self_hosted_model(model: &str) -> VoiceDescriptor {
    let language = match model {
        "indonesia" => "id",
        "english" => "en",
        _ => "mul",
    };
    VoiceDescriptor::new(model, model, language, None)
}

/// Pick a platform voice for a selection.
///
/// `None` means "leave the platform default in place", which is also the
/// outcome when `auto` finds no voice for the language or a named voice is
/// missing.
pub fn select_voice<'a>(
    selection: &VoiceSelection,
    language: LanguageCode,
    voices: &'a [VoiceDescriptor],
) -> Option<&'a VoiceDescriptor> {
    match selection {
        VoiceSelection::Default => None,
        VoiceSelection::Auto => voices.iter().find(|v| language.matches_locale(&v.language)),
        VoiceSelection::Named(name) => voices.iter().find(|v| &v.name == name || &v.id == name),
    }
}
