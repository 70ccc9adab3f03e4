use lingua::{Language, LanguageDetector, LanguageDetectorBuilder};
use serde::{Deserialize, Serialize};

/// ISO 639-1 language codes supported by the studio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "id")]
    Indonesian,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "pt")]
    Portuguese,
}

const SUPPORTED_LANGUAGES: [Language; 7] = [
    Language::English,
    Language::Indonesian,
    Language::Spanish,
    Language::French,
    Language::German,
    Language::Italian,
    Language::Portuguese,
];

impl LanguageCode {
    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en",
            LanguageCode::Indonesian => "id",
            LanguageCode::Spanish => "es",
            LanguageCode::French => "fr",
            LanguageCode::German => "de",
            LanguageCode::Italian => "it",
            LanguageCode::Portuguese => "pt",
        }
    }

    /// Convert lingua Language to LanguageCode
    pub fn from_lingua(language: Language) -> Option<Self> {
        match language {
            Language::English => Some(LanguageCode::English),
            Language::Indonesian => Some(LanguageCode::Indonesian),
            Language::Spanish => Some(LanguageCode::Spanish),
            Language::French => Some(LanguageCode::French),
            Language::German => Some(LanguageCode::German),
            Language::Italian => Some(LanguageCode::Italian),
            Language::Portuguese => Some(LanguageCode::Portuguese),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// True when a BCP 47 locale tag (`id-ID`, `en_US`, `EN`) belongs to this language
    pub fn matches_locale(&self, tag: &str) -> bool {
        let primary = tag
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default();
        primary.eq_ignore_ascii_case(self.as_str())
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(LanguageCode::English),
            "id" => Ok(LanguageCode::Indonesian),
            "es" => Ok(LanguageCode::Spanish),
            "fr" => Ok(LanguageCode::French),
            "de" => Ok(LanguageCode::German),
            "it" => Ok(LanguageCode::Italian),
            "pt" => Ok(LanguageCode::Portuguese),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

/// Build a detector restricted to the languages we can speak
pub fn build_detector() -> LanguageDetector {
    LanguageDetectorBuilder::from_languages(&SUPPORTED_LANGUAGES).build()
}

/// Detect the language of the given text, `None` when the detector is unsure
pub fn detect_language(detector: &LanguageDetector, text: &str) -> Option<LanguageCode> {
    detector
        .detect_language_of(text)
        .and_then(LanguageCode::from_lingua)
}
