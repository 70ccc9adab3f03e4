use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("Text cannot be empty")]
    EmptyInput,
    #[error("Text is too long: {length} characters, maximum is {max}")]
    InputTooLong { length: usize, max: usize },
    #[error("Rate must be a positive number, got {0}")]
    InvalidRate(f32),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("remote synthesis failed: {0}")]
    Remote(String),
    #[error("speech capability unavailable: {0}")]
    UnsupportedCapability(String),
    #[error("playback failed: {0}")]
    Playback(String),
    #[error("No downloadable audio in this session")]
    NoAudio,
    #[error("download failed: {0}")]
    Download(String),
    #[error("Synthesis request was cancelled before completion")]
    Cancelled,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<SynthesisError> for AppError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::EmptyInput | SynthesisError::InvalidRate(_) => {
                AppError::BadRequest(err.to_string())
            }
            SynthesisError::InputTooLong { .. } => AppError::PayloadTooLarge(err.to_string()),
            SynthesisError::NoAudio => AppError::NotFound(err.to_string()),
            SynthesisError::Remote(_) | SynthesisError::Download(_) => {
                AppError::ExternalService(err.to_string())
            }
            SynthesisError::UnsupportedCapability(_) => {
                AppError::ServiceUnavailable(err.to_string())
            }
            SynthesisError::Configuration(_)
            | SynthesisError::Playback(_)
            | SynthesisError::Cancelled
            | SynthesisError::Other(_) => AppError::Internal(err.to_string()),
        }
    }
}
