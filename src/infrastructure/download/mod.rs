use crate::domain::tts::{AudioHandle, SynthesisError};
use chrono::{DateTime, Utc};

/// Audio ready to be offered as a file
#[derive(Debug, Clone)]
pub struct DownloadArtifact {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// `tts-<unix millis>.mp3`
pub fn download_filename(now: DateTime<Utc>) -> String {
    format!("tts-{}.mp3", now.timestamp_millis())
}

/// Turns the session's audio handle into a downloadable file
pub struct AudioDownloader {
    http_client: reqwest::Client,
}

impl AudioDownloader {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    pub async fn artifact(
        &self,
        audio: &AudioHandle,
        now: DateTime<Utc>,
    ) -> Result<DownloadArtifact, SynthesisError> {
        let filename = download_filename(now);
        match audio {
            AudioHandle::Clip {
                bytes,
                content_type,
            } => Ok(DownloadArtifact {
                filename,
                content_type: content_type.clone(),
                bytes: bytes.as_ref().clone(),
            }),
            AudioHandle::Remote { url, .. } => {
                tracing::info!(audio_url = %url, "Fetching remote audio for download");
                let response = self
                    .http_client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| SynthesisError::Download(format!("Failed to fetch audio: {}", e)))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(SynthesisError::Download(format!(
                        "Audio host returned {}",
                        status.as_u16()
                    )));
                }

                let content_type = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("audio/mpeg")
                    .to_string();
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| SynthesisError::Download(format!("Failed to read audio: {}", e)))?
                    .to_vec();

                Ok(DownloadArtifact {
                    filename,
                    content_type,
                    bytes,
                })
            }
            AudioHandle::Spoken => Err(SynthesisError::NoAudio),
        }
    }
}
