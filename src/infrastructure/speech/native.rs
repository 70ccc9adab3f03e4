//! Native speech backend using the tts crate
//!
//! The `tts` crate fronts the platform engines:
//! - Speech Dispatcher on Linux
//! - AVFoundation on macOS/iOS
//! - WinRT/SAPI on Windows
//!
//! Engine handles are not `Send`, so every utterance creates its own engine on
//! a blocking thread and reports completion back through a channel.

use super::{SpeechBackend, Utterance};
use crate::domain::tts::{select_voice, Gender, SynthesisError, VoiceDescriptor};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tts::Tts;

const SPEAKING_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// How long an engine may queue an utterance before it reports speaking
const SPEECH_START_WINDOW: Duration = Duration::from_secs(2);

/// Slowest and fastest rate multipliers the engine is asked for
const MIN_RATE_MULTIPLIER: f32 = 0.5;
const MAX_RATE_MULTIPLIER: f32 = 2.0;

#[derive(Debug)]
enum UtteranceEvent {
    Finished,
    Stopped,
}

#[derive(Debug, Default)]
pub struct NativeSpeechBackend;

impl NativeSpeechBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Map a rate multiplier (1.0 = normal) onto the engine's own rate range.
///
/// 0.5..1.0 spans min..normal and 1.0..2.0 spans normal..max, since engines
/// disagree on units (speech-dispatcher uses -100..100, AVFoundation 0.1..2.0).
pub fn scale_rate(multiplier: f32, min: f32, normal: f32, max: f32) -> f32 {
    let multiplier = multiplier.clamp(MIN_RATE_MULTIPLIER, MAX_RATE_MULTIPLIER);
    let rate = if multiplier >= 1.0 {
        normal + (max - normal) * (multiplier - 1.0) / (MAX_RATE_MULTIPLIER - 1.0)
    } else {
        normal - (normal - min) * (1.0 - multiplier) / (1.0 - MIN_RATE_MULTIPLIER)
    };
    rate.clamp(min.min(max), max.max(min))
}

fn describe(voice: &tts::Voice) -> VoiceDescriptor {
    VoiceDescriptor {
        id: voice.id(),
        name: voice.name(),
        language: voice.language().to_string(),
        gender: voice.gender().map(|g| match g {
            tts::Gender::Male => Gender::Male,
            tts::Gender::Female => Gender::Female,
        }),
    }
}

fn open_engine() -> Result<Tts, SynthesisError> {
    Tts::default().map_err(|e| {
        SynthesisError::UnsupportedCapability(format!("Failed to initialize TTS: {}", e))
    })
}

fn list_voices_blocking() -> Result<Vec<VoiceDescriptor>, SynthesisError> {
    let tts = open_engine()?;
    if !tts.supported_features().voice {
        return Ok(Vec::new());
    }
    let voices = tts
        .voices()
        .map_err(|e| SynthesisError::UnsupportedCapability(format!("Failed to get voices: {}", e)))?;
    Ok(voices.iter().map(describe).collect())
}

fn apply_voice(tts: &mut Tts, utterance: &Utterance) {
    let voices = match tts.voices() {
        Ok(voices) => voices,
        Err(e) => {
            tracing::warn!(error = %e, "Could not list platform voices, using default");
            return;
        }
    };

    let descriptors: Vec<VoiceDescriptor> = voices.iter().map(describe).collect();
    let chosen = select_voice(&utterance.voice, utterance.language, &descriptors)
        .and_then(|chosen| voices.iter().find(|v| v.id() == chosen.id));

    match chosen {
        Some(voice) => {
            tracing::debug!(voice = %voice.name(), "Selecting platform voice");
            if let Err(e) = tts.set_voice(voice) {
                tracing::warn!(error = %e, "Failed to set voice, using default");
            }
        }
        None => tracing::debug!(
            selection = %utterance.voice,
            language = %utterance.language,
            "No matching voice, using platform default"
        ),
    }
}

fn speak_blocking(utterance: Utterance) -> Result<(), SynthesisError> {
    let mut tts = open_engine()?;
    let features = tts.supported_features();

    if features.voice {
        apply_voice(&mut tts, &utterance);
    }

    if features.rate {
        let rate = scale_rate(
            utterance.rate,
            tts.min_rate(),
            tts.normal_rate(),
            tts.max_rate(),
        );
        if let Err(e) = tts.set_rate(rate) {
            tracing::warn!(error = %e, rate = rate, "Failed to set rate");
        }
    } else {
        tracing::warn!("Rate control not supported on this platform");
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let callbacks = features.utterance_callbacks;
    if callbacks {
        let end_tx = tx.clone();
        let stop_tx = tx.clone();
        tts.on_utterance_end(Some(Box::new(move |_| {
            let _ = end_tx.send(UtteranceEvent::Finished);
        })))
        .map_err(|e| SynthesisError::Playback(format!("Failed to register callback: {}", e)))?;
        tts.on_utterance_stop(Some(Box::new(move |_| {
            let _ = stop_tx.send(UtteranceEvent::Stopped);
        })))
        .map_err(|e| SynthesisError::Playback(format!("Failed to register callback: {}", e)))?;
    }
    drop(tx);

    tracing::debug!(text_length = utterance.text.len(), "Speaking utterance");
    tts.speak(utterance.text, false).map_err(|e| {
        tracing::error!(error = %e, "Failed to speak");
        SynthesisError::Playback(format!("Speak failed: {}", e))
    })?;

    if callbacks {
        return match rx.blocking_recv() {
            Some(UtteranceEvent::Finished) => Ok(()),
            Some(UtteranceEvent::Stopped) => Err(SynthesisError::Playback(
                "Utterance stopped before completion".to_string(),
            )),
            None => Err(SynthesisError::Playback(
                "Speech engine closed before completion".to_string(),
            )),
        };
    }

    if features.is_speaking {
        return wait_for_speech_end(
            || tts.is_speaking(),
            SPEAKING_POLL_INTERVAL,
            SPEECH_START_WINDOW,
        );
    }

    tracing::warn!(
        "Engine reports neither callbacks nor speaking state, completion cannot be observed"
    );
    Ok(())
}

/// Poll the engine until it has been seen speaking and then gone quiet.
///
/// An engine that never reports speaking within `start_window` is taken to
/// have finished already (very short utterances can start and end between polls).
fn wait_for_speech_end<E: std::fmt::Display>(
    mut is_speaking: impl FnMut() -> Result<bool, E>,
    interval: Duration,
    start_window: Duration,
) -> Result<(), SynthesisError> {
    let polling_since = Instant::now();
    let mut started = false;

    loop {
        let speaking = is_speaking()
            .map_err(|e| SynthesisError::Playback(format!("Speech engine fault: {}", e)))?;

        if speaking {
            started = true;
        } else if started {
            return Ok(());
        } else if polling_since.elapsed() >= start_window {
            tracing::warn!(
                waited_ms = start_window.as_millis(),
                "Engine never reported speaking, treating utterance as finished"
            );
            return Ok(());
        }

        std::thread::sleep(interval);
    }
}

#[async_trait]
impl SpeechBackend for NativeSpeechBackend {
    async fn speak(&self, utterance: Utterance) -> Result<(), SynthesisError> {
        tracing::info!(
            language = %utterance.language,
            voice = %utterance.voice,
            rate = utterance.rate,
            text_length = utterance.text.len(),
            "Starting local speech"
        );
        tokio::task::spawn_blocking(move || speak_blocking(utterance))
            .await
            .map_err(|e| SynthesisError::Other(anyhow::anyhow!("speech task failed: {}", e)))?
    }

    async fn voices(&self) -> Result<Vec<VoiceDescriptor>, SynthesisError> {
        tokio::task::spawn_blocking(list_voices_blocking)
            .await
            .map_err(|e| SynthesisError::Other(anyhow::anyhow!("voice listing failed: {}", e)))?
    }
}
