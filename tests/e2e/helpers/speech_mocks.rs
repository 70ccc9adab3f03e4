use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;
use tts_studio::domain::tts::{Gender, LanguageCode, SynthesisError, VoiceDescriptor};
use tts_studio::infrastructure::speech::{SpeechBackend, Utterance};

/// How the scripted engine answers the next utterances
#[derive(Debug, Clone)]
pub enum SpeechScript {
    Speak,
    Unsupported,
    Interrupted,
}

/// Stand-in for the platform speech engine, recording what it was asked to say
pub struct ScriptedSpeechBackend {
    script: Mutex<SpeechScript>,
    delay: Duration,
    spoken: Mutex<Vec<Utterance>>,
}

impl ScriptedSpeechBackend {
    pub fn new(script: SpeechScript, delay: Duration) -> Self {
        Self {
            script: Mutex::new(script),
            delay,
            spoken: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn set_script(&self, script: SpeechScript) {
        *self.script.lock() = script;
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().clone()
    }
}

#[async_trait]
impl SpeechBackend for ScriptedSpeechBackend {
    async fn speak(&self, utterance: Utterance) -> Result<(), SynthesisError> {
        let script = self.script.lock().clone();
        if let SpeechScript::Unsupported = script {
            return Err(SynthesisError::UnsupportedCapability(
                "no speech engine on this host".to_string(),
            ));
        }

        tokio::time::sleep(self.delay).await;
        self.spoken.lock().push(utterance);

        match script {
            SpeechScript::Interrupted => Err(SynthesisError::Playback(
                "utterance stopped before completion".to_string(),
            )),
            _ => Ok(()),
        }
    }

    async fn voices(&self) -> Result<Vec<VoiceDescriptor>, SynthesisError> {
        if let SpeechScript::Unsupported = *self.script.lock() {
            return Err(SynthesisError::UnsupportedCapability(
                "no speech engine on this host".to_string(),
            ));
        }

        Ok(vec![
            VoiceDescriptor {
                id: "id-ID-Damayanti".to_string(),
                name: "Damayanti".to_string(),
                language: LanguageCode::Indonesian.as_str().to_string(),
                gender: Some(Gender::Female),
            },
            VoiceDescriptor {
                id: "en-US-Samantha".to_string(),
                name: "Samantha".to_string(),
                language: "en-US".to_string(),
                gender: Some(Gender::Female),
            },
        ])
    }
}
