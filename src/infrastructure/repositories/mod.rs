pub mod elevenlabs_tts_repository;
pub mod self_hosted_tts_repository;
pub mod tts_repository;

pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use self_hosted_tts_repository::SelfHostedTtsRepository;
pub use tts_repository::{RemoteSynthesisRequest, RemoteTtsRepository};
