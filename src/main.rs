use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tts_studio::controllers::studio::StudioController;
use tts_studio::domain::tts::{ControlPanel, Orchestrator, PanelState};
use tts_studio::infrastructure::config::{Config, LogFormat, RemoteProvider};
use tts_studio::infrastructure::download::AudioDownloader;
use tts_studio::infrastructure::http::start_http_server;
use tts_studio::infrastructure::repositories::{
    ElevenLabsTtsRepository, RemoteTtsRepository, SelfHostedTtsRepository,
};
use tts_studio::infrastructure::speech::{NativeSpeechBackend, SpeechBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting TTS Studio on {}:{}",
        config.host,
        config.port
    );

    let http_client = reqwest::Client::new();

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Remote synthesis provider
    let remote: Arc<dyn RemoteTtsRepository> = match config.remote_provider {
        RemoteProvider::ElevenLabs => Arc::new(ElevenLabsTtsRepository::new(
            http_client.clone(),
            config.elevenlabs_base_url.clone(),
            config.elevenlabs_api_key.clone(),
            config.elevenlabs_model_id.clone(),
            config.elevenlabs_default_voice.clone(),
        )),
        RemoteProvider::SelfHosted => Arc::new(SelfHostedTtsRepository::new(
            http_client.clone(),
            config.remote_backend_url.clone(),
            config.remote_backend_model.clone(),
        )),
    };

    if !remote.is_configured() {
        tracing::warn!(
            provider = remote.provider(),
            "Remote provider is not configured; requests will fall back to local speech"
        );
    }

    // 2. Platform speech
    let speech: Arc<dyn SpeechBackend> = Arc::new(NativeSpeechBackend::new());
    if !speech.is_available().await {
        tracing::warn!("Native speech engine unavailable on this host");
    }

    // 3. Orchestrator with its control panel
    let panel_state = Arc::new(PanelState::new());
    let policy = config.policy();
    tracing::info!(
        provider = remote.provider(),
        max_text_length = policy.max_text_length,
        fallback_to_local = policy.fallback_to_local,
        default_language = %policy.default_language,
        "Orchestration policy loaded"
    );

    let orchestrator = Arc::new(Orchestrator::new(
        remote,
        speech,
        Arc::new(AudioDownloader::new(http_client)),
        ControlPanel::new(panel_state.clone()),
        policy,
    ));

    // 4. Controllers
    let studio_controller = Arc::new(StudioController::new(orchestrator.clone(), panel_state));

    start_http_server(Arc::new(config), orchestrator, studio_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tts_studio=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
