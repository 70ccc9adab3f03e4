use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{health, studio::StudioController};
use crate::domain::tts::Orchestrator;
use crate::infrastructure::config::Config;
use crate::infrastructure::middleware::request_id_middleware;

/// All routes of the studio control surface
pub fn build_router(orchestrator: Arc<Orchestrator>, studio_controller: Arc<StudioController>) -> Router {
    let studio_routes = Router::new()
        .route("/api/tts/generate", post(StudioController::generate))
        .route("/api/tts/preview", post(StudioController::preview))
        .route("/api/tts/clear", post(StudioController::clear))
        .route("/api/tts/download", get(StudioController::download))
        .route("/api/session", get(StudioController::session))
        .route("/api/voices", get(StudioController::voices))
        .with_state(studio_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(orchestrator)
        .merge(studio_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    orchestrator: Arc<Orchestrator>,
    studio_controller: Arc<StudioController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(orchestrator, studio_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
