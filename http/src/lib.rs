use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use redaction_application::ProcessTranscriptUseCase;
use redaction_configuration::ServerConfig;

pub mod error;
pub mod handlers;

pub use error::{error_mapper, HttpError};
pub use handlers::*;

#[derive(Clone)]
pub struct AppState {
    pub usecase: Arc<dyn ProcessTranscriptUseCase>,
}

// Call transcripts arrive as a single JSON string field; allow long recordings.
const TRANSCRIPT_BODY_LIMIT_BYTES: usize = 8 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    // POST-only by contract; other methods get the JSON 405 body and the
    // Allow header instead of axum's bare default response.
    let process_route = post(process_transcript)
        .fallback(method_not_allowed)
        .layer(DefaultBodyLimit::max(TRANSCRIPT_BODY_LIMIT_BYTES));

    Router::new()
        .route("/processTranscript", process_route)
        .route("/health", get(health_check))
        .with_state(state)
}

pub async fn serve(state: AppState, config: &ServerConfig) -> anyhow::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(host = %config.host, port = config.port, "http server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to install shutdown signal handler");
    }
    tracing::info!("shutdown signal received");
}
