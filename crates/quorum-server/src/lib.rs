//! Quorum Server
//!
//! Serves the decision-card page and a JSON API over one in-memory board.
//! Finalized transcripts posted to the API are run through the pipeline
//! worker, which writes a card back to the same board.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod static_files;

use config::ServerConfig;
use handlers::{create_router, AppState};
use quorum_extractor::TranscriptExtractor;
use quorum_pipeline::PipelineWorker;
use quorum_store::Board;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Extractor rejected its configuration
    #[error("Extractor error: {0}")]
    Extractor(#[from] quorum_extractor::ExtractorError),

    /// Pipeline worker error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] quorum_pipeline::PipelineError),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`, defaulting to `info`. A second call is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the board every request and pipeline run shares
pub fn build_board(config: &ServerConfig) -> Result<Board, ServerError> {
    let extractor = TranscriptExtractor::new(config.extractor.clone())?;
    let mut board = Board::new().with_extractor(extractor);
    board.subscribe(|change| debug!("Board changed: {:?}", change));
    Ok(board)
}

/// Start the Quorum HTTP server
///
/// Builds the board, spawns the pipeline worker and serves until Ctrl-C.
/// Queued transcripts are drained before returning.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing();

    info!("Starting Quorum server");
    info!("Bind address: {}", config.bind_addr());
    info!("Static root: {}", config.static_root.display());
    info!("Pipeline run latency: {:?}", config.pipeline.total());

    let board = build_board(&config)?.into_shared();
    let worker = PipelineWorker::new(board.clone(), config.pipeline.clone()).spawn();

    let state = AppState::new(board, worker.queue(), config.static_root.clone());
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Serving on http://{}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    let metrics = worker.shutdown().await?;
    info!("Server stopped after {} pipeline runs", metrics.runs_completed);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
