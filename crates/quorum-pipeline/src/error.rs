//! Error types for pipeline operations

use thiserror::Error;

/// Errors that can occur while running the pipeline
///
/// A run has no failure path through its stages; these cover the plumbing
/// around it.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The worker is gone and no longer accepts transcripts
    #[error("Pipeline queue closed")]
    QueueClosed,

    /// The shared board could not be locked
    #[error("Board unavailable: {0}")]
    Board(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
