//! Quorum Pipeline
//!
//! Sequences finalized transcripts through a fixed five-stage pipeline and
//! turns each one into a decision card on the shared board.
//!
//! # Overview
//!
//! The pipeline is responsible for:
//! - **Staging**: listening → transcribing → extracting → normalizing →
//!   generating, each held for a configured simulated latency
//! - **Serialization**: one run at a time, in arrival order, no overlap
//! - **Progress**: a current-stage + completed-stages snapshot for display
//! - **Speech input**: driving a [`SpeechSource`] and feeding its finalized
//!   transcripts into the queue
//!
//! # Stages
//!
//! | Stage | Label | Default latency |
//! |-------|-------|-----------------|
//! | listening | Listening for intent | 300 ms |
//! | transcribing | Transcribing speech | 350 ms |
//! | extracting | Extracting decisions | 400 ms |
//! | normalizing | Normalizing fields | 400 ms |
//! | generating | Generating decision card | 350 ms |
//!
//! The latencies are a fixed stand-in for processing time; they do not
//! depend on the transcript.
//!
//! # Usage
//!
//! ```no_run
//! use quorum_pipeline::{PipelineConfig, PipelineWorker};
//! use quorum_store::Board;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let board = Board::new().into_shared();
//!     let handle = PipelineWorker::new(board.clone(), PipelineConfig::default()).spawn();
//!
//!     let queue = handle.queue();
//!     queue.submit("We decide to ship the beta. Owner is Priya.")?;
//!     queue.submit("We should revisit pricing. Pending finance.")?;
//!     drop(queue);
//!
//!     // Waits for both runs to finish
//!     let metrics = handle.shutdown().await?;
//!     println!("{}", metrics.summary());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [pipeline]
//! listening_ms = 300
//! transcribing_ms = 350
//! extracting_ms = 400
//! normalizing_ms = 400
//! generating_ms = 350
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod speech;
mod stage;
mod stepper;
mod worker;

pub use config::{PipelineConfig, MAX_STAGE_MS};
pub use error::PipelineError;
pub use metrics::PipelineMetrics;
pub use speech::{ListeningSession, MicStatus, ScriptedSource, SpeechEvent, SpeechSegment, SpeechSource};
pub use stage::{PipelineProgress, PipelineStage, StepStatus, StepView};
pub use stepper::{PipelineEvent, PipelineStepper};
pub use worker::{PipelineHandle, PipelineWorker, TranscriptQueue};
