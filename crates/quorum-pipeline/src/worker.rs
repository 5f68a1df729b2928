//! Background worker that serializes pipeline runs

use crate::{PipelineConfig, PipelineError, PipelineEvent, PipelineMetrics, PipelineProgress, PipelineStepper};
use quorum_store::SharedBoard;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Background worker that runs one transcript at a time
///
/// Transcripts are taken from an unbounded FIFO channel. A transcript that
/// arrives mid-run waits until the current run has created its card; runs
/// never overlap and are never cancelled.
///
/// # Examples
///
/// ```no_run
/// use quorum_pipeline::{PipelineConfig, PipelineWorker};
/// use quorum_store::Board;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let board = Board::new().into_shared();
///     let handle = PipelineWorker::new(board, PipelineConfig::default()).spawn();
///
///     handle.queue().submit("We will refactor the parser.")?;
///     let metrics = handle.shutdown().await?;
///     assert_eq!(metrics.runs_completed, 1);
///     Ok(())
/// }
/// ```
pub struct PipelineWorker {
    board: SharedBoard,
    config: PipelineConfig,
    events: Option<mpsc::UnboundedSender<PipelineEvent>>,
}

impl PipelineWorker {
    /// Create a worker writing cards to `board`
    pub fn new(board: SharedBoard, config: PipelineConfig) -> Self {
        Self {
            board,
            config,
            events: None,
        }
    }

    /// Forward every stage transition and completion to `events`
    pub fn with_events(mut self, events: mpsc::UnboundedSender<PipelineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Start the worker on the current tokio runtime
    pub fn spawn(self) -> PipelineHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let (progress_tx, progress_rx) = watch::channel(PipelineProgress::idle());

        let mut stepper = PipelineStepper::new(self.config, self.board, progress_tx);
        if let Some(events) = self.events {
            stepper = stepper.with_events(events);
        }

        let join = tokio::spawn(run(stepper, rx));

        PipelineHandle {
            queue: TranscriptQueue {
                tx,
                progress: progress_rx,
            },
            join,
        }
    }
}

async fn run(stepper: PipelineStepper, mut rx: mpsc::UnboundedReceiver<String>) -> PipelineMetrics {
    let mut metrics = PipelineMetrics::new();
    let mut run_number = 0u64;

    tracing::info!(
        "Pipeline worker started (run latency: {:?})",
        stepper.config().total()
    );

    while let Some(transcript) = rx.recv().await {
        run_number += 1;
        tracing::debug!("Starting run {} ({} chars)", run_number, transcript.len());

        match stepper.run(run_number, &transcript).await {
            Ok(_) => metrics.record_run(stepper.config().total()),
            Err(e) => {
                tracing::error!("Run {} failed: {}", run_number, e);
                metrics.record_failure();
            }
        }
    }

    tracing::info!("Pipeline worker stopped. Final metrics:\n{}", metrics.summary());
    metrics
}

/// Cloneable sending side of the pipeline
#[derive(Debug, Clone)]
pub struct TranscriptQueue {
    tx: mpsc::UnboundedSender<String>,
    progress: watch::Receiver<PipelineProgress>,
}

impl TranscriptQueue {
    /// Enqueue a finalized transcript
    ///
    /// The transcript is trimmed; an empty result is not enqueued and
    /// `Ok(false)` is returned.
    pub fn submit(&self, transcript: &str) -> Result<bool, PipelineError> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Ok(false);
        }
        self.tx
            .send(transcript.to_string())
            .map_err(|_| PipelineError::QueueClosed)?;
        Ok(true)
    }

    /// Latest progress snapshot
    pub fn progress(&self) -> PipelineProgress {
        self.progress.borrow().clone()
    }

    /// Receiver notified on every progress change
    pub fn watch_progress(&self) -> watch::Receiver<PipelineProgress> {
        self.progress.clone()
    }
}

/// Owner of a running worker
pub struct PipelineHandle {
    queue: TranscriptQueue,
    pub(crate) join: JoinHandle<PipelineMetrics>,
}

impl PipelineHandle {
    /// A queue to submit transcripts through
    pub fn queue(&self) -> TranscriptQueue {
        self.queue.clone()
    }

    /// Close this handle's queue and wait for the worker to drain
    ///
    /// The worker finishes every queued run first. It only stops once every
    /// [`TranscriptQueue`] clone has been dropped.
    pub async fn shutdown(self) -> Result<PipelineMetrics, PipelineError> {
        drop(self.queue);
        self.join.await.map_err(|e| PipelineError::Worker(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineStage;
    use quorum_store::Board;
    use std::time::Duration;

    fn collect(rx: &mut mpsc::UnboundedReceiver<PipelineEvent>) -> Vec<PipelineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_are_serialized_in_arrival_order() {
        let board = Board::new().into_shared();
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let handle = PipelineWorker::new(board.clone(), PipelineConfig::default())
            .with_events(events_tx)
            .spawn();

        let queue = handle.queue();
        assert!(queue.submit("We decide to ship the beta.").unwrap());
        assert!(queue.submit("We should hire a designer.").unwrap());
        drop(queue);

        let start = tokio::time::Instant::now();
        let metrics = handle.shutdown().await.unwrap();
        assert_eq!(metrics.runs_completed, 2);
        assert!(start.elapsed() >= Duration::from_millis(3600));

        let events = collect(&mut events_rx);
        assert_eq!(events.len(), 12);

        // run 1 finishes before run 2 enters its first stage
        let first_done = events
            .iter()
            .position(|e| matches!(e, PipelineEvent::RunCompleted { run: 1, .. }))
            .unwrap();
        let second_start = events
            .iter()
            .position(|e| matches!(e, PipelineEvent::StageEntered { run: 2, stage: PipelineStage::Listening }))
            .unwrap();
        assert_eq!(first_done, 5);
        assert_eq!(second_start, 6);

        let cards: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::RunCompleted { card, .. } => Some(*card),
                _ => None,
            })
            .collect();

        // newest first on the board
        let board = board.lock().unwrap();
        let order: Vec<_> = board.cards().iter().map(|c| c.id).collect();
        assert_eq!(order, vec![cards[1], cards[0]]);
        assert_eq!(
            board.cards().get(cards[0]).unwrap().field_by_name("Decision").unwrap().value,
            "ship the beta"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_arrival_waits_for_current_run() {
        let board = Board::new().into_shared();
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let handle = PipelineWorker::new(board, PipelineConfig::default())
            .with_events(events_tx)
            .spawn();

        let queue = handle.queue();
        queue.submit("first").unwrap();
        // arrive while run 1 is in its extracting stage
        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(queue.progress().active, Some(PipelineStage::Extracting));
        queue.submit("second").unwrap();
        drop(queue);

        handle.shutdown().await.unwrap();

        let runs: Vec<u64> = collect(&mut events_rx)
            .iter()
            .map(|e| match e {
                PipelineEvent::StageEntered { run, .. } | PipelineEvent::RunCompleted { run, .. } => *run,
            })
            .collect();
        assert_eq!(runs, vec![1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2]);
    }

    #[tokio::test]
    async fn test_blank_transcripts_are_skipped() {
        let board = Board::new().into_shared();
        let handle = PipelineWorker::new(board.clone(), PipelineConfig::instant()).spawn();

        let queue = handle.queue();
        assert!(!queue.submit("   ").unwrap());
        assert!(!queue.submit("").unwrap());
        drop(queue);

        let metrics = handle.shutdown().await.unwrap();
        assert_eq!(metrics.runs_completed, 0);
        assert!(board.lock().unwrap().cards().is_empty());
    }

    #[tokio::test]
    async fn test_progress_starts_idle_and_ends_finished() {
        let board = Board::new().into_shared();
        let handle = PipelineWorker::new(board, PipelineConfig::instant()).spawn();

        let queue = handle.queue();
        assert_eq!(queue.progress(), PipelineProgress::idle());
        queue.submit("We will try it.").unwrap();
        let watcher = queue.watch_progress();
        drop(queue);

        handle.shutdown().await.unwrap();
        assert_eq!(*watcher.borrow(), PipelineProgress::finished());
    }
}
