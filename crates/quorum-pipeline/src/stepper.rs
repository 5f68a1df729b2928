//! A single pipeline run: five timed stages, then a card

use crate::{PipelineConfig, PipelineError, PipelineProgress, PipelineStage};
use quorum_domain::CardId;
use quorum_store::SharedBoard;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::{debug, info};

/// Fine-grained record of what a run did, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A run entered a stage
    StageEntered {
        /// Run number, starting at 1
        run: u64,
        /// Stage entered
        stage: PipelineStage,
    },
    /// A run finished its last stage and created a card
    RunCompleted {
        /// Run number, starting at 1
        run: u64,
        /// Card created
        card: CardId,
    },
}

/// Walks one transcript through the stages
///
/// Each stage publishes a [`PipelineProgress`] on entry and then holds for its
/// configured latency. After the last stage the card is written to the board
/// and every stage is reported complete.
pub struct PipelineStepper {
    config: PipelineConfig,
    board: SharedBoard,
    progress: watch::Sender<PipelineProgress>,
    events: Option<mpsc::UnboundedSender<PipelineEvent>>,
}

impl PipelineStepper {
    /// Create a stepper publishing progress on `progress`
    pub fn new(config: PipelineConfig, board: SharedBoard, progress: watch::Sender<PipelineProgress>) -> Self {
        Self {
            config,
            board,
            progress,
            events: None,
        }
    }

    /// Also forward every [`PipelineEvent`] to `events`
    pub fn with_events(mut self, events: mpsc::UnboundedSender<PipelineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Stage latencies in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(events) = &self.events {
            // a dropped receiver only means nobody is watching
            let _ = events.send(event);
        }
    }

    /// Run one transcript through every stage and create its card
    pub async fn run(&self, run: u64, transcript: &str) -> Result<CardId, PipelineError> {
        for stage in PipelineStage::ALL {
            self.progress.send_replace(PipelineProgress::entering(stage));
            self.emit(PipelineEvent::StageEntered { run, stage });
            debug!("Run {} entered {}", run, stage);

            sleep(self.config.latency(stage)).await;
        }

        let card = {
            let mut board = self
                .board
                .lock()
                .map_err(|e| PipelineError::Board(e.to_string()))?;
            board.create_card_from_transcript(transcript)
        };

        self.progress.send_replace(PipelineProgress::finished());
        self.emit(PipelineEvent::RunCompleted { run, card });
        info!("Run {} completed: card {}", run, card);

        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_store::Board;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_run_holds_each_stage() {
        let board = Board::new().into_shared();
        let (progress_tx, progress_rx) = watch::channel(PipelineProgress::idle());
        let stepper = PipelineStepper::new(PipelineConfig::default(), board.clone(), progress_tx);

        let start = tokio::time::Instant::now();
        let card = stepper.run(1, "We will launch on Monday.").await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(1800));
        assert_eq!(*progress_rx.borrow(), PipelineProgress::finished());

        let board = board.lock().unwrap();
        let stored = board.cards().get(card).unwrap();
        assert_eq!(stored.field_by_name("Decision").unwrap().value, "launch on Monday");
    }

    #[tokio::test]
    async fn test_events_follow_stage_order() {
        let board = Board::new().into_shared();
        let (progress_tx, _progress_rx) = watch::channel(PipelineProgress::idle());
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let stepper = PipelineStepper::new(PipelineConfig::instant(), board, progress_tx).with_events(events_tx);

        let card = stepper.run(7, "Short note").await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = events_rx.try_recv() {
            events.push(event);
        }

        let mut expected: Vec<_> = PipelineStage::ALL
            .iter()
            .map(|stage| PipelineEvent::StageEntered { run: 7, stage: *stage })
            .collect();
        expected.push(PipelineEvent::RunCompleted { run: 7, card });
        assert_eq!(events, expected);
    }
}
