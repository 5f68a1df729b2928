//! Pipeline stages and progress snapshots

use serde::{Deserialize, Serialize};
use std::fmt;

static STAGE_ORDER: [PipelineStage; 5] = PipelineStage::ALL;

/// One stage of a pipeline run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    /// Waiting for intent
    Listening,
    /// Speech to text
    Transcribing,
    /// Pulling out decision, owner, status
    Extracting,
    /// Mapping values onto schema fields
    Normalizing,
    /// Building the card
    Generating,
}

impl PipelineStage {
    /// All stages in execution order
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::Listening,
        PipelineStage::Transcribing,
        PipelineStage::Extracting,
        PipelineStage::Normalizing,
        PipelineStage::Generating,
    ];

    /// Stable identifier
    pub fn id(&self) -> &'static str {
        match self {
            PipelineStage::Listening => "listening",
            PipelineStage::Transcribing => "transcribing",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Normalizing => "normalizing",
            PipelineStage::Generating => "generating",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Listening => "Listening for intent",
            PipelineStage::Transcribing => "Transcribing speech",
            PipelineStage::Extracting => "Extracting decisions",
            PipelineStage::Normalizing => "Normalizing fields",
            PipelineStage::Generating => "Generating decision card",
        }
    }

    /// Stages that run before this one
    pub fn predecessors(&self) -> &'static [PipelineStage] {
        let index = STAGE_ORDER.iter().position(|s| s == self).unwrap_or(0);
        &STAGE_ORDER[..index]
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Display status of one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// Already completed
    Done,
    /// Currently active
    Running,
    /// Neither
    Idle,
}

impl StepStatus {
    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Done => "Done",
            StepStatus::Running => "Running",
            StepStatus::Idle => "Idle",
        }
    }
}

/// One row of the pipeline display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    /// Stage identifier
    pub id: &'static str,
    /// Stage label
    pub label: &'static str,
    /// Stage status
    pub status: StepStatus,
}

/// Current stage plus completed stages
///
/// This is all that exists of a run outside the worker; nothing else is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PipelineProgress {
    /// Stage being held, if any
    pub active: Option<PipelineStage>,
    /// Stages finished in the current (or last) run
    pub completed: Vec<PipelineStage>,
}

impl PipelineProgress {
    /// Nothing active, nothing complete
    pub fn idle() -> Self {
        Self::default()
    }

    /// Entering `stage`: every earlier stage is complete
    pub fn entering(stage: PipelineStage) -> Self {
        Self {
            active: Some(stage),
            completed: stage.predecessors().to_vec(),
        }
    }

    /// Run finished: nothing active, every stage complete
    pub fn finished() -> Self {
        Self {
            active: None,
            completed: PipelineStage::ALL.to_vec(),
        }
    }

    /// Status of one stage; completion wins over activity
    pub fn status_of(&self, stage: PipelineStage) -> StepStatus {
        if self.completed.contains(&stage) {
            StepStatus::Done
        } else if self.active == Some(stage) {
            StepStatus::Running
        } else {
            StepStatus::Idle
        }
    }

    /// Display rows for every stage
    pub fn steps(&self) -> Vec<StepView> {
        PipelineStage::ALL
            .iter()
            .map(|stage| StepView {
                id: stage.id(),
                label: stage.label(),
                status: self.status_of(*stage),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_labels() {
        let ids: Vec<_> = PipelineStage::ALL.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["listening", "transcribing", "extracting", "normalizing", "generating"]);
        assert_eq!(PipelineStage::Generating.label(), "Generating decision card");
    }

    #[test]
    fn test_idle_progress() {
        let progress = PipelineProgress::idle();
        assert!(progress.steps().iter().all(|s| s.status == StepStatus::Idle));
    }

    #[test]
    fn test_entering_marks_prior_complete() {
        let progress = PipelineProgress::entering(PipelineStage::Extracting);
        assert_eq!(progress.completed, vec![PipelineStage::Listening, PipelineStage::Transcribing]);

        let statuses: Vec<_> = progress.steps().iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![StepStatus::Done, StepStatus::Done, StepStatus::Running, StepStatus::Idle, StepStatus::Idle]
        );
    }

    #[test]
    fn test_finished() {
        let progress = PipelineProgress::finished();
        assert!(progress.active.is_none());
        assert!(progress.steps().iter().all(|s| s.status == StepStatus::Done));
        assert_eq!(StepStatus::Done.as_str(), "Done");
    }

    #[test]
    fn test_first_stage_has_no_predecessors() {
        assert!(PipelineStage::Listening.predecessors().is_empty());
        assert_eq!(PipelineStage::Generating.predecessors().len(), 4);
    }
}
