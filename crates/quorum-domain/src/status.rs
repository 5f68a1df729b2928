//! Decision status values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status a decision card can carry
///
/// These are also the options of the default "Status" select field, in the
/// order they appear there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionStatus {
    /// Raised but not settled (default)
    Proposed,

    /// Agreed on
    Approved,

    /// Waiting on something
    Pending,

    /// Flagged for another look
    #[serde(rename = "Needs Review")]
    NeedsReview,
}

impl DecisionStatus {
    /// All statuses in select-option order
    pub const ALL: [DecisionStatus; 4] = [
        DecisionStatus::Proposed,
        DecisionStatus::Approved,
        DecisionStatus::Pending,
        DecisionStatus::NeedsReview,
    ];

    /// Get the status label
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Proposed => "Proposed",
            DecisionStatus::Approved => "Approved",
            DecisionStatus::Pending => "Pending",
            DecisionStatus::NeedsReview => "Needs Review",
        }
    }

    /// Labels of every status, used as select options
    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl Default for DecisionStatus {
    fn default() -> Self {
        DecisionStatus::Proposed
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
