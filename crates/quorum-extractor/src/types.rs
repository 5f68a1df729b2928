//! Extraction entry point and its result type

use crate::patterns::{extract_decision, extract_owner, extract_status};
use crate::{ExtractorConfig, ExtractorError};
use quorum_domain::{Confidence, DecisionStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Values extracted from one finalized transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptAnalysis {
    /// The trimmed transcript itself
    pub summary: String,

    /// Decision phrase
    pub decision: String,

    /// Owner, empty if none was named
    pub owner: String,

    /// Inferred status
    pub status: DecisionStatus,

    /// Confidence score
    pub confidence: Confidence,
}

/// Applies the transcript heuristics with a configured confidence band
#[derive(Debug, Clone, Default)]
pub struct TranscriptExtractor {
    config: ExtractorConfig,
}

impl TranscriptExtractor {
    /// Create an extractor, validating the configuration
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Analyze a transcript
    ///
    /// The transcript is trimmed first; every heuristic sees the trimmed text.
    pub fn analyze(&self, transcript: &str) -> TranscriptAnalysis {
        let summary = transcript.trim().to_string();
        let analysis = TranscriptAnalysis {
            decision: extract_decision(&summary),
            owner: extract_owner(&summary),
            status: extract_status(&summary),
            confidence: Confidence::clamped(self.config.estimate(&summary)),
            summary,
        };

        debug!(
            "Analyzed transcript ({} chars): status {}, confidence {:.2}",
            analysis.summary.len(),
            analysis.status,
            analysis.confidence.value()
        );

        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_full_transcript() {
        let extractor = TranscriptExtractor::default();
        let analysis =
            extractor.analyze("  We decide to ship the beta. The owner is Priya. Pending legal.  ");

        assert_eq!(analysis.summary, "We decide to ship the beta. The owner is Priya. Pending legal.");
        assert_eq!(analysis.decision, "ship the beta");
        assert_eq!(analysis.owner, "Priya");
        assert_eq!(analysis.status, DecisionStatus::Pending);
        assert!(analysis.confidence.value() > 0.5);
    }

    #[test]
    fn test_analyze_defaults() {
        let analysis = TranscriptExtractor::default().analyze("Coffee");
        assert_eq!(analysis.decision, "Coffee");
        assert_eq!(analysis.owner, "");
        assert_eq!(analysis.status, DecisionStatus::Proposed);
    }

    #[test]
    fn test_custom_band() {
        let config = ExtractorConfig {
            floor: 0.1,
            ceiling: 0.2,
            ..Default::default()
        };
        let extractor = TranscriptExtractor::new(config).unwrap();
        assert_eq!(extractor.analyze("one two").confidence.value(), 0.2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExtractorConfig {
            ceiling: 1.5,
            ..Default::default()
        };
        assert!(TranscriptExtractor::new(config).is_err());
    }
}
