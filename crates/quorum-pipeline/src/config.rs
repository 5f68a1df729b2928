//! Configuration for pipeline stage latencies

use crate::{PipelineError, PipelineStage};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest hold allowed for a single stage
pub const MAX_STAGE_MS: u64 = 60_000;

/// Simulated latency of each pipeline stage, in milliseconds
///
/// # Examples
///
/// ```
/// use quorum_pipeline::{PipelineConfig, PipelineStage};
/// use std::time::Duration;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.latency(PipelineStage::Extracting), Duration::from_millis(400));
/// assert_eq!(config.total(), Duration::from_millis(1800));
///
/// // No delay at all, for tests
/// assert_eq!(PipelineConfig::instant().total(), Duration::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Hold time of the listening stage
    pub listening_ms: u64,

    /// Hold time of the transcribing stage
    pub transcribing_ms: u64,

    /// Hold time of the extracting stage
    pub extracting_ms: u64,

    /// Hold time of the normalizing stage
    pub normalizing_ms: u64,

    /// Hold time of the generating stage
    pub generating_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            listening_ms: 300,
            transcribing_ms: 350,
            extracting_ms: 400,
            normalizing_ms: 400,
            generating_ms: 350,
        }
    }
}

impl PipelineConfig {
    /// Every stage completes immediately
    pub fn instant() -> Self {
        Self::uniform(0)
    }

    /// Every stage holds for the same time
    pub fn uniform(ms: u64) -> Self {
        Self {
            listening_ms: ms,
            transcribing_ms: ms,
            extracting_ms: ms,
            normalizing_ms: ms,
            generating_ms: ms,
        }
    }

    /// Hold time of one stage
    pub fn latency(&self, stage: PipelineStage) -> Duration {
        let ms = match stage {
            PipelineStage::Listening => self.listening_ms,
            PipelineStage::Transcribing => self.transcribing_ms,
            PipelineStage::Extracting => self.extracting_ms,
            PipelineStage::Normalizing => self.normalizing_ms,
            PipelineStage::Generating => self.generating_ms,
        };
        Duration::from_millis(ms)
    }

    /// Hold time of a whole run
    pub fn total(&self) -> Duration {
        PipelineStage::ALL.iter().map(|s| self.latency(*s)).sum()
    }

    /// Check every stage latency is within [`MAX_STAGE_MS`]
    pub fn validate(&self) -> Result<(), PipelineError> {
        for stage in PipelineStage::ALL {
            let ms = self.latency(stage).as_millis();
            if ms > MAX_STAGE_MS as u128 {
                return Err(PipelineError::Config(format!(
                    "{} latency {}ms exceeds {}ms",
                    stage, ms, MAX_STAGE_MS
                )));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| PipelineError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
