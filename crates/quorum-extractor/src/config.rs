//! Configuration for confidence estimation

use crate::ExtractorError;
use serde::{Deserialize, Serialize};

/// Confidence band used when scoring transcripts
///
/// The score is `base + words / words_per_step`, clamped to
/// `[floor, ceiling]`.
///
/// # Examples
///
/// ```
/// use quorum_extractor::ExtractorConfig;
///
/// let config = ExtractorConfig::default();
/// assert_eq!(config.estimate(""), 0.5);
/// assert_eq!(config.estimate("one two three four five"), 0.6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Score of an empty transcript before clamping
    pub base: f64,

    /// Words needed to add 1.0 to the score
    pub words_per_step: f64,

    /// Lowest score ever reported
    pub floor: f64,

    /// Highest score ever reported
    pub ceiling: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base: 0.5,
            words_per_step: 50.0,
            floor: 0.4,
            ceiling: 0.9,
        }
    }
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if !(0.0..=1.0).contains(&self.floor) || !(0.0..=1.0).contains(&self.ceiling) {
            return Err(ExtractorError::Config(
                "floor and ceiling must lie in [0, 1]".to_string(),
            ));
        }
        if self.floor > self.ceiling {
            return Err(ExtractorError::Config(
                "floor cannot exceed ceiling".to_string(),
            ));
        }
        if !(self.words_per_step > 0.0) {
            return Err(ExtractorError::Config(
                "words_per_step must be greater than 0".to_string(),
            ));
        }
        if !self.base.is_finite() {
            return Err(ExtractorError::Config("base must be finite".to_string()));
        }
        Ok(())
    }

    /// Score a transcript by its whitespace-delimited word count
    pub fn estimate(&self, transcript: &str) -> f64 {
        let word_count = transcript.split_whitespace().count() as f64;
        let score = (self.base + word_count / self.words_per_step).min(self.ceiling);
        score.max(self.floor)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
