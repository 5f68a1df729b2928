//! Model confidence attached to auto-generated cards

use crate::DomainError;
use serde::{Deserialize, Serialize};

/// A confidence score in [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Create a confidence score
    ///
    /// Returns an error if the value is not a finite number in [0, 1].
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(DomainError::ConfidenceOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Create a confidence score, clamping into [0, 1] (NaN becomes 0)
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Raw value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Value as a whole percentage, rounded
    pub fn percent(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl TryFrom<f64> for Confidence {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}
