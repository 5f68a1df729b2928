//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while configuring extraction
///
/// Extraction itself never fails; only its configuration can be invalid.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Configuration values are inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML could not be parsed
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML could not be produced
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
