//! Configuration for the Quorum server.
//!
//! Settings come from an optional TOML file, then environment overrides.

use quorum_extractor::ExtractorConfig;
use quorum_pipeline::PipelineConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a TOML config file
pub const CONFIG_ENV: &str = "QUORUM_CONFIG";

/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding the static asset directory
pub const STATIC_ROOT_ENV: &str = "QUORUM_STATIC_ROOT";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// `PORT` is not a valid port number
    #[error("Invalid port '{0}'")]
    InvalidPort(String),

    /// A section failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration
///
/// ```toml
/// bind_address = "127.0.0.1"
/// port = 8000
/// static_root = "public"
///
/// [pipeline]
/// extracting_ms = 400
///
/// [extractor]
/// base = 0.5
/// words_per_step = 50.0
/// floor = 0.4
/// ceiling = 0.9
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port
    pub port: u16,

    /// Directory served for `/` and every non-API path
    pub static_root: PathBuf,

    /// Stage latencies
    pub pipeline: PipelineConfig,

    /// Confidence band
    pub extractor: ExtractorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
            static_root: PathBuf::from("public"),
            pipeline: PipelineConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Layer configuration from a variable lookup
    ///
    /// The file named by `QUORUM_CONFIG` (if any) is read first; `PORT` and
    /// `QUORUM_STATIC_ROOT` then override it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_ENV) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(port) = lookup(PORT_ENV) {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        if let Some(root) = lookup(STATIC_ROOT_ENV) {
            config.static_root = PathBuf::from(root);
        }

        Ok(config)
    }

    /// Validate the nested sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.extractor
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.static_root, PathBuf::from("public"));
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            port = 9000
            static_root = "site"

            [pipeline]
            extracting_ms = 50

            [extractor]
            base = 0.3
            words_per_step = 20.0
            floor = 0.2
            ceiling = 0.8
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.static_root, PathBuf::from("site"));
        assert_eq!(config.pipeline.extracting_ms, 50);
        assert_eq!(config.pipeline.listening_ms, 300);
        assert_eq!(config.extractor.floor, 0.2);
    }

    #[test]
    fn test_invalid_section_rejected() {
        let toml = r#"
            [extractor]
            base = 0.5
            words_per_step = 50.0
            floor = 0.9
            ceiling = 0.4
        "#;
        assert!(matches!(ServerConfig::from_toml(toml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "3000"), ("QUORUM_STATIC_ROOT", "/srv/quorum")])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.static_root, PathBuf::from("/srv/quorum"));
        assert_eq!(config.bind_address, "127.0.0.1");
    }

    #[test]
    fn test_bad_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(p) if p == "eighty"));
        assert!(ServerConfig::from_lookup(lookup(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn test_file_then_port_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9100\nstatic_root = \"assets\"").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = ServerConfig::from_lookup(lookup(&[("QUORUM_CONFIG", path.as_str())])).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.static_root, PathBuf::from("assets"));

        let config = ServerConfig::from_lookup(lookup(&[("QUORUM_CONFIG", path.as_str()), ("PORT", "9200")])).unwrap();
        assert_eq!(config.port, 9200);
    }

    #[test]
    fn test_missing_file() {
        let err = ServerConfig::from_lookup(lookup(&[("QUORUM_CONFIG", "/nonexistent/quorum.toml")])).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }
}
