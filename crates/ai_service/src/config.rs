//! Service configuration
//!
//! Layered as defaults, then an optional TOML file, then `AGRODX_*`
//! environment variables. Command-line flags are applied last by the binary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

use crate::errors::ServiceError;

/// Which prediction backend serves `/predict`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Trained decision tree loaded from artifacts
    Model,
    /// Static (plant, symptom set) rule table
    Rules,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Model => write!(f, "model"),
            BackendMode::Rules => write!(f, "rules"),
        }
    }
}

impl FromStr for BackendMode {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "model" | "ml" => Ok(BackendMode::Model),
            "rules" | "rule" => Ok(BackendMode::Rules),
            other => Err(ServiceError::Config(format!("Unknown backend mode: {other}"))),
        }
    }
}

/// Runtime configuration for the prediction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding `model.json`, `label_encoder.json`, `feature_columns.json`
    pub artifacts_dir: PathBuf,
    pub mode: BackendMode,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            artifacts_dir: PathBuf::from("artifacts"),
            mode: BackendMode::Model,
        }
    }
}

impl ServiceConfig {
    /// Load from an optional TOML file and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ServiceError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(std::env::vars());
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ServiceError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ServiceError::Io(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ServiceError> {
        toml::from_str(content)
            .map_err(|e| ServiceError::Config(format!("Failed to parse config file: {e}")))
    }

    /// Apply `AGRODX_*` overrides; unparsable values are logged and skipped
    pub fn apply_env_overrides<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                "AGRODX_HOST" => self.host = value,
                "AGRODX_PORT" => match value.trim().parse() {
                    Ok(port) => self.port = port,
                    Err(_) => warn!("Ignoring invalid AGRODX_PORT value: {}", value),
                },
                "AGRODX_ARTIFACTS_DIR" => self.artifacts_dir = PathBuf::from(value),
                "AGRODX_MODE" => match value.parse() {
                    Ok(mode) => self.mode = mode,
                    Err(e) => warn!("Ignoring AGRODX_MODE: {}", e),
                },
                _ => {}
            }
        }
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
