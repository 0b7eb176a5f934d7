use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Total float below this magnitude marks a task as critical.
pub const DEFAULT_CRITICAL_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for [`crate::calculate_cpm_with_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub critical_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            critical_tolerance: DEFAULT_CRITICAL_TOLERANCE,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.critical_tolerance.is_finite() || self.critical_tolerance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "critical_tolerance must be a positive finite number (got {})",
                self.critical_tolerance
            )));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
