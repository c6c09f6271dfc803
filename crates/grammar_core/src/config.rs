//! Generator configuration loaded from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "grid_size": [48, 1, 48], "seed": 7, "strategy": "random" }
//! ```

use super::selector::SelectionStrategy;
use bevy::math::IVec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors that can occur while loading a config.
#[derive(Debug)]
pub enum ConfigError {
    /// File system error
    Io(std::io::Error),
    /// Malformed JSON or wrong field types
    Json(serde_json::Error),
    /// Some grid extent is below 1
    InvalidGridSize([i32; 3]),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "JSON error: {}", e),
            ConfigError::InvalidGridSize(size) => {
                write!(f, "Invalid grid size {:?}: every extent must be at least 1", size)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::InvalidGridSize(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Grid extents (x, y, z)
    pub grid_size: [i32; 3],
    /// Label every cell starts with
    pub fill: String,
    /// None = seed from OS entropy
    pub seed: Option<u64>,
    pub strategy: SelectionStrategy,
    /// Single-step budget, 0 = until nothing matches
    pub max_steps: usize,
    /// Rule-name prefix swept once single stepping is exhausted
    pub finish_with_sweep: Option<String>,
    /// Draw the match overlay in the viewer
    pub overlay: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            grid_size: [32, 1, 32],
            fill: ".".to_string(),
            seed: None,
            strategy: SelectionStrategy::Random,
            max_steps: 0,
            finish_with_sweep: None,
            overlay: true,
        }
    }
}

impl GeneratorConfig {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a config from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size.iter().any(|&extent| extent < 1) {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        Ok(())
    }

    pub fn grid_size(&self) -> IVec3 {
        IVec3::from_array(self.grid_size)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
