//! Configuration for the beco tooling.
//!
//! Maps to a `beco.toml` file. Every section is optional and falls back to
//! its `Default` impl.
//!
//! ## Example `beco.toml`
//!
//! ```toml
//! [frame]
//! x_origin = 5000.0
//! z_origin = 4000.0
//!
//! [logging]
//! level = "debug"
//!
//! [paths]
//! map = "MinusField.beco"
//! placements = "statues.json"
//! ```

use crate::frame::CoordinateFrame;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Default file locations, used when a command is not given a path.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub map: Option<PathBuf>,
    pub placements: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub frame: CoordinateFrame,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.frame.x_origin.is_finite() && self.frame.x_origin >= 0.0,
            "Frame x_origin must be finite and non-negative"
        );
        anyhow::ensure!(
            self.frame.z_origin.is_finite() && self.frame.z_origin >= 0.0,
            "Frame z_origin must be finite and non-negative"
        );
        anyhow::ensure!(
            LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()),
            "Unknown log level '{}' (expected one of {:?})",
            self.logging.level,
            LOG_LEVELS
        );
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or returns the defaults if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content)
                .map_err(|e| e.context(format!("Invalid config file {}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Failed to read config file {}", path.display()))),
        }
    }
}
