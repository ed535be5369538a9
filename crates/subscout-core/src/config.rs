//! Detection configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path (e.g. `--config`), which must exist
//! 2. The default location (~/.config/subscout/config.toml), used if present
//!
//! Anything not set falls back to [`DetectionConfig::default`]. The matching
//! thresholds (amount deviation, interval window) are fixed and not part of
//! the config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Default cap on the number of rows accepted in one detection run
pub const DEFAULT_MAX_ROWS: usize = 100_000;

/// Settings for a detection run
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Batches larger than this are rejected instead of truncated
    pub max_rows: usize,
    /// Extra chrono date formats tried after the built-in ones
    pub extra_date_formats: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            extra_date_formats: Vec::new(),
        }
    }
}

/// Default config path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("subscout").join("config.toml"))
}

/// Load configuration (explicit path first, then default location)
pub fn load_config(override_path: Option<&Path>) -> Result<DetectionConfig> {
    let content = if let Some(path) = override_path {
        Some(fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?)
    } else {
        match default_config_path() {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Some(fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read config {}: {}", path.display(), e))
                })?)
            }
            _ => None,
        }
    };

    match content {
        Some(content) => parse_config(&content),
        None => Ok(DetectionConfig::default()),
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    detection: Option<RawDetection>,
    normalize: Option<RawNormalize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDetection {
    max_rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNormalize {
    date_formats: Option<Vec<String>>,
}

/// Parse TOML content into a config
pub fn parse_config(content: &str) -> Result<DetectionConfig> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;

    let mut config = DetectionConfig::default();

    if let Some(detection) = raw.detection {
        if let Some(max_rows) = detection.max_rows {
            if max_rows == 0 {
                return Err(Error::Config(
                    "detection.max_rows must be greater than zero".into(),
                ));
            }
            config.max_rows = max_rows;
        }
    }

    if let Some(formats) = raw.normalize.and_then(|n| n.date_formats) {
        config.extra_date_formats = formats;
    }

    Ok(config)
}
