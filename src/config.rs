//! Runtime configuration.
//!
//! Values come from compiled defaults, optionally overridden by a JSON file.
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Layout, Viewport};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a canvas and its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: Layout,
    /// Initial viewport, used until the host reports its real size.
    pub viewport: Viewport,
    /// Fixed RNG seed for block placement; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// `tracing` filter directive, e.g. `"blocktree=debug"`.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            viewport: Viewport::default(),
            seed: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject geometry that cannot produce a sensible diagram.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.layout;
        let finite = [
            ("block_width", l.block_width),
            ("block_height", l.block_height),
            ("placement_margin", l.placement_margin),
            ("connector_clearance", l.connector_clearance),
            ("viewport.width", self.viewport.width),
            ("viewport.height", self.viewport.height),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "{} must be a finite number, got {}",
                name, value
            )));
        }
        if !(l.block_width > 0.0 && l.block_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "block footprint must be positive, got {}x{}",
                l.block_width, l.block_height
            )));
        }
        if !(l.placement_margin >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "placement_margin must not be negative, got {}",
                l.placement_margin
            )));
        }
        if !(l.connector_clearance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "connector_clearance must not be negative, got {}",
                l.connector_clearance
            )));
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        Ok(())
    }
}
