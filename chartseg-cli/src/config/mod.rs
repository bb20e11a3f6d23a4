//! Configuration module

use crate::error::CliError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Segmentation configuration
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Performance configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
}

impl CliConfig {
    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: CliConfig =
            toml::from_str(text).map_err(|e| CliError::ConfigError(e.to_string()))?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Segmentation-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Gap policy name, or "none" for lexical tilings only
    pub policy: String,

    /// Maximum segmentations per utterance (0 = unlimited)
    pub max_segmentations: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            policy: "all".to_string(),
            max_segmentations: 0,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub default_format: String,

    /// Pretty print JSON output
    pub pretty_json: bool,

    /// Mark tentative segments in text output
    pub mark_tentative: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            pretty_json: true,
            mark_tentative: false,
        }
    }
}

/// Performance-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Segment the utterances of a file in parallel
    pub parallel: bool,

    /// Number of worker threads (0 = auto)
    pub worker_threads: usize,
}
