pub mod render;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

fn default_seed_spacing() -> u32 {
    20
}

fn default_min_distance() -> u16 {
    300
}

fn default_max_distance() -> u16 {
    1300
}

fn default_threshold_offset() -> u16 {
    40
}

fn default_min_contour_points() -> usize {
    150
}

/// Recognized tracking options, loadable from TOML or JSON.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TrackingConfig {
    /// Lattice stride of the seed search, in cells.
    #[serde(default = "default_seed_spacing")]
    pub seed_spacing_x: u32,
    #[serde(default = "default_seed_spacing")]
    pub seed_spacing_y: u32,
    /// Valid sample band, in sensor units.
    #[serde(default = "default_min_distance")]
    pub min_distance: u16,
    #[serde(default = "default_max_distance")]
    pub max_distance: u16,
    /// Homogeneity tolerance against the learned background.
    #[serde(default = "default_threshold_offset")]
    pub threshold_offset: u16,
    /// Polylines shorter than this are dropped from the output.
    #[serde(default = "default_min_contour_points")]
    pub min_contour_points: usize,
    /// Keep only the N longest polylines per frame; 0 keeps all.
    #[serde(default)]
    pub n_longest_contours: usize,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            seed_spacing_x: default_seed_spacing(),
            seed_spacing_y: default_seed_spacing(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            threshold_offset: default_threshold_offset(),
            min_contour_points: default_min_contour_points(),
            n_longest_contours: 0,
            verbose: false,
        }
    }
}

impl TrackingConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: TrackingConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: TrackingConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ConfigError::UnsupportedFileFormat),
        }
    }

    /// Save configuration to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
