//! Preview configuration module.
//!
//! Handles loading and validating `preview.toml`. The file is plain data —
//! parsed with a schema-checked deserializer, never evaluated — and every
//! field has a stock default, so a missing file or a sparse one both work.
//!
//! ## Config File Location
//!
//! `preview.toml` lives next to wherever the consumer runs (the CLI looks in
//! the current directory by default, overridable with `--config`):
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! data_path = "./data"          # Root of the unpacked export
//! theme = "dark"                # Presentation hint: "dark" | "light"
//! default_csv_variant = "all"   # Which variant viewers open first
//!
//! [features]
//! search = true
//! breadcrumbs = true
//! image_gallery = true
//! heading_anchors = true
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! data_path = "/srv/exports/current"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up next to the consumer.
pub const CONFIG_FILENAME: &str = "preview.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Preview configuration loaded from `preview.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Root of the unpacked export. Absolute, or relative to the directory
    /// the config was loaded from.
    pub data_path: String,
    /// Presentation hint for viewers. The core never reads it.
    pub theme: Theme,
    /// Which dataset variant viewers should open first.
    pub default_csv_variant: CsvVariant,
    /// Presentation feature toggles.
    pub features: FeaturesConfig,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            theme: Theme::Dark,
            default_csv_variant: CsvVariant::All,
            features: FeaturesConfig::default(),
        }
    }
}

fn default_data_path() -> String {
    "./data".to_string()
}

/// Presentation theme hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

/// Dataset variant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvVariant {
    All,
    Filtered,
}

/// Presentation feature toggles, passed through to viewers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeaturesConfig {
    pub search: bool,
    pub breadcrumbs: bool,
    pub image_gallery: bool,
    pub heading_anchors: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            search: true,
            breadcrumbs: true,
            image_gallery: true,
            heading_anchors: true,
        }
    }
}

impl PreviewConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "data_path must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the data root against the directory the config came from.
    /// Absolute paths are kept as-is; relative ones are joined onto `base`.
    pub fn data_root(&self, base: &Path) -> PathBuf {
        let path = Path::new(&self.data_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }
}

/// Load config from `<dir>/preview.toml`, falling back to stock defaults
/// when the file doesn't exist.
pub fn load_config(dir: &Path) -> Result<PreviewConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(PreviewConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: PreviewConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// A stock `preview.toml` with all options documented, for `gen-config`.
pub fn stock_config_toml() -> String {
    r##"# notion-atlas configuration
# All options are optional - defaults shown below.

# Root of the unpacked export (absolute, or relative to this file).
data_path = "./data"

# Presentation hint for viewers: "dark" | "light".
theme = "dark"

# Which dataset variant viewers open first: "all" | "filtered".
default_csv_variant = "all"

[features]
search = true
breadcrumbs = true
image_gallery = true
heading_anchors = true
"##
    .to_string()
}
