//! Configuration file support for screensnap.
//!
//! Settings are read from `~/.config/screensnap/config.toml`. Every field is
//! optional; if no config file exists, the built-in defaults are used.

pub mod types;

pub use types::CaptureConfig;

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::capture::file::is_valid_timestamp_format;
use crate::capture::request::CaptureDefaults;
use crate::capture::types::MAX_DELAY_MS;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [capture]
/// default_file_name_base = "~/Pictures/desktop"
/// preferred_format = "jpg"
/// default_delay_ms = 1000
/// timestamp_format = "_%Y-%m-%d_%H%M%S"
/// interactive_format = "png"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Capture defaults (file name, format, delay)
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl Config {
    /// Validates and clamps configuration values to acceptable ranges.
    ///
    /// Validated ranges:
    /// - `default_delay_ms`: 0 - 60000
    /// - `default_file_name_base`: non-empty
    /// - `timestamp_format`: non-empty, only valid chrono specifiers
    fn validate_and_clamp(&mut self) {
        let defaults = CaptureConfig::default();

        if self.capture.default_delay_ms > MAX_DELAY_MS {
            log::warn!(
                "Invalid default_delay_ms {}, clamping to 0-{} range",
                self.capture.default_delay_ms,
                MAX_DELAY_MS
            );
            self.capture.default_delay_ms = MAX_DELAY_MS;
        }

        if self.capture.default_file_name_base.trim().is_empty() {
            log::warn!(
                "Empty default_file_name_base, falling back to '{}'",
                defaults.default_file_name_base
            );
            self.capture.default_file_name_base = defaults.default_file_name_base;
        }

        if self.capture.timestamp_format.is_empty()
            || !is_valid_timestamp_format(&self.capture.timestamp_format)
        {
            log::warn!(
                "Invalid timestamp_format '{}', falling back to '{}'",
                self.capture.timestamp_format,
                defaults.timestamp_format
            );
            self.capture.timestamp_format = defaults.timestamp_format;
        }
    }

    /// Defaults handed to request resolution.
    pub fn capture_defaults(&self) -> CaptureDefaults {
        CaptureDefaults {
            file_name_base: self.capture.default_file_name_base.clone(),
            preferred_format: self.capture.preferred_format.clone(),
            delay_ms: self.capture.default_delay_ms,
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/screensnap/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("screensnap");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `config_path`, or returns defaults if it does not exist.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// JSON schema describing the config file.
    pub fn json_schema() -> Schema {
        schemars::schema_for!(Config)
    }
}
