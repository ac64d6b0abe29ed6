//! Configuration type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::capture::file::DEFAULT_TIMESTAMP_FORMAT;
use crate::capture::request::{DEFAULT_DELAY_MS, DEFAULT_FILE_NAME_BASE};
use crate::capture::{TRIGGER_FORMAT, formats::PREFERRED_FORMAT};

/// Capture defaults.
///
/// Applied whenever the command line leaves a value out or supplies an
/// invalid one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CaptureConfig {
    /// Base name (without extension) used when none is given
    #[serde(default = "default_file_name_base")]
    pub default_file_name_base: String,

    /// Format used when none is given or the given one is unsupported.
    /// Falls back to "png", then to the first writable format, if it has no encoder.
    #[serde(default = "default_preferred_format")]
    pub preferred_format: String,

    /// Delay before capturing in milliseconds (valid range: 0 - 60000)
    #[serde(default = "default_delay_ms")]
    pub default_delay_ms: u64,

    /// chrono format string appended to timestamped captures
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Format used by interactive (trigger-driven) sessions
    #[serde(default = "default_interactive_format")]
    pub interactive_format: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            default_file_name_base: default_file_name_base(),
            preferred_format: default_preferred_format(),
            default_delay_ms: default_delay_ms(),
            timestamp_format: default_timestamp_format(),
            interactive_format: default_interactive_format(),
        }
    }
}

fn default_file_name_base() -> String {
    DEFAULT_FILE_NAME_BASE.to_string()
}

fn default_preferred_format() -> String {
    PREFERRED_FORMAT.to_string()
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

fn default_interactive_format() -> String {
    TRIGGER_FORMAT.to_string()
}
