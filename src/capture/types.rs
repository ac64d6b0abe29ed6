//! Data types for screenshot capture functionality.

use std::path::PathBuf;
use thiserror::Error;

/// Longest delay accepted before a capture, in milliseconds.
pub const MAX_DELAY_MS: u64 = 60_000;

/// A single, fully resolved capture job.
///
/// Built once per invocation (usually by [`crate::capture::request::resolve_request`])
/// and consumed by [`crate::capture::capture_screenshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Output file name without its extension.
    pub file_name_base: String,
    /// Informal format name, always a member of the registry it was resolved against.
    pub format: String,
    /// Blocking delay before the capture, within `0..=MAX_DELAY_MS`.
    pub delay_ms: u64,
}

/// Pixel dimensions of the display being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub width: u32,
    pub height: u32,
}

/// Result of a successful capture.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    /// Path the encoded image was written to.
    pub saved_path: PathBuf,
    /// Display dimensions reported before the delay.
    pub screen: ScreenRect,
    /// Size of the written file in bytes.
    pub bytes_written: u64,
}

/// Outcome of a triggered capture, as reported to session callbacks.
#[derive(Debug, Clone)]
pub enum CaptureOutcome {
    Success(CaptureResult),
    Failed(String),
}

/// Errors that can occur during screenshot capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Screen capture not supported for headless environment - {0}")]
    Headless(String),

    #[error("Screen capture not supported for this environment - {0}")]
    Unsupported(String),

    #[error("Unknown image format '{0}'")]
    UnknownFormat(String),

    #[error("Unable to encode screenshot for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unable to write screenshot to file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
