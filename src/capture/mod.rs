//! Screenshot capture functionality for screensnap.
//!
//! This module provides:
//! - The registry of writable image formats
//! - Resolution of positional arguments into a capture request
//! - Full screen capture of the primary display
//! - File naming (format suffix, timestamp suffix) and encoding
//! - A trigger-driven session for repeated one-shot captures

pub mod file;
pub mod formats;
pub mod request;
pub mod types;

mod dependencies;
mod manager;
mod pipeline;
mod sources;
#[cfg(test)]
mod tests;

pub use dependencies::{CaptureDelay, CaptureDependencies, ImageWriter, ScreenSource};
pub use formats::FormatRegistry;
pub use manager::{CaptureManager, TRIGGER_FORMAT, Trigger};
pub use pipeline::{capture_request, capture_screenshot};
pub use request::{CaptureDefaults, Notice, ResolvedRequest, resolve_request};
pub use sources::{headless_reason, primary_screen_rect};
pub use types::{CaptureError, CaptureOutcome, CaptureRequest, CaptureResult, ScreenRect};
