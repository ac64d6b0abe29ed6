//! Library exports for the screensnap capture pipeline.
//!
//! The binary is a thin layer over these modules; other front ends (or
//! tests) can drive the same capture, naming and configuration logic
//! without going through the command line.

pub mod capture;
pub mod config;

pub use capture::{
    CaptureDefaults, CaptureError, CaptureRequest, FormatRegistry, capture_screenshot,
    resolve_request,
};
pub use config::Config;
