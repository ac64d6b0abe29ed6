use std::sync::mpsc;

use chrono::Local;

use crate::capture::{
    dependencies::CaptureDependencies,
    file::{self, DEFAULT_TIMESTAMP_FORMAT},
    formats::FormatRegistry,
    pipeline::capture_screenshot,
    types::{CaptureOutcome, CaptureRequest},
};

/// Format used for triggered captures when available.
pub const TRIGGER_FORMAT: &str = "jpg";

/// Signals accepted by [`CaptureManager::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Take one capture now.
    Capture,
    /// End the session.
    Stop,
}

/// One-capture-per-trigger session.
///
/// Every [`Trigger::Capture`] produces exactly one file named
/// `<base><timestamp>.<format>` with no delay. Triggers are handled
/// sequentially on the thread that calls [`CaptureManager::run`].
pub struct CaptureManager<'a> {
    file_name_base: String,
    format: String,
    timestamp_format: String,
    registry: &'a FormatRegistry,
    dependencies: CaptureDependencies,
}

impl<'a> CaptureManager<'a> {
    /// Create a session writing `file_name_base` captures as jpg (or the registry default).
    pub fn new(file_name_base: impl Into<String>, registry: &'a FormatRegistry) -> Self {
        Self::with_dependencies(file_name_base, registry, CaptureDependencies::default())
    }

    /// Create a session with custom dependencies (useful for testing).
    pub fn with_dependencies(
        file_name_base: impl Into<String>,
        registry: &'a FormatRegistry,
        dependencies: CaptureDependencies,
    ) -> Self {
        Self {
            file_name_base: file_name_base.into(),
            format: registry.preferred_or_default(TRIGGER_FORMAT).to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            registry,
            dependencies,
        }
    }

    /// Override the preferred format; unsupported names fall back to the registry default.
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = self.registry.preferred_or_default(format).to_string();
        self
    }

    /// Override the chrono template used for the filename suffix.
    pub fn with_timestamp_format(mut self, template: impl Into<String>) -> Self {
        self.timestamp_format = template.into();
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// The request a trigger fired right now would run.
    pub fn next_request(&self) -> CaptureRequest {
        CaptureRequest {
            file_name_base: file::timestamped_base(
                &self.file_name_base,
                &self.format,
                &self.timestamp_format,
                Local::now(),
            ),
            format: self.format.clone(),
            delay_ms: 0,
        }
    }

    /// Perform a single capture.
    pub fn capture_once(&self) -> CaptureOutcome {
        let request = self.next_request();
        let path = file::output_path(&request.file_name_base, &request.format);
        log::debug!("Processing capture trigger: {}", path.display());

        match capture_screenshot(
            &path,
            &request.format,
            request.delay_ms,
            self.registry,
            &self.dependencies,
        ) {
            Ok(result) => {
                log::info!("Capture successful: {}", result.saved_path.display());
                CaptureOutcome::Success(result)
            }
            Err(e) => {
                let error_message = e.to_string();
                log::error!("Capture failed: {}", error_message);
                CaptureOutcome::Failed(error_message)
            }
        }
    }

    /// Handle triggers until [`Trigger::Stop`] arrives or every sender is dropped.
    ///
    /// `on_outcome` is called once per capture. Returns the number of captures attempted.
    pub fn run<F>(&self, triggers: mpsc::Receiver<Trigger>, mut on_outcome: F) -> usize
    where
        F: FnMut(&CaptureOutcome),
    {
        let mut attempted = 0;
        for trigger in triggers {
            match trigger {
                Trigger::Capture => {
                    let outcome = self.capture_once();
                    attempted += 1;
                    on_outcome(&outcome);
                }
                Trigger::Stop => {
                    log::debug!("Capture session stopped");
                    break;
                }
            }
        }
        attempted
    }
}
