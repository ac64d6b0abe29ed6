use std::{path::Path, time::Duration};

use crate::capture::{
    dependencies::CaptureDependencies,
    file,
    formats::FormatRegistry,
    types::{CaptureError, CaptureRequest, CaptureResult},
};

/// Capture the primary screen after `delay_ms` and write it to `file_name`.
///
/// Steps run in order on the calling thread: read the display size, block
/// for the delay, grab the whole display in one call, encode as `format` and
/// write. Nothing is retried and nothing is printed; the caller decides how
/// to report the error.
pub fn capture_screenshot(
    file_name: impl AsRef<Path>,
    format: &str,
    delay_ms: u64,
    registry: &FormatRegistry,
    dependencies: &CaptureDependencies,
) -> Result<CaptureResult, CaptureError> {
    let path = file_name.as_ref();
    let image_format = registry
        .image_format(format)
        .ok_or_else(|| CaptureError::UnknownFormat(format.to_string()))?;

    log::info!("Starting capture of primary display to {}", path.display());

    // Step 1: Display dimensions
    let screen = dependencies.source.screen_rect()?;
    log::debug!("Primary display is {}x{}", screen.width, screen.height);

    // Step 2: Delay
    if delay_ms > 0 {
        log::debug!("Waiting {} ms before capture", delay_ms);
    }
    dependencies.delay.wait(Duration::from_millis(delay_ms));

    // Step 3: Capture
    let image = dependencies.source.capture(screen)?;
    log::info!("Captured {}x{} frame", image.width(), image.height());

    // Step 4: Encode and write
    let bytes_written = dependencies.writer.write(image, image_format, path)?;
    log::info!(
        "Screenshot saved successfully: {} ({} bytes)",
        path.display(),
        bytes_written
    );

    Ok(CaptureResult {
        saved_path: path.to_path_buf(),
        screen,
        bytes_written,
    })
}

/// Run a resolved request, deriving the output path `<base>.<format>`.
pub fn capture_request(
    request: &CaptureRequest,
    registry: &FormatRegistry,
    dependencies: &CaptureDependencies,
) -> Result<CaptureResult, CaptureError> {
    let path = file::output_path(&request.file_name_base, &request.format);
    capture_screenshot(
        path,
        &request.format,
        request.delay_ms,
        registry,
        dependencies,
    )
}
