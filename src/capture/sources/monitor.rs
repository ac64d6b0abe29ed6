//! Primary-monitor capture through `xcap`.

use image::RgbaImage;
use xcap::Monitor;

use crate::capture::types::{CaptureError, ScreenRect};

/// Picks the entry flagged primary, or the first one when none is.
fn select_primary<T>(
    candidates: impl IntoIterator<Item = T>,
    is_primary: impl Fn(&T) -> bool,
) -> Option<T> {
    let mut candidates = candidates.into_iter();
    let first = candidates.next()?;
    if is_primary(&first) {
        return Some(first);
    }
    Some(candidates.find(|c| is_primary(c)).unwrap_or(first))
}

fn primary_monitor() -> Result<Monitor, CaptureError> {
    let monitors = Monitor::all()
        .map_err(|e| CaptureError::Unsupported(format!("failed to list monitors: {}", e)))?;

    log::debug!("Found {} monitor(s)", monitors.len());

    select_primary(monitors, |m| m.is_primary().unwrap_or(false))
        .ok_or_else(|| CaptureError::Unsupported("no monitors found".to_string()))
}

fn size_error(e: impl std::fmt::Display) -> CaptureError {
    CaptureError::Unsupported(format!("failed to read monitor size: {}", e))
}

fn monitor_rect(monitor: &Monitor) -> Result<ScreenRect, CaptureError> {
    Ok(ScreenRect {
        width: monitor.width().map_err(size_error)?,
        height: monitor.height().map_err(size_error)?,
    })
}

pub(super) fn primary_screen_rect() -> Result<ScreenRect, CaptureError> {
    let rect = monitor_rect(&primary_monitor()?)?;

    if rect.width == 0 || rect.height == 0 {
        return Err(CaptureError::Unsupported(format!(
            "primary monitor has zero-size rect ({}x{})",
            rect.width, rect.height
        )));
    }

    Ok(rect)
}

pub(super) fn capture_primary(rect: ScreenRect) -> Result<RgbaImage, CaptureError> {
    let monitor = primary_monitor()?;
    let image = monitor
        .capture_image()
        .map_err(|e| CaptureError::Unsupported(format!("screen capture failed: {}", e)))?;

    // Scaled (HiDPI) outputs report logical size but capture physical pixels.
    if image.width() != rect.width || image.height() != rect.height {
        log::warn!(
            "Captured frame is {}x{} but the display reported {}x{}",
            image.width(),
            image.height(),
            rect.width,
            rect.height
        );
    }

    Ok(image)
}
