use image::RgbaImage;

use crate::capture::types::{CaptureError, ScreenRect};

mod headless;
mod monitor;

pub use headless::headless_reason;

pub fn primary_screen_rect() -> Result<ScreenRect, CaptureError> {
    if let Some(reason) = headless_reason() {
        return Err(CaptureError::Headless(reason));
    }
    monitor::primary_screen_rect()
}

pub fn capture_primary(rect: ScreenRect) -> Result<RgbaImage, CaptureError> {
    if let Some(reason) = headless_reason() {
        return Err(CaptureError::Headless(reason));
    }
    monitor::capture_primary(rect)
}
