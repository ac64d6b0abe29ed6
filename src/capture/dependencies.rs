use std::{path::Path, sync::Arc, thread, time::Duration};

use image::{ImageFormat, RgbaImage};

use crate::capture::{
    file, sources,
    types::{CaptureError, ScreenRect},
};

/// Abstraction over the platform screen-capture primitive.
pub trait ScreenSource: Send + Sync {
    /// Pixel dimensions of the primary display, read fresh on every call.
    fn screen_rect(&self) -> Result<ScreenRect, CaptureError>;

    /// Grab the full `rect` of the primary display in a single call.
    fn capture(&self, rect: ScreenRect) -> Result<RgbaImage, CaptureError>;
}

/// Abstraction over encoding a pixel buffer and writing it out.
pub trait ImageWriter: Send + Sync {
    /// Returns the number of bytes on disk after the write.
    fn write(&self, image: RgbaImage, format: ImageFormat, path: &Path)
    -> Result<u64, CaptureError>;
}

/// Abstraction over the pre-capture wait.
pub trait CaptureDelay: Send + Sync {
    fn wait(&self, delay: Duration);
}

/// Bundle of dependencies used by the capture pipeline. Each component can be mocked in tests.
#[derive(Clone)]
pub struct CaptureDependencies {
    pub source: Arc<dyn ScreenSource>,
    pub writer: Arc<dyn ImageWriter>,
    pub delay: Arc<dyn CaptureDelay>,
}

impl Default for CaptureDependencies {
    fn default() -> Self {
        Self {
            source: Arc::new(DefaultScreenSource),
            writer: Arc::new(DefaultImageWriter),
            delay: Arc::new(ThreadSleep),
        }
    }
}

struct DefaultScreenSource;
struct DefaultImageWriter;
struct ThreadSleep;

impl ScreenSource for DefaultScreenSource {
    fn screen_rect(&self) -> Result<ScreenRect, CaptureError> {
        sources::primary_screen_rect()
    }

    fn capture(&self, rect: ScreenRect) -> Result<RgbaImage, CaptureError> {
        sources::capture_primary(rect)
    }
}

impl ImageWriter for DefaultImageWriter {
    fn write(
        &self,
        image: RgbaImage,
        format: ImageFormat,
        path: &Path,
    ) -> Result<u64, CaptureError> {
        file::save_screenshot(image, format, path)
    }
}

impl CaptureDelay for ThreadSleep {
    fn wait(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}
