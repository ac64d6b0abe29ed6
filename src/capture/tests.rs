use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, mpsc},
    thread,
    time::Duration,
};

use image::{ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;

use super::{
    dependencies::{CaptureDelay, CaptureDependencies, ImageWriter, ScreenSource},
    formats::FormatRegistry,
    manager::{CaptureManager, Trigger},
    pipeline::{capture_request, capture_screenshot},
    request::{CaptureDefaults, resolve_request},
    types::{CaptureError, CaptureOutcome, ScreenRect},
};

#[derive(Clone)]
struct MockSource {
    rect: ScreenRect,
    error: Arc<Mutex<Option<CaptureError>>>,
    captured_rects: Arc<Mutex<Vec<ScreenRect>>>,
}

impl MockSource {
    fn new(width: u32, height: u32) -> Self {
        Self {
            rect: ScreenRect { width, height },
            error: Arc::new(Mutex::new(None)),
            captured_rects: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing(error: CaptureError) -> Self {
        let source = Self::new(4, 4);
        *source.error.lock().unwrap() = Some(error);
        source
    }
}

impl ScreenSource for MockSource {
    fn screen_rect(&self) -> Result<ScreenRect, CaptureError> {
        Ok(self.rect)
    }

    fn capture(&self, rect: ScreenRect) -> Result<RgbaImage, CaptureError> {
        self.captured_rects.lock().unwrap().push(rect);
        if let Some(err) = self.error.lock().unwrap().take() {
            Err(err)
        } else {
            Ok(RgbaImage::from_pixel(
                rect.width,
                rect.height,
                Rgba([10, 20, 30, 255]),
            ))
        }
    }
}

#[derive(Clone, Default)]
struct MockWriter {
    should_fail: bool,
    calls: Arc<Mutex<Vec<(PathBuf, ImageFormat, (u32, u32))>>>,
}

impl ImageWriter for MockWriter {
    fn write(
        &self,
        image: RgbaImage,
        format: ImageFormat,
        path: &Path,
    ) -> Result<u64, CaptureError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), format, image.dimensions()));
        if self.should_fail {
            Err(CaptureError::Write {
                path: path.to_path_buf(),
                source: std::io::Error::other("disk full"),
            })
        } else {
            Ok(u64::from(image.width() * image.height() * 4))
        }
    }
}

#[derive(Clone, Default)]
struct RecordingDelay {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl CaptureDelay for RecordingDelay {
    fn wait(&self, delay: Duration) {
        self.waits.lock().unwrap().push(delay);
    }
}

fn deps(source: MockSource, writer: MockWriter, delay: RecordingDelay) -> CaptureDependencies {
    CaptureDependencies {
        source: Arc::new(source),
        writer: Arc::new(writer),
        delay: Arc::new(delay),
    }
}

fn registry() -> FormatRegistry {
    FormatRegistry::from_names(["png", "jpg", "jpeg", "gif"])
}

#[test]
fn capture_writes_full_screen_frame() {
    let source = MockSource::new(64, 48);
    let writer = MockWriter::default();
    let delay = RecordingDelay::default();
    let dependencies = deps(source.clone(), writer.clone(), delay.clone());

    let result =
        capture_screenshot("shot.png", "png", 250, &registry(), &dependencies).unwrap();

    assert_eq!(result.saved_path, PathBuf::from("shot.png"));
    assert_eq!(result.screen, ScreenRect { width: 64, height: 48 });
    assert_eq!(result.bytes_written, 64 * 48 * 4);
    assert_eq!(*delay.waits.lock().unwrap(), vec![Duration::from_millis(250)]);
    assert_eq!(
        *source.captured_rects.lock().unwrap(),
        vec![ScreenRect { width: 64, height: 48 }]
    );
    assert_eq!(
        *writer.calls.lock().unwrap(),
        vec![(PathBuf::from("shot.png"), ImageFormat::Png, (64, 48))]
    );
}

#[test]
fn capture_resolves_format_case_insensitively() {
    let writer = MockWriter::default();
    let dependencies = deps(MockSource::new(2, 2), writer.clone(), RecordingDelay::default());

    capture_screenshot("shot.jpg", "JPG", 0, &registry(), &dependencies).unwrap();

    assert_eq!(writer.calls.lock().unwrap()[0].1, ImageFormat::Jpeg);
}

#[test]
fn unknown_format_fails_before_capturing() {
    let source = MockSource::new(2, 2);
    let delay = RecordingDelay::default();
    let writer = MockWriter::default();
    let dependencies = deps(source.clone(), writer.clone(), delay.clone());

    let err = capture_screenshot("shot.webp", "webp", 0, &registry(), &dependencies).unwrap_err();

    assert!(matches!(err, CaptureError::UnknownFormat(ref f) if f == "webp"));
    assert!(source.captured_rects.lock().unwrap().is_empty());
    assert!(delay.waits.lock().unwrap().is_empty());
    assert!(writer.calls.lock().unwrap().is_empty());
}

#[test]
fn denied_capture_skips_writing() {
    let writer = MockWriter::default();
    let dependencies = deps(
        MockSource::failing(CaptureError::Headless("no display".into())),
        writer.clone(),
        RecordingDelay::default(),
    );

    let err = capture_screenshot("shot.png", "png", 0, &registry(), &dependencies).unwrap_err();

    assert!(matches!(err, CaptureError::Headless(_)), "got {err:?}");
    assert!(err.to_string().contains("headless"));
    assert!(writer.calls.lock().unwrap().is_empty());
}

#[test]
fn unsupported_environment_is_distinguished_from_headless() {
    let dependencies = deps(
        MockSource::failing(CaptureError::Unsupported("sandboxed".into())),
        MockWriter::default(),
        RecordingDelay::default(),
    );

    let err = capture_screenshot("shot.png", "png", 0, &registry(), &dependencies).unwrap_err();

    assert!(matches!(err, CaptureError::Unsupported(_)), "got {err:?}");
    let message = err.to_string();
    assert!(message.contains("this environment"), "{message}");
    assert!(message.contains("sandboxed"), "{message}");
}

#[test]
fn write_failure_is_reported() {
    let writer = MockWriter {
        should_fail: true,
        ..MockWriter::default()
    };
    let dependencies = deps(MockSource::new(2, 2), writer.clone(), RecordingDelay::default());

    let err = capture_screenshot("shot.png", "png", 0, &registry(), &dependencies).unwrap_err();

    assert!(matches!(err, CaptureError::Write { .. }), "got {err:?}");
    assert!(err.to_string().contains("disk full"));
    assert_eq!(writer.calls.lock().unwrap().len(), 1);
}

#[test]
fn resolved_request_drives_output_path() {
    let writer = MockWriter::default();
    let delay = RecordingDelay::default();
    let dependencies = deps(MockSource::new(3, 3), writer.clone(), delay.clone());
    let registry = registry();

    let resolved = resolve_request(&["desk", "GIF", "1000"], &registry, &CaptureDefaults::default());
    let result = capture_request(&resolved.request, &registry, &dependencies).unwrap();

    assert_eq!(result.saved_path, PathBuf::from("desk.gif"));
    assert_eq!(*delay.waits.lock().unwrap(), vec![Duration::from_millis(1000)]);
    assert_eq!(writer.calls.lock().unwrap()[0].1, ImageFormat::Gif);
}

#[test]
fn capture_with_real_writer_produces_decodable_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("real.png");
    let dependencies = CaptureDependencies {
        writer: CaptureDependencies::default().writer,
        ..deps(MockSource::new(20, 10), MockWriter::default(), RecordingDelay::default())
    };

    let result = capture_screenshot(&path, "png", 0, &registry(), &dependencies).unwrap();

    assert!(result.bytes_written > 0);
    assert_eq!(image::image_dimensions(&path).unwrap(), (20, 10));
}

#[test]
fn manager_captures_once_per_trigger() {
    let writer = MockWriter::default();
    let delay = RecordingDelay::default();
    let registry = registry();
    let manager = CaptureManager::with_dependencies(
        "desk",
        &registry,
        deps(MockSource::new(8, 8), writer.clone(), delay.clone()),
    );
    assert_eq!(manager.format(), "jpg");

    let (tx, rx) = mpsc::channel();
    tx.send(Trigger::Capture).unwrap();
    tx.send(Trigger::Capture).unwrap();
    drop(tx);

    let mut outcomes = Vec::new();
    let attempted = manager.run(rx, |outcome| outcomes.push(outcome.clone()));

    assert_eq!(attempted, 2);
    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        match outcome {
            CaptureOutcome::Success(result) => {
                let name = result.saved_path.to_string_lossy().into_owned();
                assert!(name.starts_with("desk_"), "{name}");
                assert!(name.ends_with(".jpg"), "{name}");
                // desk + _MM_dd_yyyy_HH_mm_ss + .jpg
                assert_eq!(name.len(), "desk".len() + 20 + ".jpg".len(), "{name}");
            }
            other => panic!("Expected success outcome, got {other:?}"),
        }
    }
    assert!(
        delay
            .waits
            .lock()
            .unwrap()
            .iter()
            .all(|wait| wait.is_zero())
    );
    assert!(
        writer
            .calls
            .lock()
            .unwrap()
            .iter()
            .all(|(_, format, _)| *format == ImageFormat::Jpeg)
    );
}

#[test]
fn manager_strips_extension_from_fixed_base() {
    let registry = registry();
    let manager = CaptureManager::with_dependencies(
        "capture.jpg",
        &registry,
        deps(MockSource::new(1, 1), MockWriter::default(), RecordingDelay::default()),
    );

    let request = manager.next_request();
    assert!(request.file_name_base.starts_with("capture_"));
    assert!(!request.file_name_base.contains(".jpg"));
    assert_eq!(request.delay_ms, 0);
}

#[test]
fn manager_stops_on_stop_trigger() {
    let writer = MockWriter::default();
    let registry = registry();
    let manager = CaptureManager::with_dependencies(
        "desk",
        &registry,
        deps(MockSource::new(1, 1), writer.clone(), RecordingDelay::default()),
    );

    let (tx, rx) = mpsc::channel();
    tx.send(Trigger::Capture).unwrap();
    tx.send(Trigger::Stop).unwrap();
    tx.send(Trigger::Capture).unwrap();

    let attempted = manager.run(rx, |_| {});

    assert_eq!(attempted, 1);
    assert_eq!(writer.calls.lock().unwrap().len(), 1);
}

#[test]
fn manager_reports_failures_and_keeps_running() {
    let registry = registry();
    let manager = CaptureManager::with_dependencies(
        "desk",
        &registry,
        deps(
            MockSource::failing(CaptureError::Unsupported("denied".into())),
            MockWriter::default(),
            RecordingDelay::default(),
        ),
    );

    let (tx, rx) = mpsc::channel();
    let sender = thread::spawn(move || {
        tx.send(Trigger::Capture).unwrap();
        tx.send(Trigger::Capture).unwrap();
    });

    let mut outcomes = Vec::new();
    manager.run(rx, |outcome| outcomes.push(outcome.clone()));
    sender.join().unwrap();

    assert!(matches!(&outcomes[0], CaptureOutcome::Failed(msg) if msg.contains("denied")));
    assert!(matches!(&outcomes[1], CaptureOutcome::Success(_)));
}

#[test]
fn manager_falls_back_when_jpg_missing() {
    let registry = FormatRegistry::from_names(["png", "gif"]);
    let manager = CaptureManager::with_dependencies(
        "desk",
        &registry,
        deps(MockSource::new(1, 1), MockWriter::default(), RecordingDelay::default()),
    );
    assert_eq!(manager.format(), "png");
    assert_eq!(manager.with_format("gif").format(), "gif");
}
