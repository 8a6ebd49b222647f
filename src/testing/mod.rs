//! Synthetic data and fakes for offline testing.
//!
//! Nothing here touches hardware; the fakes implement the same seams the
//! platform pieces do so the coordination core can be exercised headless.

use crate::barcode::{BarcodeDecodeOptions, BarcodeDecoder, BarcodeResult};
use crate::errors::CameraError;
use crate::luminance::LuminanceSource;
use crate::platform::PlatformHandler;
use crate::types::{CameraFrame, CameraInfo, CameraPosition, ImageFormat, SnapshotImage};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

/// Create a synthetic RGB8 test frame with content varying per frame number
pub fn synthetic_frame(frame_number: u64, width: u32, height: u32) -> CameraFrame {
    let mut data = vec![0u8; (width * height * 3) as usize];

    // Gradient pattern that changes each frame
    let base = (frame_number % 256) as u8;
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 3) as usize;
            data[idx] = base.wrapping_add((x % 256) as u8);
            data[idx + 1] = base.wrapping_add((y % 256) as u8);
            data[idx + 2] = base.wrapping_add(((x + y) % 256) as u8);
        }
    }

    CameraFrame::new(data, width, height, "synthetic".to_string())
}

/// In-memory platform handler for tests.
///
/// Serves encoded snapshots of a small synthetic frame and records call
/// counts; failures can be injected for both startup and capture.
pub struct FakePlatformHandler {
    cameras: Vec<CameraInfo>,
    started: AtomicBool,
    fail_start: AtomicBool,
    fail_snapshot: AtomicBool,
    start_count: AtomicU32,
    stop_count: AtomicU32,
    snapshot_count: AtomicU32,
    last_zoom: Mutex<Option<f32>>,
}

impl FakePlatformHandler {
    pub fn new(cameras: Vec<CameraInfo>) -> Self {
        Self {
            cameras,
            started: AtomicBool::new(false),
            fail_start: AtomicBool::new(false),
            fail_snapshot: AtomicBool::new(false),
            start_count: AtomicU32::new(0),
            stop_count: AtomicU32::new(0),
            snapshot_count: AtomicU32::new(0),
            last_zoom: Mutex::new(None),
        }
    }

    /// A handler exposing one back camera with a 1x-4x zoom range
    pub fn with_default_camera() -> Self {
        Self::new(vec![CameraInfo::new(
            "0".to_string(),
            "Fake camera".to_string(),
        )
        .with_position(CameraPosition::Back)
        .with_zoom_range(1.0, 4.0)
        .with_torch(true)])
    }

    pub fn fail_next_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    pub fn fail_snapshots(&self, fail: bool) {
        self.fail_snapshot.store(fail, Ordering::SeqCst);
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn start_count(&self) -> u32 {
        self.start_count.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> u32 {
        self.stop_count.load(Ordering::SeqCst)
    }

    pub fn snapshot_count(&self) -> u32 {
        self.snapshot_count.load(Ordering::SeqCst)
    }

    pub fn last_zoom(&self) -> Option<f32> {
        self.last_zoom.lock().ok().and_then(|z| *z)
    }

    fn encode_snapshot(&self, format: ImageFormat) -> Result<SnapshotImage, CameraError> {
        // Vary the content per capture so successive streams differ
        let count = self.snapshot_count.fetch_add(1, Ordering::SeqCst);
        let frame = synthetic_frame(count as u64, 8, 8);
        let rgb = image::RgbImage::from_raw(frame.width, frame.height, frame.data)
            .ok_or_else(|| CameraError::DecodeError("frame buffer size mismatch".to_string()))?;

        let mut encoded = Vec::new();
        image::DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut encoded), format.to_image_format())
            .map_err(|e| CameraError::IoError(format!("Failed to encode snapshot: {}", e)))?;

        Ok(SnapshotImage {
            format,
            width: frame.width,
            height: frame.height,
            data: Bytes::from(encoded),
        })
    }
}

#[async_trait]
impl PlatformHandler for FakePlatformHandler {
    fn list_cameras(&self) -> Result<Vec<CameraInfo>, CameraError> {
        Ok(self.cameras.clone())
    }

    async fn start_camera(&self, _camera: &CameraInfo) -> Result<(), CameraError> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(CameraError::AccessError(
                "camera permission denied".to_string(),
            ));
        }
        self.started.store(true, Ordering::SeqCst);
        self.start_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_camera(&self) -> Result<(), CameraError> {
        self.started.store(false, Ordering::SeqCst);
        self.stop_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get_snapshot(&self, format: ImageFormat) -> Result<SnapshotImage, CameraError> {
        if self.fail_snapshot.load(Ordering::SeqCst) {
            return Err(CameraError::AccessError(
                "snapshot unavailable".to_string(),
            ));
        }
        self.encode_snapshot(format)
    }

    async fn save_snapshot(&self, format: ImageFormat, path: &Path) -> Result<(), CameraError> {
        let snapshot = self.get_snapshot(format)?;
        tokio::fs::write(path, &snapshot.data)
            .await
            .map_err(|e| CameraError::IoError(format!("Failed to write snapshot: {}", e)))
    }

    fn set_zoom_factor(&self, factor: f32) -> Result<(), CameraError> {
        if let Ok(mut zoom) = self.last_zoom.lock() {
            *zoom = Some(factor);
        }
        Ok(())
    }
}

/// Scripted decoder for pipeline tests: records invocations and returns a
/// preset outcome.
pub struct StubDecoder {
    results: Mutex<Vec<BarcodeResult>>,
    fail: AtomicBool,
    calls: AtomicU32,
    last_options: Mutex<Option<BarcodeDecodeOptions>>,
}

impl StubDecoder {
    pub fn new(results: Vec<BarcodeResult>) -> Self {
        Self {
            results: Mutex::new(results),
            fail: AtomicBool::new(false),
            calls: AtomicU32::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn failing() -> Self {
        let decoder = Self::empty();
        decoder.fail.store(true, Ordering::SeqCst);
        decoder
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<BarcodeDecodeOptions> {
        self.last_options.lock().ok().and_then(|o| o.clone())
    }

    fn record(
        &self,
        options: &BarcodeDecodeOptions,
    ) -> Result<Vec<BarcodeResult>, CameraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_options.lock() {
            *last = Some(options.clone());
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(CameraError::DecodeError("scripted failure".to_string()));
        }
        Ok(self.results.lock().map(|r| r.clone()).unwrap_or_default())
    }
}

impl BarcodeDecoder for StubDecoder {
    fn decode(
        &self,
        _source: &LuminanceSource,
        options: &BarcodeDecodeOptions,
    ) -> Result<Option<BarcodeResult>, CameraError> {
        Ok(self.record(options)?.into_iter().next())
    }

    fn decode_multiple(
        &self,
        _source: &LuminanceSource,
        options: &BarcodeDecodeOptions,
    ) -> Result<Vec<BarcodeResult>, CameraError> {
        self.record(options)
    }
}
