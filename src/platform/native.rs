//! nokhwa-backed platform handler.
//!
//! Enumerates real devices and serves snapshots from the active stream. Zoom
//! bounds and torch/flash hooks stay at their defaults; nokhwa exposes no
//! portable control surface for them.

use crate::errors::CameraError;
use crate::platform::PlatformHandler;
use crate::types::{CameraFrame, CameraInfo, ImageFormat, SnapshotImage};
use async_trait::async_trait;
use bytes::Bytes;
use nokhwa::{
    pixel_format::RgbFormat,
    query,
    utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType},
    Camera,
};
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;

/// Platform handler backed by nokhwa's native capture APIs
pub struct NativeHandler {
    camera: Mutex<Option<Camera>>,
}

impl NativeHandler {
    pub fn new() -> Self {
        Self {
            camera: Mutex::new(None),
        }
    }

    /// Pull the next frame from the active stream.
    ///
    /// The caller owns the delivery loop and feeds frames into
    /// `CameraView::on_frame`.
    pub fn poll_frame(&self) -> Result<CameraFrame, CameraError> {
        let mut guard = self
            .camera
            .lock()
            .map_err(|_| CameraError::AccessError("camera mutex poisoned".to_string()))?;
        let camera = guard
            .as_mut()
            .ok_or_else(|| CameraError::AccessError("camera not started".to_string()))?;

        let buffer = camera
            .frame()
            .map_err(|e| CameraError::AccessError(format!("Failed to capture frame: {}", e)))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::DecodeError(format!("Failed to decode frame: {}", e)))?;
        let (width, height) = decoded.dimensions();
        let device_id = camera.index().to_string();

        Ok(CameraFrame::new(
            decoded.into_raw(),
            width,
            height,
            device_id,
        ))
    }

    fn encode_current_frame(&self, format: ImageFormat) -> Result<SnapshotImage, CameraError> {
        let frame = self.poll_frame()?;
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

impl Default for NativeHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformHandler for NativeHandler {
    fn list_cameras(&self) -> Result<Vec<CameraInfo>, CameraError> {
        let cameras = query(ApiBackend::Auto).map_err(|e| {
            CameraError::InitializationError(format!("Failed to query cameras: {}", e))
        })?;

        Ok(cameras
            .into_iter()
            .map(|info| CameraInfo::new(info.index().to_string(), info.human_name()))
            .collect())
    }

    async fn start_camera(&self, camera: &CameraInfo) -> Result<(), CameraError> {
        let index = camera
            .device_id
            .parse::<u32>()
            .map_err(|_| CameraError::AccessError("Invalid device ID".to_string()))?;

        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::None);
        let mut native = Camera::new(CameraIndex::Index(index), requested).map_err(|e| {
            CameraError::AccessError(format!("Failed to initialize camera: {}", e))
        })?;
        native
            .open_stream()
            .map_err(|e| CameraError::AccessError(format!("Failed to open stream: {}", e)))?;

        let mut guard = self
            .camera
            .lock()
            .map_err(|_| CameraError::AccessError("camera mutex poisoned".to_string()))?;
        *guard = Some(native);
        log::info!("Started native camera {}", camera.device_id);
        Ok(())
    }

    async fn stop_camera(&self) -> Result<(), CameraError> {
        let mut guard = self
            .camera
            .lock()
            .map_err(|_| CameraError::AccessError("camera mutex poisoned".to_string()))?;
        match guard.take() {
            Some(mut camera) => {
                if let Err(e) = camera.stop_stream() {
                    log::warn!("Failed to stop stream cleanly: {}", e);
                }
                Ok(())
            }
            None => Err(CameraError::AccessError(
                "camera not started".to_string(),
            )),
        }
    }

    fn get_snapshot(&self, format: ImageFormat) -> Result<SnapshotImage, CameraError> {
        self.encode_current_frame(format)
    }

    async fn save_snapshot(&self, format: ImageFormat, path: &Path) -> Result<(), CameraError> {
        let snapshot = self.encode_current_frame(format)?;
        tokio::fs::write(path, &snapshot.data)
            .await
            .map_err(|e| CameraError::IoError(format!("Failed to write snapshot: {}", e)))
    }
}
