//! The camera view façade.
//!
//! Single entry point for consumers: aggregates the lifecycle controller,
//! snapshot coordinator, and barcode detection pipeline behind explicit
//! setters, and receives the platform handler's frame callback through
//! [`CameraView::on_frame`].

use crate::barcode::{BarcodeDecodeOptions, BarcodeDecoder, BarcodeDetectionPipeline, QrDecoder};
use crate::errors::CameraError;
use crate::events::{CameraEvent, EventHub};
use crate::lifecycle::CameraLifecycleController;
use crate::luminance::{FrameLuminanceAdapter, RgbLuminanceAdapter};
use crate::platform::PlatformHandler;
use crate::snapshot::SnapshotCoordinator;
use crate::types::{
    CameraConfiguration, CameraFrame, CameraInfo, FlashMode, ImageFormat, SnapshotImage,
};
use bytes::Bytes;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

pub struct CameraView {
    handler: RwLock<Option<Arc<dyn PlatformHandler>>>,
    cameras: Mutex<Vec<CameraInfo>>,
    config: Mutex<CameraConfiguration>,
    lifecycle: CameraLifecycleController,
    snapshot: SnapshotCoordinator,
    pipeline: BarcodeDetectionPipeline,
    events: Arc<EventHub>,
    take_auto_snapshot: AtomicBool,
    frame_index: AtomicU64,
}

impl CameraView {
    /// Create a view with the bundled RGB luminance adapter and QR decoder
    pub fn new() -> Self {
        Self::with_parts(
            Arc::new(RgbLuminanceAdapter),
            Arc::new(QrDecoder::new()),
        )
    }

    /// Create a view with a custom luminance adapter and decoding engine
    pub fn with_parts(
        adapter: Arc<dyn FrameLuminanceAdapter>,
        decoder: Arc<dyn BarcodeDecoder>,
    ) -> Self {
        let events = Arc::new(EventHub::new());
        Self {
            handler: RwLock::new(None),
            cameras: Mutex::new(Vec::new()),
            config: Mutex::new(CameraConfiguration::default()),
            lifecycle: CameraLifecycleController::new(events.clone()),
            snapshot: SnapshotCoordinator::new(events.clone()),
            pipeline: BarcodeDetectionPipeline::new(adapter, decoder, events.clone()),
            events,
            take_auto_snapshot: AtomicBool::new(false),
            frame_index: AtomicU64::new(0),
        }
    }

    /// Register a listener for the view's events
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&CameraEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener);
    }

    /// Bind the platform handler, load the camera list, and raise
    /// `CamerasLoaded`
    pub fn bind_handler(&self, handler: Arc<dyn PlatformHandler>) -> Result<(), CameraError> {
        let cameras = handler.list_cameras()?;
        log::info!("Platform handler bound, {} cameras available", cameras.len());
        if let Ok(mut list) = self.cameras.lock() {
            *list = cameras;
        }
        if let Ok(mut slot) = self.handler.write() {
            *slot = Some(handler);
        }
        self.events.emit(CameraEvent::CamerasLoaded);
        Ok(())
    }

    fn handler(&self) -> Option<Arc<dyn PlatformHandler>> {
        self.handler.read().ok().and_then(|slot| slot.clone())
    }

    /// Cameras available on the device, loaded when the handler was bound
    pub fn cameras(&self) -> Vec<CameraInfo> {
        self.cameras.lock().map(|list| list.clone()).unwrap_or_default()
    }

    /// Select the camera to use. No-op when reselecting the current camera.
    pub fn set_camera(&self, camera: CameraInfo) {
        if self.lifecycle.select_camera(camera) {
            // Re-clamp the zoom into the new camera's bounds
            let clamped = self.lifecycle.clamp_zoom(self.zoom_factor());
            if let Ok(mut config) = self.config.lock() {
                config.zoom_factor = clamped;
            }
            if let Err(e) = self.propagate(|handler| handler.set_zoom_factor(clamped)) {
                log::warn!("failed to apply zoom after camera change: {}", e);
            }
        }
    }

    pub fn camera(&self) -> Option<CameraInfo> {
        self.lifecycle.selected_camera()
    }

    pub fn min_zoom_factor(&self) -> f32 {
        self.lifecycle.min_zoom_factor()
    }

    pub fn max_zoom_factor(&self) -> f32 {
        self.lifecycle.max_zoom_factor()
    }

    pub fn set_flash_mode(&self, mode: FlashMode) -> Result<(), CameraError> {
        if let Ok(mut config) = self.config.lock() {
            config.flash_mode = mode;
        }
        self.propagate(|handler| handler.set_flash_mode(mode))
    }

    pub fn flash_mode(&self) -> FlashMode {
        self.config.lock().map(|c| c.flash_mode).unwrap_or_default()
    }

    pub fn set_torch_enabled(&self, enabled: bool) -> Result<(), CameraError> {
        if let Ok(mut config) = self.config.lock() {
            config.torch_enabled = enabled;
        }
        self.propagate(|handler| handler.set_torch_enabled(enabled))
    }

    pub fn torch_enabled(&self) -> bool {
        self.config.lock().map(|c| c.torch_enabled).unwrap_or(false)
    }

    pub fn set_mirrored_image(&self, mirrored: bool) -> Result<(), CameraError> {
        if let Ok(mut config) = self.config.lock() {
            config.mirrored_image = mirrored;
        }
        self.propagate(|handler| handler.set_mirrored_image(mirrored))
    }

    pub fn mirrored_image(&self) -> bool {
        self.config.lock().map(|c| c.mirrored_image).unwrap_or(false)
    }

    /// Set the zoom factor, clamped to the selected camera's bounds
    pub fn set_zoom_factor(&self, factor: f32) -> Result<(), CameraError> {
        if !factor.is_finite() {
            return Err(CameraError::ControlError(
                "zoom factor must be finite".to_string(),
            ));
        }
        let clamped = self.lifecycle.clamp_zoom(factor);
        if let Ok(mut config) = self.config.lock() {
            config.zoom_factor = clamped;
        }
        self.propagate(|handler| handler.set_zoom_factor(clamped))
    }

    pub fn zoom_factor(&self) -> f32 {
        self.config.lock().map(|c| c.zoom_factor).unwrap_or(1.0)
    }

    pub fn set_barcode_detection_enabled(&self, enabled: bool) {
        self.pipeline.set_enabled(enabled);
    }

    pub fn barcode_detection_enabled(&self) -> bool {
        self.pipeline.is_enabled()
    }

    /// Decode every `rate`-th frame; rates below 1 are rejected
    pub fn set_barcode_detection_frame_rate(&self, rate: u32) -> Result<(), CameraError> {
        if rate < 1 {
            return Err(CameraError::ControlError(
                "detection frame rate must be at least 1".to_string(),
            ));
        }
        self.pipeline.set_frame_rate(rate);
        Ok(())
    }

    pub fn barcode_detection_frame_rate(&self) -> u32 {
        self.pipeline.frame_rate()
    }

    /// Replace the decode options atomically; the next processed frame sees
    /// the full new set
    pub fn set_barcode_options(&self, options: BarcodeDecodeOptions) {
        self.pipeline.set_options(options);
    }

    pub fn barcode_options(&self) -> BarcodeDecodeOptions {
        self.pipeline.options()
    }

    pub fn set_auto_snapshot_seconds(&self, seconds: f32) -> Result<(), CameraError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(CameraError::ControlError(
                "auto snapshot seconds must be zero or positive".to_string(),
            ));
        }
        self.snapshot.set_auto_seconds(seconds);
        Ok(())
    }

    pub fn auto_snapshot_seconds(&self) -> f32 {
        self.snapshot.auto_seconds()
    }

    pub fn set_auto_snapshot_format(&self, format: ImageFormat) {
        self.snapshot.set_auto_format(format);
    }

    pub fn auto_snapshot_format(&self) -> ImageFormat {
        self.snapshot.auto_format()
    }

    pub fn set_auto_snapshot_as_image_source(&self, enabled: bool) {
        self.snapshot.set_as_image_source(enabled);
    }

    pub fn auto_snapshot_as_image_source(&self) -> bool {
        self.snapshot.as_image_source()
    }

    /// Edge-triggered capture toggle: only the false-to-true transition
    /// captures a frame
    pub fn set_take_auto_snapshot(&self, value: bool) {
        let previous = self.take_auto_snapshot.swap(value, Ordering::SeqCst);
        if value && !previous {
            let Some(handler) = self.handler() else {
                log::debug!("snapshot trigger ignored, no handler bound");
                return;
            };
            let format = self.snapshot.auto_format();
            if let Err(e) = self.snapshot.capture(handler.as_ref(), format) {
                log::debug!("triggered snapshot failed: {}", e);
            }
        }
    }

    pub fn take_auto_snapshot(&self) -> bool {
        self.take_auto_snapshot.load(Ordering::SeqCst)
    }

    /// Last captured snapshot image, if any
    pub fn snapshot_image(&self) -> Option<SnapshotImage> {
        self.snapshot.snapshot_image()
    }

    /// Current encoded snapshot stream; replaced wholesale on every capture
    pub fn snapshot_stream(&self) -> Option<Bytes> {
        self.snapshot.snapshot_stream()
    }

    /// Start playback of the selected camera.
    ///
    /// Requires a selected camera and a bound handler; the current
    /// configuration is pushed to the handler on success.
    pub async fn start_camera_async(&self) -> Result<(), CameraError> {
        let handler = self.handler();
        self.lifecycle.start_camera(handler.clone()).await?;

        if let Some(handler) = handler {
            let config = self
                .config
                .lock()
                .map(|c| c.clone())
                .unwrap_or_default();
            if let Err(e) = handler
                .set_flash_mode(config.flash_mode)
                .and_then(|_| handler.set_torch_enabled(config.torch_enabled))
                .and_then(|_| handler.set_zoom_factor(config.zoom_factor))
                .and_then(|_| handler.set_mirrored_image(config.mirrored_image))
            {
                log::warn!("failed to apply camera configuration: {}", e);
            }
        }
        Ok(())
    }

    /// Stop playback. Returns a failure status when no session is active.
    pub async fn stop_camera_async(&self) -> Result<(), CameraError> {
        self.lifecycle.stop_camera(self.handler()).await
    }

    /// Capture the current frame on demand
    pub fn get_snapshot(&self, format: ImageFormat) -> Result<SnapshotImage, CameraError> {
        let handler = self
            .handler()
            .ok_or_else(|| CameraError::AccessError("no platform handler bound".to_string()))?;
        self.snapshot.capture(handler.as_ref(), format)
    }

    /// Save the current frame to disk; requires an active camera session
    pub async fn save_snapshot(
        &self,
        format: ImageFormat,
        path: &Path,
    ) -> Result<(), CameraError> {
        if !self.lifecycle.is_active() {
            return Err(CameraError::AccessError(
                "no active camera session".to_string(),
            ));
        }
        let handler = self
            .handler()
            .ok_or_else(|| CameraError::AccessError("no platform handler bound".to_string()))?;
        self.snapshot.save(handler.as_ref(), format, path).await
    }

    /// Frame-delivery callback, invoked once per available video frame.
    ///
    /// Drives the barcode pipeline and the periodic snapshot check; never
    /// fails, so decode errors cannot interrupt the stream.
    pub fn on_frame(&self, frame: &CameraFrame) {
        let index = self.frame_index.fetch_add(1, Ordering::SeqCst);
        self.pipeline.on_frame(frame, index);

        if let Some(handler) = self.handler() {
            self.snapshot
                .auto_tick(handler.as_ref());
        }
    }

    fn propagate<F>(&self, apply: F) -> Result<(), CameraError>
    where
        F: FnOnce(&dyn PlatformHandler) -> Result<(), CameraError>,
    {
        if !self.lifecycle.is_active() {
            return Ok(());
        }
        match self.handler() {
            Some(handler) => apply(handler.as_ref()),
            None => Ok(()),
        }
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self::new()
    }
}
