//! Snapshot capture: on-demand, edge-triggered, and periodic.
//!
//! The coordinator owns the last capture as both a decoded image handle and
//! an encoded byte stream. At most one stream is live at a time: a new
//! capture drops the previous stream before installing its own, under the
//! same lock, so a concurrent capture cannot race the disposal.

use crate::errors::CameraError;
use crate::events::{CameraEvent, CameraProperty, EventHub};
use crate::platform::PlatformHandler;
use crate::timing::FrameClock;
use crate::types::{ImageFormat, SnapshotImage};
use bytes::Bytes;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Auto-capture settings, mutated by the view's property setters
#[derive(Debug, Clone)]
struct AutoSnapshotSettings {
    /// Minimum seconds between automatic captures; 0 disables auto capture
    seconds: f32,
    format: ImageFormat,
    /// Whether automatic captures also refresh the decoded image handle
    as_image_source: bool,
}

impl Default for AutoSnapshotSettings {
    fn default() -> Self {
        Self {
            seconds: 0.0,
            format: ImageFormat::Png,
            as_image_source: false,
        }
    }
}

#[derive(Default)]
struct SnapshotState {
    image: Option<SnapshotImage>,
    stream: Option<Bytes>,
    /// Seconds on the coordinator clock at the last capture attempt
    last_snapshot: f64,
}

pub struct SnapshotCoordinator {
    state: Mutex<SnapshotState>,
    settings: Mutex<AutoSnapshotSettings>,
    clock: FrameClock,
    events: Arc<EventHub>,
}

impl SnapshotCoordinator {
    pub fn new(events: Arc<EventHub>) -> Self {
        Self::with_clock(FrameClock::new(), events)
    }

    pub fn with_clock(clock: FrameClock, events: Arc<EventHub>) -> Self {
        Self {
            state: Mutex::new(SnapshotState::default()),
            settings: Mutex::new(AutoSnapshotSettings::default()),
            clock,
            events,
        }
    }

    pub fn set_auto_seconds(&self, seconds: f32) {
        if let Ok(mut settings) = self.settings.lock() {
            settings.seconds = seconds.max(0.0);
        }
    }

    pub fn auto_seconds(&self) -> f32 {
        self.settings.lock().map(|s| s.seconds).unwrap_or(0.0)
    }

    pub fn set_auto_format(&self, format: ImageFormat) {
        if let Ok(mut settings) = self.settings.lock() {
            settings.format = format;
        }
    }

    pub fn auto_format(&self) -> ImageFormat {
        self.settings
            .lock()
            .map(|s| s.format)
            .unwrap_or(ImageFormat::Png)
    }

    pub fn set_as_image_source(&self, enabled: bool) {
        if let Ok(mut settings) = self.settings.lock() {
            settings.as_image_source = enabled;
        }
    }

    pub fn as_image_source(&self) -> bool {
        self.settings
            .lock()
            .map(|s| s.as_image_source)
            .unwrap_or(false)
    }

    /// Last captured image handle, if any
    pub fn snapshot_image(&self) -> Option<SnapshotImage> {
        self.state.lock().ok().and_then(|state| state.image.clone())
    }

    /// Current encoded byte stream, if any
    pub fn snapshot_stream(&self) -> Option<Bytes> {
        self.state.lock().ok().and_then(|state| state.stream.clone())
    }

    /// Seconds on the coordinator clock at the last capture
    pub fn last_snapshot_pts(&self) -> f64 {
        self.state.lock().map(|state| state.last_snapshot).unwrap_or(0.0)
    }

    /// Capture the current frame on demand.
    ///
    /// On success installs the new image and stream and advances the capture
    /// time; on failure prior state is left intact.
    pub fn capture(
        &self,
        handler: &dyn PlatformHandler,
        format: ImageFormat,
    ) -> Result<SnapshotImage, CameraError> {
        self.capture_at(handler, format, self.clock.pts(), true)
    }

    /// Periodic capture check, driven once per delivered frame.
    ///
    /// Captures only when the configured period has elapsed. The capture time
    /// advances even when the capture fails so a broken handler does not turn
    /// every subsequent frame into a retry.
    pub(crate) fn auto_tick(&self, handler: &dyn PlatformHandler) {
        let pts = self.clock.pts();
        let (seconds, format) = match self.settings.lock() {
            Ok(settings) => (settings.seconds, settings.format),
            Err(_) => return,
        };
        if seconds <= 0.0 {
            return;
        }
        {
            let state = match self.state.lock() {
                Ok(state) => state,
                Err(_) => return,
            };
            if pts - state.last_snapshot < seconds as f64 {
                return;
            }
        }
        if let Err(e) = self.capture_at(handler, format, pts, false) {
            log::debug!("auto snapshot capture failed: {}", e);
            if let Ok(mut state) = self.state.lock() {
                state.last_snapshot = pts;
            }
        }
    }

    fn capture_at(
        &self,
        handler: &dyn PlatformHandler,
        format: ImageFormat,
        pts: f64,
        force_image: bool,
    ) -> Result<SnapshotImage, CameraError> {
        let snapshot = handler.get_snapshot(format)?;
        let install_image = force_image || self.as_image_source();

        {
            let mut state = self
                .state
                .lock()
                .map_err(|_| CameraError::AccessError("snapshot state poisoned".to_string()))?;
            // Drop the previous stream before installing the new one
            state.stream.take();
            state.stream = Some(snapshot.data.clone());
            if install_image {
                state.image = Some(snapshot.clone());
            }
            state.last_snapshot = pts;
        }

        if install_image {
            self.events
                .emit(CameraEvent::PropertyChanged(CameraProperty::SnapShot));
        }
        self.events
            .emit(CameraEvent::PropertyChanged(CameraProperty::SnapShotStream));
        Ok(snapshot)
    }

    /// Write the current frame to disk in the given format
    pub async fn save(
        &self,
        handler: &dyn PlatformHandler,
        format: ImageFormat,
        path: &Path,
    ) -> Result<(), CameraError> {
        handler.save_snapshot(format, path).await
    }
}
