//! Camera lifecycle: selection, start/stop orchestration, and zoom bounds.

use crate::errors::CameraError;
use crate::events::{CameraEvent, CameraProperty, EventHub};
use crate::platform::PlatformHandler;
use crate::types::CameraInfo;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct LifecycleState {
    selected: Option<CameraInfo>,
    /// Cached (min, max) zoom bounds; cleared on camera change and
    /// recomputed lazily from the selected camera
    zoom_bounds: Option<(f32, f32)>,
}

/// Owns camera selection and start/stop delegation to the platform handler
pub struct CameraLifecycleController {
    state: Mutex<LifecycleState>,
    active: AtomicBool,
    events: Arc<EventHub>,
}

impl CameraLifecycleController {
    pub fn new(events: Arc<EventHub>) -> Self {
        Self {
            state: Mutex::new(LifecycleState::default()),
            active: AtomicBool::new(false),
            events,
        }
    }

    /// Select a camera. Returns `true` when this is an actual change.
    ///
    /// A change invalidates the cached zoom bounds and fires exactly one
    /// change notification for each zoom bound.
    pub fn select_camera(&self, camera: CameraInfo) -> bool {
        {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(_) => return false,
            };
            if state
                .selected
                .as_ref()
                .is_some_and(|current| current.device_id == camera.device_id)
            {
                return false;
            }
            state.selected = Some(camera);
            state.zoom_bounds = None;
        }
        self.notify_zoom_bounds();
        true
    }

    pub fn selected_camera(&self) -> Option<CameraInfo> {
        self.state.lock().ok().and_then(|state| state.selected.clone())
    }

    /// Start the capture session.
    ///
    /// Requires a selected camera and a bound handler; refreshes the cached
    /// zoom bounds and fires the zoom-bound notifications once on success.
    pub async fn start_camera(
        &self,
        handler: Option<Arc<dyn PlatformHandler>>,
    ) -> Result<(), CameraError> {
        let camera = self
            .selected_camera()
            .ok_or_else(|| CameraError::AccessError("no camera selected".to_string()))?;
        let handler = handler
            .ok_or_else(|| CameraError::AccessError("no platform handler bound".to_string()))?;

        handler.start_camera(&camera).await?;

        if let Ok(mut state) = self.state.lock() {
            state.zoom_bounds = Some((camera.min_zoom_factor, camera.max_zoom_factor));
        }
        self.active.store(true, Ordering::SeqCst);
        log::info!("Camera {} started", camera.device_id);
        self.notify_zoom_bounds();
        Ok(())
    }

    /// Stop the capture session.
    ///
    /// Calling without an active session is a failure status, not a panic.
    pub async fn stop_camera(
        &self,
        handler: Option<Arc<dyn PlatformHandler>>,
    ) -> Result<(), CameraError> {
        if !self.active.load(Ordering::SeqCst) {
            return Err(CameraError::AccessError(
                "camera not started".to_string(),
            ));
        }
        let handler = handler
            .ok_or_else(|| CameraError::AccessError("no platform handler bound".to_string()))?;

        handler.stop_camera().await?;
        self.active.store(false, Ordering::SeqCst);
        log::info!("Camera stopped");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Minimum zoom factor of the selected camera, 1.0 when none selected
    pub fn min_zoom_factor(&self) -> f32 {
        self.zoom_bounds().0
    }

    /// Maximum zoom factor of the selected camera, 1.0 when none selected
    pub fn max_zoom_factor(&self) -> f32 {
        self.zoom_bounds().1
    }

    /// Clamp a requested zoom factor into the selected camera's bounds
    pub fn clamp_zoom(&self, factor: f32) -> f32 {
        let (min, max) = self.zoom_bounds();
        factor.clamp(min, max)
    }

    fn zoom_bounds(&self) -> (f32, f32) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return (1.0, 1.0),
        };
        if state.zoom_bounds.is_none() {
            state.zoom_bounds = state
                .selected
                .as_ref()
                .map(|camera| (camera.min_zoom_factor, camera.max_zoom_factor));
        }
        state.zoom_bounds.unwrap_or((1.0, 1.0))
    }

    fn notify_zoom_bounds(&self) {
        self.events
            .emit(CameraEvent::PropertyChanged(CameraProperty::MinZoomFactor));
        self.events
            .emit(CameraEvent::PropertyChanged(CameraProperty::MaxZoomFactor));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(id: &str) -> CameraInfo {
        CameraInfo::new(id.to_string(), format!("Camera {}", id)).with_zoom_range(1.0, 4.0)
    }

    #[test]
    fn test_reselect_same_camera_is_noop() {
        let controller = CameraLifecycleController::new(Arc::new(EventHub::new()));
        assert!(controller.select_camera(camera("0")));
        assert!(!controller.select_camera(camera("0")));
        assert!(controller.select_camera(camera("1")));
    }

    #[test]
    fn test_zoom_bounds_follow_selection() {
        let controller = CameraLifecycleController::new(Arc::new(EventHub::new()));
        assert_eq!(controller.min_zoom_factor(), 1.0);
        assert_eq!(controller.max_zoom_factor(), 1.0);

        controller.select_camera(camera("0"));
        assert_eq!(controller.max_zoom_factor(), 4.0);
        assert_eq!(controller.clamp_zoom(10.0), 4.0);
        assert_eq!(controller.clamp_zoom(0.5), 1.0);
    }

    #[tokio::test]
    async fn test_start_without_camera_fails() {
        let controller = CameraLifecycleController::new(Arc::new(EventHub::new()));
        let result = controller.start_camera(None).await;
        assert!(matches!(result, Err(CameraError::AccessError(_))));
    }

    #[tokio::test]
    async fn test_stop_without_start_fails() {
        let controller = CameraLifecycleController::new(Arc::new(EventHub::new()));
        controller.select_camera(camera("0"));
        let result = controller.stop_camera(None).await;
        assert!(matches!(result, Err(CameraError::AccessError(_))));
        assert!(!controller.is_active());
    }
}
