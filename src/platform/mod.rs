//! Platform camera handler seam.
//!
//! The core never touches camera hardware directly; everything goes through
//! [`PlatformHandler`]. The `native` feature ships a nokhwa-backed handler,
//! and `testing::FakePlatformHandler` covers offline tests.

#[cfg(feature = "native")]
pub mod native;

use crate::errors::CameraError;
use crate::types::{CameraInfo, FlashMode, ImageFormat, SnapshotImage};
use async_trait::async_trait;
use std::path::Path;

/// Platform-specific camera access.
///
/// `start_camera`/`stop_camera`/`save_snapshot` suspend at the operation
/// boundary only; implementations deliver frames sequentially to the view's
/// frame callback and never overlap deliveries. The property hooks default to
/// no-ops for hardware without the corresponding control.
#[async_trait]
pub trait PlatformHandler: Send + Sync {
    /// Enumerate the cameras available on the device
    fn list_cameras(&self) -> Result<Vec<CameraInfo>, CameraError>;

    /// Start the capture session for the given camera.
    ///
    /// Fails with `AccessError` on permission denial, busy hardware, or an
    /// unsupported format.
    async fn start_camera(&self, camera: &CameraInfo) -> Result<(), CameraError>;

    /// Stop the capture session and release the camera resource
    async fn stop_camera(&self) -> Result<(), CameraError>;

    /// Encode the current frame in the given format
    fn get_snapshot(&self, format: ImageFormat) -> Result<SnapshotImage, CameraError>;

    /// Write the current frame, encoded in the given format, to `path`
    async fn save_snapshot(&self, format: ImageFormat, path: &Path) -> Result<(), CameraError>;

    /// Apply the flash mode for the next capture
    fn set_flash_mode(&self, mode: FlashMode) -> Result<(), CameraError> {
        let _ = mode;
        Ok(())
    }

    /// Switch the torch LED on or off
    fn set_torch_enabled(&self, enabled: bool) -> Result<(), CameraError> {
        let _ = enabled;
        Ok(())
    }

    /// Apply a zoom factor already clamped to the camera's bounds
    fn set_zoom_factor(&self, factor: f32) -> Result<(), CameraError> {
        let _ = factor;
        Ok(())
    }

    /// Mirror the preview image horizontally
    fn set_mirrored_image(&self, mirrored: bool) -> Result<(), CameraError> {
        let _ = mirrored;
        Ok(())
    }
}
