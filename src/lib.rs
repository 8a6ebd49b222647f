//! CamView: bindable camera control core
//!
//! This crate provides the coordination core of a camera control: camera
//! lifecycle management, snapshot capture, and frame-driven barcode
//! detection, with platform camera access delegated to a per-platform
//! handler.
//!
//! # Features
//! - Camera selection with lazy zoom-bound caching
//! - Async start/stop orchestration through a platform handler trait
//! - On-demand, edge-triggered, and periodic snapshot capture
//! - Throttled barcode detection over the incoming frame stream
//! - Pluggable luminance adapters and decoding engines
//!
//! # Usage
//! ```rust
//! use camview::testing::FakePlatformHandler;
//! use camview::view::CameraView;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let view = CameraView::new();
//! view.bind_handler(Arc::new(FakePlatformHandler::with_default_camera())).unwrap();
//! let camera = view.cameras().into_iter().next().unwrap();
//! view.set_camera(camera);
//! view.start_camera_async().await.unwrap();
//! # });
//! ```

pub mod barcode;
pub mod config;
pub mod errors;
pub mod events;
pub mod lifecycle;
pub mod luminance;
pub mod platform;
pub mod snapshot;
pub mod timing;
pub mod types;
pub mod view;

// Testing utilities - synthetic data and fakes for offline testing
pub mod testing;

// Re-exports for convenience
pub use barcode::{BarcodeDecodeOptions, BarcodeDecoder, BarcodeFormat, BarcodeResult};
pub use errors::CameraError;
pub use events::{CameraEvent, CameraProperty};
pub use luminance::{FrameLuminanceAdapter, LuminanceSource, RgbLuminanceAdapter};
pub use platform::PlatformHandler;
pub use types::{CameraFrame, CameraInfo, FlashMode, ImageFormat, Platform, SnapshotImage};
pub use view::CameraView;

/// Detect the current platform using the Platform enum
pub fn current_platform() -> Platform {
    Platform::current()
}

/// Initialize logging for the camera control
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "camview=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
        platform: Platform::current(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub platform: Platform,
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_platform_detection() {
        let platform = current_platform();
        assert_ne!(platform, Platform::Unknown);
    }

    #[test]
    fn test_crate_info() {
        let info = get_info();
        assert_eq!(info.name, "camview");
        assert!(!info.version.is_empty());
        assert!(!info.description.is_empty());
    }
}
