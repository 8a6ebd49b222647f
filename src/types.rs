//! Core data types for the camera control.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform detection for composition-time selection of platform pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    MacOS,
    Linux,
    Unknown,
}

impl Platform {
    /// Detect the current platform
    pub fn current() -> Self {
        #[cfg(target_os = "windows")]
        return Platform::Windows;
        #[cfg(target_os = "macos")]
        return Platform::MacOS;
        #[cfg(target_os = "linux")]
        return Platform::Linux;
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        return Platform::Unknown;
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOS => "macos",
            Platform::Linux => "linux",
            Platform::Unknown => "unknown",
        }
    }
}

/// Physical placement of a camera on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraPosition {
    Front,
    Back,
    #[default]
    Unknown,
}

/// Flash mode for photo capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    Disabled,
    Enabled,
    Auto,
}

/// Encoded image format for snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// File extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    /// Map to the `image` crate's output format
    pub fn to_image_format(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Information about a physical camera device.
///
/// Immutable once constructed; owned by the platform enumeration layer.
/// Zoom bounds feed the zoom-factor clamping in the lifecycle controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraInfo {
    /// Stable device identifier (platform-specific)
    pub device_id: String,
    /// Human-readable device name
    pub name: String,
    /// Placement of the camera on the device
    pub position: CameraPosition,
    /// Minimum supported zoom factor
    pub min_zoom_factor: f32,
    /// Maximum supported zoom factor
    pub max_zoom_factor: f32,
    /// Whether the camera has a continuous illumination LED
    pub has_torch: bool,
    /// Whether the camera has a flash unit
    pub has_flash: bool,
}

impl CameraInfo {
    pub fn new(device_id: String, name: String) -> Self {
        Self {
            device_id,
            name,
            position: CameraPosition::Unknown,
            min_zoom_factor: 1.0,
            max_zoom_factor: 1.0,
            has_torch: false,
            has_flash: false,
        }
    }

    pub fn with_position(mut self, position: CameraPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_zoom_range(mut self, min: f32, max: f32) -> Self {
        self.min_zoom_factor = min;
        self.max_zoom_factor = max;
        self
    }

    pub fn with_torch(mut self, has_torch: bool) -> Self {
        self.has_torch = has_torch;
        self
    }

    pub fn with_flash(mut self, has_flash: bool) -> Self {
        self.has_flash = has_flash;
        self
    }
}

/// Metadata attached to a delivered video frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMetadata {
    /// Wall-clock capture time
    pub timestamp: DateTime<Utc>,
    /// Identifier of the device that produced the frame
    pub device_id: String,
}

/// A single RGB8 video frame delivered by the platform handler
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// Packed RGB8 pixel data, `width * height * 3` bytes
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub metadata: FrameMetadata,
}

impl CameraFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, device_id: String) -> Self {
        Self {
            data,
            width,
            height,
            metadata: FrameMetadata {
                timestamp: Utc::now(),
                device_id,
            },
        }
    }

    /// Size of the pixel payload in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// An encoded snapshot produced by the platform handler.
///
/// The byte payload doubles as the snapshot stream; the coordinator keeps
/// at most one live stream at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

/// Desired camera state as driven by the consumer.
///
/// Read by the lifecycle controller on each relevant change; the zoom factor
/// is kept clamped to the selected camera's bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfiguration {
    pub flash_mode: FlashMode,
    pub torch_enabled: bool,
    pub zoom_factor: f32,
    pub mirrored_image: bool,
}

impl Default for CameraConfiguration {
    fn default() -> Self {
        Self {
            flash_mode: FlashMode::Disabled,
            torch_enabled: false,
            zoom_factor: 1.0,
            mirrored_image: false,
        }
    }
}
