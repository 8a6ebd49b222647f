//! Frame-to-luminance conversion for barcode decoding.
//!
//! Barcode decoders consume grayscale sample buffers. The adapter trait is
//! the seam for platform-specific pixel layouts; the bundled implementation
//! handles the packed RGB8 frames the core uses.

use crate::errors::CameraError;
use crate::types::CameraFrame;
use image::GrayImage;

/// A grayscale sample buffer derived from a video frame
#[derive(Debug, Clone)]
pub struct LuminanceSource {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl LuminanceSource {
    /// Wrap a luma buffer; the buffer must hold `width * height` samples
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, CameraError> {
        if data.len() != (width as usize) * (height as usize) {
            return Err(CameraError::DecodeError(format!(
                "luminance buffer size {} does not match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[u8] {
        &self.data
    }

    /// View the buffer as a `GrayImage` for decoders built on the image crate
    pub fn to_gray_image(&self) -> Result<GrayImage, CameraError> {
        GrayImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            CameraError::DecodeError("luminance buffer does not fit dimensions".to_string())
        })
    }
}

/// Converts a platform frame into a luminance source.
///
/// One implementation per pixel layout, selected at composition time.
pub trait FrameLuminanceAdapter: Send + Sync {
    fn to_luminance_source(&self, frame: &CameraFrame) -> Result<LuminanceSource, CameraError>;
}

/// Adapter for packed RGB8 frames using BT.601 luma weights
#[derive(Debug, Default)]
pub struct RgbLuminanceAdapter;

impl FrameLuminanceAdapter for RgbLuminanceAdapter {
    fn to_luminance_source(&self, frame: &CameraFrame) -> Result<LuminanceSource, CameraError> {
        let expected = (frame.width as usize) * (frame.height as usize) * 3;
        if frame.data.len() != expected {
            return Err(CameraError::DecodeError(format!(
                "frame size {} does not match {}x{} RGB8",
                frame.data.len(),
                frame.width,
                frame.height
            )));
        }

        let mut luma = Vec::with_capacity(expected / 3);
        for px in frame.data.chunks_exact(3) {
            let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
            luma.push(((r * 299 + g * 587 + b * 114) / 1000) as u8);
        }
        LuminanceSource::new(luma, frame.width, frame.height)
    }
}
