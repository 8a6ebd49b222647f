//! Barcode detection: decode options, results, decoder contract, and the
//! frame-driven detection pipeline.

pub mod decoder;
pub mod pipeline;

pub use decoder::QrDecoder;
pub use pipeline::BarcodeDetectionPipeline;

use crate::errors::CameraError;
use crate::luminance::LuminanceSource;
use serde::{Deserialize, Serialize};

/// Barcode symbologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeFormat {
    QrCode,
    MicroQrCode,
    DataMatrix,
    Aztec,
    Pdf417,
    Ean8,
    Ean13,
    UpcA,
    UpcE,
    Code39,
    Code93,
    Code128,
    Itf,
    Codabar,
}

/// Options applied by the decoder on every decode attempt.
///
/// An empty `character_set` means "use the decoder default". An empty
/// `possible_formats` accepts every symbology the decoder supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeDecodeOptions {
    /// Try rotated orientations of the image
    pub auto_rotate: bool,
    /// Character set override; empty preserves the decoder default
    pub character_set: String,
    /// Accepted symbologies; empty accepts all
    pub possible_formats: Vec<BarcodeFormat>,
    /// Spend more time to find a code
    pub try_harder: bool,
    /// Also try the inverted image
    pub try_inverted: bool,
    /// Image is a pure barcode without surrounding scene
    pub pure_barcode: bool,
    /// Report every code found instead of the first
    pub read_multiple_codes: bool,
}

impl Default for BarcodeDecodeOptions {
    fn default() -> Self {
        Self {
            auto_rotate: false,
            character_set: String::new(),
            possible_formats: Vec::new(),
            try_harder: false,
            try_inverted: false,
            pure_barcode: false,
            read_multiple_codes: false,
        }
    }
}

impl BarcodeDecodeOptions {
    /// Whether the given symbology passes the format filter
    pub fn accepts_format(&self, format: BarcodeFormat) -> bool {
        self.possible_formats.is_empty() || self.possible_formats.contains(&format)
    }
}

/// One decoded barcode payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeResult {
    /// Decoded text content
    pub text: String,
    /// Raw payload bytes
    pub raw_bytes: Vec<u8>,
    /// Symbology the code was encoded in
    pub format: BarcodeFormat,
}

impl BarcodeResult {
    pub fn new(text: String, format: BarcodeFormat) -> Self {
        let raw_bytes = text.clone().into_bytes();
        Self {
            text,
            raw_bytes,
            format,
        }
    }
}

/// Black-box barcode decoding engine.
///
/// Contract: a decode attempt that finds nothing returns `Ok(None)` or an
/// empty vector; errors are reserved for malformed input. The pipeline treats
/// errors and empty results identically, so implementations may use either.
/// Option fields an engine cannot honor are ignored.
pub trait BarcodeDecoder: Send + Sync {
    /// Decode the first code found, if any
    fn decode(
        &self,
        source: &LuminanceSource,
        options: &BarcodeDecodeOptions,
    ) -> Result<Option<BarcodeResult>, CameraError>;

    /// Decode every code found
    fn decode_multiple(
        &self,
        source: &LuminanceSource,
        options: &BarcodeDecodeOptions,
    ) -> Result<Vec<BarcodeResult>, CameraError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = BarcodeDecodeOptions::default();
        assert!(options.character_set.is_empty());
        assert!(options.possible_formats.is_empty());
        assert!(!options.read_multiple_codes);
        assert!(!options.try_harder);
    }

    #[test]
    fn test_empty_formats_accept_all() {
        let options = BarcodeDecodeOptions::default();
        assert!(options.accepts_format(BarcodeFormat::QrCode));
        assert!(options.accepts_format(BarcodeFormat::Code128));
    }

    #[test]
    fn test_format_filter() {
        let options = BarcodeDecodeOptions {
            possible_formats: vec![BarcodeFormat::Ean13],
            ..Default::default()
        };
        assert!(options.accepts_format(BarcodeFormat::Ean13));
        assert!(!options.accepts_format(BarcodeFormat::QrCode));
    }

    #[test]
    fn test_result_raw_bytes() {
        let result = BarcodeResult::new("hello".to_string(), BarcodeFormat::QrCode);
        assert_eq!(result.raw_bytes, b"hello");
        assert_eq!(result.format, BarcodeFormat::QrCode);
    }
}
