//! Default barcode decoding engine backed by rqrr.
//!
//! Covers QR codes only; other symbologies plug in through the
//! [`BarcodeDecoder`] trait. rqrr locates finder patterns in any orientation,
//! so `auto_rotate` needs no extra work here, and content is decoded per the
//! encoding declared in the code itself, which is the decoder default an
//! empty `character_set` asks for. Remaining hint flags are ignored.

use crate::barcode::{BarcodeDecodeOptions, BarcodeDecoder, BarcodeFormat, BarcodeResult};
use crate::errors::CameraError;
use crate::luminance::LuminanceSource;

/// QR decoder built on rqrr's grid detection
#[derive(Debug, Default)]
pub struct QrDecoder;

impl QrDecoder {
    pub fn new() -> Self {
        Self
    }

    fn decode_grids(
        &self,
        source: &LuminanceSource,
        options: &BarcodeDecodeOptions,
        max_results: usize,
    ) -> Result<Vec<BarcodeResult>, CameraError> {
        if !options.accepts_format(BarcodeFormat::QrCode) {
            return Ok(Vec::new());
        }

        let gray = source.to_gray_image()?;
        let mut prepared = rqrr::PreparedImage::prepare(gray);
        let grids = prepared.detect_grids();

        let mut results = Vec::new();
        for grid in grids {
            match grid.decode() {
                Ok((_meta, content)) => {
                    results.push(BarcodeResult::new(content, BarcodeFormat::QrCode));
                    if results.len() >= max_results {
                        break;
                    }
                }
                Err(e) => {
                    // A grid that fails to decode is not a found code
                    log::debug!("QR grid decode failed: {}", e);
                }
            }
        }
        Ok(results)
    }
}

impl BarcodeDecoder for QrDecoder {
    fn decode(
        &self,
        source: &LuminanceSource,
        options: &BarcodeDecodeOptions,
    ) -> Result<Option<BarcodeResult>, CameraError> {
        Ok(self.decode_grids(source, options, 1)?.into_iter().next())
    }

    fn decode_multiple(
        &self,
        source: &LuminanceSource,
        options: &BarcodeDecodeOptions,
    ) -> Result<Vec<BarcodeResult>, CameraError> {
        self.decode_grids(source, options, usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_source() -> LuminanceSource {
        LuminanceSource::new(vec![255u8; 64 * 64], 64, 64).unwrap()
    }

    #[test]
    fn test_blank_image_finds_nothing() {
        let decoder = QrDecoder::new();
        let result = decoder
            .decode(&blank_source(), &BarcodeDecodeOptions::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_format_filter_short_circuits() {
        let decoder = QrDecoder::new();
        let options = BarcodeDecodeOptions {
            possible_formats: vec![BarcodeFormat::Ean13],
            ..Default::default()
        };
        let results = decoder.decode_multiple(&blank_source(), &options).unwrap();
        assert!(results.is_empty());
    }
}
