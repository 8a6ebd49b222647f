//! Frame-driven barcode detection.
//!
//! The platform handler delivers frames sequentially; the pipeline decodes
//! every Nth frame when detection is enabled and raises one
//! `BarcodeDetected` event per processed frame that yields results. Adapter
//! or decoder failures are converted into "zero results" so the frame path
//! keeps flowing.

use crate::barcode::{BarcodeDecodeOptions, BarcodeDecoder, BarcodeResult};
use crate::events::{CameraEvent, EventHub};
use crate::luminance::FrameLuminanceAdapter;
use crate::types::CameraFrame;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Default decode cadence: every 10th frame
pub const DEFAULT_FRAME_RATE: u32 = 10;

pub struct BarcodeDetectionPipeline {
    enabled: AtomicBool,
    frame_rate: AtomicU32,
    options: Mutex<BarcodeDecodeOptions>,
    adapter: Arc<dyn FrameLuminanceAdapter>,
    decoder: Arc<dyn BarcodeDecoder>,
    events: Arc<EventHub>,
}

impl BarcodeDetectionPipeline {
    pub fn new(
        adapter: Arc<dyn FrameLuminanceAdapter>,
        decoder: Arc<dyn BarcodeDecoder>,
        events: Arc<EventHub>,
    ) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            frame_rate: AtomicU32::new(DEFAULT_FRAME_RATE),
            options: Mutex::new(BarcodeDecodeOptions::default()),
            adapter,
            decoder,
            events,
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Decode every `rate`-th frame; `rate` must be at least 1
    pub fn set_frame_rate(&self, rate: u32) {
        self.frame_rate.store(rate.max(1), Ordering::SeqCst);
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate.load(Ordering::SeqCst)
    }

    /// Replace the decode options as a whole.
    ///
    /// Takes effect on the next processed frame; a frame already being
    /// decoded keeps the options it started with.
    pub fn set_options(&self, options: BarcodeDecodeOptions) {
        if let Ok(mut current) = self.options.lock() {
            *current = options;
        }
    }

    pub fn options(&self) -> BarcodeDecodeOptions {
        self.options
            .lock()
            .map(|options| options.clone())
            .unwrap_or_default()
    }

    /// Process one delivered frame.
    ///
    /// No-op unless detection is enabled and `frame_index` is on the decode
    /// cadence. Never propagates an error.
    pub fn on_frame(&self, frame: &CameraFrame, frame_index: u64) {
        if !self.enabled.load(Ordering::SeqCst) {
            return;
        }
        let rate = self.frame_rate.load(Ordering::SeqCst).max(1) as u64;
        if frame_index % rate != 0 {
            return;
        }

        // Snapshot the options so this frame sees one consistent set
        let options = match self.options.lock() {
            Ok(options) => options.clone(),
            Err(_) => return,
        };

        let source = match self.adapter.to_luminance_source(frame) {
            Ok(source) => source,
            Err(e) => {
                log::debug!("luminance conversion failed, skipping frame: {}", e);
                return;
            }
        };

        let results = self.run_decode(&source, &options);
        if !results.is_empty() {
            self.events.emit(CameraEvent::BarcodeDetected(results));
        }
    }

    fn run_decode(
        &self,
        source: &crate::luminance::LuminanceSource,
        options: &BarcodeDecodeOptions,
    ) -> Vec<BarcodeResult> {
        if options.read_multiple_codes {
            match self.decoder.decode_multiple(source, options) {
                Ok(results) => results,
                Err(e) => {
                    log::debug!("barcode decode failed, treating as no codes: {}", e);
                    Vec::new()
                }
            }
        } else {
            match self.decoder.decode(source, options) {
                Ok(Some(result)) => vec![result],
                Ok(None) => Vec::new(),
                Err(e) => {
                    log::debug!("barcode decode failed, treating as no codes: {}", e);
                    Vec::new()
                }
            }
        }
    }
}
