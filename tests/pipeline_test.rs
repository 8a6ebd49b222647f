//! Tests for the barcode detection pipeline: decode cadence, event
//! emission, and error absorption.

use camview::barcode::{
    BarcodeDecodeOptions, BarcodeDetectionPipeline, BarcodeFormat, BarcodeResult,
};
use camview::events::{CameraEvent, EventHub};
use camview::luminance::RgbLuminanceAdapter;
use camview::testing::{synthetic_frame, StubDecoder};
use std::sync::{Arc, Mutex};

fn pipeline_with(
    decoder: Arc<StubDecoder>,
) -> (BarcodeDetectionPipeline, Arc<Mutex<Vec<CameraEvent>>>) {
    let events = Arc::new(EventHub::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    events.subscribe(move |event| {
        sink.lock().unwrap().push(event.clone());
    });
    let pipeline = BarcodeDetectionPipeline::new(Arc::new(RgbLuminanceAdapter), decoder, events);
    (pipeline, seen)
}

fn detections(seen: &Mutex<Vec<CameraEvent>>) -> Vec<Vec<BarcodeResult>> {
    seen.lock()
        .unwrap()
        .iter()
        .filter_map(|event| match event {
            CameraEvent::BarcodeDetected(results) => Some(results.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn decoder_runs_only_on_cadence() {
    let decoder = Arc::new(StubDecoder::empty());
    let (pipeline, _seen) = pipeline_with(decoder.clone());
    pipeline.set_enabled(true);
    pipeline.set_frame_rate(3);

    let frame = synthetic_frame(0, 16, 16);
    for index in 0..9u64 {
        pipeline.on_frame(&frame, index);
    }

    // Indices 0, 3, 6
    assert_eq!(decoder.calls(), 3);
}

#[test]
fn disabled_pipeline_never_decodes() {
    let decoder = Arc::new(StubDecoder::empty());
    let (pipeline, seen) = pipeline_with(decoder.clone());
    pipeline.set_frame_rate(1);

    let frame = synthetic_frame(0, 16, 16);
    for index in 0..5u64 {
        pipeline.on_frame(&frame, index);
    }

    assert_eq!(decoder.calls(), 0);
    assert!(detections(&seen).is_empty());
}

#[test]
fn zero_results_raise_no_event() {
    let decoder = Arc::new(StubDecoder::empty());
    let (pipeline, seen) = pipeline_with(decoder.clone());
    pipeline.set_enabled(true);
    pipeline.set_frame_rate(1);

    pipeline.on_frame(&synthetic_frame(0, 16, 16), 0);

    assert_eq!(decoder.calls(), 1);
    assert!(detections(&seen).is_empty());
}

#[test]
fn results_raise_one_event_with_full_set() {
    let results = vec![
        BarcodeResult::new("first".to_string(), BarcodeFormat::QrCode),
        BarcodeResult::new("second".to_string(), BarcodeFormat::QrCode),
    ];
    let decoder = Arc::new(StubDecoder::new(results.clone()));
    let (pipeline, seen) = pipeline_with(decoder);
    pipeline.set_enabled(true);
    pipeline.set_frame_rate(1);
    pipeline.set_options(BarcodeDecodeOptions {
        read_multiple_codes: true,
        ..Default::default()
    });

    pipeline.on_frame(&synthetic_frame(0, 16, 16), 0);

    let detected = detections(&seen);
    assert_eq!(detected.len(), 1);
    assert_eq!(detected[0], results);
}

#[test]
fn single_mode_reports_first_result_only() {
    let results = vec![
        BarcodeResult::new("first".to_string(), BarcodeFormat::QrCode),
        BarcodeResult::new("second".to_string(), BarcodeFormat::QrCode),
    ];
    let decoder = Arc::new(StubDecoder::new(results));
    let (pipeline, seen) = pipeline_with(decoder);
    pipeline.set_enabled(true);
    pipeline.set_frame_rate(1);

    pipeline.on_frame(&synthetic_frame(0, 16, 16), 0);

    let detected = detections(&seen);
    assert_eq!(detected.len(), 1);
    assert_eq!(detected[0].len(), 1);
    assert_eq!(detected[0][0].text, "first");
}

#[test]
fn decode_failure_is_swallowed() {
    let decoder = Arc::new(StubDecoder::failing());
    let (pipeline, seen) = pipeline_with(decoder.clone());
    pipeline.set_enabled(true);
    pipeline.set_frame_rate(1);

    // Must not panic or emit; the frame path keeps flowing
    for index in 0..3u64 {
        pipeline.on_frame(&synthetic_frame(index, 16, 16), index);
    }

    assert_eq!(decoder.calls(), 3);
    assert!(detections(&seen).is_empty());
}

#[test]
fn adapter_failure_is_swallowed() {
    let decoder = Arc::new(StubDecoder::empty());
    let (pipeline, seen) = pipeline_with(decoder.clone());
    pipeline.set_enabled(true);
    pipeline.set_frame_rate(1);

    // Frame with a truncated buffer fails luminance conversion
    let mut frame = synthetic_frame(0, 16, 16);
    frame.data.truncate(10);
    pipeline.on_frame(&frame, 0);

    assert_eq!(decoder.calls(), 0);
    assert!(detections(&seen).is_empty());
}

#[test]
fn options_take_effect_on_next_frame() {
    let decoder = Arc::new(StubDecoder::empty());
    let (pipeline, _seen) = pipeline_with(decoder.clone());
    pipeline.set_enabled(true);
    pipeline.set_frame_rate(1);

    pipeline.on_frame(&synthetic_frame(0, 16, 16), 0);
    assert_eq!(decoder.last_options().unwrap(), BarcodeDecodeOptions::default());

    let options = BarcodeDecodeOptions {
        try_harder: true,
        auto_rotate: true,
        possible_formats: vec![BarcodeFormat::QrCode],
        ..Default::default()
    };
    pipeline.set_options(options.clone());
    pipeline.on_frame(&synthetic_frame(1, 16, 16), 1);

    // The whole option set arrives together, never a partial mix
    assert_eq!(decoder.last_options().unwrap(), options);
}

#[test]
fn empty_character_set_passes_through_unchanged() {
    let decoder = Arc::new(StubDecoder::empty());
    let (pipeline, _seen) = pipeline_with(decoder.clone());
    pipeline.set_enabled(true);
    pipeline.set_frame_rate(1);

    pipeline.set_options(BarcodeDecodeOptions {
        try_harder: true,
        ..Default::default()
    });
    pipeline.on_frame(&synthetic_frame(0, 16, 16), 0);

    // Empty means "decoder default"; the pipeline must not substitute one
    assert_eq!(decoder.last_options().unwrap().character_set, "");
}

#[test]
fn frame_rate_below_one_is_clamped() {
    let decoder = Arc::new(StubDecoder::empty());
    let (pipeline, _seen) = pipeline_with(decoder);
    pipeline.set_frame_rate(0);
    assert_eq!(pipeline.frame_rate(), 1);
}
