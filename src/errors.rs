use thiserror::Error;

/// Error taxonomy for camera control operations.
///
/// Lifecycle and snapshot operations surface `AccessError`/`IoError` to the
/// caller as result values. `DecodeError` never crosses the frame-processing
/// boundary; the detection pipeline absorbs it as "zero results".
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("Camera access error: {0}")]
    AccessError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
    #[error("Camera control error: {0}")]
    ControlError(String),
    #[error("Camera initialization error: {0}")]
    InitializationError(String),
}
