use thiserror::Error;

/// Errors originating from the preview core types.
///
/// All of these are configuration errors: they are detected before any
/// task is submitted, so a host that hits one simply never starts the
/// preview feature.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid zoom scale: {0} (must be 1..=65536)")]
    InvalidZoom(u32),

    #[error("layer name must not be empty")]
    EmptyLayerName,

    #[error("invalid preview dimensions: {width}×{height} (sides must be 1..=16384)")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Failure reported by the sampling collaborator.
///
/// The collaborator is opaque to the pipeline, so its failures carry only
/// a message. A `SampleError` aborts the scan that triggered it and is
/// surfaced as a task failure, never as a cancellation.
#[derive(Debug, Clone, Error)]
#[error("sampling failed: {message}")]
pub struct SampleError {
    message: String,
}

impl SampleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
