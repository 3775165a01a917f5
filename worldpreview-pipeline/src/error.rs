use thiserror::Error;

use worldpreview_core::{CoreError, SampleError};

/// Errors originating from the preview pipeline.
///
/// Cancellation is deliberately *not* an error here — it is an expected
/// outcome of supersession and travels through `TaskOutcome::Cancelled`.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The sampling collaborator failed mid-scan.
    #[error("sampling collaborator failed: {0}")]
    Sampling(#[from] SampleError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
