pub mod buffer;
pub mod cancel;
pub mod coordinator;
pub mod error;
pub mod generator;
pub mod session;

pub use buffer::PixelBuffer;
pub use cancel::TaskCancel;
pub use coordinator::{TaskCoordinator, TaskHandle, TaskOutcome};
pub use error::PipelineError;
pub use generator::{generate, Generated};
pub use session::{DebouncePolicy, PreviewSession, PreviewUpdate, SubmitTrigger, TickAction};

/// Convenience result type for the pipeline crate.
pub type Result<T> = std::result::Result<T, PipelineError>;
