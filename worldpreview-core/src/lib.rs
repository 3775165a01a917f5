pub mod color;
pub mod error;
pub mod grid;
pub mod rect;
pub mod sampler;
pub mod settings;

// Re-export primary types for convenience.
pub use color::Color;
pub use error::{CoreError, SampleError};
pub use grid::PreviewGrid;
pub use rect::SampleRect;
pub use sampler::LayerSampler;
pub use settings::PreviewSettings;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
