use crate::color::Color;
use crate::error::SampleError;
use crate::rect::SampleRect;

/// Contract implemented by the world-generator collaborator.
///
/// The pipeline treats the sampler as an opaque, pure function from
/// `(layer, area)` to a color. Calls may be arbitrarily slow and are
/// issued from a worker thread, so implementations used with the task
/// coordinator must be `Send + Sync` (the bounds live at that seam, not
/// here, so simple single-threaded stubs stay cheap to write).
pub trait LayerSampler {
    /// Ordered list of layer names this sampler can render. May be
    /// empty; used only to populate selectable options.
    fn layers(&self) -> Vec<String>;

    /// Seed side channel, applied before any sampling for a task.
    ///
    /// Takes `&self` because it is called on a shared sampler from the
    /// worker thread; implementations that hold seed state use interior
    /// mutability.
    fn set_seed(&self, seed: &str);

    /// The color covering the world-space cell `area` on `layer`.
    fn sample(&self, layer: &str, area: SampleRect) -> std::result::Result<Color, SampleError>;
}
