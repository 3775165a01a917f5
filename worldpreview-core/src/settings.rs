use serde::Serialize;

use crate::error::CoreError;

/// The user-controlled inputs that fully determine a preview's output.
///
/// A value type with structural equality: the control loop rebuilds one
/// from live inputs each tick and compares it against the last observed
/// value to decide whether new work is needed. Immutable once
/// constructed; a change produces a fresh value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PreviewSettings {
    pub layer: String,
    pub zoom: u32,
    pub seed: String,
}

/// Helper for deserialization — re-validates the fields on load so
/// persisted settings can never smuggle in an invalid zoom or layer.
impl<'de> serde::Deserialize<'de> for PreviewSettings {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            layer: String,
            zoom: u32,
            seed: String,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.layer, raw.zoom, raw.seed).map_err(serde::de::Error::custom)
    }
}

impl PreviewSettings {
    pub const DEFAULT_ZOOM: u32 = 10;

    /// Largest accepted zoom scale. Together with
    /// [`PreviewGrid::MAX_SIZE`](crate::PreviewGrid::MAX_SIZE) this keeps
    /// every world coordinate of the pixel→world mapping within `i32`
    /// range.
    pub const MAX_ZOOM: u32 = 65_536;

    pub fn new(
        layer: impl Into<String>,
        zoom: u32,
        seed: impl Into<String>,
    ) -> crate::Result<Self> {
        let layer = layer.into();
        if layer.is_empty() {
            return Err(CoreError::EmptyLayerName);
        }
        if zoom == 0 || zoom > Self::MAX_ZOOM {
            return Err(CoreError::InvalidZoom(zoom));
        }
        Ok(Self {
            layer,
            zoom,
            seed: seed.into(),
        })
    }

    /// Return a copy with a different layer selection.
    pub fn with_layer(self, layer: impl Into<String>) -> crate::Result<Self> {
        Self::new(layer, self.zoom, self.seed)
    }

    /// Return a copy with a different zoom scale.
    pub fn with_zoom(self, zoom: u32) -> crate::Result<Self> {
        Self::new(self.layer, zoom, self.seed)
    }

    /// Return a copy with a different seed.
    pub fn with_seed(self, seed: impl Into<String>) -> crate::Result<Self> {
        Self::new(self.layer, self.zoom, seed)
    }
}
