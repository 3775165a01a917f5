use serde::Serialize;

use crate::error::CoreError;
use crate::rect::SampleRect;

/// The fixed pixel dimensions of a preview image, and the mapping from
/// output pixels to world-space sample cells.
///
/// The grid is centred on the world origin: pixel `(x, y)` maps to the
/// cell whose minimum corner is `((x + offset_x) * zoom, (y + offset_y)
/// * zoom)` with `offset = -(dimension / 2)`, covering `zoom × zoom`
/// world units. `(0, 0)` is the top-left pixel; rows are scanned in
/// row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviewGrid {
    pub width: u32,
    pub height: u32,
}

/// Helper for deserialization — re-validates the dimensions on load so
/// persisted grids can never bypass the size bounds.
impl<'de> serde::Deserialize<'de> for PreviewGrid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            width: u32,
            height: u32,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.width, raw.height).map_err(serde::de::Error::custom)
    }
}

impl PreviewGrid {
    /// Side length of the default square preview.
    pub const DEFAULT_SIZE: u32 = 128;

    /// Largest accepted side length. Together with
    /// [`PreviewSettings::MAX_ZOOM`](crate::PreviewSettings::MAX_ZOOM)
    /// this keeps every world coordinate produced by [`cell_rect`](Self::cell_rect)
    /// within `i32` range.
    pub const MAX_SIZE: u32 = 16_384;

    /// Create a grid with explicit dimensions.
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 || width > Self::MAX_SIZE || height > Self::MAX_SIZE {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// A square grid, as used by the standard preview image.
    pub fn square(side: u32) -> crate::Result<Self> {
        Self::new(side, side)
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Total byte length of an RGBA buffer for this grid.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * 4
    }

    /// Centring offset applied to pixel coordinates before scaling.
    #[inline]
    pub fn offset(&self) -> (i32, i32) {
        (-(self.width as i32) / 2, -(self.height as i32) / 2)
    }

    /// World-space cell covered by output pixel `(x, y)` at the given
    /// zoom scale.
    ///
    /// The mapping is computed in `i64`; for any grid within
    /// [`MAX_SIZE`](Self::MAX_SIZE) and zoom within
    /// [`PreviewSettings::MAX_ZOOM`](crate::PreviewSettings::MAX_ZOOM)
    /// the result fits `i32` exactly.
    #[inline]
    pub fn cell_rect(&self, x: u32, y: u32, zoom: u32) -> SampleRect {
        let (off_x, off_y) = self.offset();
        let min_x = (x as i64 + off_x as i64) * zoom as i64;
        let min_y = (y as i64 + off_y as i64) * zoom as i64;
        SampleRect::from_min_and_size(min_x as i32, min_y as i32, zoom, zoom)
    }
}

impl Default for PreviewGrid {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_square() {
        let g = PreviewGrid::default();
        assert_eq!(g.width, 128);
        assert_eq!(g.height, 128);
        assert_eq!(g.byte_len(), 128 * 128 * 4);
    }

    #[test]
    fn invalid_dimensions() {
        assert!(PreviewGrid::new(0, 128).is_err());
        assert!(PreviewGrid::new(128, 0).is_err());
        assert!(PreviewGrid::square(0).is_err());
        assert!(PreviewGrid::square(PreviewGrid::MAX_SIZE + 1).is_err());
        assert!(PreviewGrid::square(PreviewGrid::MAX_SIZE).is_ok());
    }

    #[test]
    fn deserialization_revalidates() {
        let ok: PreviewGrid = serde_json::from_str(r#"{"width":128,"height":64}"#).unwrap();
        assert_eq!((ok.width, ok.height), (128, 64));

        let zero: Result<PreviewGrid, _> = serde_json::from_str(r#"{"width":0,"height":0}"#);
        assert!(zero.is_err());

        let huge: Result<PreviewGrid, _> =
            serde_json::from_str(r#"{"width":16385,"height":128}"#);
        assert!(huge.is_err());
    }

    #[test]
    fn cell_rect_stays_in_range_at_the_bounds() {
        use crate::settings::PreviewSettings;

        let g = PreviewGrid::square(PreviewGrid::MAX_SIZE).unwrap();
        let zoom = PreviewSettings::MAX_ZOOM;

        // The extreme corners of the largest grid at the largest zoom.
        let far = g.cell_rect(PreviewGrid::MAX_SIZE - 1, PreviewGrid::MAX_SIZE - 1, zoom);
        let expected = (PreviewGrid::MAX_SIZE as i64 - 1 - 8192) * zoom as i64;
        assert_eq!(far.x as i64, expected);
        assert_eq!(far.y as i64, expected);

        let near = g.cell_rect(0, 0, zoom);
        assert_eq!(near.x as i64, -8192 * zoom as i64);
        assert_eq!(near.y as i64, -8192 * zoom as i64);
    }

    #[test]
    fn cell_rect_is_centred_and_scaled() {
        // 4×4 grid at zoom 2: pixel (x, y) maps to ((x-2)*2, (y-2)*2).
        let g = PreviewGrid::square(4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let r = g.cell_rect(x, y, 2);
                assert_eq!(r.x, (x as i32 - 2) * 2);
                assert_eq!(r.y, (y as i32 - 2) * 2);
                assert_eq!(r.width, 2);
                assert_eq!(r.height, 2);
            }
        }
    }

    #[test]
    fn cell_rect_zoom_one_is_identity_shift() {
        let g = PreviewGrid::square(128).unwrap();
        let r = g.cell_rect(0, 0, 1);
        assert_eq!((r.x, r.y), (-64, -64));
        let c = g.cell_rect(64, 64, 1);
        assert_eq!((c.x, c.y), (0, 0));
    }

    #[test]
    fn odd_dimension_offset_truncates_toward_zero() {
        let g = PreviewGrid::square(5).unwrap();
        assert_eq!(g.offset(), (-2, -2));
    }
}
