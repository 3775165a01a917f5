/// A world-space cell rectangle handed to the sampling collaborator.
///
/// `(x, y)` is the inclusive minimum corner; the rectangle covers
/// `[x, x + width) × [y, y + height)` in world units. Coordinates are
/// signed because the preview grid is centred on the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl SampleRect {
    pub const fn from_min_and_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive maximum x, widened to avoid overflow near `i32` bounds.
    #[inline]
    pub fn max_x(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive maximum y, widened to avoid overflow near `i32` bounds.
    #[inline]
    pub fn max_y(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn contains(&self, px: i64, py: i64) -> bool {
        px >= self.x as i64 && px < self.max_x() && py >= self.y as i64 && py < self.max_y()
    }
}
