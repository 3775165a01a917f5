/// An RGBA pixel buffer produced by one preview task.
///
/// Exclusively owned by the generating task until it is handed off in a
/// `TaskOutcome::Success`; never mutated after handoff. A cancelled
/// task's buffer is dropped inside the worker and never observed.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new buffer filled with black (opaque).
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Copy one row of RGBA data into place.
    pub fn blit_row(&mut self, y: u32, row: &[u8]) {
        debug_assert_eq!(row.len(), self.width as usize * 4);
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        self.pixels[start..start + stride].copy_from_slice(row);
    }

    /// The RGBA bytes of the pixel at `(x, y)`.
    pub fn pixel_at(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}
