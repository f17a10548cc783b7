//! In-memory framebuffer for the LED matrix.

use core::convert::TryFrom;

use crate::{BUFFER_SIZE, HEIGHT, PIXEL_BYTES, ROW_BYTES, Rgb, WIDTH};

/// RGB888 framebuffer for the panel.
///
/// Pixels are stored row-major, three bytes per pixel in R, G, B order.
#[derive(Clone)]
pub struct FrameBuffer {
    bytes: [u8; BUFFER_SIZE],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Creates a new all-black framebuffer.
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; BUFFER_SIZE],
        }
    }

    pub const fn width(&self) -> usize {
        WIDTH
    }

    pub const fn height(&self) -> usize {
        HEIGHT
    }

    /// Returns the underlying framebuffer bytes.
    pub fn bytes(&self) -> &[u8; BUFFER_SIZE] {
        &self.bytes
    }

    /// Returns mutable framebuffer bytes.
    pub fn bytes_mut(&mut self) -> &mut [u8; BUFFER_SIZE] {
        &mut self.bytes
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Paints every pixel with `color`.
    pub fn fill(&mut self, color: Rgb) {
        for px in self.bytes.chunks_exact_mut(PIXEL_BYTES) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
        }
    }

    /// Sets a pixel color.
    ///
    /// Returns `true` when pixel is in bounds, `false` otherwise.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) -> bool {
        let Some(offset) = Self::offset(x, y) else {
            return false;
        };

        self.bytes[offset] = color.r;
        self.bytes[offset + 1] = color.g;
        self.bytes[offset + 2] = color.b;
        true
    }

    /// Reads a pixel color.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        let offset = Self::offset(x, y)?;
        Some(Rgb::new(
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
        ))
    }

    /// Returns the payload of row `y` (0-based).
    pub fn row(&self, y: usize) -> Option<&[u8; ROW_BYTES]> {
        if y >= HEIGHT {
            return None;
        }

        let start = y * ROW_BYTES;
        <&[u8; ROW_BYTES]>::try_from(&self.bytes[start..start + ROW_BYTES]).ok()
    }

    /// Count of pixels that are not black.
    pub fn lit_pixels(&self) -> usize {
        self.bytes
            .chunks_exact(PIXEL_BYTES)
            .filter(|px| px.iter().any(|channel| *channel != 0))
            .count()
    }

    #[inline]
    fn offset(x: usize, y: usize) -> Option<usize> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        Some(y * ROW_BYTES + x * PIXEL_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_bytes_are_row_major_rgb() {
        let mut fb = FrameBuffer::new();

        assert!(fb.set_pixel(1, 0, Rgb::new(1, 2, 3)));
        assert!(fb.set_pixel(0, 1, Rgb::new(4, 5, 6)));

        let row0 = fb.row(0).unwrap();
        assert_eq!(&row0[3..6], &[1, 2, 3]);
        let row1 = fb.row(1).unwrap();
        assert_eq!(&row1[0..3], &[4, 5, 6]);
    }

    #[test]
    fn out_of_bounds_pixel_is_ignored() {
        let mut fb = FrameBuffer::new();

        assert!(!fb.set_pixel(WIDTH, 0, Rgb::WHITE));
        assert!(!fb.set_pixel(0, HEIGHT, Rgb::WHITE));
        assert_eq!(fb.lit_pixels(), 0);
        assert!(fb.row(HEIGHT).is_none());
    }

    #[test]
    fn set_and_read_last_pixel() {
        let mut fb = FrameBuffer::new();

        assert!(fb.set_pixel(WIDTH - 1, HEIGHT - 1, Rgb::RED));
        assert_eq!(fb.pixel(WIDTH - 1, HEIGHT - 1), Some(Rgb::RED));
        assert_eq!(fb.pixel(WIDTH, HEIGHT), None);
    }

    #[test]
    fn fill_then_clear() {
        let mut fb = FrameBuffer::new();

        fb.fill(Rgb::YELLOW);
        assert_eq!(fb.lit_pixels(), WIDTH * HEIGHT);
        assert_eq!(fb.pixel(10, 10), Some(Rgb::YELLOW));

        fb.clear();
        assert_eq!(fb.lit_pixels(), 0);
    }
}
