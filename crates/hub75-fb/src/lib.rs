#![cfg_attr(not(test), no_std)]

//! Framebuffer primitives for a 64x32 RGB LED matrix (HUB75 panel).

mod color;
mod framebuffer;

#[cfg(feature = "embedded-graphics")]
mod graphics;

pub use color::Rgb;
pub use framebuffer::FrameBuffer;

/// Panel width in pixels.
pub const WIDTH: usize = 64;
/// Panel height in pixels.
pub const HEIGHT: usize = 32;
/// Bytes per pixel (R, G, B).
pub const PIXEL_BYTES: usize = 3;
/// Number of bytes in one panel row.
pub const ROW_BYTES: usize = WIDTH * PIXEL_BYTES;
/// Total framebuffer size in bytes.
pub const BUFFER_SIZE: usize = ROW_BYTES * HEIGHT;
