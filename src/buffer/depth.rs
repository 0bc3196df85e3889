//! Read-only depth maps and the sampler that turns a pixel into a depth value
//!
//! Only the red channel carries depth. Grayscale sources decode with equal
//! channels, and colour sources are accepted with green and blue ignored.

use crate::buffer::pixel::{OPAQUE, PixelBuffer};
use crate::io::error::{Result, StereogramError};
use image::RgbaImage;

/// Largest raw channel value, mapping to the nearest depth of 1.0
const MAX_CHANNEL: f64 = 255.0;

/// Depth source for one generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthMap {
    buffer: PixelBuffer,
}

impl DepthMap {
    /// Interpret an existing pixel buffer as a depth map
    pub const fn from_buffer(buffer: PixelBuffer) -> Self {
        Self { buffer }
    }

    /// Interpret a decoded image as a depth map
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        Self::from_buffer(PixelBuffer::from_rgba_image(image))
    }

    /// Depth map with the same raw red value everywhere
    pub fn filled(width: usize, height: usize, red: u8) -> Self {
        Self::from_buffer(PixelBuffer::filled(width, height, [red, red, red, OPAQUE]))
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    /// Underlying pixel data
    pub const fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Normalised depth at `(x, y)`, the red channel divided by 255
    ///
    /// No interpolation or clamping is applied; the result lies in `[0, 1]`
    /// because the channel is eight bits wide.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if `(x, y)` lies outside the map
    pub fn sample(&self, x: usize, y: usize) -> Result<f64> {
        self.buffer
            .pixel(x, y)
            .map(|[red, ..]| f64::from(red) / MAX_CHANNEL)
            .ok_or_else(|| StereogramError::IndexOutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
    }
}
