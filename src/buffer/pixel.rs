//! RGBA pixel grid shared by depth maps, pattern tiles and composed stereograms
//!
//! Pixels live in a `(height, width, 4)` array so that each row is a
//! contiguous `(width, 4)` lane block. Composition hands those row blocks to
//! independent workers.

use crate::io::error::{Result, StereogramError, invalid_parameter};
use image::RgbaImage;
use ndarray::iter::AxisIterMut;
use ndarray::{Array3, Axis, Ix2, Slice};

/// Number of interleaved channels per pixel (R, G, B, A)
pub const CHANNELS: usize = 4;

/// Alpha value of a fully opaque pixel
pub const OPAQUE: u8 = 255;

/// Channel index of alpha within a pixel
const ALPHA: usize = 3;

/// Rectangular RGBA8 grid, row-major with stride equal to width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Create a buffer with every channel of every pixel set to zero
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: Array3::zeros((height, width, CHANNELS)),
        }
    }

    /// Create a buffer with every pixel set to `rgba`
    pub fn filled(width: usize, height: usize, rgba: [u8; CHANNELS]) -> Self {
        Self::from_fn(width, height, |_, _| rgba)
    }

    /// Create a buffer by evaluating `pixel(x, y)` at every cell
    pub fn from_fn<F>(width: usize, height: usize, mut pixel: F) -> Self
    where
        F: FnMut(usize, usize) -> [u8; CHANNELS],
    {
        let mut data = Array3::zeros((height, width, CHANNELS));
        for y in 0..height {
            for x in 0..width {
                let rgba = pixel(x, y);
                for (c, value) in rgba.iter().enumerate() {
                    if let Some(cell) = data.get_mut((y, x, c)) {
                        *cell = *value;
                    }
                }
            }
        }
        Self { data }
    }

    /// Copy a decoded image into a buffer of the same dimensions
    pub fn from_rgba_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let mut data = Array3::zeros((height as usize, width as usize, CHANNELS));

        for (x, y, pixel) in image.enumerate_pixels() {
            for (c, value) in pixel.0.iter().enumerate() {
                if let Some(cell) = data.get_mut((y as usize, x as usize, c)) {
                    *cell = *value;
                }
            }
        }

        Self { data }
    }

    /// Convert into an `image` buffer for resizing or encoding
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions do not fit the `image` crate's
    /// `u32` coordinate space
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let width = u32::try_from(self.width())
            .map_err(|err| invalid_parameter("width", &self.width(), &err))?;
        let height = u32::try_from(self.height())
            .map_err(|err| invalid_parameter("height", &self.height(), &err))?;

        // Logical iteration order of a (height, width, 4) array is row-major RGBA
        let raw: Vec<u8> = self.data.iter().copied().collect();

        RgbaImage::from_raw(width, height, raw).ok_or_else(|| {
            invalid_parameter(
                "buffer",
                &format!("{width}x{height}"),
                &"pixel data does not match dimensions",
            )
        })
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Read all four channels at `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; CHANNELS]> {
        Some([
            *self.data.get((y, x, 0))?,
            *self.data.get((y, x, 1))?,
            *self.data.get((y, x, 2))?,
            *self.data.get((y, x, ALPHA))?,
        ])
    }

    /// Read the colour channels at `(x, y)`, ignoring alpha
    pub fn rgb(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        Some([
            *self.data.get((y, x, 0))?,
            *self.data.get((y, x, 1))?,
            *self.data.get((y, x, 2))?,
        ])
    }

    /// Overwrite all four channels at `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if `(x, y)` lies outside the buffer
    pub fn put_pixel(&mut self, x: usize, y: usize, rgba: [u8; CHANNELS]) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(StereogramError::IndexOutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }

        for (c, value) in rgba.iter().enumerate() {
            if let Some(cell) = self.data.get_mut((y, x, c)) {
                *cell = *value;
            }
        }
        Ok(())
    }

    /// Draw `src` with its top-left corner at `(x0, y0)`, clipped to this buffer
    pub fn blit(&mut self, src: &Self, x0: usize, y0: usize) {
        let width = src.width().min(self.width().saturating_sub(x0));
        let height = src.height().min(self.height().saturating_sub(y0));
        if width == 0 || height == 0 {
            return;
        }

        let mut target = self.data.view_mut();
        target.slice_axis_inplace(Axis(0), Slice::from(y0..y0 + height));
        target.slice_axis_inplace(Axis(1), Slice::from(x0..x0 + width));

        let mut source = src.data.view();
        source.slice_axis_inplace(Axis(0), Slice::from(..height));
        source.slice_axis_inplace(Axis(1), Slice::from(..width));

        target.assign(&source);
    }

    /// Copy the top `band_height` rows down so they start at row `dst_y`
    ///
    /// The copy is clipped at the bottom edge and never reads rows at or below
    /// `dst_y`, so the source band is always the buffer's own current content.
    /// Returns the number of rows written.
    pub fn copy_band_down(&mut self, band_height: usize, dst_y: usize) -> usize {
        if dst_y >= self.height() {
            return 0;
        }
        let rows = band_height.min(dst_y).min(self.height() - dst_y);
        if rows == 0 {
            return 0;
        }

        let (band, mut below) = self.data.view_mut().split_at(Axis(0), dst_y);
        below
            .slice_axis_mut(Axis(0), Slice::from(..rows))
            .assign(&band.slice_axis(Axis(0), Slice::from(..rows)));
        rows
    }

    /// Force every pixel's alpha channel to fully opaque
    pub fn set_opaque(&mut self) {
        self.data.index_axis_mut(Axis(2), ALPHA).fill(OPAQUE);
    }

    /// Mutable `(width, 4)` view of each row, top to bottom
    pub fn rows_mut(&mut self) -> AxisIterMut<'_, u8, Ix2> {
        self.data.axis_iter_mut(Axis(0))
    }
}
