//! Tile generation from a template image or independent random noise
//!
//! The tile is the repeating unit of the stereogram: exactly `separation`
//! pixels wide and as tall as the depth map. A template is scaled to the tile
//! width and then repeated downwards by copying the tile's own top band, so
//! each repeat replicates what is already drawn rather than resampling the
//! source image again.

use crate::buffer::pixel::{OPAQUE, PixelBuffer};
use crate::io::error::{Result, StereogramError, invalid_parameter};
use image::imageops::{self, FilterType};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Origin of the repeating pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSource {
    /// User-supplied image, scaled to the tile width and tiled vertically
    Template(PixelBuffer),
    /// Classic random-dot texture with an independent gray level per pixel
    Noise {
        /// Seed for the noise generator; equal seeds give equal tiles
        seed: u64,
    },
}

/// Build a `tile_width × tile_height` tile from the given source
///
/// # Errors
///
/// Returns an error if:
/// - `tile_width` is zero
/// - The template cannot be scaled to a non-empty band (`DegenerateTemplate`)
pub fn generate_tile(
    source: &PatternSource,
    tile_width: usize,
    tile_height: usize,
) -> Result<PixelBuffer> {
    if tile_width == 0 {
        return Err(invalid_parameter(
            "tile_width",
            &tile_width,
            &"must be positive",
        ));
    }

    match source {
        PatternSource::Template(template) => template_tile(template, tile_width, tile_height),
        PatternSource::Noise { seed } => Ok(noise_tile(*seed, tile_width, tile_height)),
    }
}

/// Height of the template once scaled to `tile_width`, preserving aspect ratio
///
/// Any positive height is drawn at least one row tall.
///
/// # Errors
///
/// Returns `DegenerateTemplate` for zero-sized templates or a zero tile width
pub fn scaled_height(template: &PixelBuffer, tile_width: usize) -> Result<usize> {
    let (width, height) = (template.width(), template.height());
    if width == 0 || height == 0 {
        return Err(StereogramError::DegenerateTemplate { width, height });
    }

    let aspect_ratio = width as f64 / height as f64;
    let scaled = tile_width as f64 / aspect_ratio;
    if scaled <= 0.0 {
        return Err(StereogramError::DegenerateTemplate { width, height });
    }

    Ok(scaled.round().max(1.0) as usize)
}

/// Scale `template` to the tile width and fill the tile by repeating it downwards
///
/// # Errors
///
/// Returns `DegenerateTemplate` if the template has no usable height at this width
pub fn template_tile(
    template: &PixelBuffer,
    tile_width: usize,
    tile_height: usize,
) -> Result<PixelBuffer> {
    let band_height = scaled_height(template, tile_width)?;
    let band = resize(template, tile_width, band_height)?;

    let mut tile = PixelBuffer::new(tile_width, tile_height);
    tile.blit(&band, 0, 0);

    let mut repeats = 1;
    let mut y = band_height;
    while y < tile_height {
        tile.copy_band_down(band_height, y);
        y += band_height;
        repeats += 1;
    }

    // Output pixels must be opaque even when the template is not
    tile.set_opaque();

    tracing::debug!(
        template_width = template.width(),
        template_height = template.height(),
        band_height,
        repeats,
        "built template tile"
    );
    Ok(tile)
}

/// Fill a tile with independent uniform gray levels
pub fn noise_tile(seed: u64, tile_width: usize, tile_height: usize) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    PixelBuffer::from_fn(tile_width, tile_height, |_, _| {
        let value: u8 = rng.random();
        [value, value, value, OPAQUE]
    })
}

fn resize(template: &PixelBuffer, width: usize, height: usize) -> Result<PixelBuffer> {
    let target_width =
        u32::try_from(width).map_err(|err| invalid_parameter("tile_width", &width, &err))?;
    let target_height =
        u32::try_from(height).map_err(|err| invalid_parameter("scaled_height", &height, &err))?;

    let source = template.to_rgba_image()?;
    let scaled = imageops::resize(&source, target_width, target_height, FilterType::Triangle);
    Ok(PixelBuffer::from_rgba_image(&scaled))
}
