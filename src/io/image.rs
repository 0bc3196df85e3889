//! Image decoding into pixel buffers and PNG encoding of finished stereograms

use crate::buffer::{DepthMap, PixelBuffer};
use crate::io::error::{Result, StereogramError, not_found};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use std::io::Write;
use std::path::Path;

/// Decode any supported image file into an RGBA pixel buffer
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist (`NotFound`)
/// - The file cannot be read or is not a supported image format
pub fn load_pixel_buffer(path: &Path, kind: &'static str) -> Result<PixelBuffer> {
    if !path.is_file() {
        return Err(not_found(kind, &path.display()));
    }

    let img = image::open(path).map_err(|e| StereogramError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(PixelBuffer::from_rgba_image(&img.to_rgba8()))
}

/// Decode a depth image; only its red channel is used for depth
///
/// # Errors
///
/// Returns an error if the file is missing or cannot be decoded
pub fn load_depth_map(path: &Path) -> Result<DepthMap> {
    load_pixel_buffer(path, "depth map").map(DepthMap::from_buffer)
}

/// Decode a template image
///
/// # Errors
///
/// Returns an error if the file is missing or cannot be decoded
pub fn load_template(path: &Path) -> Result<PixelBuffer> {
    load_pixel_buffer(path, "template")
}

/// Encode `buffer` as an RGBA PNG stream into `writer`
///
/// # Errors
///
/// Returns an error if the buffer is too large for the encoder or writing fails
pub fn encode_png<W: Write>(buffer: &PixelBuffer, writer: W) -> Result<()> {
    let image = buffer.to_rgba_image()?;
    PngEncoder::new(writer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| StereogramError::Encode { source: e })
}

/// Encode `buffer` as PNG bytes held in memory
///
/// # Errors
///
/// Returns an error if encoding fails
pub fn encode_png_bytes(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    encode_png(buffer, &mut bytes)?;
    Ok(bytes)
}

/// Save `buffer` as a PNG file, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_png(buffer: &PixelBuffer, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| StereogramError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    buffer
        .to_rgba_image()?
        .save_with_format(output_path, ImageFormat::Png)
        .map_err(|e| StereogramError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
