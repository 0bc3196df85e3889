//! Pixel storage for depth maps, pattern tiles and composed output

/// Depth map wrapper and per-pixel depth sampling
pub mod depth;
/// RGBA pixel grid with clipped copy operations
pub mod pixel;

pub use depth::DepthMap;
pub use pixel::PixelBuffer;
