/// Tiled base pattern and depth-weighted row linking
pub mod compositor;
/// Request-level pipeline from depth map and pattern source to output buffer
pub mod generator;
/// Pattern tile construction from templates or noise
pub mod pattern;
