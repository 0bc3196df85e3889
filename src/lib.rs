//! Single-image random-dot stereogram generation
//!
//! A depth map and a repeating texture tile are combined into one flat image
//! that shows an illusory depth surface when viewed with crossed or parallel
//! eyes. The tile is laid across the output with a fixed horizontal period and
//! each row is then relinked from left to right, shortening the period where
//! the depth map is bright.

#![forbid(unsafe_code)]

/// Tile generation, row linking and the generation pipeline
pub mod algorithm;
/// Pixel buffers and depth maps
pub mod buffer;
/// Input/output operations, configuration and error handling
pub mod io;

pub use algorithm::generator::{GenerationConfig, Parameters, StereogramGenerator};
pub use algorithm::pattern::PatternSource;
pub use buffer::{DepthMap, PixelBuffer};
pub use io::error::{Result, StereogramError};
