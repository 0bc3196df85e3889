//! Generation defaults and runtime configuration constants

// Stereo geometry
/// Horizontal period of the base pattern in pixels
pub const DEFAULT_SEPARATION: usize = 170;
/// Percentage of the separation removed at maximum depth
pub const DEFAULT_DEPTH_STRENGTH: i32 = 25;

// Strengths outside this range are accepted but rarely view well
/// Smallest depth strength expected to produce a usable image
pub const MIN_INTENDED_DEPTH_STRENGTH: i32 = 0;
/// Largest depth strength expected to produce a usable image
pub const MAX_INTENDED_DEPTH_STRENGTH: i32 = 100;

/// Fixed seed for reproducible noise tiles and template choice
pub const DEFAULT_SEED: u64 = 42;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_stereogram";
/// Extension of generated files
pub const OUTPUT_EXTENSION: &str = "png";
/// Extensions accepted as depth map and template images
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

// Logging
/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";
/// Filter used with `--verbose` when `RUST_LOG` is unset
pub const VERBOSE_LOG_FILTER: &str = "sirds=debug,info";
