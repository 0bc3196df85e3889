//! Generation parameters and the request-level stereogram pipeline

use crate::algorithm::compositor::composite;
use crate::algorithm::pattern::{PatternSource, generate_tile};
use crate::buffer::{DepthMap, PixelBuffer};
use crate::io::configuration::{
    DEFAULT_DEPTH_STRENGTH, DEFAULT_SEPARATION, MAX_INTENDED_DEPTH_STRENGTH,
    MIN_INTENDED_DEPTH_STRENGTH,
};
use crate::io::error::{Result, StereogramError, invalid_parameter};
use rayon::ThreadPool;

/// Stereo geometry for one generation, fixed for its whole duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    separation: usize,
    depth_strength: i32,
}

impl Parameters {
    /// Validate and bundle the stereo parameters
    ///
    /// Any depth strength is accepted, including negative values and values
    /// above 100; see [`Self::is_intended_strength`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `separation` is zero
    pub fn new(separation: usize, depth_strength: i32) -> Result<Self> {
        if separation == 0 {
            return Err(invalid_parameter(
                "separation",
                &separation,
                &"must be positive",
            ));
        }

        Ok(Self {
            separation,
            depth_strength,
        })
    }

    /// Horizontal period of the base pattern in pixels
    pub const fn separation(&self) -> usize {
        self.separation
    }

    /// Depth strength as an unscaled percentage
    pub const fn depth_strength(&self) -> i32 {
        self.depth_strength
    }

    /// Whether the depth strength lies in the 0..=100 range
    pub const fn is_intended_strength(&self) -> bool {
        self.depth_strength >= MIN_INTENDED_DEPTH_STRENGTH
            && self.depth_strength <= MAX_INTENDED_DEPTH_STRENGTH
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            separation: DEFAULT_SEPARATION,
            depth_strength: DEFAULT_DEPTH_STRENGTH,
        }
    }
}

/// Parameters plus the threading policy for row linking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Stereo geometry
    pub parameters: Parameters,
    /// Link rows on a worker pool instead of the calling thread
    pub parallel: bool,
    /// Worker count for the pool; `None` lets rayon decide
    pub threads: Option<usize>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            parameters: Parameters::default(),
            parallel: true,
            threads: None,
        }
    }
}

/// Turns depth maps and pattern sources into stereogram buffers
///
/// Each call to [`Self::generate`] owns its buffers; the generator only
/// holds configuration and the worker pool, so it can serve many requests.
pub struct StereogramGenerator {
    config: GenerationConfig,
    pool: Option<ThreadPool>,
}

impl StereogramGenerator {
    /// Create a generator, building a worker pool when `config.parallel` is set
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `config.threads` is `Some(0)`
    /// - The worker pool cannot be built
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let pool = if config.parallel {
            Some(build_thread_pool(config.threads)?)
        } else {
            None
        };

        Ok(Self { config, pool })
    }

    /// Active configuration
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Whether rows are linked on a worker pool
    pub const fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Generate a stereogram sized to `depth`
    ///
    /// # Errors
    ///
    /// Returns an error if the tile cannot be built (e.g. a degenerate
    /// template) or composition fails
    #[tracing::instrument(
        skip(self, depth, source),
        fields(width = depth.width(), height = depth.height())
    )]
    pub fn generate(&self, depth: &DepthMap, source: &PatternSource) -> Result<PixelBuffer> {
        let tile = self.tile(source, depth.height())?;
        self.composite(depth, &tile)
    }

    /// Build the `separation × height` pattern tile
    ///
    /// # Errors
    ///
    /// Returns `DegenerateTemplate` if a template cannot be scaled to the tile
    pub fn tile(&self, source: &PatternSource, height: usize) -> Result<PixelBuffer> {
        generate_tile(source, self.config.parameters.separation(), height)
    }

    /// Lay out `tile` and link it against `depth`
    ///
    /// # Errors
    ///
    /// Returns an error if the tile does not match the separation and depth height
    pub fn composite(&self, depth: &DepthMap, tile: &PixelBuffer) -> Result<PixelBuffer> {
        let parameters = self.config.parameters;
        composite(
            depth,
            parameters.separation(),
            parameters.depth_strength(),
            tile,
            self.pool.as_ref(),
        )
    }
}

/// Build a rayon pool, optionally with a fixed worker count
///
/// # Errors
///
/// Returns an error if `threads` is `Some(0)` or rayon fails to start the pool
pub fn build_thread_pool(threads: Option<usize>) -> Result<ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(invalid_parameter("threads", &n, &"must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| StereogramError::ThreadPool {
        reason: e.to_string(),
    })
}
