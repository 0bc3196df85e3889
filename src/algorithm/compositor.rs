//! Depth-driven horizontal linking that turns a tiled pattern into a stereogram
//!
//! Composition runs in two steps. The tile is first laid across the output
//! with period `separation`. Every row is then rewritten strictly left to
//! right: each column from `separation` onwards copies its colour from a
//! column `separation - shift` to its left, where `shift` grows with depth.
//! Reads see cells already rewritten earlier in the same row, which is what
//! chains correspondences along the row. Rows never touch each other and may
//! be linked in parallel.

use crate::buffer::depth::DepthMap;
use crate::buffer::pixel::PixelBuffer;
use crate::io::error::{Result, invalid_parameter};
use ndarray::ArrayViewMut2;
use ndarray::parallel::prelude::*;
use rayon::ThreadPool;

/// Number of leading channels copied by a link; alpha is left alone
const COLOR_CHANNELS: usize = 3;

/// Depth strength that applies the full depth-proportional shift
const FULL_STRENGTH: f64 = 100.0;

/// Depth-proportional reduction of the separation at normalised depth `depth`
///
/// Computed as `floor(depth * separation * (depth_strength / 100))`. Negative
/// strengths are accepted and give negative shifts.
pub fn link_shift(depth: f64, separation: usize, depth_strength: i32) -> i64 {
    (depth * separation as f64 * (f64::from(depth_strength) / FULL_STRENGTH)).floor() as i64
}

/// Lay `tile` across a `width × height` buffer at every multiple of its width
///
/// The last copy is clipped at the right edge when `width` is not a multiple
/// of the tile width.
pub fn tile_horizontally(tile: &PixelBuffer, width: usize, height: usize) -> PixelBuffer {
    let mut output = PixelBuffer::new(width, height);
    let period = tile.width();
    if period == 0 {
        return output;
    }

    for x0 in (0..width).step_by(period) {
        output.blit(tile, x0, 0);
    }
    output
}

/// Links a single row of the output in place
///
/// The traversal order is part of the contract: columns are processed in
/// ascending order and each read observes every write made to its left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCompositor {
    separation: usize,
    depth_strength: i32,
}

impl RowCompositor {
    /// Create a compositor for the given period and strength
    pub const fn new(separation: usize, depth_strength: i32) -> Self {
        Self {
            separation,
            depth_strength,
        }
    }

    /// Horizontal period of the base pattern
    pub const fn separation(&self) -> usize {
        self.separation
    }

    /// Depth strength as a percentage
    pub const fn depth_strength(&self) -> i32 {
        self.depth_strength
    }

    /// Link row `y`, given as a `(width, 4)` view, against depth row `y`
    ///
    /// Columns `0..separation` keep their tiled value. A column whose source
    /// position falls outside the row also keeps its tiled value. Returns the
    /// number of columns that were linked.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if the row is wider than the depth map or
    /// `y` is not a depth map row
    pub fn link_row(
        &self,
        depth: &DepthMap,
        y: usize,
        mut row: ArrayViewMut2<'_, u8>,
    ) -> Result<usize> {
        let width = row.dim().0;
        let mut linked = 0;

        for x in self.separation..width {
            let shift = link_shift(depth.sample(x, y)?, self.separation, self.depth_strength);
            let left = x as i64 - self.separation as i64 + shift;
            let Ok(left) = usize::try_from(left) else {
                continue;
            };
            if left >= width {
                continue;
            }

            for c in 0..COLOR_CHANNELS {
                if let Some(value) = row.get((left, c)).copied()
                    && let Some(cell) = row.get_mut((x, c))
                {
                    *cell = value;
                }
            }
            linked += 1;
        }

        Ok(linked)
    }
}

/// Compose a stereogram from a depth map and a `separation × height` tile
///
/// Rows are linked on `pool` when one is given and sequentially otherwise;
/// both produce identical buffers.
///
/// # Errors
///
/// Returns an error if:
/// - `separation` is zero
/// - The tile is not `separation` wide and as tall as the depth map
#[tracing::instrument(
    skip(depth, tile, pool),
    fields(width = depth.width(), height = depth.height(), parallel = pool.is_some())
)]
pub fn composite(
    depth: &DepthMap,
    separation: usize,
    depth_strength: i32,
    tile: &PixelBuffer,
    pool: Option<&ThreadPool>,
) -> Result<PixelBuffer> {
    if separation == 0 {
        return Err(invalid_parameter(
            "separation",
            &separation,
            &"must be positive",
        ));
    }
    if tile.width() != separation || tile.height() != depth.height() {
        return Err(invalid_parameter(
            "tile",
            &format!("{}x{}", tile.width(), tile.height()),
            &format!("expected {separation}x{}", depth.height()),
        ));
    }

    let mut output = tile_horizontally(tile, depth.width(), depth.height());
    let compositor = RowCompositor::new(separation, depth_strength);

    let linked = match pool {
        Some(pool) => pool.install(|| link_rows_parallel(compositor, depth, &mut output))?,
        None => link_rows_sequential(compositor, depth, &mut output)?,
    };

    tracing::debug!(linked, "linked stereogram rows");
    Ok(output)
}

fn link_rows_sequential(
    compositor: RowCompositor,
    depth: &DepthMap,
    output: &mut PixelBuffer,
) -> Result<usize> {
    let mut linked = 0;
    for (y, row) in output.rows_mut().enumerate() {
        linked += compositor.link_row(depth, y, row)?;
    }
    Ok(linked)
}

// Each task owns exactly one row view, so no cell is shared between tasks
fn link_rows_parallel(
    compositor: RowCompositor,
    depth: &DepthMap,
    output: &mut PixelBuffer,
) -> Result<usize> {
    let per_row = output
        .rows_mut()
        .into_par_iter()
        .enumerate()
        .map(|(y, row)| compositor.link_row(depth, y, row))
        .collect::<Result<Vec<usize>>>()?;
    Ok(per_row.iter().sum())
}
