//! Difference ("changes") map between two grids.

use tracing::trace;

use crate::grid::{clip, to_continuous, PixelGrid, CHANNELS};

/// Visualize where two grids differ.
///
/// Per channel: `out = 255 · (1 - |a - b|)` on continuous values, so equal
/// pixels come out white and fully inverted pixels come out black.
///
/// # Panics
/// If the grids have different dimensions.
pub fn difference_map(a: &PixelGrid, b: &PixelGrid) -> PixelGrid {
    a.assert_same_dimensions(b, "difference_map");

    let (width, height) = a.dimensions();
    trace!(width, height, "difference_map");

    PixelGrid::from_rows(width, height, |y, row| {
        for x in 0..width {
            for c in 0..CHANNELS {
                let av = to_continuous(a.value(x, y, c));
                let bv = to_continuous(b.value(x, y, c));
                row[x * CHANNELS + c] = clip((1.0 - (av - bv).abs()) * 255.0);
            }
        }
    })
}
