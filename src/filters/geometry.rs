//! Mirroring.
//!
//! Both operations reflect the grid in place by swapping symmetric rows or
//! columns. With an odd dimension the center row/column stays where it is.

use tracing::trace;

use crate::grid::PixelGrid;

/// Mirror top-bottom: row `y` swaps with row `height - 1 - y`.
pub fn vertical_mirror(grid: &mut PixelGrid) {
    let height = grid.height();
    trace!(height, "vertical_mirror");

    for y in 0..height / 2 {
        grid.row_swap(y, height - 1 - y);
    }
}

/// Mirror left-right: column `x` swaps with column `width - 1 - x`.
pub fn horizontal_mirror(grid: &mut PixelGrid) {
    let width = grid.width();
    trace!(width, "horizontal_mirror");

    for x in 0..width / 2 {
        grid.column_swap(x, width - 1 - x);
    }
}
