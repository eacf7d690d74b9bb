//! Unsharp masking.
//!
//! Combines a sharp grid with a blurred version of itself; the blur is
//! whatever spatial filter ran before, so this module does no convolution
//! of its own.

use tracing::{debug, trace};

use crate::grid::{clip, to_continuous, PixelGrid, CHANNELS};

/// Apply unsharp mask.
///
/// Per channel, with `c` and `b` the continuous sharp and blurred values:
/// `out = 255 · (c + power · (c - b))`.
///
/// # Arguments
/// * `sharp` - Grid before blurring
/// * `blurred` - Blurred version of `sharp`, same dimensions
/// * `power` - Sharpening strength
///
/// # Returns
/// Sharpened grid, or an unchanged copy of `sharp` when `power <= 0`
///
/// # Panics
/// If the grids have different dimensions.
pub fn unsharp_mask(sharp: &PixelGrid, blurred: &PixelGrid, power: f64) -> PixelGrid {
    if power <= 0.0 || power.is_nan() {
        debug!(power, "unsharp mask skipped: power <= 0");
        return sharp.clone();
    }
    sharp.assert_same_dimensions(blurred, "unsharp_mask");

    let (width, height) = sharp.dimensions();
    trace!(width, height, power, "unsharp_mask");

    PixelGrid::from_rows(width, height, |y, row| {
        for x in 0..width {
            for c in 0..CHANNELS {
                let s = to_continuous(sharp.value(x, y, c));
                let b = to_continuous(blurred.value(x, y, c));
                row[x * CHANNELS + c] = clip((s + power * (s - b)) * 255.0);
            }
        }
    })
}
