//! Noise reduction filters: Median and σ-filter.
//!
//! Neither filter is separable, so each output pixel gathers its full 2D
//! window from the read-only source grid. Rows are computed in parallel
//! into a separate destination grid.

use tracing::{debug, trace};

use super::core::max_useful_radius;
use crate::grid::{clip, PixelGrid, CHANNELS};

// ============================================================================
// Median
// ============================================================================

/// Apply median filter.
///
/// Each channel takes the median of the in-bounds neighbors in a
/// `kernel_size × kernel_size` window (radius `kernel_size / 2`). With an
/// even neighbor count the lower-middle element wins (index `n / 2` of the
/// sorted values).
///
/// # Arguments
/// * `input` - Source grid
/// * `kernel_size` - Window extent
///
/// # Returns
/// Median-filtered grid, or an unchanged copy when `kernel_size <= 1`
pub fn median_filter(input: &PixelGrid, kernel_size: usize) -> PixelGrid {
    if kernel_size <= 1 {
        debug!(kernel_size, "median filter skipped: kernel_size <= 1");
        return input.clone();
    }

    let (width, height) = input.dimensions();
    let radius = (kernel_size / 2).min(max_useful_radius(input));
    let window_size = (2 * radius + 1).pow(2).min(width * height);
    let radius = radius as isize;

    trace!(width, height, kernel_size, "median_filter");

    PixelGrid::from_rows(width, height, |y, row| {
        let mut windows: [Vec<u8>; CHANNELS] =
            std::array::from_fn(|_| Vec::with_capacity(window_size));

        for x in 0..width {
            for window in windows.iter_mut() {
                window.clear();
            }

            for dy in -radius..=radius {
                let sy = y as isize + dy;
                if sy < 0 || sy >= height as isize {
                    continue;
                }
                for dx in -radius..=radius {
                    let sx = x as isize + dx;
                    if sx < 0 || sx >= width as isize {
                        continue;
                    }
                    let px = input.pixel(sx as usize, sy as usize);
                    for (window, &v) in windows.iter_mut().zip(px.iter()) {
                        window.push(v);
                    }
                }
            }

            for (c, window) in windows.iter_mut().enumerate() {
                row[x * CHANNELS + c] = median(window);
            }
        }
    })
}

/// Order statistic at index `len / 2`. Reorders `values`.
fn median(values: &mut [u8]) -> u8 {
    if values.is_empty() {
        return 0;
    }
    let middle = values.len() / 2;
    *values.select_nth_unstable(middle).1
}

// ============================================================================
// σ-filter
// ============================================================================

/// Apply σ-filter (edge-preserving smoothing).
///
/// Each pixel becomes the average of the neighbors in a window of radius
/// `(size - 1) / 2` whose absolute difference from the center is at most
/// `k · sigma` on every channel at once. Dissimilar neighbors are left out,
/// so edges survive. A pixel with no qualifying neighbor keeps its value.
///
/// # Arguments
/// * `input` - Source grid
/// * `size` - Window extent
/// * `sigma` - Noise spread estimate
/// * `k` - Tolerance multiplier
///
/// # Returns
/// Filtered grid, or an unchanged copy when `size <= 1`
pub fn sigma_filter(input: &PixelGrid, size: usize, sigma: f64, k: f64) -> PixelGrid {
    if size <= 1 {
        debug!(size, "sigma filter skipped: size <= 1");
        return input.clone();
    }

    let (width, height) = input.dimensions();
    let radius = ((size - 1) / 2).min(max_useful_radius(input)) as isize;
    let tolerance = k * sigma;

    trace!(width, height, size, sigma, k, "sigma_filter");

    PixelGrid::from_rows(width, height, |y, row| {
        for x in 0..width {
            let center = input.pixel(x, y);
            let mut sum = [0.0f64; CHANNELS];
            let mut count = 0usize;

            for dy in -radius..=radius {
                let sy = y as isize + dy;
                if sy < 0 || sy >= height as isize {
                    continue;
                }
                for dx in -radius..=radius {
                    let sx = x as isize + dx;
                    if sx < 0 || sx >= width as isize {
                        continue;
                    }

                    let neighbor = input.pixel(sx as usize, sy as usize);
                    let similar = neighbor
                        .iter()
                        .zip(center.iter())
                        .all(|(&n, &c)| (n as f64 - c as f64).abs() <= tolerance);

                    if similar {
                        for (acc, &v) in sum.iter_mut().zip(neighbor.iter()) {
                            *acc += v as f64;
                        }
                        count += 1;
                    }
                }
            }

            for c in 0..CHANNELS {
                row[x * CHANNELS + c] = if count > 0 {
                    clip(sum[c] / count as f64)
                } else {
                    center[c]
                };
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Median Tests
    // ========================================================================

    #[test]
    fn test_median_flat_image_unchanged() {
        let grid = PixelGrid::filled(5, 5, [77, 0, 255]);
        assert_eq!(median_filter(&grid, 3), grid);
    }

    #[test]
    fn test_median_small_kernel_is_noop() {
        let mut grid = PixelGrid::filled(3, 3, [128, 128, 128]);
        grid.set_pixel(1, 1, [255, 0, 255]);
        assert_eq!(median_filter(&grid, 1), grid);
        assert_eq!(median_filter(&grid, 0), grid);
    }

    #[test]
    fn test_median_removes_salt_pepper() {
        let mut grid = PixelGrid::filled(5, 5, [128, 128, 128]);
        grid.set_pixel(2, 2, [255, 0, 255]);

        let result = median_filter(&grid, 3);

        assert_eq!(result.pixel(2, 2), [128, 128, 128]);
    }

    #[test]
    fn test_median_channels_independent() {
        let pixels = [
            [10, 90, 1],
            [20, 80, 2],
            [30, 70, 3],
            [40, 60, 4],
        ];
        let grid = PixelGrid::from_pixels(2, 2, &pixels).unwrap();

        let result = median_filter(&grid, 3);

        // All four pixels in every window; index 2 of the sorted values
        assert_eq!(result.pixel(0, 0), [30, 80, 3]);
    }

    #[test]
    fn test_median_preserves_edge() {
        let pixels: Vec<[u8; 3]> = (0..25)
            .map(|i| if i % 5 < 2 { [0, 0, 0] } else { [255, 255, 255] })
            .collect();
        let grid = PixelGrid::from_pixels(5, 5, &pixels).unwrap();

        let result = median_filter(&grid, 3);

        assert_eq!(result.pixel(0, 2), [0, 0, 0]);
        assert_eq!(result.pixel(4, 2), [255, 255, 255]);
    }

    // ========================================================================
    // σ-filter Tests
    // ========================================================================

    #[test]
    fn test_sigma_filter_smooths_similar_noise() {
        let mut grid = PixelGrid::filled(3, 3, [100, 100, 100]);
        grid.set_pixel(1, 1, [109, 100, 100]);

        let result = sigma_filter(&grid, 3, 5.0, 2.0);

        // All 9 neighbors within 10: (8 * 100 + 109) / 9 = 101
        assert_eq!(result.pixel(1, 1), [101, 100, 100]);
    }

    #[test]
    fn test_sigma_filter_excludes_dissimilar_neighbors() {
        let pixels: Vec<[u8; 3]> = (0..9)
            .map(|i| if i % 3 == 0 { [0, 0, 0] } else { [200, 200, 200] })
            .collect();
        let grid = PixelGrid::from_pixels(3, 3, &pixels).unwrap();

        let result = sigma_filter(&grid, 3, 10.0, 1.0);

        // The dark column never mixes with the bright ones
        assert_eq!(result, grid);
    }

    #[test]
    fn test_sigma_filter_requires_every_channel() {
        let mut grid = PixelGrid::filled(3, 1, [100, 100, 100]);
        // Red is similar, blue is not: the pixel must be excluded entirely
        grid.set_pixel(0, 0, [102, 100, 200]);

        let result = sigma_filter(&grid, 3, 5.0, 1.0);

        assert_eq!(result.pixel(1, 0), [100, 100, 100]);
    }

    #[test]
    fn test_sigma_filter_zero_tolerance_keeps_center() {
        let mut grid = PixelGrid::filled(3, 3, [10, 20, 30]);
        grid.set_pixel(1, 1, [40, 50, 60]);

        let result = sigma_filter(&grid, 3, 0.0, 2.0);

        // Only the center itself qualifies
        assert_eq!(result.pixel(1, 1), [40, 50, 60]);
    }

    #[test]
    fn test_sigma_filter_negative_tolerance_keeps_every_pixel() {
        let pixels: Vec<[u8; 3]> = (0..12u8).map(|i| [i * 20, 255 - i * 7, i]).collect();
        let grid = PixelGrid::from_pixels(4, 3, &pixels).unwrap();

        // k * sigma < 0: not even the center qualifies
        assert_eq!(sigma_filter(&grid, 3, -1.0, 2.0), grid);
        assert_eq!(sigma_filter(&grid, 5, 1.0, -0.5), grid);
    }

    #[test]
    fn test_oversized_windows_match_full_window() {
        let pixels: Vec<[u8; 3]> = (0..6u8).map(|i| [i * 40, 200 - i * 30, 7 * i]).collect();
        let grid = PixelGrid::from_pixels(3, 2, &pixels).unwrap();

        let median = median_filter(&grid, 2_000_001);
        assert_eq!(median.dimensions(), (3, 2));
        assert_eq!(median, median_filter(&grid, 7));

        let sigma = sigma_filter(&grid, usize::MAX, 50.0, 2.0);
        assert_eq!(sigma.dimensions(), (3, 2));
        assert_eq!(sigma, sigma_filter(&grid, 7, 50.0, 2.0));
    }

    #[test]
    fn test_sigma_filter_small_size_is_noop() {
        let mut grid = PixelGrid::filled(3, 3, [10, 20, 30]);
        grid.set_pixel(1, 1, [12, 20, 30]);
        assert_eq!(sigma_filter(&grid, 1, 5.0, 2.0), grid);
    }
}
