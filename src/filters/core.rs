//! Core utilities shared by the convolution filters.
//!
//! This module provides:
//! - 1D kernel generation (Gaussian, rectangular)
//! - Separable two-pass convolution with edge renormalization

use tracing::trace;

use crate::grid::{clip, PixelGrid, CHANNELS};

/// Direction of a single 1D convolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Along rows (x varies).
    Horizontal,
    /// Along columns (y varies).
    Vertical,
}

/// Largest window radius that can still reach another pixel of `grid`.
///
/// Offsets past `max(width, height)` always land outside the grid and are
/// skipped, so any larger radius gives the same output.
pub fn max_useful_radius(grid: &PixelGrid) -> usize {
    grid.width().max(grid.height())
}

/// Limit a kernel extent so its radius `size / 2` stays within
/// [`max_useful_radius`]. The filtered output is unchanged.
pub fn clamp_kernel_size(size: usize, grid: &PixelGrid) -> usize {
    size.min(2 * max_useful_radius(grid) + 1)
}

/// Generate a 1D Gaussian kernel.
///
/// The kernel has `2r + 1` taps with `r = size / 2`; the weight at offset
/// `i` is `exp(-i² / 2σ²) / (σ√(2π))`. Weights are not normalized here:
/// [`convolve_1d`] divides by the sum of the weights it actually used.
///
/// # Arguments
/// * `size` - Requested kernel extent
/// * `sigma` - Standard deviation, must be > 0
pub fn gaussian_kernel_1d(size: usize, sigma: f64) -> Vec<f64> {
    let radius = (size / 2) as isize;
    let norm = sigma * (2.0 * std::f64::consts::PI).sqrt();

    (-radius..=radius)
        .map(|i| {
            let x = i as f64;
            (-(x * x) / (2.0 * sigma * sigma)).exp() / norm
        })
        .collect()
}

/// Generate a uniform (box) kernel with weight `1 / size`.
///
/// Even sizes get `size + 1` taps so the kernel stays centered.
pub fn rectangular_kernel(size: usize) -> Vec<f64> {
    let taps = (size / 2) * 2 + 1;
    vec![1.0 / size.max(1) as f64; taps]
}

/// Apply one 1D convolution pass and return a new grid.
///
/// Neighbors outside the grid are skipped rather than zero-padded, and each
/// output value is divided by the sum of the in-bounds weights, so borders
/// are not darkened.
///
/// Output is rounded to the nearest integer before clamping. This differs
/// from the truncating [`clip`] used by the point operations: a weighted
/// average of identical values can land one ulp below the integer, and
/// truncating it would shift constant regions down by one.
pub fn convolve_1d(src: &PixelGrid, kernel: &[f64], pass: Pass) -> PixelGrid {
    let (width, height) = src.dimensions();
    let radius = (kernel.len() / 2) as isize;

    trace!(width, height, taps = kernel.len(), ?pass, "convolve_1d");

    PixelGrid::from_rows(width, height, |y, row| {
        for x in 0..width {
            let mut sum = [0.0f64; CHANNELS];
            let mut weight_sum = 0.0f64;

            for (ki, &weight) in kernel.iter().enumerate() {
                let offset = ki as isize - radius;
                let (sx, sy) = match pass {
                    Pass::Horizontal => (x as isize + offset, y as isize),
                    Pass::Vertical => (x as isize, y as isize + offset),
                };

                if sx < 0 || sx >= width as isize || sy < 0 || sy >= height as isize {
                    continue;
                }

                for (c, acc) in sum.iter_mut().enumerate() {
                    *acc += src.value(sx as usize, sy as usize, c) as f64 * weight;
                }
                weight_sum += weight;
            }

            for c in 0..CHANNELS {
                row[x * CHANNELS + c] = if weight_sum > 0.0 {
                    clip((sum[c] / weight_sum).round())
                } else {
                    src.value(x, y, c)
                };
            }
        }
    })
}

/// Apply a separable kernel: horizontal pass, then vertical pass.
///
/// Equivalent to the full 2D convolution with the outer product of
/// `kernel` with itself, in O(n·r) instead of O(n·r²).
pub fn convolve_separable(src: &PixelGrid, kernel: &[f64]) -> PixelGrid {
    let temp = convolve_1d(src, kernel, Pass::Horizontal);
    convolve_1d(&temp, kernel, Pass::Vertical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_kernel_is_symmetric() {
        let kernel = gaussian_kernel_1d(5, 1.0);
        assert_eq!(kernel.len(), 5);
        assert_relative_eq!(kernel[0], kernel[4]);
        assert_relative_eq!(kernel[1], kernel[3]);
        assert!(kernel[2] > kernel[1]);
        // Peak of the unnormalized density at x = 0
        assert_relative_eq!(kernel[2], 1.0 / (2.0 * std::f64::consts::PI).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_gaussian_kernel_even_size_rounds_up() {
        assert_eq!(gaussian_kernel_1d(4, 1.0).len(), 5);
        assert_eq!(gaussian_kernel_1d(1, 1.0).len(), 1);
    }

    #[test]
    fn test_clamp_kernel_size_limits_radius() {
        let grid = PixelGrid::new(4, 2);
        assert_eq!(max_useful_radius(&grid), 4);
        assert_eq!(clamp_kernel_size(3, &grid), 3);
        assert_eq!(clamp_kernel_size(usize::MAX, &grid), 9);
        assert_eq!(clamp_kernel_size(usize::MAX, &PixelGrid::new(0, 0)), 1);
    }

    #[test]
    fn test_rectangular_kernel_uniform() {
        let kernel = rectangular_kernel(3);
        assert_eq!(kernel.len(), 3);
        for &w in &kernel {
            assert_relative_eq!(w, 1.0 / 3.0);
        }
    }

    #[test]
    fn test_convolve_constant_image_unchanged() {
        let src = PixelGrid::filled(6, 4, [37, 128, 251]);
        let kernel = gaussian_kernel_1d(9, 3.0);
        let result = convolve_separable(&src, &kernel);
        assert_eq!(result, src);
    }

    #[test]
    fn test_convolve_edges_are_renormalized() {
        // A 1-pixel-wide bright column at the border must not be darkened
        // by missing out-of-bounds neighbors.
        let src = PixelGrid::filled(1, 5, [200, 200, 200]);
        let result = convolve_1d(&src, &rectangular_kernel(5), Pass::Horizontal);
        assert_eq!(result, src);
    }

    #[test]
    fn test_convolve_horizontal_spreads_along_rows_only() {
        let mut src = PixelGrid::new(3, 3);
        src.set_pixel(1, 1, [90, 90, 90]);

        let result = convolve_1d(&src, &rectangular_kernel(3), Pass::Horizontal);

        assert_eq!(result.pixel(0, 1), [45, 45, 45]);
        assert_eq!(result.pixel(1, 1), [30, 30, 30]);
        assert_eq!(result.pixel(1, 0), [0, 0, 0]);
        assert_eq!(result.pixel(1, 2), [0, 0, 0]);
    }
}
