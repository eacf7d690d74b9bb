//! Blur filters: Gaussian and rectangular (box).
//!
//! Both use separable 2-pass convolution from [`super::core`]. The source
//! grid is only read; the result is a new grid.

use tracing::{debug, trace};

use super::core::{clamp_kernel_size, convolve_separable, gaussian_kernel_1d, rectangular_kernel};
use crate::grid::PixelGrid;

/// Apply Gaussian blur.
///
/// # Arguments
/// * `input` - Source grid
/// * `size` - Kernel extent; the kernel radius is `size / 2`
/// * `sigma` - Standard deviation of the Gaussian
///
/// # Returns
/// Blurred grid, or an unchanged copy when `sigma <= 0`
pub fn gaussian_filter(input: &PixelGrid, size: usize, sigma: f64) -> PixelGrid {
    if sigma <= 0.0 || sigma.is_nan() {
        debug!(sigma, "gaussian filter skipped: sigma <= 0");
        return input.clone();
    }

    let size = clamp_kernel_size(size, input);
    trace!(size, sigma, "gaussian_filter");
    let kernel = gaussian_kernel_1d(size, sigma);
    convolve_separable(input, &kernel)
}

/// Apply rectangular (box) blur.
///
/// # Arguments
/// * `input` - Source grid
/// * `size` - Box width in pixels
///
/// # Returns
/// Blurred grid, or an unchanged copy when `size <= 1`
pub fn rectangular_filter(input: &PixelGrid, size: usize) -> PixelGrid {
    if size <= 1 {
        debug!(size, "rectangular filter skipped: size <= 1");
        return input.clone();
    }

    let size = clamp_kernel_size(size, input);
    trace!(size, "rectangular_filter");
    let kernel = rectangular_kernel(size);
    convolve_separable(input, &kernel)
}
