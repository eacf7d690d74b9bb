//! Intensity-domain remapping: auto clips, binary clip, intensity slicing.
//!
//! The two auto clips scale against the brightest channel value in the
//! whole grid, so they need one read pass before the remap pass.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::grayscale::luma;
use crate::grid::{build_lut, clip, to_continuous, PixelGrid};

/// Brightest channel value anywhere in the grid, 0 for an empty grid.
pub fn max_value(grid: &PixelGrid) -> u8 {
    grid.view().iter().copied().max().unwrap_or(0)
}

// ============================================================================
// Auto clips
// ============================================================================

/// Logarithmic auto-clip.
///
/// With `c = 255 / ln(1 + max)`, every value `v` maps to `c · ln(1 + v)`,
/// so the brightest value lands on 255. An all-black grid is left as is.
pub fn logarithmic_clip(grid: &mut PixelGrid) {
    let max = max_value(grid);
    if max == 0 {
        debug!("logarithmic clip skipped: grid is black");
        return;
    }

    let scale = (max as f64).ln_1p();
    trace!(max, c = 255.0 / scale, "logarithmic_clip");

    let lut = build_lut(|v| clip(255.0 * (v as f64).ln_1p() / scale));
    grid.map_values(|v| lut[v as usize]);
}

/// Power (gamma) auto-clip.
///
/// With `c = 255 / (max / 255)^gamma`, every value maps to
/// `c · (v / 255)^gamma`. An all-black grid is left as is.
pub fn power_clip(grid: &mut PixelGrid, gamma: f64) {
    let max = max_value(grid);
    if max == 0 {
        debug!("power clip skipped: grid is black");
        return;
    }

    let scale = to_continuous(max).powf(gamma);
    trace!(max, gamma, c = 255.0 / scale, "power_clip");

    let lut = build_lut(|v| clip(255.0 * to_continuous(v).powf(gamma) / scale));
    grid.map_values(|v| lut[v as usize]);
}

// ============================================================================
// Binary clip
// ============================================================================

/// Threshold each channel independently: `>= threshold` becomes 255,
/// everything else 0.
pub fn binary_clip(grid: &mut PixelGrid, threshold: u8) {
    trace!(threshold, "binary_clip");
    grid.map_values(|v| if v >= threshold { 255 } else { 0 });
}

// ============================================================================
// Intensity slicing
// ============================================================================

/// How intensity slicing treats pixels inside and outside the luma range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceMode {
    /// Slicing disabled.
    #[default]
    Off,
    /// In-range pixels become a constant gray; others are untouched.
    Constant,
    /// In-range pixels are untouched; others become black.
    Preserve,
}

/// Intensity slicing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensitySlice {
    pub low: u8,
    pub high: u8,
    pub value: u8,
    pub mode: SliceMode,
}

impl IntensitySlice {
    /// Whether a luma value falls in `[low, high]`.
    #[inline]
    pub fn contains(&self, gray: u8) -> bool {
        gray >= self.low && gray <= self.high
    }
}

/// Slice the grid by per-pixel luma.
pub fn intensity_slice(grid: &mut PixelGrid, slice: IntensitySlice) {
    trace!(low = slice.low, high = slice.high, value = slice.value, mode = ?slice.mode, "intensity_slice");

    let constant = [slice.value; 3];
    match slice.mode {
        SliceMode::Off => {}
        SliceMode::Constant => grid.map_pixels(|[r, g, b]| {
            if slice.contains(luma(r, g, b)) {
                constant
            } else {
                [r, g, b]
            }
        }),
        SliceMode::Preserve => grid.map_pixels(|[r, g, b]| {
            if slice.contains(luma(r, g, b)) {
                [r, g, b]
            } else {
                [0, 0, 0]
            }
        }),
    }
}
