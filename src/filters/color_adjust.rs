//! Color adjustment filters: Brightness, Contrast, Negative, Magic, point curves.
//!
//! These are pixel-wise operations that don't require spatial context, so
//! they all mutate the grid in place. Each one maps a channel value through
//! a fixed function and clamps before writing back.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::error::RedactError;
use crate::grid::{build_lut, clip, to_continuous, PixelGrid, CHANNELS};

/// Sigmoid steepness used when increasing contrast.
const CONTRAST_GAIN: f64 = 30.0;

// ============================================================================
// Brightness
// ============================================================================

/// Apply a gamma-style brightness curve to one channel.
///
/// `out = 255 * (in / 255) ^ exponent`. An exponent of 1.0 is the identity,
/// > 1.0 darkens, < 1.0 lightens.
///
/// # Arguments
/// * `grid` - Grid to modify in place
/// * `channel` - 0 = red, 1 = green, 2 = blue
/// * `exponent` - Curve exponent
pub fn brightness(grid: &mut PixelGrid, channel: usize, exponent: f64) {
    assert!(channel < CHANNELS, "channel index out of range: {channel}");
    trace!(channel, exponent, "brightness");

    let lut = build_lut(|v| clip(to_continuous(v).powf(exponent) * 255.0));
    grid.map_channel(channel, |v| lut[v as usize]);
}

// ============================================================================
// Contrast
// ============================================================================

/// Map a single value through the contrast curve.
///
/// Above 1.0 the value is blended toward a steep sigmoid centered at 0.5;
/// below 1.0 it is blended toward a nearly flat sigmoid, which pulls values
/// toward mid-gray. 1.0 returns the input.
pub fn contrast_value(value: u8, contrast: f64) -> u8 {
    let old = to_continuous(value);

    let blended = if contrast > 1.0 {
        let new = sigmoid(CONTRAST_GAIN * (0.5 - old));
        (contrast - 1.0) * new + (2.0 - contrast) * old
    } else if contrast < 1.0 {
        let new = sigmoid((0.5 - old) / CONTRAST_GAIN);
        (1.0 - contrast) * new + contrast * old
    } else {
        return value;
    };

    clip(blended * 255.0)
}

/// Adjust contrast of all channels in place.
///
/// # Arguments
/// * `grid` - Grid to modify in place
/// * `contrast` - Contrast factor, 1.0 = no change
pub fn contrast(grid: &mut PixelGrid, contrast: f64) {
    trace!(contrast, "contrast");

    let lut = build_lut(|v| contrast_value(v, contrast));
    grid.map_values(|v| lut[v as usize]);
}

#[inline]
fn sigmoid(t: f64) -> f64 {
    1.0 / (1.0 + t.exp())
}

// ============================================================================
// Negative
// ============================================================================

/// Invert every channel: `out = 255 - in`.
pub fn negative(grid: &mut PixelGrid) {
    trace!("negative");
    grid.map_values(|v| 255 - v);
}

// ============================================================================
// Magic (threshold-band invert)
// ============================================================================

/// Invert channel values that lie within `[threshold, 255 - threshold]`.
///
/// Values closer than `threshold` to either end of the range are left
/// unchanged. A threshold of 128 or more leaves every value unchanged.
pub fn magic(grid: &mut PixelGrid, threshold: i32) {
    trace!(threshold, "magic");

    let lut = build_lut(|v| {
        let (value, threshold) = (v as i64, threshold as i64);
        if value + threshold <= 255 && value - threshold >= 0 {
            255 - v
        } else {
            v
        }
    });
    grid.map_values(|v| lut[v as usize]);
}

// ============================================================================
// Point curves with a single numeric parameter
// ============================================================================

/// Named per-value curves driven by one coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointCurve {
    /// `out = 255 * c * ln(1 + in / 255)`
    LogarithmicBrightness,
}

impl PointCurve {
    pub fn name(self) -> &'static str {
        match self {
            PointCurve::LogarithmicBrightness => "logarithmic_brightness",
        }
    }

    /// Map one value through the curve.
    pub fn eval(self, value: u8, coefficient: f64) -> u8 {
        match self {
            PointCurve::LogarithmicBrightness => {
                clip(coefficient * to_continuous(value).ln_1p() * 255.0)
            }
        }
    }

    /// Apply the curve to every channel in place.
    pub fn apply(self, grid: &mut PixelGrid, coefficient: f64) {
        trace!(curve = self.name(), coefficient, "point curve");

        let lut = build_lut(|v| self.eval(v, coefficient));
        grid.map_values(|v| lut[v as usize]);
    }
}

impl fmt::Display for PointCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PointCurve {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "logarithmicbrightness" => Ok(PointCurve::LogarithmicBrightness),
            _ => Err(RedactError::UnknownCurve(s.to_string())),
        }
    }
}
