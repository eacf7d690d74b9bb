//! Pixel grid: the 8-bit RGB substrate every transform reads and writes.
//!
//! A [`PixelGrid`] owns an `ndarray` array of shape `(height, width, 3)`.
//! Its dimensions are fixed at construction; only channel values change.
//! `Clone` is a deep copy with independent storage, which is the only way
//! two grids can hold the same content without aliasing.

use ndarray::{Array3, ArrayView3, ArrayViewMut3, Axis};
use rayon::prelude::*;

use crate::error::{RedactError, RedactResult};

/// Number of color channels per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// One RGB pixel.
pub type Pixel = [u8; CHANNELS];

/// Clamp a continuous value to the 0-255 range and truncate to u8.
///
/// NaN maps to 0.
#[inline]
pub fn clip(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

/// Convert a channel value to the 0.0-1.0 range.
#[inline]
pub fn to_continuous(value: u8) -> f64 {
    value as f64 / 255.0
}

/// Tabulate a u8 -> u8 function over all 256 inputs.
pub(crate) fn build_lut<F>(f: F) -> [u8; 256]
where
    F: Fn(u8) -> u8,
{
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = f(i as u8);
    }
    lut
}

/// Dense row-major grid of RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    data: Array3<u8>,
}

impl PixelGrid {
    /// Create a black grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: Array3::<u8>::zeros((height, width, CHANNELS)),
        }
    }

    /// Create a grid where every pixel has the same color.
    pub fn filled(width: usize, height: usize, pixel: Pixel) -> Self {
        Self {
            data: Array3::from_shape_fn((height, width, CHANNELS), |(_, _, c)| pixel[c]),
        }
    }

    /// Build a grid from row-major pixels.
    pub fn from_pixels(width: usize, height: usize, pixels: &[Pixel]) -> RedactResult<Self> {
        if pixels.len() != width * height {
            return Err(RedactError::InvalidDimensions(format!(
                "expected {} pixels for {}x{}, got {}",
                width * height,
                width,
                height,
                pixels.len()
            )));
        }
        let flat: Vec<u8> = pixels.iter().flat_map(|p| p.iter().copied()).collect();
        Self::from_raw_rgb(width, height, flat)
    }

    /// Build a grid from a flat `RGBRGB...` buffer.
    pub fn from_raw_rgb(width: usize, height: usize, data: Vec<u8>) -> RedactResult<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(CHANNELS))
            .ok_or_else(|| RedactError::InvalidDimensions("image dimensions overflow".into()))?;

        if data.len() != expected {
            return Err(RedactError::InvalidDimensions(format!(
                "expected {} bytes for {}x{} RGB, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }

        let data = Array3::from_shape_vec((height, width, CHANNELS), data)
            .map_err(|e| RedactError::InvalidDimensions(e.to_string()))?;
        Ok(Self { data })
    }

    /// Build a grid from a flat `RGBARGBA...` buffer, discarding alpha.
    pub fn from_raw_rgba(width: usize, height: usize, data: &[u8]) -> RedactResult<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| RedactError::InvalidDimensions("image dimensions overflow".into()))?;

        if data.len() != expected {
            return Err(RedactError::InvalidDimensions(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }

        let rgb: Vec<u8> = data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::from_raw_rgb(width, height, rgb)
    }

    /// Wrap an existing `(height, width, 3)` array.
    pub fn from_array(data: Array3<u8>) -> RedactResult<Self> {
        let channels = data.shape()[2];
        if channels != CHANNELS {
            return Err(RedactError::UnsupportedChannels(channels));
        }
        Ok(Self { data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.shape()[1]
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.shape()[0]
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Pixel) {
        for (c, &v) in pixel.iter().enumerate() {
            self.data[[y, x, c]] = v;
        }
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        let (width, height) = self.dimensions();
        (0..height).flat_map(move |y| (0..width).map(move |x| self.pixel(x, y)))
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    pub fn view_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        self.data.view_mut()
    }

    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Flatten to an `RGBRGB...` buffer.
    pub fn into_raw_rgb(self) -> Vec<u8> {
        if self.data.is_standard_layout() {
            self.data.into_raw_vec_and_offset().0
        } else {
            self.data.iter().copied().collect()
        }
    }

    /// Flatten to an `RGBARGBA...` buffer with opaque alpha.
    pub fn to_raw_rgba(&self) -> Vec<u8> {
        self.pixels()
            .flat_map(|[r, g, b]| [r, g, b, 255])
            .collect()
    }

    /// Panic unless `other` has the same dimensions.
    pub(crate) fn assert_same_dimensions(&self, other: &PixelGrid, operation: &str) {
        assert_eq!(
            self.dimensions(),
            other.dimensions(),
            "{operation}: grid dimensions differ"
        );
    }

    /// Apply `f` to every channel value in place.
    pub(crate) fn map_values<F>(&mut self, f: F)
    where
        F: Fn(u8) -> u8,
    {
        self.data.mapv_inplace(f);
    }

    /// Apply `f` to one channel in place.
    pub(crate) fn map_channel<F>(&mut self, channel: usize, f: F)
    where
        F: Fn(u8) -> u8,
    {
        self.data.index_axis_mut(Axis(2), channel).mapv_inplace(f);
    }

    /// Apply `f` to every pixel in place.
    pub(crate) fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn(Pixel) -> Pixel,
    {
        for mut px in self.data.lanes_mut(Axis(2)) {
            let mapped = f([px[0], px[1], px[2]]);
            px[0] = mapped[0];
            px[1] = mapped[1];
            px[2] = mapped[2];
        }
    }

    /// Build a grid row by row in parallel.
    ///
    /// `fill_row` receives the row index and that row's `width * 3` output
    /// bytes. Rows are disjoint, so each one may only read from grids other
    /// than the one being built.
    pub(crate) fn from_rows<F>(width: usize, height: usize, fill_row: F) -> Self
    where
        F: Fn(usize, &mut [u8]) + Sync + Send,
    {
        let stride = width * CHANNELS;
        let mut flat = vec![0u8; height * stride];
        if stride > 0 {
            flat.par_chunks_mut(stride)
                .enumerate()
                .for_each(|(y, row)| fill_row(y, row));
        }

        let data = Array3::from_shape_vec((height, width, CHANNELS), flat)
            .expect("row buffer matches grid shape");
        Self { data }
    }

    #[inline]
    pub(crate) fn value(&self, x: usize, y: usize, channel: usize) -> u8 {
        self.data[[y, x, channel]]
    }

    pub(crate) fn row_swap(&mut self, a: usize, b: usize) {
        for x in 0..self.width() {
            for c in 0..CHANNELS {
                self.data.swap([a, x, c], [b, x, c]);
            }
        }
    }

    pub(crate) fn column_swap(&mut self, a: usize, b: usize) {
        for y in 0..self.height() {
            for c in 0..CHANNELS {
                self.data.swap([y, a, c], [y, b, c]);
            }
        }
    }
}
