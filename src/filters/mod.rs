//! Filter modules for the redaction pipeline.
//!
//! ## Pixel Format
//!
//! Every filter works on a [`PixelGrid`](crate::grid::PixelGrid): 8-bit RGB,
//! shape `(height, width, 3)`, no alpha. Every filter preserves dimensions
//! and clamps results to 0-255 before writing them back.
//!
//! ## Architecture
//!
//! - **Point operations** mutate a grid in place (`&mut PixelGrid`).
//! - **Neighborhood operations** read a source grid and return a new one,
//!   computed row by row in parallel with rayon. A pass never reads the
//!   grid it is writing.
//! - **Degenerate parameters** (sigma <= 0, kernel size <= 1, power <= 0)
//!   return an unchanged copy instead of failing.
//!
//! ## Filter Categories
//!
//! - **Pixel-wise**: brightness, contrast, negative, magic, point curves
//! - **Geometry**: vertical/horizontal mirror, channel reorder
//! - **Tonal**: logarithmic/power auto clip, binary clip, intensity slicing
//! - **Convolution**: gaussian, rectangular
//! - **Order statistic / edge-preserving**: median, σ-filter
//! - **Combiners**: unsharp mask, difference map
//! - **Channels**: luma, single-channel extraction

pub mod core;

pub mod blur;
pub mod channel_order;
pub mod color_adjust;
pub mod difference;
pub mod geometry;
pub mod grayscale;
pub mod levels;
pub mod noise;
pub mod sharpen;
