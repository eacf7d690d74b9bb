//! The redaction pipeline.
//!
//! Stages run in a fixed order, each one skipped while its parameter sits
//! at its neutral value. The order is part of the contract: mirroring
//! before brightness is not the same image as brightness before mirroring.
//!
//! 1. channel reorder
//! 2. red, green, blue brightness
//! 3. contrast
//! 4. negative
//! 5. vertical mirror, horizontal mirror
//! 6. magic
//! 7. logarithmic brightness, logarithmic clip, power clip, binary clip,
//!    intensity slicing
//! 8. spatial filter (the grid before it is kept as the pre-filter grid)
//! 9. unsharp mask of the pre-filter grid against the filtered grid
//!
//! The difference map always compares the final grid to the untouched
//! input.

use std::fmt;

use tracing::debug;

use crate::filters::blur::{gaussian_filter, rectangular_filter};
use crate::filters::channel_order::reorder_channels;
use crate::filters::color_adjust::{brightness, contrast, magic, negative, PointCurve};
use crate::filters::difference::difference_map;
use crate::filters::geometry::{horizontal_mirror, vertical_mirror};
use crate::filters::grayscale::{extract_channels, ChannelSet};
use crate::filters::levels::{binary_clip, intensity_slice, logarithmic_clip, power_clip};
use crate::filters::noise::{median_filter, sigma_filter};
use crate::filters::sharpen::unsharp_mask;
use crate::grid::PixelGrid;
use crate::params::{FilterKind, RedactParams};
use crate::statistics::{self, ImageStatistics};

/// One pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    ReorderChannels,
    RedBrightness,
    GreenBrightness,
    BlueBrightness,
    Contrast,
    Negative,
    VerticalMirror,
    HorizontalMirror,
    Magic,
    LogarithmicBrightness,
    LogarithmicClip,
    PowerClip,
    BinaryClip,
    IntensitySlice,
    SpatialFilter,
    UnsharpMask,
}

impl Stage {
    /// Every stage in execution order.
    pub const ALL: [Stage; 16] = [
        Stage::ReorderChannels,
        Stage::RedBrightness,
        Stage::GreenBrightness,
        Stage::BlueBrightness,
        Stage::Contrast,
        Stage::Negative,
        Stage::VerticalMirror,
        Stage::HorizontalMirror,
        Stage::Magic,
        Stage::LogarithmicBrightness,
        Stage::LogarithmicClip,
        Stage::PowerClip,
        Stage::BinaryClip,
        Stage::IntensitySlice,
        Stage::SpatialFilter,
        Stage::UnsharpMask,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::ReorderChannels => "reorder_channels",
            Stage::RedBrightness => "red_brightness",
            Stage::GreenBrightness => "green_brightness",
            Stage::BlueBrightness => "blue_brightness",
            Stage::Contrast => "contrast",
            Stage::Negative => "negative",
            Stage::VerticalMirror => "vertical_mirror",
            Stage::HorizontalMirror => "horizontal_mirror",
            Stage::Magic => "magic",
            Stage::LogarithmicBrightness => "logarithmic_brightness",
            Stage::LogarithmicClip => "logarithmic_clip",
            Stage::PowerClip => "power_clip",
            Stage::BinaryClip => "binary_clip",
            Stage::IntensitySlice => "intensity_slice",
            Stage::SpatialFilter => "spatial_filter",
            Stage::UnsharpMask => "unsharp_mask",
        }
    }

    /// Whether the stage runs for these parameters.
    pub fn is_active(self, params: &RedactParams) -> bool {
        match self {
            Stage::ReorderChannels => !params.order.is_identity(),
            Stage::RedBrightness => params.red_brightness != 1.0,
            Stage::GreenBrightness => params.green_brightness != 1.0,
            Stage::BlueBrightness => params.blue_brightness != 1.0,
            Stage::Contrast => params.contrast != 1.0,
            Stage::Negative => params.negative,
            Stage::VerticalMirror => params.vertical_mirror,
            Stage::HorizontalMirror => params.horizontal_mirror,
            Stage::Magic => params.magic != 0,
            Stage::LogarithmicBrightness => params.logarithmic_brightness != 0.0,
            Stage::LogarithmicClip => params.logarithmic_clip,
            Stage::PowerClip => params.power_clip != 0.0,
            Stage::BinaryClip => params.binary_clip != 0,
            Stage::IntensitySlice => params.intensity_slice().is_some(),
            Stage::SpatialFilter => params.filter != FilterKind::None,
            Stage::UnsharpMask => params.unsharp_masking > 0.0,
        }
    }

    fn apply(self, working: &mut Working, params: &RedactParams) {
        let grid = &mut working.grid;
        match self {
            Stage::ReorderChannels => *grid = reorder_channels(grid, &params.order),
            Stage::RedBrightness => brightness(grid, 0, params.red_brightness),
            Stage::GreenBrightness => brightness(grid, 1, params.green_brightness),
            Stage::BlueBrightness => brightness(grid, 2, params.blue_brightness),
            Stage::Contrast => contrast(grid, params.contrast),
            Stage::Negative => negative(grid),
            Stage::VerticalMirror => vertical_mirror(grid),
            Stage::HorizontalMirror => horizontal_mirror(grid),
            Stage::Magic => magic(grid, params.magic),
            Stage::LogarithmicBrightness => {
                PointCurve::LogarithmicBrightness.apply(grid, params.logarithmic_brightness)
            }
            Stage::LogarithmicClip => logarithmic_clip(grid),
            Stage::PowerClip => power_clip(grid, params.power_clip),
            Stage::BinaryClip => binary_clip(grid, params.binary_clip),
            Stage::IntensitySlice => {
                if let Some(slice) = params.intensity_slice() {
                    intensity_slice(grid, slice);
                }
            }
            Stage::SpatialFilter => {
                let filtered = spatial_filter(grid, params);
                working.pre_filter = Some(std::mem::replace(grid, filtered));
            }
            Stage::UnsharpMask => match &working.pre_filter {
                Some(pre_filter) => {
                    *grid = unsharp_mask(pre_filter, grid, params.unsharp_masking);
                }
                // Sharp and blurred grids are identical, the mask changes nothing
                None => debug!("unsharp mask skipped: no spatial filter ran"),
            },
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stages that run for `params`, in execution order.
pub fn active_stages(params: &RedactParams) -> Vec<Stage> {
    Stage::ALL
        .into_iter()
        .filter(|stage| stage.is_active(params))
        .collect()
}

struct Working {
    grid: PixelGrid,
    /// Grid as it was before the spatial filter replaced it
    pre_filter: Option<PixelGrid>,
}

/// Run the selected spatial filter. Degenerate sizes and spreads give an
/// unchanged copy.
fn spatial_filter(grid: &PixelGrid, params: &RedactParams) -> PixelGrid {
    match params.filter {
        FilterKind::None => grid.clone(),
        FilterKind::Gaussian => gaussian_filter(grid, params.filter_size, params.sigma),
        FilterKind::Sigma => {
            sigma_filter(grid, params.filter_size, params.sigma, params.interval)
        }
        FilterKind::Median => median_filter(grid, params.filter_size),
        FilterKind::Rectangular => rectangular_filter(grid, params.filter_size),
    }
}

/// Output of [`redact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    /// Difference map of the input against `redacted`
    pub changes: PixelGrid,
    /// The edited grid
    pub redacted: PixelGrid,
}

/// Run the pipeline on a copy of `input`.
///
/// `input` is never modified and doubles as the original the difference
/// map is computed against.
pub fn redact(input: &PixelGrid, params: &RedactParams) -> Redaction {
    let stages = active_stages(params);
    debug!(
        width = input.width(),
        height = input.height(),
        active = stages.len(),
        "redact"
    );

    let mut working = Working {
        grid: input.clone(),
        pre_filter: None,
    };
    for stage in stages {
        debug!(stage = stage.name(), "stage");
        stage.apply(&mut working, params);
    }

    let redacted = working.grid;
    let changes = difference_map(input, &redacted);
    Redaction { changes, redacted }
}

/// Everything the boundary layer returns for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub redaction: Redaction,
    /// Channel extractions of the input
    pub channels: ChannelSet,
    /// Histograms of the input
    pub statistics: ImageStatistics,
}

/// Redact `input` and, concurrently, extract its channels and compute its
/// statistics. All three read the same unmodified input.
pub fn process(input: &PixelGrid, params: &RedactParams) -> ProcessedImage {
    let (redaction, (channels, stats)) = rayon::join(
        || redact(input, params),
        || rayon::join(|| extract_channels(input), || statistics::statistics(input)),
    );

    ProcessedImage {
        redaction,
        channels,
        statistics: stats,
    }
}
