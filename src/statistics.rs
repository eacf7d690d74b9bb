//! Per-channel brightness histograms of an unmodified grid.
//!
//! The serialized form uses the PascalCase keys the web client reads:
//! `{"Brightness": {"Red": [...], "Green": [...], "Blue": [...], "Gray": [...]}}`,
//! each list holding 256 counts.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::trace;

use crate::error::RedactResult;
use crate::filters::grayscale::{luma, Channel};
use crate::grid::PixelGrid;

/// Number of buckets per histogram, one per 8-bit value.
pub const BUCKETS: usize = 256;

/// Four 256-bucket histograms over one grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawHistogram")]
pub struct BrightnessHistogram {
    pub red: [u32; BUCKETS],
    pub green: [u32; BUCKETS],
    pub blue: [u32; BUCKETS],
    pub gray: [u32; BUCKETS],
}

impl Default for BrightnessHistogram {
    fn default() -> Self {
        Self {
            red: [0; BUCKETS],
            green: [0; BUCKETS],
            blue: [0; BUCKETS],
            gray: [0; BUCKETS],
        }
    }
}

impl BrightnessHistogram {
    pub fn channel(&self, channel: Channel) -> &[u32; BUCKETS] {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
            Channel::Gray => &self.gray,
        }
    }

    /// Number of pixels counted. Every histogram sums to this value.
    pub fn total(&self) -> u64 {
        self.red.iter().map(|&n| n as u64).sum()
    }
}

impl Serialize for BrightnessHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BrightnessHistogram", 4)?;
        state.serialize_field("Red", &self.red[..])?;
        state.serialize_field("Green", &self.green[..])?;
        state.serialize_field("Blue", &self.blue[..])?;
        state.serialize_field("Gray", &self.gray[..])?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawHistogram {
    red: Vec<u32>,
    green: Vec<u32>,
    blue: Vec<u32>,
    gray: Vec<u32>,
}

impl TryFrom<RawHistogram> for BrightnessHistogram {
    type Error = String;

    fn try_from(raw: RawHistogram) -> Result<Self, Self::Error> {
        fn buckets(name: &str, counts: Vec<u32>) -> Result<[u32; BUCKETS], String> {
            let len = counts.len();
            counts
                .try_into()
                .map_err(|_| format!("{name} histogram has {len} buckets, expected {BUCKETS}"))
        }

        Ok(Self {
            red: buckets("Red", raw.red)?,
            green: buckets("Green", raw.green)?,
            blue: buckets("Blue", raw.blue)?,
            gray: buckets("Gray", raw.gray)?,
        })
    }
}

/// Statistics record handed to the boundary layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStatistics {
    #[serde(rename = "Brightness")]
    pub brightness: BrightnessHistogram,
}

impl ImageStatistics {
    pub fn to_json(&self) -> RedactResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Count every channel value and every pixel's luma.
pub fn brightness_histogram(grid: &PixelGrid) -> BrightnessHistogram {
    let (width, height) = grid.dimensions();
    trace!(width, height, "brightness_histogram");

    let mut histogram = BrightnessHistogram::default();
    for [r, g, b] in grid.pixels() {
        histogram.red[r as usize] += 1;
        histogram.green[g as usize] += 1;
        histogram.blue[b as usize] += 1;
        histogram.gray[luma(r, g, b) as usize] += 1;
    }
    histogram
}

/// Summarize a grid. The grid is only read.
pub fn statistics(grid: &PixelGrid) -> ImageStatistics {
    ImageStatistics {
        brightness: brightness_histogram(grid),
    }
}
