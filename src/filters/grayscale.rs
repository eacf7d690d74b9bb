//! Luma computation and single-channel extraction.
//!
//! Uses ITU-R BT.601 weights with each weighted term truncated to an
//! integer before summing. Every gray value in the crate (histograms, the
//! gray channel, intensity slicing) goes through [`luma`], so all of them
//! are bit-identical.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RedactError;
use crate::grid::{PixelGrid, CHANNELS};

/// ITU-R BT.601 luma coefficients
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Gray value of an RGB triple.
///
/// The three truncated terms sum to at most 254, so the result never wraps.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    (r as f32 * LUMA_R) as u8 + (g as f32 * LUMA_G) as u8 + (b as f32 * LUMA_B) as u8
}

/// A color channel, or the derived gray channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
    Gray,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Gray];

    /// Index into an RGB triple, `None` for gray.
    pub fn index(self) -> Option<usize> {
        match self {
            Channel::Red => Some(0),
            Channel::Green => Some(1),
            Channel::Blue => Some(2),
            Channel::Gray => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
            Channel::Gray => "gray",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(Channel::Red),
            "green" | "g" => Ok(Channel::Green),
            "blue" | "b" => Ok(Channel::Blue),
            "gray" | "grey" => Ok(Channel::Gray),
            _ => Err(RedactError::UnknownChannel(s.to_string())),
        }
    }
}

/// The four extractions of one source grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSet {
    pub red: PixelGrid,
    pub green: PixelGrid,
    pub blue: PixelGrid,
    pub gray: PixelGrid,
}

impl ChannelSet {
    pub fn get(&self, channel: Channel) -> &PixelGrid {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
            Channel::Gray => &self.gray,
        }
    }
}

/// Extract one channel into a new grid.
///
/// Color channels keep their own value and zero the other two. `Gray`
/// writes the luma to all three channels.
pub fn extract_channel(input: &PixelGrid, channel: Channel) -> PixelGrid {
    let (width, height) = input.dimensions();

    PixelGrid::from_rows(width, height, |y, row| {
        for x in 0..width {
            let [r, g, b] = input.pixel(x, y);
            let out = match channel.index() {
                Some(keep) => {
                    let mut px = [0u8; CHANNELS];
                    px[keep] = [r, g, b][keep];
                    px
                }
                None => {
                    let gray = luma(r, g, b);
                    [gray, gray, gray]
                }
            };
            row[x * CHANNELS..(x + 1) * CHANNELS].copy_from_slice(&out);
        }
    })
}

/// Extract all four channels, each independently from `input`.
pub fn extract_channels(input: &PixelGrid) -> ChannelSet {
    ChannelSet {
        red: extract_channel(input, Channel::Red),
        green: extract_channel(input, Channel::Green),
        blue: extract_channel(input, Channel::Blue),
        gray: extract_channel(input, Channel::Gray),
    }
}
