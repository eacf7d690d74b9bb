//! Channel reordering.
//!
//! A [`ChannelOrder`] is a permutation string over `R`, `G`, `B`: output
//! channel `i` takes the source channel named at position `i`. Parsing is
//! lenient. Only the first three characters are read, and a slot whose
//! character is not one of `R`, `G`, `B` stays unassigned, which reads
//! source channel 0.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use crate::grid::{PixelGrid, CHANNELS};

/// Source channel index for each output slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOrder {
    slots: [Option<usize>; CHANNELS],
    text: String,
}

impl ChannelOrder {
    /// The identity permutation `RGB`.
    pub fn identity() -> Self {
        Self::parse("RGB")
    }

    /// Parse a permutation string. Never fails.
    pub fn parse(text: &str) -> Self {
        let mut slots = [None; CHANNELS];
        for (slot, ch) in slots.iter_mut().zip(text.chars()) {
            *slot = match ch {
                'R' => Some(0),
                'G' => Some(1),
                'B' => Some(2),
                _ => None,
            };
        }
        Self {
            slots,
            text: text.to_string(),
        }
    }

    /// True for `RGB` and for the empty string.
    pub fn is_identity(&self) -> bool {
        self.text.is_empty() || self.text == "RGB"
    }

    /// Source channel read by output slot `i`; unassigned slots read 0.
    pub fn source(&self, slot: usize) -> usize {
        self.slots[slot].unwrap_or(0)
    }

    /// Whether every slot names a channel.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Default for ChannelOrder {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for ChannelOrder {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for ChannelOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for ChannelOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}

/// Build a new grid with channels rearranged by `order`.
pub fn reorder_channels(input: &PixelGrid, order: &ChannelOrder) -> PixelGrid {
    let (width, height) = input.dimensions();
    let sources = [order.source(0), order.source(1), order.source(2)];
    trace!(order = %order, ?sources, "reorder_channels");

    PixelGrid::from_rows(width, height, |y, row| {
        for x in 0..width {
            let px = input.pixel(x, y);
            for (c, &src) in sources.iter().enumerate() {
                row[x * CHANNELS + c] = px[src];
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_bgr() {
        let grid = PixelGrid::filled(1, 1, [10, 20, 30]);
        let result = reorder_channels(&grid, &ChannelOrder::parse("BGR"));
        assert_eq!(result.pixel(0, 0), [30, 20, 10]);
    }

    #[test]
    fn test_reorder_identity_is_noop() {
        let grid = PixelGrid::from_pixels(2, 1, &[[1, 2, 3], [4, 5, 6]]).unwrap();
        let order = ChannelOrder::identity();
        assert!(order.is_identity());
        assert_eq!(reorder_channels(&grid, &order), grid);
    }

    #[test]
    fn test_reorder_may_duplicate() {
        let grid = PixelGrid::filled(1, 1, [10, 20, 30]);
        let result = reorder_channels(&grid, &ChannelOrder::parse("GGG"));
        assert_eq!(result.pixel(0, 0), [20, 20, 20]);
    }

    #[test]
    fn test_reorder_unassigned_slots_read_first_channel() {
        let grid = PixelGrid::filled(1, 1, [10, 20, 30]);

        let short = ChannelOrder::parse("B");
        assert!(!short.is_complete());
        assert_eq!(reorder_channels(&grid, &short).pixel(0, 0), [30, 10, 10]);

        let junk = ChannelOrder::parse("BxG");
        assert_eq!(reorder_channels(&grid, &junk).pixel(0, 0), [30, 10, 20]);
    }

    #[test]
    fn test_parse_ignores_extra_characters() {
        let order = ChannelOrder::parse("BGRRR");
        assert_eq!(order.source(0), 2);
        assert_eq!(order.source(2), 0);
        assert!(!order.is_identity());
    }

    #[test]
    fn test_empty_order_is_identity() {
        assert!(ChannelOrder::parse("").is_identity());
    }
}
