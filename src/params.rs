//! Parameter record for the redaction pipeline.
//!
//! [`RedactParams`] is a flat, read-only description of which stages to run
//! and how strongly. Every field has a neutral value at which its stage is
//! skipped, and a missing field in a JSON document takes that value.
//!
//! [`UiParams`] is the percent-scale form sent by the web client
//! (`RedBrightness: 100` meaning "unchanged"); it converts into
//! [`RedactParams`] with the client's scaling rules.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RedactError, RedactResult};
use crate::filters::channel_order::ChannelOrder;
use crate::filters::levels::{IntensitySlice, SliceMode};

/// Spatial filter selected for the filter stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterKind {
    #[default]
    None,
    Gaussian,
    Sigma,
    Median,
    Rectangular,
}

impl FilterKind {
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Gaussian => "gaussian",
            FilterKind::Sigma => "sigma",
            FilterKind::Median => "median",
            FilterKind::Rectangular => "rectangular",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = RedactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(FilterKind::None),
            "gaussian" | "gauss" => Ok(FilterKind::Gaussian),
            "sigma" => Ok(FilterKind::Sigma),
            "median" => Ok(FilterKind::Median),
            "rectangular" | "box" => Ok(FilterKind::Rectangular),
            _ => Err(RedactError::UnknownFilter(s.to_string())),
        }
    }
}

impl Serialize for FilterKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FilterKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

/// Flat parameter record consumed by [`crate::pipeline::redact`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactParams {
    /// Red brightness exponent, 1.0 = unchanged
    pub red_brightness: f64,
    /// Green brightness exponent, 1.0 = unchanged
    pub green_brightness: f64,
    /// Blue brightness exponent, 1.0 = unchanged
    pub blue_brightness: f64,
    /// Contrast factor, 1.0 = unchanged
    pub contrast: f64,
    /// Logarithmic brightness coefficient, 0.0 = disabled
    pub logarithmic_brightness: f64,
    pub negative: bool,
    /// Channel permutation, `RGB` = unchanged
    pub order: ChannelOrder,
    pub vertical_mirror: bool,
    pub horizontal_mirror: bool,
    /// Threshold-band invert amount, 0 = disabled
    pub magic: i32,
    pub logarithmic_clip: bool,
    /// Power clip gamma, 0.0 = disabled
    pub power_clip: f64,
    /// Binary clip threshold, 0 = disabled
    pub binary_clip: u8,
    pub slice_mode: SliceMode,
    pub slice_low: u8,
    pub slice_high: u8,
    pub slice_value: u8,
    pub filter: FilterKind,
    /// Kernel extent for the spatial filter
    pub filter_size: usize,
    /// Spread for the Gaussian and σ-filters
    pub sigma: f64,
    /// σ-filter tolerance multiplier `k`
    pub interval: f64,
    /// Unsharp mask strength, 0.0 = disabled
    pub unsharp_masking: f64,
}

impl Default for RedactParams {
    fn default() -> Self {
        Self {
            red_brightness: 1.0,
            green_brightness: 1.0,
            blue_brightness: 1.0,
            contrast: 1.0,
            logarithmic_brightness: 0.0,
            negative: false,
            order: ChannelOrder::identity(),
            vertical_mirror: false,
            horizontal_mirror: false,
            magic: 0,
            logarithmic_clip: false,
            power_clip: 0.0,
            binary_clip: 0,
            slice_mode: SliceMode::Off,
            slice_low: 0,
            slice_high: 0,
            slice_value: 0,
            filter: FilterKind::None,
            filter_size: 0,
            sigma: 0.0,
            interval: 0.0,
            unsharp_masking: 0.0,
        }
    }
}

impl RedactParams {
    /// Parse a JSON object. Missing keys are neutral, unknown keys ignored.
    pub fn from_json(json: &str) -> RedactResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> RedactResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the web client's percent-scale JSON form.
    pub fn from_ui_json(json: &str) -> RedactResult<Self> {
        let ui: UiParams = serde_json::from_str(json)?;
        ui.into_params()
    }

    /// Intensity slicing settings, `None` when slicing is off.
    pub fn intensity_slice(&self) -> Option<IntensitySlice> {
        match self.slice_mode {
            SliceMode::Off => None,
            mode => Some(IntensitySlice {
                low: self.slice_low,
                high: self.slice_high,
                value: self.slice_value,
                mode,
            }),
        }
    }

    /// Whether every pipeline stage would be skipped.
    pub fn is_neutral(&self) -> bool {
        crate::pipeline::active_stages(self).is_empty()
    }
}

/// Percent-scale parameters as sent by the web client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UiParams {
    /// 0-200 percent, 100 (or missing) = unchanged
    pub red_brightness: f64,
    pub green_brightness: f64,
    pub blue_brightness: f64,
    /// Percent, 100 (or missing) = unchanged
    pub contrast: f64,
    /// Percent, 0 = disabled
    pub logarithmic_brightness: f64,
    pub negative: bool,
    pub order: String,
    pub vertical_mirror: bool,
    pub horizontal_mirror: bool,
    pub magic: i32,
    pub filter: String,
    pub filter_size: usize,
    pub sigma: f64,
    pub interval: f64,
    pub unsharp_masking: f64,
    pub logarithmic_clip: bool,
    pub power_clip: f64,
    pub binary_clip: u8,
    pub constant_low: u8,
    pub constant_high: u8,
    pub constant_value: u8,
    pub slice_mode: Option<SliceMode>,
}

impl UiParams {
    /// Convert to pipeline parameters.
    ///
    /// Fails only on an unknown filter name.
    pub fn into_params(self) -> RedactResult<RedactParams> {
        let slice_mode = self.slice_mode.unwrap_or(
            if self.constant_low != 0 || self.constant_high != 0 || self.constant_value != 0 {
                SliceMode::Constant
            } else {
                SliceMode::Off
            },
        );

        Ok(RedactParams {
            red_brightness: brightness_exponent(self.red_brightness),
            green_brightness: brightness_exponent(self.green_brightness),
            blue_brightness: brightness_exponent(self.blue_brightness),
            contrast: percent_or_unity(self.contrast),
            logarithmic_brightness: self.logarithmic_brightness / 100.0,
            negative: self.negative,
            order: if self.order.is_empty() {
                ChannelOrder::identity()
            } else {
                ChannelOrder::parse(&self.order)
            },
            vertical_mirror: self.vertical_mirror,
            horizontal_mirror: self.horizontal_mirror,
            magic: self.magic,
            logarithmic_clip: self.logarithmic_clip,
            power_clip: self.power_clip,
            binary_clip: self.binary_clip,
            slice_mode,
            slice_low: self.constant_low,
            slice_high: self.constant_high,
            slice_value: self.constant_value,
            filter: self.filter.parse()?,
            filter_size: self.filter_size,
            sigma: self.sigma,
            interval: self.interval,
            unsharp_masking: self.unsharp_masking,
        })
    }
}

/// 0 counts as "not sent" and means 100 percent.
fn percent_or_unity(percent: f64) -> f64 {
    if percent == 0.0 {
        1.0
    } else {
        percent / 100.0
    }
}

/// Slider percent to curve exponent: 100 -> 1.0, 200 -> 0.0, 0 -> 1.0.
fn brightness_exponent(percent: f64) -> f64 {
    let percent = if percent == 0.0 { 100.0 } else { percent };
    (200.0 - percent) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        let params = RedactParams::default();
        assert!(params.is_neutral());
        assert!(params.intensity_slice().is_none());
    }

    #[test]
    fn test_from_json_missing_fields_are_neutral() {
        let params = RedactParams::from_json("{}").unwrap();
        assert_eq!(params, RedactParams::default());
    }

    #[test]
    fn test_from_json_reads_fields() {
        let params = RedactParams::from_json(
            r#"{"negative": true, "order": "BGR", "filter": "Median", "filter_size": 3,
                "slice_mode": "preserve", "slice_low": 10, "slice_high": 20, "unknown": 1}"#,
        )
        .unwrap();

        assert!(params.negative);
        assert_eq!(params.order, ChannelOrder::parse("BGR"));
        assert_eq!(params.filter, FilterKind::Median);
        assert_eq!(params.filter_size, 3);
        assert_eq!(
            params.intensity_slice(),
            Some(IntensitySlice {
                low: 10,
                high: 20,
                value: 0,
                mode: SliceMode::Preserve,
            })
        );
        assert!(!params.is_neutral());
    }

    #[test]
    fn test_from_json_rejects_unknown_filter() {
        let result = RedactParams::from_json(r#"{"filter": "bilateral"}"#);
        assert!(matches!(result, Err(RedactError::InvalidParameters(_))));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(RedactParams::from_json("{not json").is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_order_text() {
        let mut params = RedactParams::default();
        params.order = ChannelOrder::parse("GBR");
        params.filter = FilterKind::Gaussian;

        let json = params.to_json().unwrap();
        assert!(json.contains(r#""order":"GBR""#));
        assert!(json.contains(r#""filter":"gaussian""#));
        assert_eq!(RedactParams::from_json(&json).unwrap(), params);
    }

    #[test]
    fn test_filter_kind_from_str() {
        assert_eq!("".parse::<FilterKind>().unwrap(), FilterKind::None);
        assert_eq!("Rectangular".parse::<FilterKind>().unwrap(), FilterKind::Rectangular);
        assert!(matches!(
            "unsharp".parse::<FilterKind>(),
            Err(RedactError::UnknownFilter(_))
        ));
    }

    // ========================================================================
    // UI form
    // ========================================================================

    #[test]
    fn test_ui_defaults_are_neutral() {
        let params = RedactParams::from_ui_json("{}").unwrap();
        assert!(params.is_neutral());
        assert_eq!(params.red_brightness, 1.0);
        assert_eq!(params.contrast, 1.0);
    }

    #[test]
    fn test_ui_percent_scaling() {
        let params = RedactParams::from_ui_json(
            r#"{"RedBrightness": 150, "GreenBrightness": 100, "BlueBrightness": 50,
                "Contrast": 120, "LogarithmicBrightness": 80, "Filter": "sigma",
                "FilterSize": 5, "Sigma": 2.5, "Interval": 2, "Order": "RGB"}"#,
        )
        .unwrap();

        assert_eq!(params.red_brightness, 0.5);
        assert_eq!(params.green_brightness, 1.0);
        assert_eq!(params.blue_brightness, 1.5);
        assert_eq!(params.contrast, 1.2);
        assert_eq!(params.logarithmic_brightness, 0.8);
        assert_eq!(params.filter, FilterKind::Sigma);
        assert_eq!(params.filter_size, 5);
        assert_eq!(params.interval, 2.0);
    }

    #[test]
    fn test_ui_constant_fields_enable_slicing() {
        let params = RedactParams::from_ui_json(
            r#"{"ConstantLow": 50, "ConstantHigh": 100, "ConstantValue": 7}"#,
        )
        .unwrap();
        assert_eq!(params.slice_mode, SliceMode::Constant);

        let params = RedactParams::from_ui_json(
            r#"{"ConstantLow": 50, "ConstantHigh": 100, "SliceMode": "preserve"}"#,
        )
        .unwrap();
        assert_eq!(params.slice_mode, SliceMode::Preserve);
    }

    #[test]
    fn test_ui_unknown_filter_fails() {
        let result = RedactParams::from_ui_json(r#"{"Filter": "kuwahara"}"#);
        assert!(matches!(result, Err(RedactError::UnknownFilter(_))));
    }
}
