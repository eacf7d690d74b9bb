//! WebAssembly exports for the redaction pipeline.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images cross
//! the boundary as flat RGBA bytes (canvas `ImageData` layout); alpha is
//! dropped on the way in and written back as 255.

use wasm_bindgen::prelude::*;

use crate::error::RedactError;
use crate::filters::grayscale::{extract_channel, Channel};
use crate::grid::PixelGrid;
use crate::params::RedactParams;
use crate::pipeline::redact;
use crate::statistics::statistics;

fn js_error(err: RedactError) -> JsError {
    JsError::new(&err.to_string())
}

// ============================================================================
// Pipeline
// ============================================================================

/// Result of [`redact_rgba`], both images as flat RGBA bytes.
#[wasm_bindgen]
pub struct RedactOutput {
    changes: Vec<u8>,
    redacted: Vec<u8>,
}

#[wasm_bindgen]
impl RedactOutput {
    /// Difference map against the input
    #[wasm_bindgen(getter)]
    pub fn changes(&self) -> Vec<u8> {
        self.changes.clone()
    }

    /// Edited image
    #[wasm_bindgen(getter)]
    pub fn redacted(&self) -> Vec<u8> {
        self.redacted.clone()
    }
}

/// Run the redaction pipeline on an RGBA image.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `params_json` - Parameter record as JSON; missing fields are neutral
#[wasm_bindgen]
pub fn redact_rgba(
    data: &[u8],
    width: usize,
    height: usize,
    params_json: &str,
) -> Result<RedactOutput, JsError> {
    let params = RedactParams::from_json(params_json).map_err(js_error)?;
    let input = PixelGrid::from_raw_rgba(width, height, data).map_err(js_error)?;

    let result = redact(&input, &params);
    Ok(RedactOutput {
        changes: result.changes.to_raw_rgba(),
        redacted: result.redacted.to_raw_rgba(),
    })
}

// ============================================================================
// Channels & Statistics
// ============================================================================

/// Extract one channel (`red`, `green`, `blue` or `gray`) of an RGBA image.
#[wasm_bindgen]
pub fn extract_channel_rgba(
    data: &[u8],
    width: usize,
    height: usize,
    channel: &str,
) -> Result<Vec<u8>, JsError> {
    let channel: Channel = channel.parse().map_err(js_error)?;
    let input = PixelGrid::from_raw_rgba(width, height, data).map_err(js_error)?;
    Ok(extract_channel(&input, channel).to_raw_rgba())
}

/// Histograms of an RGBA image as JSON.
#[wasm_bindgen]
pub fn statistics_json(data: &[u8], width: usize, height: usize) -> Result<String, JsError> {
    let input = PixelGrid::from_raw_rgba(width, height, data).map_err(js_error)?;
    statistics(&input).to_json().map_err(js_error)
}
