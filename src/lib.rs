//! Image Redactor
//!
//! Configurable image-editing pipeline implemented in Rust, with Python
//! bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Every transform works on a [`PixelGrid`]: 8-bit RGB, shape
//! `(height, width, 3)`. Boundary layers convert from RGBA or numpy arrays.
//!
//! ## Pipeline
//! [`redact`] runs the enabled stages of a [`RedactParams`] record in a
//! fixed order on a copy of the input and returns the edited grid together
//! with a difference map against the input. [`process`] additionally
//! extracts the four channels and computes the histograms of the input.
//!
//! ```
//! use image_redactor::{redact, PixelGrid, RedactParams};
//!
//! let input = PixelGrid::filled(2, 2, [10, 20, 30]);
//! let params = RedactParams::from_json(r#"{"order": "BGR"}"#).unwrap();
//!
//! let result = redact(&input, &params);
//! assert_eq!(result.redacted.pixel(0, 0), [30, 20, 10]);
//! ```

pub mod error;
pub mod filters;
pub mod grid;
pub mod params;
pub mod pipeline;
pub mod statistics;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{RedactError, RedactResult};
pub use filters::channel_order::ChannelOrder;
pub use filters::grayscale::{extract_channel, extract_channels, Channel, ChannelSet};
pub use filters::levels::{IntensitySlice, SliceMode};
pub use grid::PixelGrid;
pub use params::{FilterKind, RedactParams, UiParams};
pub use pipeline::{active_stages, process, redact, ProcessedImage, Redaction, Stage};
pub use statistics::{statistics, BrightnessHistogram, ImageStatistics};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::RedactError;
    use crate::filters::grayscale::{self, Channel};
    use crate::grid::PixelGrid;
    use crate::params::RedactParams;
    use crate::{pipeline, statistics as stats};

    impl From<RedactError> for PyErr {
        fn from(err: RedactError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    fn to_grid(image: &PyReadonlyArray3<'_, u8>) -> PyResult<PixelGrid> {
        Ok(PixelGrid::from_array(image.as_array().to_owned())?)
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    /// Run the redaction pipeline.
    ///
    /// Returns `(changes, redacted)`, both `uint8` arrays shaped like the
    /// input. Missing parameters are neutral.
    #[pyfunction]
    #[pyo3(signature = (image, params_json=None))]
    pub fn redact<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        params_json: Option<&str>,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, Bound<'py, PyArray3<u8>>)> {
        let params = match params_json {
            Some(json) => RedactParams::from_json(json)?,
            None => RedactParams::default(),
        };
        let input = to_grid(&image)?;

        let result = py.allow_threads(|| pipeline::redact(&input, &params));
        Ok((
            result.changes.into_array().into_pyarray(py),
            result.redacted.into_array().into_pyarray(py),
        ))
    }

    // ========================================================================
    // Channels
    // ========================================================================

    /// Extract one channel by name (`red`, `green`, `blue`, `gray`).
    #[pyfunction]
    pub fn extract_channel<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        name: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let channel: Channel = name.parse()?;
        let input = to_grid(&image)?;
        let result = grayscale::extract_channel(&input, channel);
        Ok(result.into_array().into_pyarray(py))
    }

    /// Extract all channels as `(red, green, blue, gray)`.
    #[pyfunction]
    #[allow(clippy::type_complexity)]
    pub fn extract_channels<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<(
        Bound<'py, PyArray3<u8>>,
        Bound<'py, PyArray3<u8>>,
        Bound<'py, PyArray3<u8>>,
        Bound<'py, PyArray3<u8>>,
    )> {
        let input = to_grid(&image)?;
        let set = grayscale::extract_channels(&input);
        Ok((
            set.red.into_array().into_pyarray(py),
            set.green.into_array().into_pyarray(py),
            set.blue.into_array().into_pyarray(py),
            set.gray.into_array().into_pyarray(py),
        ))
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Histograms of the image as a JSON string.
    #[pyfunction]
    pub fn statistics(image: PyReadonlyArray3<'_, u8>) -> PyResult<String> {
        let input = to_grid(&image)?;
        Ok(stats::statistics(&input).to_json()?)
    }

    #[pymodule]
    pub fn image_redactor(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(redact, m)?)?;
        m.add_function(wrap_pyfunction!(extract_channel, m)?)?;
        m.add_function(wrap_pyfunction!(extract_channels, m)?)?;
        m.add_function(wrap_pyfunction!(statistics, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::image_redactor;
