use crate::blobs::{extract_blobs, MinBlobSize};
use crate::track::python::PyObjectTrack;
use crate::trackers::engine::python::PyTrackingEngine;
use crate::utils::bbox::python::PyBoundingBox;
use image::GrayImage;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Extracts bounding boxes of the outer contours from a row-major byte mask
///
#[pyfunction]
#[pyo3(name = "extract_blobs", signature = (width, height, data, min_width = 3, min_height = 3))]
fn extract_blobs_py(
    width: u32,
    height: u32,
    data: Vec<u8>,
    min_width: i32,
    min_height: i32,
) -> PyResult<Vec<PyBoundingBox>> {
    let mask = GrayImage::from_raw(width, height, data)
        .ok_or_else(|| PyValueError::new_err("Mask buffer doesn't match its dimensions"))?;
    Ok(extract_blobs(&mask, MinBlobSize::new(min_width, min_height))
        .into_iter()
        .map(PyBoundingBox)
        .collect())
}

#[pymodule]
#[pyo3(name = "blobtrack")]
fn blobtrack(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyBoundingBox>()?;
    m.add_class::<PyObjectTrack>()?;
    m.add_class::<PyTrackingEngine>()?;

    m.add_function(wrap_pyfunction!(extract_blobs_py, m)?)?;
    Ok(())
}
