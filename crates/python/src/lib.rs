#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

mod cloud;
mod octree;

#[pymodule]
fn octoplane_rs(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<cloud::PyPointCloud>()?;
    m.add_class::<octree::PyDepthOctree>()?;
    Ok(())
}
