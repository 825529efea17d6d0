use octoplane_segmentation::{RansacParams, RansacPlaneSegmenter};
use octoplane_spatial::{OctreeError, SpaceOctree};
use pyo3::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cloud::PyPointCloud;

fn to_py_err(err: OctreeError) -> PyErr {
    match err {
        OctreeError::EmptyInput | OctreeError::DepthTooLarge { .. } => {
            pyo3::exceptions::PyValueError::new_err(err.to_string())
        }
        OctreeError::NotBuilt => pyo3::exceptions::PyAttributeError::new_err(err.to_string()),
    }
}

/// Octree whose leaves sit at a fixed depth and are segmented independently.
#[pyclass(name = "DepthOctree")]
#[derive(Debug, Clone)]
pub struct PyDepthOctree {
    inner: SpaceOctree,
}

#[pymethods]
impl PyDepthOctree {
    #[new]
    #[pyo3(signature = (depth = 1))]
    pub fn new(depth: usize) -> Self {
        Self {
            inner: SpaceOctree::new(depth),
        }
    }

    #[getter]
    pub fn depth(&self) -> usize {
        self.inner.depth()
    }

    pub fn build(&mut self, cloud: &PyPointCloud) -> PyResult<()> {
        self.inner.build(&cloud.inner).map_err(to_py_err)
    }

    /// Keep only the dominant RANSAC plane of every leaf.
    #[pyo3(signature = (distance_threshold = 0.01, iterations = 1000, seed = None))]
    pub fn segment_ransac(
        &mut self,
        py: Python<'_>,
        distance_threshold: f32,
        iterations: usize,
        seed: Option<u64>,
    ) -> PyResult<()> {
        if !distance_threshold.is_finite() || distance_threshold < 0.0 {
            return Err(pyo3::exceptions::PyValueError::new_err(
                "distance_threshold must be finite and >= 0",
            ));
        }
        let segmenter = RansacPlaneSegmenter::new(RansacParams {
            distance_threshold,
            iterations,
            seed,
        });
        let inner = &mut self.inner;
        py.allow_threads(|| inner.par_segment(&segmenter))
            .map_err(to_py_err)
    }

    /// All leaf points in one cloud, one random color per leaf.
    #[pyo3(signature = (seed = None))]
    pub fn export_colorized(&self, seed: Option<u64>) -> PyResult<PyPointCloud> {
        let cloud = match seed {
            Some(s) => self
                .inner
                .export_colorized_with_rng(&mut StdRng::seed_from_u64(s)),
            None => self.inner.export_colorized(),
        }
        .map_err(to_py_err)?;
        Ok(PyPointCloud { inner: cloud })
    }

    pub fn leaf_count(&self) -> usize {
        self.inner.leaf_count()
    }

    pub fn point_count(&self) -> usize {
        self.inner.point_count()
    }

    pub fn __repr__(&self) -> String {
        format!(
            "DepthOctree(depth={}, built={}, leaves={})",
            self.inner.depth(),
            self.inner.is_built(),
            self.inner.leaf_count()
        )
    }
}
