use numpy::{Element, PyArray2, PyArrayMethods, PyUntypedArrayMethods};
use octoplane_core::{HasColor, PointCloud};
use pyo3::prelude::*;

#[pyclass(name = "PointCloud")]
#[derive(Debug, Clone)]
pub struct PyPointCloud {
    pub(crate) inner: PointCloud,
}

#[pymethods]
impl PyPointCloud {
    #[new]
    pub fn new() -> Self {
        Self {
            inner: PointCloud::new(),
        }
    }

    /// Create a PointCloud from an Nx3 NumPy array.
    ///
    /// Accepts f32 or f64 arrays; f64 is narrowed to f32. The array must be
    /// C-contiguous (row-major).
    #[staticmethod]
    pub fn from_numpy(array: &Bound<'_, PyAny>) -> PyResult<Self> {
        if let Ok(arr) = array.downcast::<PyArray2<f32>>() {
            return Self::from_rows(arr, |v| v);
        }
        if let Ok(arr) = array.downcast::<PyArray2<f64>>() {
            return Self::from_rows(arr, |v| v as f32);
        }
        Err(pyo3::exceptions::PyTypeError::new_err(
            "expected NumPy array with dtype float32 or float64, shape (N, 3)",
        ))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Positions as an Nx3 float32 array.
    pub fn to_numpy<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let rows: Vec<Vec<f32>> = self.inner.iter_points().map(|p| p.to_vec()).collect();
        if rows.is_empty() {
            return Ok(PyArray2::zeros_bound(py, [0, 3], false));
        }
        Ok(PyArray2::from_vec2_bound(py, &rows)?)
    }

    /// Colors as an Nx3 uint8 array, or `None` for an uncolored cloud.
    pub fn colors_numpy<'py>(&self, py: Python<'py>) -> PyResult<Option<Bound<'py, PyArray2<u8>>>> {
        let Some(points) = self.inner.iter_colored() else {
            return Ok(None);
        };
        let rows: Vec<Vec<u8>> = points.map(|p| p.color().to_vec()).collect();
        if rows.is_empty() {
            return Ok(Some(PyArray2::zeros_bound(py, [0, 3], false)));
        }
        Ok(Some(PyArray2::from_vec2_bound(py, &rows)?))
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    pub fn __repr__(&self) -> String {
        format!(
            "PointCloud(n={}, colored={})",
            self.inner.len(),
            self.inner.colors.is_some()
        )
    }
}

impl PyPointCloud {
    fn from_rows<T, F>(array: &Bound<'_, PyArray2<T>>, cast: F) -> PyResult<Self>
    where
        T: Element + Copy,
        F: Fn(T) -> f32,
    {
        // Fortran-order memory would be read with the wrong stride
        if !array.is_c_contiguous() {
            return Err(pyo3::exceptions::PyValueError::new_err(
                "array must be C-contiguous (row-major). \
                 Use numpy.ascontiguousarray(arr) to convert.",
            ));
        }
        let readonly = array.readonly();
        let shape = readonly.shape();
        if shape.len() != 2 || shape[1] != 3 {
            return Err(pyo3::exceptions::PyValueError::new_err(
                "expected shape (N, 3)",
            ));
        }
        let slice = readonly.as_slice().map_err(|_| {
            pyo3::exceptions::PyValueError::new_err("failed to read array as contiguous slice")
        })?;
        let points = slice
            .chunks_exact(3)
            .map(|c| [cast(c[0]), cast(c[1]), cast(c[2])]);
        Ok(Self {
            inner: PointCloud::from_points(points),
        })
    }
}
