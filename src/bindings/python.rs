use crate::config::{load_config, Config};
use crate::processing::acquisition::Sample;
use crate::processing::detrend::detrend;
use crate::processing::pipeline::PpgPipeline;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn to_py_err(e: crate::error::PpgError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

#[pyclass]
pub struct PyPpgPipeline {
    pipeline: PpgPipeline,
    fs: f64,
}

#[pymethods]
impl PyPpgPipeline {
    #[new]
    #[pyo3(signature = (capacity=300, fs=60.0, alternation_divisor=100))]
    pub fn new(capacity: usize, fs: f64, alternation_divisor: usize) -> PyResult<Self> {
        let mut config = Config::default();
        config.window.capacity = capacity;
        config.window.alternation_divisor = alternation_divisor;
        let pipeline = PpgPipeline::new(config).map_err(to_py_err)?;
        Ok(PyPpgPipeline { pipeline, fs })
    }

    #[staticmethod]
    pub fn from_config(path: String, fs: f64) -> PyResult<Self> {
        let config = load_config(path).map_err(to_py_err)?;
        let pipeline = PpgPipeline::new(config).map_err(to_py_err)?;
        Ok(PyPpgPipeline { pipeline, fs })
    }

    /// Returns `(value, is_signal_present)` for one raw intensity sample.
    pub fn push_sample(&mut self, value: f64) -> (f64, bool) {
        let timestamp = self.pipeline.frame_index() as f64 / self.fs;
        let state = self.pipeline.push_sample(Sample { timestamp, value });
        (state.current_value, state.is_signal_present)
    }

    pub fn run_chunk(&mut self, data: Vec<f64>) -> Vec<(f64, bool)> {
        data.into_iter().map(|value| self.push_sample(value)).collect()
    }

    pub fn reset(&mut self) {
        self.pipeline.reset();
    }

    #[getter]
    pub fn frame_index(&self) -> usize {
        self.pipeline.frame_index()
    }

    #[getter]
    pub fn held_mean(&self) -> f64 {
        self.pipeline.gate().held_mean()
    }
}

#[pyfunction]
pub fn detrend_window(window: Vec<f64>) -> PyResult<Vec<f64>> {
    detrend(&window).map_err(to_py_err)
}

/// A Python module implemented in Rust.
#[pymodule]
pub fn webcam_ppg(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPpgPipeline>()?;
    m.add_function(wrap_pyfunction!(detrend_window, m)?)?;
    Ok(())
}
