// Python-bindinger (pyo3). Presentasjonslaget (Dash) sender JSON inn og får
// JSON tilbake; all logikk ligger i `crate::api`.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::api;
use crate::error::RideSimError;

fn to_py_err(e: RideSimError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// simulate_route_json(json_str) -> str
#[pyfunction]
fn simulate_route_json(json_str: &str) -> PyResult<String> {
    api::simulate_route_json(json_str).map_err(to_py_err)
}

/// pacing_table_json(strategy) -> str
#[pyfunction]
fn pacing_table_json(strategy: &str) -> PyResult<String> {
    api::pacing_table_json(strategy).map_err(to_py_err)
}

/// format_duration(seconds) -> str
#[pyfunction]
fn format_duration(seconds: f64) -> String {
    crate::aggregator::format_duration(seconds)
}

#[pymodule]
fn ridesim_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate_route_json, m)?)?;
    m.add_function(wrap_pyfunction!(pacing_table_json, m)?)?;
    m.add_function(wrap_pyfunction!(format_duration, m)?)?;
    Ok(())
}
