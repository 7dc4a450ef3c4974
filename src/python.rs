// Python bindings
//
// Plain dicts in and out; results use the key names downstream AAF tooling
// already reads (`primary_category`, `alternative_categories`).

use std::collections::HashMap;
use std::path::PathBuf;

use pyo3::exceptions::PyIOError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::ucs::{Categorizer, ClassificationResult, Taxonomy, UcsCategory, UcsMatch};
use crate::CategorizerConfig;

#[pymodule]
fn wavmeta(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(read_metadata, m)?)?;
    m.add_function(wrap_pyfunction!(categorize, m)?)?;
    m.add_function(wrap_pyfunction!(sanitize, m)?)?;
    Ok(())
}

/// Read the flat metadata map of a WAV file
#[pyfunction]
fn read_metadata<'py>(py: Python<'py>, path: PathBuf) -> PyResult<Bound<'py, PyDict>> {
    let metadata =
        crate::metadata::read_metadata(&path).map_err(|e| PyIOError::new_err(e.to_string()))?;

    let dict = PyDict::new(py);
    for (key, value) in metadata.to_flat_map().iter() {
        dict.set_item(key, value)?;
    }
    Ok(dict)
}

/// Classify a sound against taxonomy rows (dicts with id, full_name,
/// category, subcategory, description, keywords)
#[pyfunction]
#[pyo3(signature = (filename, description, taxonomy_rows, allow_guess=true))]
fn categorize<'py>(
    py: Python<'py>,
    filename: &str,
    description: &str,
    taxonomy_rows: Vec<HashMap<String, String>>,
    allow_guess: bool,
) -> PyResult<Bound<'py, PyDict>> {
    let taxonomy: Taxonomy = taxonomy_rows.iter().map(row_to_category).collect();
    let categorizer = Categorizer::new(CategorizerConfig {
        allow_guess,
        ..CategorizerConfig::default()
    });
    let result = categorizer.categorize(filename, description, &taxonomy);
    result_to_dict(py, &result)
}

/// Normalize a string the way every extracted value is normalized
#[pyfunction]
fn sanitize(value: &str) -> String {
    crate::utils::sanitize(value)
}

fn row_to_category(row: &HashMap<String, String>) -> UcsCategory {
    let field = |name: &str| row.get(name).map(String::as_str).unwrap_or("");
    UcsCategory::from_row(
        field("id"),
        field("full_name"),
        field("category"),
        field("subcategory"),
        field("description"),
        field("keywords"),
    )
}

fn result_to_dict<'py>(
    py: Python<'py>,
    result: &ClassificationResult<'_>,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    let Some(primary) = &result.primary else {
        return Ok(dict);
    };

    dict.set_item("primary_category", match_to_dict(py, primary)?)?;
    if !result.alternatives.is_empty() {
        let alternatives = PyList::empty(py);
        for alternative in &result.alternatives {
            alternatives.append(match_to_dict(py, alternative)?)?;
        }
        dict.set_item("alternative_categories", alternatives)?;
    }
    Ok(dict)
}

fn match_to_dict<'py>(py: Python<'py>, found: &UcsMatch<'_>) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("id", &found.category.id)?;
    dict.set_item("full_name", &found.category.full_name)?;
    dict.set_item("category", &found.category.category)?;
    dict.set_item("subcategory", &found.category.subcategory)?;
    dict.set_item("score", found.score)?;
    Ok(dict)
}
