// API Functions - PyO3-exposed functions for Python

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use tracing::warn;

use super::PyExtractionResults;
use crate::config::ExtractorConfig;
use crate::extractors::base::UnitId;
use crate::extractors::manager::ExtractorManager;

fn manager_for(config_json: Option<&str>) -> PyResult<ExtractorManager> {
    let config = match config_json {
        Some(json) => ExtractorConfig::from_json_str(json)
            .map_err(|e| PyValueError::new_err(format!("{e:#}")))?,
        None => ExtractorConfig::default(),
    };
    Ok(ExtractorManager::new(config))
}

/// Extract facts from one source
///
/// Args:
///     content (str): source text
///     file_path (str): relative path, used for language detection and the `file` fact
///     config (str | None): JSON extractor configuration
///
/// Raises:
///     ValueError: unsupported file or aborted unit
#[pyfunction]
#[pyo3(signature = (content, file_path, config=None))]
pub fn extract_file(
    content: &str,
    file_path: &str,
    config: Option<&str>,
) -> PyResult<PyExtractionResults> {
    let manager = manager_for(config)?;
    let unit = manager
        .extract_to_memory(file_path, content, UnitId(1))
        .map_err(|e| PyValueError::new_err(format!("Extraction failed: {e:#}")))?;
    Ok(PyExtractionResults::from_unit(unit))
}

/// Extract many sources in parallel with the GIL released
///
/// Args:
///     files (list[tuple[str, str]]): `(file_path, content)` pairs
///     config (str | None): JSON extractor configuration
///
/// Returns:
///     list[ExtractionResults | None]: input order; `None` for aborted units
#[pyfunction]
#[pyo3(signature = (files, config=None))]
pub fn extract_files_batch(
    py: Python<'_>,
    files: Vec<(String, String)>,
    config: Option<&str>,
) -> PyResult<Vec<Option<PyExtractionResults>>> {
    let manager = manager_for(config)?;
    let results = py.detach(move || manager.extract_files_batch(&files, 1));

    Ok(results
        .into_iter()
        .map(|result| match result {
            Ok(unit) => Some(PyExtractionResults::from_unit(unit)),
            Err(e) => {
                warn!("Batch extraction skipped a unit: {:#}", e);
                None
            }
        })
        .collect())
}

/// Language of a path, or "text" when no extractor handles it
#[pyfunction]
#[pyo3(signature = (file_path))]
pub fn detect_language(file_path: &str) -> String {
    crate::language::detect_language(file_path)
        .unwrap_or("text")
        .to_string()
}

#[pyfunction]
pub fn supported_languages() -> Vec<String> {
    crate::language::SUPPORTED_LANGUAGES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// blake3 hex digest, the same hash the `file` fact records
#[pyfunction]
pub fn hash_content(content: &str) -> String {
    crate::utils::hashing::hash_content(content)
}
