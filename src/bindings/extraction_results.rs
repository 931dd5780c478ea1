// PyExtractionResults - facts and report of one unit

use pyo3::prelude::*;

use super::PyFact;
use crate::extractors::base::Severity;
use crate::extractors::manager::UnitFacts;

#[pyclass(name = "ExtractionResults")]
pub struct PyExtractionResults {
    inner: UnitFacts,
}

impl PyExtractionResults {
    pub fn from_unit(unit: UnitFacts) -> Self {
        PyExtractionResults { inner: unit }
    }
}

#[pymethods]
impl PyExtractionResults {
    #[getter]
    fn file_path(&self) -> String {
        self.inner.report.file_path.clone()
    }

    #[getter]
    fn facts(&self) -> Vec<PyFact> {
        self.inner
            .facts
            .iter()
            .map(|f| PyFact::from_fact(f.clone()))
            .collect()
    }

    #[getter]
    fn entities(&self) -> usize {
        self.inner.report.entities
    }

    #[getter]
    fn failed_entities(&self) -> Vec<String> {
        self.inner.report.failed.iter().map(|h| h.to_string()).collect()
    }

    /// Diagnostics rendered as `severity at subject: message`
    #[getter]
    fn diagnostics(&self) -> Vec<String> {
        self.inner
            .report
            .diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect()
    }

    #[getter]
    fn error_count(&self) -> usize {
        self.inner.report.diagnostics.count(Severity::Error)
    }

    fn __repr__(&self) -> String {
        format!(
            "ExtractionResults(file={}, facts={}, entities={}, failed={})",
            self.inner.report.file_path,
            self.inner.facts.len(),
            self.inner.report.entities,
            self.inner.report.failed.len()
        )
    }
}
