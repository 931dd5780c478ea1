// PyFact - PyO3 wrapper for one fact tuple

use pyo3::prelude::*;

use crate::extractors::base::{Fact, Value};
use crate::output::format_fact;

/// One `(subject, relation, args...)` tuple. Handles are rendered as `#unit_slot`.
#[pyclass(name = "Fact")]
pub struct PyFact {
    inner: Fact,
}

impl PyFact {
    pub fn from_fact(fact: Fact) -> Self {
        PyFact { inner: fact }
    }
}

#[pymethods]
impl PyFact {
    #[getter]
    fn subject(&self) -> String {
        self.inner.subject.to_string()
    }

    #[getter]
    fn relation(&self) -> &'static str {
        self.inner.relation.as_str()
    }

    /// Arguments as text; integers in decimal, handles as `#unit_slot`
    #[getter]
    fn args(&self) -> Vec<String> {
        self.inner
            .args
            .iter()
            .map(|arg| match arg {
                Value::Handle(h) => h.to_string(),
                Value::Int(i) => i.to_string(),
                Value::Str(s) => s.clone(),
            })
            .collect()
    }

    /// The fact as a TRAP line
    fn trap(&self) -> String {
        format_fact(&self.inner)
    }

    fn __repr__(&self) -> String {
        format!("Fact({})", format_fact(&self.inner))
    }
}
