// Trapper Core - tree-sitter based fact extraction
//
// Walks a C# syntax tree and writes relational facts (one tuple per line) for
// a downstream query engine. The engine in `extractors::base` is
// language-agnostic; `extractors::csharp` plugs in the C# kinds.
//
// The optional `python` feature exposes the manager as a PyO3 module.

pub mod config;
pub mod extractors;
pub mod language;
pub mod output;
pub mod utils;

#[cfg(feature = "python")]
pub mod bindings;

pub use config::{ExtractorConfig, OutputFormat};
pub use extractors::base::{
    Diagnostic, Diagnostics, Fact, FactSink, FatalError, Handle, MemorySink, Relation,
    SemanticOracle, Severity, UnitId, UnitReport, Value,
};
pub use extractors::{extract_facts, ExtractorManager};
pub use output::{JsonLinesWriter, TrapWriter};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Trapper Core Python module
#[cfg(feature = "python")]
#[pymodule]
fn trapper_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    m.add_function(wrap_pyfunction!(bindings::extract_file, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::extract_files_batch, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::detect_language, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::supported_languages, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::hash_content, m)?)?;

    m.add_class::<bindings::PyFact>()?;
    m.add_class::<bindings::PyExtractionResults>()?;

    Ok(())
}
