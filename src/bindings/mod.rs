// PyO3 Bindings Module
//
// Python surface over the extractor manager. Built only with the `python`
// feature; wraps facts and unit reports in read-only PyO3 classes.

mod api;
mod extraction_results;
mod fact;

pub use api::{detect_language, extract_file, extract_files_batch, hash_content, supported_languages};
pub use extraction_results::PyExtractionResults;
pub use fact::PyFact;
