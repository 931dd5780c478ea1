//! On-disk fact sinks
//!
//! Both writers stream one line per fact in emission order and never read
//! back. Each unit gets its own writer; nothing here is shared across threads.

mod jsonl;
mod trap;

pub use jsonl::JsonLinesWriter;
pub use trap::{format_fact, TrapWriter};

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::config::OutputFormat;
use crate::extractors::base::FactSink;

/// Create `path` (and its parent directories) and wrap it in the writer for `format`.
pub fn create_file_sink(path: &Path, format: OutputFormat) -> Result<Box<dyn FactSink + Send>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory '{}'", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
    let writer = BufWriter::new(file);
    Ok(match format {
        OutputFormat::Trap => Box::new(TrapWriter::new(writer)),
        OutputFormat::Jsonl => Box::new(JsonLinesWriter::new(writer)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{Fact, Relation};
    use tempfile::TempDir;

    #[test]
    fn test_file_sink_creates_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("src/Core/A.cs.trap");
        {
            let mut sink = create_file_sink(&path, OutputFormat::Trap).unwrap();
            sink.emit(Fact::new(
                crate::extractors::base::Handle::UNRESOLVED,
                Relation::Name,
                vec!["A".into()],
            ))
            .unwrap();
            sink.flush().unwrap();
        }
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "name(#unresolved,\"A\")\n");
    }
}
