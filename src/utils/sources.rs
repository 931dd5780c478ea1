// Source discovery for batch extraction

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::ignore::{is_ignored_by_pattern, load_trapperignore, DEFAULT_PATTERNS};
use super::paths::to_relative_unix_style;

/// A source file found under an extraction root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub absolute: PathBuf,
    /// Unix-style path relative to the root; used in `file` facts and output names
    pub relative: String,
}

/// All `**/*.cs` files under `root`, minus ignored ones, sorted by relative path.
///
/// The sort makes unit ids (and therefore handles) reproducible between runs.
pub fn discover_sources(root: &Path, extra_patterns: &[String]) -> Result<Vec<SourceFile>> {
    let mut patterns: Vec<String> = DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect();
    patterns.extend(load_trapperignore(root)?);
    patterns.extend(extra_patterns.iter().cloned());

    let root_text = root
        .to_str()
        .context("Extraction root contains invalid UTF-8")?;
    let query = format!("{}/**/*.cs", glob::Pattern::escape(root_text));

    let mut sources = Vec::new();
    for entry in glob::glob(&query).context("Invalid source glob")? {
        let absolute = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping unreadable path during discovery: {}", e);
                continue;
            }
        };
        if !absolute.is_file() {
            continue;
        }
        let relative = to_relative_unix_style(&absolute, root)?;
        if is_ignored_by_pattern(&relative, &patterns) {
            debug!("Ignoring {}", relative);
            continue;
        }
        sources.push(SourceFile { absolute, relative });
    }

    sources.sort_by(|a, b| a.relative.cmp(&b.relative));
    debug!("Discovered {} C# sources under {}", sources.len(), root.display());
    Ok(sources)
}
