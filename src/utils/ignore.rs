//! `.trapperignore` handling
//!
//! Patterns come from a `.trapperignore` file at the extraction root plus the
//! configured `ignore_patterns`. Matching is against the relative Unix-style
//! path of a source.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const IGNORE_FILE: &str = ".trapperignore";

/// Directories no C# build ever wants extracted.
pub const DEFAULT_PATTERNS: &[&str] = &["bin/", "obj/", ".git/"];

/// Load patterns from `<root>/.trapperignore`
///
/// Empty lines and `#` comments are skipped. A missing file is no patterns.
pub fn load_trapperignore(root: &Path) -> Result<Vec<String>> {
    let ignore_file = root.join(IGNORE_FILE);
    if !ignore_file.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&ignore_file)
        .with_context(|| format!("Failed to read {}", ignore_file.display()))?;
    let patterns: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    if !patterns.is_empty() {
        debug!("Loaded {} ignore patterns from {}", patterns.len(), IGNORE_FILE);
    }
    Ok(patterns)
}

/// Check a relative path against ignore patterns
///
/// - `dir/` matches the directory `dir` as a whole path component
/// - `*.ext` matches a suffix
/// - anything else matches as a substring
pub fn is_ignored_by_pattern(relative_unix: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| {
        if let Some(dir) = pattern.strip_suffix('/') {
            relative_unix.split('/').any(|component| component == dir)
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            relative_unix.ends_with(suffix)
        } else {
            relative_unix.contains(pattern.as_str())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_missing_ignore_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_trapperignore(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_load_skips_comments_and_blanks() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(IGNORE_FILE),
            "# generated code\nGenerated/\n*.Designer.cs\n\nMigrations\n",
        )
        .unwrap();

        let loaded = load_trapperignore(temp_dir.path()).unwrap();
        assert_eq!(loaded, patterns(&["Generated/", "*.Designer.cs", "Migrations"]));
    }

    #[test]
    fn test_directory_pattern_matches_whole_components() {
        let list = patterns(&["obj/"]);
        assert!(is_ignored_by_pattern("obj/Debug/AssemblyInfo.cs", &list));
        assert!(is_ignored_by_pattern("src/App/obj/Temp.cs", &list));
        assert!(!is_ignored_by_pattern("src/myobj/Thing.cs", &list));
        assert!(!is_ignored_by_pattern("src/obj-old/Thing.cs", &list));
    }

    #[test]
    fn test_suffix_and_substring_patterns() {
        let list = patterns(&["*.Designer.cs", "Migrations"]);
        assert!(is_ignored_by_pattern("Forms/Main.Designer.cs", &list));
        assert!(is_ignored_by_pattern("Data/Migrations/001_Init.cs", &list));
        assert!(!is_ignored_by_pattern("Forms/Main.cs", &list));
    }
}
