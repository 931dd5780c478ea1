//! Extractor configuration
//!
//! Every field has a default, so a partial JSON document (or none at all) is a
//! valid configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk encoding used by the batch driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Trap,
    Jsonl,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Trap => "trap",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Write a `location` fact for every entity
    pub emit_locations: bool,
    /// Write md5 `key` facts for named declarations
    pub emit_keys: bool,
    /// Append diagnostics to the sink as `diagnostic` facts when a unit finishes
    pub emit_diagnostics: bool,
    /// Record a warning when the oracle cannot type an expression
    pub report_unresolved_types: bool,
    pub output_format: OutputFormat,
    /// Extra ignore patterns on top of `.trapperignore`
    pub ignore_patterns: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            emit_locations: true,
            emit_keys: true,
            emit_diagnostics: false,
            report_unresolved_types: true,
            output_format: OutputFormat::Trap,
            ignore_patterns: Vec::new(),
        }
    }
}

impl ExtractorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid extractor configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ExtractorConfig::from_json_str(r#"{ "emit_locations": false, "output_format": "jsonl" }"#)
                .unwrap();
        assert!(!config.emit_locations);
        assert_eq!(config.output_format, OutputFormat::Jsonl);
        assert!(config.emit_keys);
        assert!(config.report_unresolved_types);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(
            ExtractorConfig::from_json_str("{}").unwrap(),
            ExtractorConfig::default()
        );
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(ExtractorConfig::from_json_str(r#"{ "output_format": "xml" }"#).is_err());
    }
}
