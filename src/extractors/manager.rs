//! ExtractorManager - public API for fact extraction
//!
//! Parses sources and hands each unit to the factory with its own context and
//! sink. Batch extraction runs units in parallel with rayon; units share
//! nothing but the read-only configuration.

use anyhow::Context as _;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tree_sitter::{Parser, Tree};

use crate::config::ExtractorConfig;
use crate::extractors::base::{Fact, FactSink, MemorySink, UnitId, UnitReport};
use crate::output::create_file_sink;
use crate::utils::paths::output_path_for;
use crate::utils::sources::discover_sources;

/// Facts and report of one unit extracted in memory.
#[derive(Debug)]
pub struct UnitFacts {
    pub facts: Vec<Fact>,
    pub report: UnitReport,
}

/// Outcome of one file in a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct UnitOutcome {
    pub file_path: String,
    pub output_path: Option<PathBuf>,
    pub entities: usize,
    pub failed_entities: usize,
    pub diagnostics: usize,
    /// Set when the unit was aborted; its output file may be partial
    pub error: Option<String>,
}

/// Summary of a batch run, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub units: Vec<UnitOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.units.iter().filter(|u| u.error.is_none()).count()
    }

    pub fn aborted(&self) -> usize {
        self.units.len() - self.succeeded()
    }
}

/// Manager for fact extraction across files
pub struct ExtractorManager {
    config: ExtractorConfig,
}

impl Default for ExtractorManager {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl ExtractorManager {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn supported_languages(&self) -> Vec<&'static str> {
        crate::language::SUPPORTED_LANGUAGES.to_vec()
    }

    /// Extract one source into `sink`
    ///
    /// `file_path` is only used for language detection and the `file` fact;
    /// nothing is read from disk.
    pub fn extract_source(
        &self,
        file_path: &str,
        content: &str,
        unit: UnitId,
        sink: &mut dyn FactSink,
    ) -> Result<UnitReport, anyhow::Error> {
        let language = self.get_language_from_path(file_path)?;
        let tree = self.parse(&language, file_path, content)?;

        let report = super::factory::extract_facts(
            &tree,
            file_path,
            content,
            &language,
            unit,
            sink,
            &self.config,
        )?;

        debug!(
            "Extracted {} entities from {} file: {} ({} failed)",
            report.entities,
            language,
            file_path,
            report.failed.len()
        );
        Ok(report)
    }

    /// Extract one source into memory
    pub fn extract_to_memory(
        &self,
        file_path: &str,
        content: &str,
        unit: UnitId,
    ) -> Result<UnitFacts, anyhow::Error> {
        let mut sink = MemorySink::new();
        let report = self.extract_source(file_path, content, unit, &mut sink)?;
        Ok(UnitFacts {
            facts: sink.into_facts(),
            report,
        })
    }

    /// Read and extract a file on disk, stored under its path relative to `root`
    pub fn extract_file(
        &self,
        path: &Path,
        root: &Path,
        unit: UnitId,
    ) -> Result<UnitFacts, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let relative = crate::utils::paths::to_relative_unix_style(path, root)?;
        self.extract_to_memory(&relative, &content, unit)
    }

    /// Extract many in-memory sources in parallel
    ///
    /// Unit ids are `first_unit + index`, so handles stay distinct across the
    /// batch. Results keep input order.
    pub fn extract_files_batch(
        &self,
        files: &[(String, String)],
        first_unit: u32,
    ) -> Vec<Result<UnitFacts, anyhow::Error>> {
        files
            .par_iter()
            .enumerate()
            .map(|(index, (path, content))| {
                self.extract_to_memory(path, content, UnitId(first_unit + index as u32))
            })
            .collect()
    }

    /// Extract every C# source under `root`, writing one output file per unit under `trap_dir`
    ///
    /// A unit that aborts is reported in the summary; the others still run.
    pub fn extract_directory(
        &self,
        root: &Path,
        trap_dir: &Path,
    ) -> Result<BatchSummary, anyhow::Error> {
        let sources = discover_sources(root, &self.config.ignore_patterns)?;
        let format = self.config.output_format;

        let units: Vec<UnitOutcome> = sources
            .par_iter()
            .enumerate()
            .map(|(index, source)| {
                let output = output_path_for(&source.relative, trap_dir, format);
                let result = std::fs::read_to_string(&source.absolute)
                    .with_context(|| format!("Failed to read '{}'", source.absolute.display()))
                    .and_then(|content| {
                        let mut sink = create_file_sink(&output, format)?;
                        self.extract_source(
                            &source.relative,
                            &content,
                            UnitId(index as u32 + 1),
                            sink.as_mut(),
                        )
                    });
                match result {
                    Ok(report) => UnitOutcome {
                        file_path: source.relative.clone(),
                        output_path: Some(output),
                        entities: report.entities,
                        failed_entities: report.failed.len(),
                        diagnostics: report.diagnostics.len(),
                        error: None,
                    },
                    Err(e) => {
                        warn!("Extraction of '{}' aborted: {:#}", source.relative, e);
                        UnitOutcome {
                            file_path: source.relative.clone(),
                            output_path: None,
                            entities: 0,
                            failed_entities: 0,
                            diagnostics: 0,
                            error: Some(format!("{e:#}")),
                        }
                    }
                }
            })
            .collect();

        let summary = BatchSummary { units };
        info!(
            "Extracted {} of {} units from {} ({} aborted)",
            summary.succeeded(),
            summary.units.len(),
            root.display(),
            summary.aborted()
        );
        Ok(summary)
    }

    fn parse(&self, language: &str, file_path: &str, content: &str) -> Result<Tree, anyhow::Error> {
        let mut parser = Parser::new();
        let tree_sitter_language = crate::language::get_tree_sitter_language(language)?;
        parser.set_language(&tree_sitter_language).map_err(|e| {
            anyhow::anyhow!("Failed to set parser language for {}: {}", language, e)
        })?;
        parser
            .parse(content, None)
            .ok_or_else(|| anyhow::anyhow!("Failed to parse file: {}", file_path))
    }

    fn get_language_from_path(&self, file_path: &str) -> Result<String, anyhow::Error> {
        crate::language::detect_language(file_path)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Unsupported file: {}", file_path))
    }
}
