// Per-unit extraction context
//
// Owns the identity cache and diagnostics of one compilation unit and borrows
// the oracle and sink for exactly as long as the unit takes. Never reused
// across units.

use serde::Serialize;
use std::marker::PhantomData;
use tracing::debug;

use super::cache::{IdentityCache, SlotState};
use super::diagnostics::{Diagnostic, Diagnostics, Severity, Subject};
use super::entity::Schema;
use super::error::FatalError;
use super::facts::{Fact, FactSink, Relation, Value};
use super::oracle::SemanticOracle;
use super::types::{Category, Handle, UnitId};
use crate::config::ExtractorConfig;
use crate::utils::hashing::hash_content;

/// Summary of one finished unit.
#[derive(Debug, Clone, Serialize)]
pub struct UnitReport {
    pub unit: UnitId,
    pub file_path: String,
    pub file: Handle,
    pub entities: usize,
    /// Entities whose population failed; their partial facts stay in the sink
    pub failed: Vec<Handle>,
    pub diagnostics: Diagnostics,
}

pub struct Context<'a, 'tree, S: Schema> {
    unit: UnitId,
    file_path: String,
    source: &'tree str,
    file: Handle,
    oracle: &'a dyn SemanticOracle<'tree>,
    sink: &'a mut dyn FactSink,
    pub(crate) cache: IdentityCache,
    diagnostics: Diagnostics,
    config: &'a ExtractorConfig,
    _schema: PhantomData<S>,
}

impl<'a, 'tree, S: Schema> Context<'a, 'tree, S> {
    /// Open a unit: allocates the file entity and writes its facts.
    pub fn new(
        unit: UnitId,
        file_path: &str,
        source: &'tree str,
        oracle: &'a dyn SemanticOracle<'tree>,
        sink: &'a mut dyn FactSink,
        config: &'a ExtractorConfig,
    ) -> Result<Self, FatalError> {
        let mut cache = IdentityCache::new(unit);
        let file = cache.allocate_detached("FILE", Category::File);
        cache.begin(file);

        let mut ctx = Self {
            unit,
            file_path: file_path.to_string(),
            source,
            file,
            oracle,
            sink,
            cache,
            diagnostics: Diagnostics::new(),
            config,
            _schema: PhantomData,
        };

        let hash = hash_content(source);
        ctx.emit(
            file,
            Relation::Kind,
            vec![Category::File.to_string().into(), "FILE".into()],
        )?;
        ctx.emit(
            file,
            Relation::File,
            vec![ctx.file_path.clone().into(), hash.into()],
        )?;
        ctx.cache.finish(file, SlotState::Populated);

        debug!("Opened unit {} for '{}'", unit.0, ctx.file_path);
        Ok(ctx)
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn file(&self) -> Handle {
        self.file
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn source(&self) -> &'tree str {
        self.source
    }

    pub fn oracle(&self) -> &'a dyn SemanticOracle<'tree> {
        self.oracle
    }

    pub fn config(&self) -> &'a ExtractorConfig {
        self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    /// Append one tuple to the sink.
    pub fn emit(
        &mut self,
        subject: Handle,
        relation: Relation,
        args: Vec<Value>,
    ) -> Result<(), FatalError> {
        self.sink.emit(Fact::new(subject, relation, args))?;
        Ok(())
    }

    pub(crate) fn report(
        &mut self,
        severity: Severity,
        subject: Subject,
        category: Option<Category>,
        message: String,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            subject,
            category,
            message,
        });
    }

    /// Close the unit. Optionally mirrors diagnostics into the sink, then flushes it.
    pub fn finish(mut self) -> Result<UnitReport, FatalError> {
        if self.config.emit_diagnostics {
            let entries: Vec<Diagnostic> = self.diagnostics.iter().cloned().collect();
            for diagnostic in entries {
                let subject = match diagnostic.subject {
                    Subject::Entity(handle) => handle,
                    Subject::Location(_) => self.file,
                };
                let message = match diagnostic.subject {
                    Subject::Entity(_) => diagnostic.message.clone(),
                    Subject::Location(span) => format!("{} ({})", diagnostic.message, span),
                };
                self.emit(
                    subject,
                    Relation::Diagnostic,
                    vec![diagnostic.severity.to_string().into(), message.into()],
                )?;
            }
        }
        self.sink.flush()?;

        let report = UnitReport {
            unit: self.unit,
            file_path: self.file_path,
            file: self.file,
            entities: self.cache.len(),
            failed: self.cache.handles_in(SlotState::Failed).collect(),
            diagnostics: self.diagnostics,
        };
        debug!(
            "Closed unit {} ('{}'): {} entities, {} failed, {} diagnostics",
            report.unit.0,
            report.file_path,
            report.entities,
            report.failed.len(),
            report.diagnostics.len()
        );
        Ok(report)
    }
}
