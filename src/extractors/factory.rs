//! Shared extractor factory - single entry point from a parsed tree to facts
//!
//! Every path that turns a tree into facts (manager, batch driver, Python
//! surface) goes through [`extract_facts`], so a language is either supported
//! everywhere or nowhere.

use anyhow::anyhow;
use tree_sitter::Tree;

use crate::config::ExtractorConfig;
use crate::extractors::base::{
    Category, Context, EntityInfo, FactSink, FatalError, Schema, SemanticOracle, UnitId,
    UnitReport,
};
use crate::extractors::csharp::{CSharp, SyntacticOracle};

/// Extract one compilation unit into `sink`.
///
/// # Parameters
/// - `tree`: pre-parsed tree-sitter AST of `content`
/// - `file_path`: relative Unix-style path, written to the `file` fact
/// - `language`: language identifier (`"csharp"`)
/// - `unit`: distinct per unit within a run; forms the high half of every handle
///
/// Domain failures end up in the report's diagnostics. Only a fatal error
/// (unwritable sink, lost oracle, identity violation) is returned as `Err`.
pub fn extract_facts(
    tree: &Tree,
    file_path: &str,
    content: &str,
    language: &str,
    unit: UnitId,
    sink: &mut dyn FactSink,
    config: &ExtractorConfig,
) -> Result<UnitReport, anyhow::Error> {
    match language {
        "csharp" => {
            let oracle = SyntacticOracle::new(tree, content);
            let report =
                extract_unit::<CSharp>(tree, file_path, content, unit, &oracle, sink, config)?;
            Ok(report)
        }
        _ => Err(anyhow!(
            "No extractor available for language '{}' (file: {})",
            language,
            file_path
        )),
    }
}

/// Run one unit through the engine with an explicit oracle.
///
/// The root node is extracted as a declaration under the unit's file entity.
pub fn extract_unit<'tree, S: Schema>(
    tree: &'tree Tree,
    file_path: &str,
    content: &'tree str,
    unit: UnitId,
    oracle: &dyn SemanticOracle<'tree>,
    sink: &mut dyn FactSink,
    config: &ExtractorConfig,
) -> Result<UnitReport, FatalError> {
    let mut ctx: Context<'_, 'tree, S> =
        Context::new(unit, file_path, content, oracle, sink, config)?;
    let file = ctx.file();
    ctx.extract(EntityInfo::child(
        tree.root_node(),
        Category::Declaration,
        file,
        0,
    ))?;
    ctx.finish()
}
