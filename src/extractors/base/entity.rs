// Entity model shared by every language schema
//
// A schema supplies the closed set of kinds and the per-kind populators; the
// engine supplies identity, descriptive facts and failure bookkeeping.

use std::fmt;
use tree_sitter::Node;

use super::context::Context;
use super::error::ExtractionError;
use super::types::{Category, Handle};

/// Closed classification of a construct's concrete form.
pub trait KindTag: Copy + fmt::Debug + 'static {
    /// Upper-case tag written to the `kind` fact, e.g. `SIZEOF`.
    fn tag(&self) -> &'static str;

    fn category(&self) -> Category;
}

/// Syntactic owner of a node that can be reached by reference.
#[derive(Debug, Clone, Copy)]
pub struct Owner<'tree> {
    pub node: Node<'tree>,
    pub category: Category,
    pub index: u32,
}

/// A language's closed set of entity kinds and their populators.
pub trait Schema: Sized + 'static {
    type Kind: KindTag;

    /// Total over the category: every node either maps to exactly one kind or
    /// to `None`, which the dispatcher records as a classification failure.
    fn classify(category: Category, node: Node<'_>) -> Option<Self::Kind>;

    /// Kind-specific facts and child slots. Descriptive facts are already out
    /// when this runs.
    fn populate<'tree>(
        ctx: &mut Context<'_, 'tree, Self>,
        entity: &Entity<'tree, Self::Kind>,
    ) -> Result<Outcome, ExtractionError>;

    /// Owner entity and ordinal of `node`, for nodes that may be reached
    /// through a name before their owner visits them.
    fn enclosing<'tree>(node: Node<'tree>) -> Option<Owner<'tree>> {
        let _ = node;
        None
    }
}

/// Where a node was found: its category, owning entity and ordinal.
#[derive(Debug, Clone, Copy)]
pub struct EntityInfo<'tree> {
    pub node: Node<'tree>,
    pub category: Category,
    pub parent: Option<Handle>,
    pub index: u32,
}

impl<'tree> EntityInfo<'tree> {
    pub fn root(node: Node<'tree>, category: Category) -> Self {
        Self {
            node,
            category,
            parent: None,
            index: 0,
        }
    }

    pub fn child(node: Node<'tree>, category: Category, parent: Handle, index: u32) -> Self {
        Self {
            node,
            category,
            parent: Some(parent),
            index,
        }
    }
}

/// An identified entity about to be populated.
#[derive(Debug, Clone, Copy)]
pub struct Entity<'tree, K> {
    pub handle: Handle,
    pub kind: K,
    pub node: Node<'tree>,
    pub category: Category,
    pub parent: Option<Handle>,
    pub index: u32,
}

impl<'tree, K: KindTag> Entity<'tree, K> {
    /// Pure construction: no facts, no cache access.
    pub fn create(info: EntityInfo<'tree>, handle: Handle, kind: K) -> Self {
        Self {
            handle,
            kind,
            node: info.node,
            category: info.category,
            parent: info.parent,
            index: info.index,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}

/// Result of a population that did not abort.
///
/// Soft failures (an unanswered oracle query that did not stop the populator)
/// are carried here and end up as warnings.
#[derive(Debug, Default)]
pub struct Outcome {
    issues: Vec<ExtractionError>,
}

impl Outcome {
    pub fn complete() -> Self {
        Self::default()
    }

    pub fn degrade(&mut self, issue: ExtractionError) {
        self.issues.push(issue);
    }

    pub fn into_issues(self) -> Vec<ExtractionError> {
        self.issues
    }
}

/// Shared population pass: descriptive facts first, then the kind's slots.
pub(crate) fn populate<'tree, S: Schema>(
    ctx: &mut Context<'_, 'tree, S>,
    entity: &Entity<'tree, S::Kind>,
) -> Result<Outcome, ExtractionError> {
    ctx.describe(entity)?;
    S::populate(ctx, entity)
}
