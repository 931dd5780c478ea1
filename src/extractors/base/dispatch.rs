// Dispatcher: classify, consult the identity cache, hand off to the populator.
//
// Emits no facts itself. Domain failures stop at the entity that raised them;
// only `FatalError` travels up the call stack.

use tracing::{debug, warn};
use tree_sitter::Node;

use super::cache::SlotState;
use super::context::Context;
use super::diagnostics::{Severity, Subject};
use super::entity::{self, Entity, EntityInfo, KindTag, Schema};
use super::error::{ExtractionError, FatalError};
use super::types::{Category, Handle, NodeKey, Span};

impl<'a, 'tree, S: Schema> Context<'a, 'tree, S> {
    /// Handle for `info.node`, populating it on first sight.
    ///
    /// Returns [`Handle::UNRESOLVED`] (after recording a diagnostic) when the
    /// node does not classify under `info.category`.
    pub fn extract(&mut self, info: EntityInfo<'tree>) -> Result<Handle, FatalError> {
        let Some(kind) = S::classify(info.category, info.node) else {
            self.classification_failure(info.node, info.category);
            return Ok(Handle::UNRESOLVED);
        };

        let (handle, is_new) =
            self.cache
                .lookup_or_reserve(NodeKey::of(&info.node), kind.tag(), info.category);
        if !is_new {
            self.check_category(handle, info.category);
            return Ok(handle);
        }

        let entity = Entity::create(info, handle, kind);
        self.try_populate(&entity)?;
        Ok(handle)
    }

    /// Handle for a node reached through a name rather than by containment.
    ///
    /// Uncached nodes are placed under their syntactic owner (extracted first,
    /// recursively) so their `parent` fact does not depend on which path found
    /// them. Nodes without an owner are only returned when already cached.
    pub fn extract_reference(
        &mut self,
        node: Node<'tree>,
        category: Category,
    ) -> Result<Handle, FatalError> {
        if let Some(handle) = self.cache.get(NodeKey::of(&node)) {
            return Ok(handle);
        }
        let Some(owner) = S::enclosing(node) else {
            return Ok(Handle::UNRESOLVED);
        };

        let parent = self.extract_reference(owner.node, owner.category)?;
        // Populating the owner may already have visited this node.
        if let Some(handle) = self.cache.get(NodeKey::of(&node)) {
            return Ok(handle);
        }
        if !parent.is_resolved() {
            return Ok(Handle::UNRESOLVED);
        }
        self.extract(EntityInfo::child(node, category, parent, owner.index))
    }

    fn try_populate(&mut self, entity: &Entity<'tree, S::Kind>) -> Result<(), FatalError> {
        let handle = entity.handle;
        if !self.cache.begin(handle) {
            return Err(FatalError::IdentityViolation(handle));
        }

        match entity::populate::<S>(self, entity) {
            Ok(outcome) => {
                for issue in outcome.into_issues() {
                    self.report(
                        Severity::Warning,
                        Subject::Entity(handle),
                        Some(entity.category),
                        issue.to_string(),
                    );
                }
                self.cache.finish(handle, SlotState::Populated);
            }
            Err(ExtractionError::Fatal(fatal)) => {
                self.cache.finish(handle, SlotState::Failed);
                return Err(fatal);
            }
            Err(err) => {
                warn!(
                    "Population of {} {} failed in '{}': {}",
                    entity.tag(),
                    handle,
                    self.file_path(),
                    err
                );
                self.report(
                    Severity::Error,
                    Subject::Entity(handle),
                    Some(entity.category),
                    err.to_string(),
                );
                self.cache.finish(handle, SlotState::Failed);
            }
        }
        Ok(())
    }

    fn classification_failure(&mut self, node: Node<'tree>, category: Category) {
        let span = Span::of(&node);
        debug!(
            "Unclassified {} node `{}` at {} in '{}'",
            category,
            node.kind(),
            span,
            self.file_path()
        );
        self.report(
            Severity::Error,
            Subject::Location(span),
            Some(category),
            format!("unhandled {} kind `{}`", category, node.kind()),
        );
    }

    fn check_category(&mut self, handle: Handle, requested: Category) {
        let Some(existing) = self.cache.slot(handle).map(|s| s.category) else {
            return;
        };
        if existing != requested {
            warn!(
                "Entity {} was created as {} but requested as {}",
                handle, existing, requested
            );
            self.report(
                Severity::Internal,
                Subject::Entity(handle),
                Some(requested),
                format!("created as {existing}, requested as {requested}"),
            );
        }
    }
}
