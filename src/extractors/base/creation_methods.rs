// Fact creation helpers used by every populator
//
// Descriptive facts, child links, keys and oracle-backed facts. Populators call
// these instead of talking to the sink directly so ordering stays uniform.

use tree_sitter::Node;

use super::context::Context;
use super::entity::{Entity, EntityInfo, Outcome, Schema};
use super::error::{ExtractionError, FatalError, ResolutionError};
use super::facts::{Relation, Value};
use super::types::{Category, Handle, Role, Span};

impl<'a, 'tree, S: Schema> Context<'a, 'tree, S> {
    /// `kind`, `parent` and `location` for a freshly reserved entity.
    pub(crate) fn describe(&mut self, entity: &Entity<'tree, S::Kind>) -> Result<(), FatalError> {
        self.emit(
            entity.handle,
            Relation::Kind,
            vec![entity.category.to_string().into(), entity.tag().into()],
        )?;
        if let Some(parent) = entity.parent {
            self.emit(
                entity.handle,
                Relation::Parent,
                vec![parent.into(), entity.index.into()],
            )?;
        }
        if self.config().emit_locations {
            let span = Span::of(&entity.node);
            let file = self.file();
            self.emit(
                entity.handle,
                Relation::Location,
                vec![
                    file.into(),
                    span.start_line.into(),
                    span.start_column.into(),
                    span.end_line.into(),
                    span.end_column.into(),
                ],
            )?;
        }
        Ok(())
    }

    /// Extract `node` into slot `role` at `ord` and link it to `parent`.
    pub fn extract_child(
        &mut self,
        parent: Handle,
        role: Role,
        node: Node<'tree>,
        category: Category,
        ord: u32,
    ) -> Result<Handle, FatalError> {
        let child = self.extract(EntityInfo::child(node, category, parent, ord))?;
        self.link(parent, role, child, ord)?;
        Ok(child)
    }

    /// Extract a list slot, numbering ordinals from 0 in source order.
    pub fn extract_children(
        &mut self,
        parent: Handle,
        role: Role,
        nodes: &[Node<'tree>],
        category: Category,
    ) -> Result<Vec<Handle>, FatalError> {
        let mut handles = Vec::with_capacity(nodes.len());
        for (ord, node) in nodes.iter().enumerate() {
            handles.push(self.extract_child(parent, role, *node, category, ord as u32)?);
        }
        Ok(handles)
    }

    /// Optional slot: absent syntax yields no fact and no diagnostic.
    pub fn extract_optional(
        &mut self,
        parent: Handle,
        role: Role,
        node: Option<Node<'tree>>,
        category: Category,
    ) -> Result<Option<Handle>, FatalError> {
        match node {
            Some(node) => self.extract_child(parent, role, node, category, 0).map(Some),
            None => Ok(None),
        }
    }

    /// Mandatory slot at ordinal 0.
    pub fn extract_required(
        &mut self,
        parent: Handle,
        role: Role,
        node: Option<Node<'tree>>,
        category: Category,
    ) -> Result<Handle, ExtractionError> {
        let node = node.ok_or(ExtractionError::MissingSlot(role))?;
        Ok(self.extract_child(parent, role, node, category, 0)?)
    }

    /// `child(role, child, ord)`; skipped for unresolved children.
    pub fn link(
        &mut self,
        parent: Handle,
        role: Role,
        child: Handle,
        ord: u32,
    ) -> Result<(), FatalError> {
        if !child.is_resolved() {
            return Ok(());
        }
        self.emit(parent, Relation::Child, vec![role.into(), child.into(), ord.into()])
    }

    pub fn emit_text(
        &mut self,
        subject: Handle,
        relation: Relation,
        text: impl Into<String>,
    ) -> Result<(), FatalError> {
        self.emit(subject, relation, vec![Value::Str(text.into())])
    }

    /// `name` plus, when enabled, a stable `key` for a named declaration.
    pub fn emit_name(
        &mut self,
        entity: &Entity<'tree, S::Kind>,
        name: &str,
    ) -> Result<(), FatalError> {
        self.emit_text(entity.handle, Relation::Name, name)?;
        if self.config().emit_keys {
            let key = self.generate_key(entity.tag(), name, &entity.node);
            self.emit_text(entity.handle, Relation::Key, key)?;
        }
        Ok(())
    }

    /// md5 of `path:tag:name:line:column`; stable across runs for unchanged source.
    pub fn generate_key(&self, tag: &str, name: &str, node: &Node) -> String {
        let start = node.start_position();
        let input = format!(
            "{}:{}:{}:{}:{}",
            self.file_path(),
            tag,
            name,
            start.row + 1,
            start.column
        );
        format!("{:x}", md5::compute(input.as_bytes()))
    }

    /// Bind a name use to its declaration, if the oracle knows one.
    pub fn bind(&mut self, subject: Handle, name: Node<'tree>) -> Result<Option<Handle>, FatalError> {
        let Some(declaration) = self.oracle().declaration_of(name) else {
            return Ok(None);
        };
        let target = self.extract_reference(declaration, Category::Declaration)?;
        if !target.is_resolved() {
            return Ok(None);
        }
        self.emit(subject, Relation::BindsTo, vec![target.into()])?;
        Ok(Some(target))
    }

    /// `expr_type` for an expression. An unanswered query degrades `outcome`
    /// instead of failing the entity.
    pub fn expression_type(
        &mut self,
        subject: Handle,
        node: Node<'tree>,
        outcome: &mut Outcome,
    ) -> Result<(), FatalError> {
        match self.oracle().expression_type(node) {
            Ok(Some(name)) => self.emit_text(subject, Relation::ExprType, name),
            Ok(None) => Ok(()),
            Err(ResolutionError::Unavailable(reason)) => Err(FatalError::OracleUnavailable(reason)),
            Err(err) => {
                if self.config().report_unresolved_types {
                    outcome.degrade(ExtractionError::Resolution(err));
                }
                Ok(())
            }
        }
    }

    /// `type_name` for a type access. Unlike [`Self::expression_type`], failure
    /// here fails the entity.
    pub fn type_name(&mut self, subject: Handle, node: Node<'tree>) -> Result<String, ExtractionError> {
        let name = self.oracle().type_name(node)?;
        self.emit_text(subject, Relation::TypeName, name.clone())?;
        Ok(name)
    }
}
