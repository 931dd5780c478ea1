// Fact tuples and the append-only sink contract

use serde::Serialize;
use std::fmt;

use super::types::{Handle, Role};

/// Relation name of a fact tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    File,
    Kind,
    Parent,
    Location,
    Child,
    Name,
    Key,
    Literal,
    Operator,
    TypeName,
    ExprType,
    Modifier,
    BindsTo,
    Import,
    Diagnostic,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::File => "file",
            Relation::Kind => "kind",
            Relation::Parent => "parent",
            Relation::Location => "location",
            Relation::Child => "child",
            Relation::Name => "name",
            Relation::Key => "key",
            Relation::Literal => "literal",
            Relation::Operator => "operator",
            Relation::TypeName => "type_name",
            Relation::ExprType => "expr_type",
            Relation::Modifier => "modifier",
            Relation::BindsTo => "binds_to",
            Relation::Import => "import",
            Relation::Diagnostic => "diagnostic",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One argument of a fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Handle(Handle),
    Int(i64),
    Str(String),
}

impl Value {
    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            Value::Handle(h) => Some(*h),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        Value::Handle(h)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Role> for Value {
    fn from(role: Role) -> Self {
        Value::Str(role.as_str().to_string())
    }
}

/// An ordered record `(subject, relation, args...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub subject: Handle,
    pub relation: Relation,
    pub args: Vec<Value>,
}

impl Fact {
    pub fn new(subject: Handle, relation: Relation, args: Vec<Value>) -> Self {
        Self {
            subject,
            relation,
            args,
        }
    }
}

/// Append-only destination for facts.
///
/// No read-back and no dedup: the identity cache guarantees each subject is
/// described once before anything reaches the sink.
pub trait FactSink {
    fn emit(&mut self, fact: Fact) -> std::io::Result<()>;

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// In-memory sink, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    facts: Vec<Fact>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn into_facts(self) -> Vec<Fact> {
        self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn with_relation(&self, relation: Relation) -> impl Iterator<Item = &Fact> {
        self.facts.iter().filter(move |f| f.relation == relation)
    }

    pub fn about(&self, subject: Handle) -> impl Iterator<Item = &Fact> {
        self.facts.iter().filter(move |f| f.subject == subject)
    }

    /// Kind tag recorded for `subject`, if it was described.
    pub fn kind_of(&self, subject: Handle) -> Option<&str> {
        self.about(subject)
            .find(|f| f.relation == Relation::Kind)
            .and_then(|f| f.args.get(1))
            .and_then(Value::as_str)
    }

    /// Handles whose kind tag is `tag`, in emission order.
    pub fn entities_of_kind<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = Handle> + 'a {
        self.with_relation(Relation::Kind)
            .filter(move |f| f.args.get(1).and_then(Value::as_str) == Some(tag))
            .map(|f| f.subject)
    }

    /// `(role, child, ordinal)` triples recorded for `parent`.
    pub fn children_of(&self, parent: Handle) -> Vec<(String, Handle, i64)> {
        self.about(parent)
            .filter(|f| f.relation == Relation::Child)
            .filter_map(|f| {
                let role = f.args.first()?.as_str()?.to_string();
                let child = f.args.get(1)?.as_handle()?;
                let ord = f.args.get(2)?.as_int()?;
                Some((role, child, ord))
            })
            .collect()
    }

    /// First string argument of `relation` on `subject`.
    pub fn text_of(&self, subject: Handle, relation: Relation) -> Option<&str> {
        self.about(subject)
            .find(|f| f.relation == relation)
            .and_then(|f| f.args.first())
            .and_then(Value::as_str)
    }
}

impl FactSink for MemorySink {
    fn emit(&mut self, fact: Fact) -> std::io::Result<()> {
        self.facts.push(fact);
        Ok(())
    }
}

impl<S: FactSink + ?Sized> FactSink for &mut S {
    fn emit(&mut self, fact: Fact) -> std::io::Result<()> {
        (**self).emit(fact)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        (**self).flush()
    }
}

impl<S: FactSink + ?Sized> FactSink for Box<S> {
    fn emit(&mut self, fact: Fact) -> std::io::Result<()> {
        (**self).emit(fact)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        (**self).flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::types::UnitId;

    #[test]
    fn test_memory_sink_keeps_emission_order() {
        let parent = Handle::new(UnitId(0), 0);
        let child = Handle::new(UnitId(0), 1);
        let mut sink = MemorySink::new();

        sink.emit(Fact::new(parent, Relation::Kind, vec!["expr".into(), "SIZEOF".into()]))
            .unwrap();
        sink.emit(Fact::new(child, Relation::Kind, vec!["type".into(), "PREDEFINED".into()]))
            .unwrap();
        sink.emit(Fact::new(
            parent,
            Relation::Child,
            vec![Role::OperandType.into(), child.into(), 0i64.into()],
        ))
        .unwrap();

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.kind_of(parent), Some("SIZEOF"));
        assert_eq!(
            sink.children_of(parent),
            vec![("operand_type".to_string(), child, 0)]
        );
        assert_eq!(sink.entities_of_kind("PREDEFINED").collect::<Vec<_>>(), vec![child]);
    }
}
