// Base Extractor Types
//
// Identity, category and slot-role types shared by every language schema.

use serde::{Deserialize, Serialize};
use std::fmt;
use tree_sitter::Node;

/// Identifier of one compilation unit within a run.
///
/// The driver hands out a distinct id per unit; it forms the high half of every
/// [`Handle`] minted inside that unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Stable identifier of one extracted entity.
///
/// Packs `(unit, slot + 1)` into a `u64`. Raw value 0 is never produced by
/// [`Handle::new`], which is what makes [`Handle::UNRESOLVED`] a safe sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(u64);

impl Handle {
    /// Returned by the dispatcher when a node could not be classified.
    pub const UNRESOLVED: Handle = Handle(0);

    pub(crate) fn new(unit: UnitId, slot: u32) -> Self {
        Handle(((unit.0 as u64) << 32) | (slot as u64 + 1))
    }

    pub fn is_resolved(&self) -> bool {
        self.0 != 0
    }

    pub fn unit(&self) -> UnitId {
        UnitId((self.0 >> 32) as u32)
    }

    /// Arena slot inside the owning unit, `None` for the sentinel.
    pub fn slot(&self) -> Option<u32> {
        let low = (self.0 & 0xFFFF_FFFF) as u32;
        low.checked_sub(1)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot() {
            Some(slot) => write!(f, "#{}_{}", self.unit().0, slot + 1),
            None => write!(f, "#unresolved"),
        }
    }
}

/// Identity of a syntax node inside one parse tree.
///
/// Keyed on tree-sitter's node id, never on the node's text or position, so two
/// structurally equal nodes stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(usize);

impl NodeKey {
    pub fn of(node: &Node) -> Self {
        NodeKey(node.id())
    }
}

/// Structural category a node is requested under.
///
/// The category decides which closed set of kinds the node may classify into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Expression,
    Statement,
    Type,
    Declaration,
    File,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Expression => write!(f, "expr"),
            Category::Statement => write!(f, "stmt"),
            Category::Type => write!(f, "type"),
            Category::Declaration => write!(f, "decl"),
            Category::File => write!(f, "file"),
        }
    }
}

/// Semantic role of a child slot, recorded on every `child` fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    OperandType,
    Operand,
    Thrown,
    Left,
    Right,
    Condition,
    Then,
    Else,
    Body,
    Argument,
    Function,
    Target,
    Member,
    Statement,
    Initializer,
    Type,
    TypeArgument,
    ElementType,
    Parameter,
    ReturnType,
    Declarator,
    Value,
    Subscript,
    CaseLabel,
    Section,
    Catch,
    Finally,
    Accessor,
    BaseType,
    TypeParameter,
    Update,
    Iterable,
    Variable,
    Resource,
    Qualifier,
    Field,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::OperandType => "operand_type",
            Role::Operand => "operand",
            Role::Thrown => "thrown",
            Role::Left => "left",
            Role::Right => "right",
            Role::Condition => "condition",
            Role::Then => "then",
            Role::Else => "else",
            Role::Body => "body",
            Role::Argument => "argument",
            Role::Function => "function",
            Role::Target => "target",
            Role::Member => "member",
            Role::Statement => "statement",
            Role::Initializer => "initializer",
            Role::Type => "type",
            Role::TypeArgument => "type_argument",
            Role::ElementType => "element_type",
            Role::Parameter => "parameter",
            Role::ReturnType => "return_type",
            Role::Declarator => "declarator",
            Role::Value => "value",
            Role::Subscript => "subscript",
            Role::CaseLabel => "case_label",
            Role::Section => "section",
            Role::Catch => "catch",
            Role::Finally => "finally",
            Role::Accessor => "accessor",
            Role::BaseType => "base_type",
            Role::TypeParameter => "type_parameter",
            Role::Update => "update",
            Role::Iterable => "iterable",
            Role::Variable => "variable",
            Role::Resource => "resource",
            Role::Qualifier => "qualifier",
            Role::Field => "field",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source span of a node (1-based lines, 0-based columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Span {
    pub fn of(node: &Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_line: (start.row + 1) as u32,
            start_column: start.column as u32,
            end_line: (end.row + 1) as u32,
            end_column: end.column as u32,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}
