// Read-only semantic oracle consulted by populators

use tree_sitter::Node;

use super::error::ResolutionError;

/// Answers symbol and type questions about nodes of one parse tree.
///
/// Never mutated by extraction. Implementations that lose their backing
/// resolver should answer [`ResolutionError::Unavailable`], which aborts the unit.
pub trait SemanticOracle<'tree> {
    /// Static type of an expression. `Ok(None)` means the expression has no
    /// type of its own (lambdas, throw expressions).
    fn expression_type(&self, node: Node<'tree>) -> Result<Option<String>, ResolutionError>;

    /// Fully spelled name of the type a type-syntax node denotes.
    fn type_name(&self, node: Node<'tree>) -> Result<String, ResolutionError>;

    /// Declaration node a name refers to, if any.
    fn declaration_of(&self, node: Node<'tree>) -> Option<Node<'tree>>;
}
