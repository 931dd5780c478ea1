// C# Helper Methods
//
// Modifier, operator and name text shared by the populators.

use tree_sitter::Node;

use super::slots;
use super::{CsEntity, Ctx};
use crate::extractors::base::tree_methods::node_text;
use crate::extractors::base::{FatalError, Handle, Relation};

/// Keyword tokens a parameter may carry instead of a `modifier` node.
const PARAMETER_MODIFIERS: &[&str] = &["ref", "out", "in", "this", "params", "scoped", "readonly"];

/// Modifier keywords of a declaration, in source order (attributes excluded)
pub fn extract_modifiers(source: &str, node: &Node) -> Vec<String> {
    let mut modifiers = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "modifier" | "parameter_modifier" => modifiers.push(node_text(source, &child)),
            kind if node.kind() == "parameter"
                && !child.is_named()
                && PARAMETER_MODIFIERS.contains(&kind) =>
            {
                modifiers.push(kind.to_string())
            }
            _ => {}
        }
    }
    modifiers
}

pub fn emit_modifiers(ctx: &mut Ctx<'_, '_>, subject: Handle, node: &Node) -> Result<(), FatalError> {
    for modifier in extract_modifiers(ctx.source(), node) {
        ctx.emit_text(subject, Relation::Modifier, modifier)?;
    }
    Ok(())
}

/// Emit `name` and `key` from the declaration's name field, if it has one.
pub fn emit_declared_name<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    entity: &CsEntity<'tree>,
) -> Result<Option<String>, FatalError> {
    let Some(name) = slots::name_node(entity.node) else {
        return Ok(None);
    };
    let text = simple_name(ctx.source(), name);
    ctx.emit_name(entity, &text)?;
    Ok(Some(text))
}

/// Identifier text of a simple or generic name (`List<T>` gives `List`).
pub fn simple_name(source: &str, node: Node) -> String {
    if node.kind() == "generic_name" {
        if let Some(id) = slots::name_node(node) {
            return node_text(source, &id);
        }
    }
    node_text(source, &node)
}

/// Operator token of a unary, binary or assignment expression.
pub fn operator_text(source: &str, node: Node) -> Option<String> {
    if let Some(op) = slots::field(node, "operator") {
        return Some(node_text(source, &op));
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|c| !c.is_named() && !matches!(c.kind(), "(" | ")"))
        .map(|c| c.kind().to_string());
    found
}

/// Collapse whitespace inside a spelled type or qualified name.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for part in text.split_whitespace() {
        out.push_str(part);
        if part.ends_with(',') {
            out.push(' ');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    #[test]
    fn test_extract_modifiers_skips_attributes() {
        let code = "class A { [Obsolete] public static void M() {} }";
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(code, None).unwrap();
        let class = tree.root_node().named_child(0).unwrap();
        let method = slots::member_nodes(class)[0];
        assert_eq!(extract_modifiers(code, &method), vec!["public", "static"]);
    }

    #[test]
    fn test_normalize_keeps_argument_spacing() {
        assert_eq!(normalize("Dictionary<string,\n   int>"), "Dictionary<string, int>");
        assert_eq!(normalize("System . Text"), "System.Text");
    }
}
