// Tree navigation helpers shared by populators and the oracle

use tree_sitter::Node;

use super::context::Context;
use super::entity::Schema;

/// Source text covered by `node` (lossy on broken UTF-8 boundaries)
pub fn node_text(source: &str, node: &Node) -> String {
    let bytes = source.as_bytes();
    let (start, end) = (node.start_byte(), node.end_byte());
    if start <= end && end <= bytes.len() {
        String::from_utf8_lossy(&bytes[start..end]).to_string()
    } else {
        String::new()
    }
}

/// Comments and preprocessor lines are extras that can sit between any two
/// nodes; they never occupy a slot.
pub fn is_trivia(kind: &str) -> bool {
    kind == "comment" || kind.starts_with("preproc")
}

/// Named children minus trivia, in source order.
pub fn named_children<'tree>(node: &Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !is_trivia(c.kind()))
        .collect()
}

pub fn find_child_by_type<'tree>(node: &Node<'tree>, child_type: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == child_type);
    found
}

pub fn find_child_by_types<'tree>(node: &Node<'tree>, types: &[&str]) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| types.contains(&c.kind()));
    found
}

pub fn find_children_by_type<'tree>(node: &Node<'tree>, child_type: &str) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == child_type)
        .collect()
}

/// First anonymous child whose kind is one of `tokens`.
pub fn find_token(node: &Node, tokens: &[&'static str]) -> Option<&'static str> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|c| !c.is_named())
        .find_map(|c| tokens.iter().copied().find(|t| *t == c.kind()));
    found
}

/// Position of `child` among `siblings`, compared by node identity.
pub fn position_of(siblings: &[Node<'_>], child: &Node<'_>) -> Option<u32> {
    siblings
        .iter()
        .position(|s| s.id() == child.id())
        .map(|i| i as u32)
}

impl<'a, 'tree, S: Schema> Context<'a, 'tree, S> {
    pub fn node_text(&self, node: &Node) -> String {
        node_text(self.source(), node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(code: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .unwrap();
        parser.parse(code, None).unwrap()
    }

    #[test]
    fn test_named_children_skip_comments() {
        let code = "// leading\nclass A {}\n/* between */\nclass B {}";
        let tree = parse(code);
        let children = named_children(&tree.root_node());
        let kinds: Vec<&str> = children.iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec!["class_declaration", "class_declaration"]);
        assert_eq!(position_of(&children, &children[1]), Some(1));
    }

    #[test]
    fn test_text_and_tokens() {
        let code = "class A { public static int x; }";
        let tree = parse(code);
        let class = tree.root_node().named_child(0).unwrap();
        assert_eq!(find_token(&class, &["class", "struct"]), Some("class"));
        let body = find_child_by_type(&class, "declaration_list").unwrap();
        let field = find_child_by_types(&body, &["field_declaration", "property_declaration"]).unwrap();
        assert_eq!(node_text(code, &field), "public static int x;");
        assert_eq!(find_children_by_type(&field, "modifier").len(), 2);
    }
}
