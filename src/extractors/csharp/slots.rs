// C# slot lookup
//
// Every list slot is computed by exactly one function here. Populators number
// ordinals from these lists and `CSharp::enclosing` uses the same lists, so a
// declaration reached by reference gets the index its owner would give it.

use tree_sitter::Node;

use crate::extractors::base::tree_methods::{
    find_child_by_type, find_child_by_types, find_children_by_type, is_trivia, named_children,
    position_of,
};
use crate::extractors::base::{Category, Owner};

/// Field lookup that ignores nodes the parser inserted to recover from errors.
pub fn field<'tree>(node: Node<'tree>, name: &str) -> Option<Node<'tree>> {
    node.child_by_field_name(name).filter(|n| !n.is_missing())
}

/// Type syntax a declaration is annotated with (`returns` on methods).
pub fn declared_type<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    field(node, "type").or_else(|| field(node, "returns"))
}

pub fn name_node<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    field(node, "name").or_else(|| find_child_by_type(&node, "identifier"))
}

pub fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "struct_declaration"
            | "interface_declaration"
            | "record_declaration"
            | "record_struct_declaration"
            | "enum_declaration"
    )
}

/// Nodes whose body is a member list.
pub fn is_member_container(kind: &str) -> bool {
    is_type_declaration(kind)
        || matches!(
            kind,
            "compilation_unit" | "namespace_declaration" | "file_scoped_namespace_declaration"
        )
}

pub fn is_member_kind(kind: &str) -> bool {
    (kind.ends_with("_declaration") && kind != "variable_declaration")
        || kind == "using_directive"
        || kind == "global_statement"
}

fn body_container<'tree>(owner: Node<'tree>) -> Option<Node<'tree>> {
    match owner.kind() {
        "compilation_unit" | "file_scoped_namespace_declaration" => Some(owner),
        "enum_declaration" => field(owner, "body")
            .or_else(|| find_child_by_type(&owner, "enum_member_declaration_list")),
        _ => field(owner, "body").or_else(|| find_child_by_type(&owner, "declaration_list")),
    }
}

/// Members of a compilation unit, namespace or type, in source order.
pub fn member_nodes<'tree>(owner: Node<'tree>) -> Vec<Node<'tree>> {
    let Some(body) = body_container(owner) else {
        return Vec::new();
    };
    named_children(&body)
        .into_iter()
        .filter(|c| is_member_kind(c.kind()))
        .collect()
}

/// Parameters of a member, local function or lambda. An implicitly typed
/// single lambda parameter is the bare identifier.
pub fn parameter_nodes<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let list = field(node, "parameters").or_else(|| {
        find_child_by_types(&node, &["parameter_list", "bracketed_parameter_list"])
    });
    match list {
        Some(list) if is_implicit_parameter(list.kind()) => vec![list],
        Some(list) => find_children_by_type(&list, "parameter"),
        None => Vec::new(),
    }
}

/// Untyped lambda parameter (`x => ...`).
pub fn is_implicit_parameter(kind: &str) -> bool {
    matches!(kind, "identifier" | "implicit_parameter")
}

pub fn type_parameter_nodes<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    field(node, "type_parameters")
        .or_else(|| find_child_by_type(&node, "type_parameter_list"))
        .map(|list| find_children_by_type(&list, "type_parameter"))
        .unwrap_or_default()
}

/// `variable_declaration` carried by a field, event, local, `for` or `using`.
pub fn variable_declaration<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    if node.kind() == "variable_declaration" {
        return Some(node);
    }
    find_child_by_type(&node, "variable_declaration")
}

pub fn declarator_nodes<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    variable_declaration(node)
        .map(|decl| find_children_by_type(&decl, "variable_declarator"))
        .unwrap_or_default()
}

/// Value after `=` in a declarator, parameter default, property or enum member.
pub fn initializer_of<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    let mut seen_equals = false;
    let mut cursor = node.walk();
    let children: Vec<Node<'tree>> = node.children(&mut cursor).collect();
    for child in children {
        if child.kind() == "equals_value_clause" {
            return first_named(child);
        }
        if !child.is_named() {
            seen_equals |= child.kind() == "=";
            continue;
        }
        if seen_equals && !is_trivia(child.kind()) {
            return Some(child);
        }
    }
    None
}

/// First named child that is not a comment.
pub fn first_named<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    named_children(&node).into_iter().next()
}

/// Every named node carrying field `name`, in source order.
pub fn children_by_field<'tree>(node: Node<'tree>, name: &str) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.children_by_field_name(name, &mut cursor)
        .filter(|c| c.is_named() && !c.is_missing())
        .collect()
}

pub fn accessor_nodes<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    field(node, "accessors")
        .or_else(|| find_child_by_type(&node, "accessor_list"))
        .map(|list| find_children_by_type(&list, "accessor_declaration"))
        .unwrap_or_default()
}

/// Types listed after `:` on a type declaration.
pub fn base_type_nodes<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let Some(list) = find_child_by_type(&node, "base_list") else {
        return Vec::new();
    };
    named_children(&list)
        .into_iter()
        .map(|c| {
            if c.kind() == "primary_constructor_base_type" {
                c.named_child(0).unwrap_or(c)
            } else {
                c
            }
        })
        .filter(|c| c.kind() != "argument_list")
        .collect()
}

pub fn type_argument_nodes<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    find_child_by_type(&node, "type_argument_list")
        .map(|list| named_children(&list))
        .unwrap_or_default()
}

/// Expressions of an `argument_list` or `bracketed_argument_list`, with
/// `name:` prefixes and `ref`/`out` markers stripped.
pub fn argument_nodes<'tree>(list: Node<'tree>) -> Vec<Node<'tree>> {
    find_children_by_type(&list, "argument")
        .into_iter()
        .filter_map(|arg| {
            named_children(&arg)
                .into_iter()
                .rfind(|c| c.kind() != "name_colon")
        })
        .collect()
}

pub fn argument_list<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    field(node, "arguments").or_else(|| find_child_by_type(&node, "argument_list"))
}

/// Body of a function-like declaration: a block statement or the expression
/// after `=>`.
pub fn function_body<'tree>(node: Node<'tree>) -> Option<(Node<'tree>, Category)> {
    let body = field(node, "body")
        .or_else(|| find_child_by_types(&node, &["block", "arrow_expression_clause"]))?;
    match body.kind() {
        "block" => Some((body, Category::Statement)),
        "arrow_expression_clause" => first_named(body).map(|e| (e, Category::Expression)),
        _ => Some((body, Category::Expression)),
    }
}

/// Syntactic owner of a declaration that can be named before it is visited.
pub fn owner_of(node: Node<'_>) -> Option<Owner<'_>> {
    match node.kind() {
        "variable_declarator" => {
            let owner = node.parent()?.parent()?;
            if !matches!(owner.kind(), "field_declaration" | "event_field_declaration") {
                return None;
            }
            let index = position_of(&declarator_nodes(owner), &node)?;
            Some(Owner {
                node: owner,
                category: Category::Declaration,
                index,
            })
        }
        "parameter" => {
            let owner = node.parent()?.parent()?;
            if !is_member_kind(owner.kind()) {
                return None;
            }
            let index = position_of(&parameter_nodes(owner), &node)?;
            Some(Owner {
                node: owner,
                category: Category::Declaration,
                index,
            })
        }
        kind if is_member_kind(kind) => {
            let container = node.parent()?;
            let owner = match container.kind() {
                "declaration_list" | "enum_member_declaration_list" => container.parent()?,
                _ => container,
            };
            if !is_member_container(owner.kind()) {
                return None;
            }
            let index = position_of(&member_nodes(owner), &node)?;
            Some(Owner {
                node: owner,
                category: Category::Declaration,
                index,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::{Parser, Tree};

    fn parse(code: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .unwrap();
        parser.parse(code, None).unwrap()
    }

    fn first_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        if node.kind() == kind {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
        children.into_iter().find_map(|c| first_of_kind(c, kind))
    }

    #[test]
    fn test_member_positions_match_owner() {
        let code = "class A { int x; void M() {} class B {} }";
        let tree = parse(code);
        let class = first_of_kind(tree.root_node(), "class_declaration").unwrap();
        let members = member_nodes(class);
        let kinds: Vec<&str> = members.iter().map(|m| m.kind()).collect();
        assert_eq!(
            kinds,
            vec!["field_declaration", "method_declaration", "class_declaration"]
        );

        let owner = owner_of(members[1]).unwrap();
        assert_eq!(owner.node.id(), class.id());
        assert_eq!(owner.index, 1);
    }

    #[test]
    fn test_field_declarator_owned_by_field() {
        let code = "class A { int x, y = 2; }";
        let tree = parse(code);
        let field_decl = first_of_kind(tree.root_node(), "field_declaration").unwrap();
        let declarators = declarator_nodes(field_decl);
        assert_eq!(declarators.len(), 2);

        let owner = owner_of(declarators[1]).unwrap();
        assert_eq!(owner.node.id(), field_decl.id());
        assert_eq!(owner.index, 1);
        assert!(initializer_of(declarators[0]).is_none());
        assert_eq!(initializer_of(declarators[1]).unwrap().kind(), "integer_literal");
    }

    #[test]
    fn test_locals_have_no_owner() {
        let code = "class A { void M() { int z = 1; } }";
        let tree = parse(code);
        let local = first_of_kind(tree.root_node(), "local_declaration_statement").unwrap();
        let declarator = declarator_nodes(local)[0];
        assert!(owner_of(declarator).is_none());
    }

    #[test]
    fn test_arguments_strip_names() {
        let code = "class A { void M() { F(1, b: 2); } }";
        let tree = parse(code);
        let call = first_of_kind(tree.root_node(), "invocation_expression").unwrap();
        let args = argument_nodes(argument_list(call).unwrap());
        let kinds: Vec<&str> = args.iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, vec!["integer_literal", "integer_literal"]);
    }
}
