// C# statement populators

use tree_sitter::Node;

use super::declarations::populate_function;
use super::helpers::emit_modifiers;
use super::slots::{self, children_by_field, field, first_named};
use super::{classify_statement, CSharpKind, CsEntity, Ctx};
use crate::extractors::base::tree_methods::{
    find_child_by_type, find_children_by_type, find_token, named_children,
};
use crate::extractors::base::{Category, ExtractionError, FatalError, Handle, Outcome, Relation, Role};

pub(super) fn populate<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    entity: &CsEntity<'tree>,
) -> Result<Outcome, ExtractionError> {
    use CSharpKind::*;

    let node = entity.node;
    let handle = entity.handle;
    let outcome = Outcome::complete();

    match entity.kind {
        Block => {
            let statements = named_children(&node);
            ctx.extract_children(handle, Role::Statement, &statements, Category::Statement)?;
        }
        ExprStmt => {
            ctx.extract_required(handle, Role::Operand, first_named(node), Category::Expression)?;
        }
        LocalDecl => {
            emit_modifiers(ctx, handle, &node)?;
            extract_variables(ctx, handle, node)?;
        }
        If => {
            ctx.extract_required(
                handle,
                Role::Condition,
                field(node, "condition"),
                Category::Expression,
            )?;
            ctx.extract_required(
                handle,
                Role::Then,
                field(node, "consequence"),
                Category::Statement,
            )?;
            ctx.extract_optional(
                handle,
                Role::Else,
                field(node, "alternative"),
                Category::Statement,
            )?;
        }
        While => {
            ctx.extract_required(
                handle,
                Role::Condition,
                field(node, "condition"),
                Category::Expression,
            )?;
            ctx.extract_required(handle, Role::Body, body(node), Category::Statement)?;
        }
        Do => {
            ctx.extract_required(handle, Role::Body, body(node), Category::Statement)?;
            ctx.extract_required(
                handle,
                Role::Condition,
                field(node, "condition"),
                Category::Expression,
            )?;
        }
        For => {
            let initializers = children_by_field(node, "initializer");
            match initializers.iter().find(|n| n.kind() == "variable_declaration") {
                Some(declaration) => extract_variables(ctx, handle, *declaration)?,
                None => {
                    ctx.extract_children(
                        handle,
                        Role::Initializer,
                        &initializers,
                        Category::Expression,
                    )?;
                }
            }
            ctx.extract_optional(
                handle,
                Role::Condition,
                field(node, "condition"),
                Category::Expression,
            )?;
            let updates = children_by_field(node, "update");
            ctx.extract_children(handle, Role::Update, &updates, Category::Expression)?;
            ctx.extract_required(handle, Role::Body, body(node), Category::Statement)?;
        }
        Foreach => {
            ctx.extract_optional(handle, Role::Type, field(node, "type"), Category::Type)?;
            if let Some(left) = field(node, "left") {
                let category = if left.kind() == "identifier" {
                    Category::Declaration
                } else {
                    Category::Expression
                };
                ctx.extract_child(handle, Role::Variable, left, category, 0)?;
            }
            ctx.extract_required(
                handle,
                Role::Iterable,
                field(node, "right"),
                Category::Expression,
            )?;
            ctx.extract_required(handle, Role::Body, body(node), Category::Statement)?;
        }
        Return => {
            ctx.extract_optional(handle, Role::Value, first_named(node), Category::Expression)?;
        }
        // `throw;` has no operand and produces no child fact
        ThrowStmt => {
            ctx.extract_optional(handle, Role::Thrown, first_named(node), Category::Expression)?;
        }
        Break | Continue | Empty => {}
        Try => {
            ctx.extract_required(handle, Role::Body, body(node), Category::Statement)?;
            let catches = find_children_by_type(&node, "catch_clause");
            ctx.extract_children(handle, Role::Catch, &catches, Category::Statement)?;
            let finally = find_child_by_type(&node, "finally_clause").and_then(first_named);
            ctx.extract_optional(handle, Role::Finally, finally, Category::Statement)?;
        }
        Catch => {
            let variable = find_child_by_type(&node, "catch_declaration");
            ctx.extract_optional(handle, Role::Variable, variable, Category::Declaration)?;
            let filter = find_child_by_type(&node, "catch_filter_clause").and_then(first_named);
            ctx.extract_optional(handle, Role::Condition, filter, Category::Expression)?;
            ctx.extract_required(handle, Role::Body, body(node), Category::Statement)?;
        }
        Switch => {
            let switch_body = field(node, "body").or_else(|| find_child_by_type(&node, "switch_body"));
            let value = field(node, "value").or_else(|| {
                named_children(&node)
                    .into_iter()
                    .find(|c| Some(c.id()) != switch_body.map(|b| b.id()))
            });
            ctx.extract_required(handle, Role::Value, value, Category::Expression)?;
            let sections = switch_body
                .map(|b| find_children_by_type(&b, "switch_section"))
                .unwrap_or_default();
            ctx.extract_children(handle, Role::Section, &sections, Category::Statement)?;
        }
        SwitchSection => {
            let (labels, statements) = section_parts(node);
            ctx.extract_children(handle, Role::CaseLabel, &labels, Category::Expression)?;
            ctx.extract_children(handle, Role::Statement, &statements, Category::Statement)?;
        }
        Using => {
            let statement_body = body(node);
            match slots::variable_declaration(node) {
                Some(declaration) => extract_variables(ctx, handle, declaration)?,
                None => {
                    let resource = named_children(&node)
                        .into_iter()
                        .find(|c| Some(c.id()) != statement_body.map(|b| b.id()));
                    ctx.extract_optional(handle, Role::Resource, resource, Category::Expression)?;
                }
            }
            ctx.extract_required(handle, Role::Body, statement_body, Category::Statement)?;
        }
        Lock => {
            let statement_body = body(node);
            let value = named_children(&node)
                .into_iter()
                .find(|c| Some(c.id()) != statement_body.map(|b| b.id()));
            ctx.extract_required(handle, Role::Value, value, Category::Expression)?;
            ctx.extract_required(handle, Role::Body, statement_body, Category::Statement)?;
        }
        Yield => {
            if let Some(keyword) = find_token(&node, &["return", "break"]) {
                ctx.emit_text(handle, Relation::Operator, keyword)?;
            }
            ctx.extract_optional(handle, Role::Value, first_named(node), Category::Expression)?;
        }
        LocalFunction => return populate_function(ctx, entity),
        _ => {
            return Err(ExtractionError::Malformed(format!(
                "{} is not a statement kind",
                entity.tag()
            )))
        }
    }
    Ok(outcome)
}

/// Embedded statement of a loop, `using`, `lock`, `try` or `catch`.
fn body<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    field(node, "body").or_else(|| {
        named_children(&node)
            .into_iter()
            .rev()
            .find(|c| classify_statement(*c).is_some())
    })
}

/// Declared type and declarators of a `variable_declaration`, directly under `parent`.
fn extract_variables<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    parent: Handle,
    node: Node<'tree>,
) -> Result<(), FatalError> {
    let declared = slots::variable_declaration(node).and_then(slots::declared_type);
    ctx.extract_optional(parent, Role::Type, declared, Category::Type)?;
    let declarators = slots::declarator_nodes(node);
    ctx.extract_children(parent, Role::Declarator, &declarators, Category::Declaration)?;
    Ok(())
}

/// Case labels and statements of a switch section. `default:` has no label
/// expression.
///
/// `case 1:` parses as a `constant_pattern` around the expression; the label is
/// the expression itself. Other patterns (`case int n:`, `case > 0:`) are kept
/// as-is and stay unclassified.
fn section_parts(section: Node<'_>) -> (Vec<Node<'_>>, Vec<Node<'_>>) {
    let mut labels = Vec::new();
    let mut statements = Vec::new();
    for child in named_children(&section) {
        if classify_statement(child).is_some() {
            statements.push(child);
        } else if child.kind().ends_with("_switch_label") {
            labels.extend(first_named(child).map(case_label));
        } else if child.kind() != "when_clause" {
            labels.push(case_label(child));
        }
    }
    (labels, statements)
}

fn case_label(node: Node<'_>) -> Node<'_> {
    match node.kind() {
        "constant_pattern" => first_named(node).unwrap_or(node),
        _ => node,
    }
}

#[cfg(test)]
mod tests {
    use crate::extractors::base::{Handle, Relation};
    use crate::extractors::csharp::test_support::{extract, find_entity};

    #[test]
    fn test_rethrow_has_no_operand_child() {
        let run = extract("class A { void M() { try { } catch { throw; } } }");
        let throw = find_entity(&run, "THROW");
        assert!(run.sink.children_of(throw).is_empty());
        assert!(run.report.diagnostics.for_entity(throw).next().is_none());
        assert!(!run.report.failed.contains(&throw));
    }

    #[test]
    fn test_throw_statement_with_operand() {
        let run = extract("class A { void M() { throw new System.Exception(); } }");
        let throw = find_entity(&run, "THROW");
        let children = run.sink.children_of(throw);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].0, "thrown");
        assert_eq!(children[0].2, 0);
    }

    #[test]
    fn test_block_statement_ordinals() {
        let run = extract("class A { void M() { int a = 1; a++; return; } }");
        let block = find_entity(&run, "BLOCK");
        let children = run.sink.children_of(block);
        let ords: Vec<i64> = children.iter().map(|(_, _, ord)| *ord).collect();
        assert_eq!(ords, vec![0, 1, 2]);
        let kinds: Vec<&str> = children
            .iter()
            .map(|(_, child, _)| run.sink.kind_of(*child).unwrap())
            .collect();
        assert_eq!(kinds, vec!["LOCAL_DECL", "EXPR_STMT", "RETURN"]);
    }

    #[test]
    fn test_foreach_variable_is_bound() {
        let run = extract(
            "class A { void M(int[] xs) { foreach (var x in xs) { System.Console.WriteLine(x); } } }",
        );
        let foreach = find_entity(&run, "FOREACH");
        let roles: Vec<String> = run
            .sink
            .children_of(foreach)
            .into_iter()
            .map(|(role, _, _)| role)
            .collect();
        assert_eq!(roles, vec!["type", "variable", "iterable", "body"]);

        let variable = find_entity(&run, "VARIABLE");
        assert_eq!(run.sink.text_of(variable, Relation::Name), Some("x"));
        let implicit = find_entity(&run, "IMPLICIT");
        assert_eq!(run.sink.text_of(implicit, Relation::TypeName), Some("int"));
    }

    #[test]
    fn test_catch_variable_and_finally() {
        let run = extract(
            "class A { void M() { try { } catch (System.Exception e) when (e != null) { } finally { } } }",
        );
        let try_stmt = find_entity(&run, "TRY");
        let roles: Vec<String> = run
            .sink
            .children_of(try_stmt)
            .into_iter()
            .map(|(role, _, _)| role)
            .collect();
        assert_eq!(roles, vec!["body", "catch", "finally"]);

        let catch = find_entity(&run, "CATCH");
        let roles: Vec<String> = run
            .sink
            .children_of(catch)
            .into_iter()
            .map(|(role, _, _)| role)
            .collect();
        assert_eq!(roles, vec!["variable", "condition", "body"]);
        let variable = find_entity(&run, "CATCH_VARIABLE");
        assert_eq!(run.sink.text_of(variable, Relation::Name), Some("e"));
    }

    #[test]
    fn test_switch_sections() {
        // Stacked labels parse as one section per label; only the last one
        // carries the statements.
        let run = extract(
            "class A { void M(int v) { switch (v) { case 1: case 2: break; default: return; } } }",
        );
        let switch = find_entity(&run, "SWITCH");
        let children = run.sink.children_of(switch);
        assert_eq!(children[0].0, "value");
        let sections: Vec<Handle> = children
            .iter()
            .filter(|(r, _, _)| r == "section")
            .map(|(_, h, _)| *h)
            .collect();
        assert_eq!(sections.len(), 3);

        let parts = |section: Handle| -> Vec<(String, String, i64)> {
            run.sink
                .children_of(section)
                .into_iter()
                .map(|(role, child, ord)| (role, run.sink.kind_of(child).unwrap().to_string(), ord))
                .collect()
        };
        let part = |role: &str, kind: &str, ord: i64| (role.to_string(), kind.to_string(), ord);
        assert_eq!(parts(sections[0]), vec![part("case_label", "INT_LITERAL", 0)]);
        assert_eq!(
            parts(sections[1]),
            vec![part("case_label", "INT_LITERAL", 0), part("statement", "BREAK", 0)]
        );
        assert_eq!(parts(sections[2]), vec![part("statement", "RETURN", 0)]);

        let label = run.sink.children_of(sections[1])[0].1;
        assert_eq!(run.sink.text_of(label, Relation::Literal), Some("2"));
        assert!(run.report.diagnostics.is_empty());
    }
}
