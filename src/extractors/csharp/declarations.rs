// C# declaration populators
//
// Named declarations write `name` (and a stable `key`) right after their
// descriptive facts, then modifiers, then their slots in source order.

use tree_sitter::Node;

use super::helpers::{emit_declared_name, emit_modifiers, normalize};
use super::slots::{self, field, first_named};
use super::{CSharpKind, CsEntity, Ctx};
use crate::extractors::base::tree_methods::{find_child_by_type, find_token, named_children};
use crate::extractors::base::{
    Category, ExtractionError, FatalError, Handle, Outcome, Relation, Role, Value,
};

pub(super) fn populate<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    entity: &CsEntity<'tree>,
) -> Result<Outcome, ExtractionError> {
    use CSharpKind::*;

    let node = entity.node;
    let handle = entity.handle;

    match entity.kind {
        CompilationUnit => {
            extract_members(ctx, handle, node)?;
        }
        UsingDirective => populate_using(ctx, handle, node)?,
        Namespace => {
            if let Some(name) = field(node, "name") {
                let text = normalize(&ctx.node_text(&name));
                ctx.emit_name(entity, &text)?;
            }
            extract_members(ctx, handle, node)?;
        }
        Class | Struct | Interface | Record => {
            emit_declared_name(ctx, entity)?;
            emit_modifiers(ctx, handle, &node)?;
            extract_type_parameters(ctx, handle, node)?;
            // Primary constructor parameters
            extract_parameters(ctx, handle, node)?;
            extract_base_types(ctx, handle, node)?;
            extract_members(ctx, handle, node)?;
        }
        Enum => {
            emit_declared_name(ctx, entity)?;
            emit_modifiers(ctx, handle, &node)?;
            extract_base_types(ctx, handle, node)?;
            extract_members(ctx, handle, node)?;
        }
        EnumMember => {
            emit_declared_name(ctx, entity)?;
            ctx.extract_optional(
                handle,
                Role::Value,
                slots::initializer_of(node),
                Category::Expression,
            )?;
        }
        Delegate => {
            emit_declared_name(ctx, entity)?;
            emit_modifiers(ctx, handle, &node)?;
            extract_type_parameters(ctx, handle, node)?;
            ctx.extract_optional(
                handle,
                Role::ReturnType,
                slots::declared_type(node),
                Category::Type,
            )?;
            extract_parameters(ctx, handle, node)?;
        }
        Method => return populate_function(ctx, entity),
        Constructor => {
            emit_declared_name(ctx, entity)?;
            emit_modifiers(ctx, handle, &node)?;
            extract_parameters(ctx, handle, node)?;
            // `: base(...)` / `: this(...)`
            let chained = find_child_by_type(&node, "constructor_initializer")
                .and_then(slots::argument_list)
                .map(slots::argument_nodes)
                .unwrap_or_default();
            ctx.extract_children(handle, Role::Argument, &chained, Category::Expression)?;
            extract_body(ctx, handle, node)?;
        }
        Destructor => {
            emit_declared_name(ctx, entity)?;
            extract_body(ctx, handle, node)?;
        }
        Operator => {
            let name = operator_name(ctx, node);
            ctx.emit_name(entity, &name)?;
            emit_modifiers(ctx, handle, &node)?;
            ctx.extract_optional(
                handle,
                Role::ReturnType,
                slots::declared_type(node),
                Category::Type,
            )?;
            extract_parameters(ctx, handle, node)?;
            extract_body(ctx, handle, node)?;
        }
        Indexer => {
            ctx.emit_name(entity, "this")?;
            emit_modifiers(ctx, handle, &node)?;
            ctx.extract_optional(handle, Role::Type, slots::declared_type(node), Category::Type)?;
            extract_parameters(ctx, handle, node)?;
            extract_accessors(ctx, handle, node)?;
            extract_arrow_value(ctx, handle, node)?;
        }
        Field => {
            emit_modifiers(ctx, handle, &node)?;
            extract_variables(ctx, handle, node)?;
        }
        Event => {
            emit_modifiers(ctx, handle, &node)?;
            if node.kind() == "event_declaration" {
                emit_declared_name(ctx, entity)?;
                ctx.extract_optional(
                    handle,
                    Role::Type,
                    slots::declared_type(node),
                    Category::Type,
                )?;
                extract_accessors(ctx, handle, node)?;
            } else {
                extract_variables(ctx, handle, node)?;
            }
        }
        Property => {
            emit_declared_name(ctx, entity)?;
            emit_modifiers(ctx, handle, &node)?;
            ctx.extract_optional(handle, Role::Type, slots::declared_type(node), Category::Type)?;
            extract_accessors(ctx, handle, node)?;
            extract_arrow_value(ctx, handle, node)?;
            ctx.extract_optional(
                handle,
                Role::Initializer,
                slots::initializer_of(node),
                Category::Expression,
            )?;
        }
        Accessor => {
            let keyword = field(node, "name")
                .map(|n| ctx.node_text(&n))
                .or_else(|| {
                    find_token(&node, &["get", "set", "init", "add", "remove"])
                        .map(str::to_string)
                });
            if let Some(keyword) = keyword {
                ctx.emit_name(entity, &keyword)?;
            }
            emit_modifiers(ctx, handle, &node)?;
            extract_body(ctx, handle, node)?;
        }
        Variable => {
            if node.kind() == "variable_declarator" {
                emit_declared_name(ctx, entity)?;
                ctx.extract_optional(
                    handle,
                    Role::Initializer,
                    slots::initializer_of(node),
                    Category::Expression,
                )?;
            } else {
                let name = ctx.node_text(&node);
                ctx.emit_name(entity, &name)?;
            }
        }
        Parameter => {
            if slots::is_implicit_parameter(node.kind()) {
                let name = ctx.node_text(&node);
                ctx.emit_name(entity, &name)?;
            } else {
                if let Some(name) = field(node, "name") {
                    let text = ctx.node_text(&name);
                    ctx.emit_name(entity, &text)?;
                }
                emit_modifiers(ctx, handle, &node)?;
                ctx.extract_optional(handle, Role::Type, field(node, "type"), Category::Type)?;
                ctx.extract_optional(
                    handle,
                    Role::Value,
                    slots::initializer_of(node),
                    Category::Expression,
                )?;
            }
        }
        TypeParameter => {
            emit_declared_name(ctx, entity)?;
            if let Some(variance) = find_token(&node, &["in", "out"]) {
                ctx.emit_text(handle, Relation::Modifier, variance)?;
            }
        }
        CatchVariable => {
            ctx.extract_optional(handle, Role::Type, field(node, "type"), Category::Type)?;
            if let Some(name) = field(node, "name") {
                let text = ctx.node_text(&name);
                ctx.emit_name(entity, &text)?;
            }
        }
        GlobalStatement => {
            ctx.extract_required(handle, Role::Statement, first_named(node), Category::Statement)?;
        }
        _ => {
            return Err(ExtractionError::Malformed(format!(
                "{} is not a declaration kind",
                entity.tag()
            )))
        }
    }
    Ok(Outcome::complete())
}

/// Methods and local functions: name, modifiers, type parameters, return
/// type, parameters, body.
pub(super) fn populate_function<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    entity: &CsEntity<'tree>,
) -> Result<Outcome, ExtractionError> {
    let node = entity.node;
    let handle = entity.handle;
    emit_declared_name(ctx, entity)?;
    emit_modifiers(ctx, handle, &node)?;
    // Type parameters first so the return type can bind to them
    extract_type_parameters(ctx, handle, node)?;
    ctx.extract_optional(
        handle,
        Role::ReturnType,
        slots::declared_type(node),
        Category::Type,
    )?;
    extract_parameters(ctx, handle, node)?;
    extract_body(ctx, handle, node)?;
    Ok(Outcome::complete())
}

fn populate_using<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    handle: Handle,
    node: Node<'tree>,
) -> Result<(), FatalError> {
    for keyword in ["global", "static"] {
        if find_token(&node, &[keyword]).is_some() {
            ctx.emit_text(handle, Relation::Modifier, keyword)?;
        }
    }
    let alias = field(node, "name");
    let target = named_children(&node)
        .into_iter()
        .rev()
        .find(|c| alias.map_or(true, |a| a.id() != c.id()));
    let Some(target) = target else {
        return Ok(());
    };
    let mut args = vec![Value::Str(normalize(&ctx.node_text(&target)))];
    if let Some(alias) = alias {
        args.push(Value::Str(ctx.node_text(&alias)));
    }
    ctx.emit(handle, Relation::Import, args)
}

fn operator_name(ctx: &Ctx<'_, '_>, node: Node<'_>) -> String {
    if node.kind() == "conversion_operator_declaration" {
        let conversion = find_token(&node, &["implicit", "explicit"]).unwrap_or("implicit");
        return format!("{conversion} operator");
    }
    match field(node, "operator") {
        Some(op) => format!("operator {}", ctx.node_text(&op)),
        None => "operator".to_string(),
    }
}

fn extract_members<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    handle: Handle,
    node: Node<'tree>,
) -> Result<(), FatalError> {
    let members = slots::member_nodes(node);
    ctx.extract_children(handle, Role::Member, &members, Category::Declaration)?;
    Ok(())
}

fn extract_parameters<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    handle: Handle,
    node: Node<'tree>,
) -> Result<(), FatalError> {
    let params = slots::parameter_nodes(node);
    ctx.extract_children(handle, Role::Parameter, &params, Category::Declaration)?;
    Ok(())
}

fn extract_type_parameters<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    handle: Handle,
    node: Node<'tree>,
) -> Result<(), FatalError> {
    let params = slots::type_parameter_nodes(node);
    ctx.extract_children(handle, Role::TypeParameter, &params, Category::Declaration)?;
    Ok(())
}

fn extract_base_types<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    handle: Handle,
    node: Node<'tree>,
) -> Result<(), FatalError> {
    let bases = slots::base_type_nodes(node);
    ctx.extract_children(handle, Role::BaseType, &bases, Category::Type)?;
    Ok(())
}

fn extract_accessors<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    handle: Handle,
    node: Node<'tree>,
) -> Result<(), FatalError> {
    let accessors = slots::accessor_nodes(node);
    ctx.extract_children(handle, Role::Accessor, &accessors, Category::Declaration)?;
    Ok(())
}

fn extract_body<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    handle: Handle,
    node: Node<'tree>,
) -> Result<(), FatalError> {
    if let Some((body, category)) = slots::function_body(node) {
        ctx.extract_child(handle, Role::Body, body, category, 0)?;
    }
    Ok(())
}

/// `=> expr` on an expression-bodied property or indexer.
fn extract_arrow_value<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    handle: Handle,
    node: Node<'tree>,
) -> Result<(), FatalError> {
    let value = find_child_by_type(&node, "arrow_expression_clause").and_then(first_named);
    ctx.extract_optional(handle, Role::Body, value, Category::Expression)?;
    Ok(())
}

fn extract_variables<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    handle: Handle,
    node: Node<'tree>,
) -> Result<(), FatalError> {
    let declared = slots::variable_declaration(node).and_then(slots::declared_type);
    ctx.extract_optional(handle, Role::Type, declared, Category::Type)?;
    let declarators = slots::declarator_nodes(node);
    ctx.extract_children(handle, Role::Declarator, &declarators, Category::Declaration)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::extractors::base::{Relation, Value};
    use crate::extractors::csharp::test_support::{extract, find_entity, find_named};

    #[test]
    fn test_class_members_in_source_order() {
        let run = extract(
            "public sealed class Account { private int balance; public Account() {} public int Balance => balance; void Reset() {} }",
        );
        let class = find_entity(&run, "CLASS");
        assert_eq!(run.sink.text_of(class, Relation::Name), Some("Account"));
        let modifiers: Vec<&str> = run
            .sink
            .about(class)
            .filter(|f| f.relation == Relation::Modifier)
            .filter_map(|f| f.args[0].as_str())
            .collect();
        assert_eq!(modifiers, vec!["public", "sealed"]);

        let members: Vec<(&str, i64)> = run
            .sink
            .children_of(class)
            .into_iter()
            .filter(|(role, _, _)| role == "member")
            .map(|(_, child, ord)| (run.sink.kind_of(child).unwrap(), ord))
            .collect();
        assert_eq!(
            members,
            vec![("FIELD", 0), ("CONSTRUCTOR", 1), ("PROPERTY", 2), ("METHOD", 3)]
        );
    }

    #[test]
    fn test_using_directives_record_imports() {
        let run = extract("using System.Text;\nusing IO = System.IO;\nclass A {}");
        let imports: Vec<Vec<Value>> = run
            .sink
            .with_relation(Relation::Import)
            .map(|f| f.args.clone())
            .collect();
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0], vec![Value::Str("System.Text".into())]);
        assert_eq!(
            imports[1],
            vec![Value::Str("System.IO".into()), Value::Str("IO".into())]
        );
    }

    #[test]
    fn test_declaration_keys_are_stable() {
        let first = extract("class A { void M() {} }");
        let second = extract("class A { void M() {} }");
        let key = |run: &crate::extractors::csharp::test_support::Run| {
            let method = find_entity(run, "METHOD");
            run.sink.text_of(method, Relation::Key).map(str::to_string)
        };
        assert!(key(&first).is_some());
        assert_eq!(key(&first), key(&second));
        assert_eq!(key(&first).unwrap().len(), 32);
    }

    #[test]
    fn test_forward_reference_is_placed_under_owner() {
        let run = extract("class A { void First() { Second(); } void Second() {} }");
        let class = find_entity(&run, "CLASS");
        let second = find_named(&run, "METHOD", "Second");

        let parents: Vec<Vec<Value>> = run
            .sink
            .about(second)
            .filter(|f| f.relation == Relation::Parent)
            .map(|f| f.args.clone())
            .collect();
        assert_eq!(parents, vec![vec![Value::Handle(class), Value::Int(1)]]);

        // Reached twice, described once
        let kinds = run
            .sink
            .about(second)
            .filter(|f| f.relation == Relation::Kind)
            .count();
        assert_eq!(kinds, 1);
        let links = run
            .sink
            .children_of(class)
            .into_iter()
            .filter(|(_, child, _)| *child == second)
            .count();
        assert_eq!(links, 1);
    }

    #[test]
    fn test_mutually_referencing_types_terminate() {
        let run = extract("class Node { Edge next; } class Edge { Node target; }");
        let node_class = find_named(&run, "CLASS", "Node");
        let edge_class = find_named(&run, "CLASS", "Edge");

        let bindings: Vec<_> = run
            .sink
            .with_relation(Relation::BindsTo)
            .filter_map(|f| f.args[0].as_handle())
            .collect();
        assert!(bindings.contains(&node_class));
        assert!(bindings.contains(&edge_class));
        assert_eq!(run.sink.entities_of_kind("CLASS").count(), 2);
    }

    #[test]
    fn test_enum_members_and_values() {
        let run = extract("enum Color : byte { Red = 1, Green, Blue = Red + 1 }");
        let color = find_entity(&run, "ENUM");
        let children = run.sink.children_of(color);
        let roles: Vec<&str> = children.iter().map(|(role, _, _)| role.as_str()).collect();
        assert_eq!(roles, vec!["base_type", "member", "member", "member"]);

        let blue = find_named(&run, "ENUM_MEMBER", "Blue");
        let value = run.sink.children_of(blue);
        assert_eq!(value.len(), 1);
        assert_eq!(run.sink.kind_of(value[0].1), Some("BINARY"));
    }
}
