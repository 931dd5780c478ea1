// C# expression populators

use tree_sitter::Node;

use super::helpers::{emit_modifiers, operator_text, simple_name};
use super::slots::{self, field, first_named};
use super::{CSharpKind, CsEntity, Ctx};
use crate::extractors::base::tree_methods::{find_child_by_type, find_children_by_type, named_children};
use crate::extractors::base::{Category, ExtractionError, Outcome, Relation, Role};

pub(super) fn populate<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    entity: &CsEntity<'tree>,
) -> Result<Outcome, ExtractionError> {
    use CSharpKind::*;

    let node = entity.node;
    let handle = entity.handle;
    let mut outcome = Outcome::complete();
    ctx.expression_type(handle, node, &mut outcome)?;

    match entity.kind {
        IntLiteral | RealLiteral | StringLiteral | CharLiteral | BoolLiteral | NullLiteral => {
            let text = ctx.node_text(&node);
            ctx.emit_text(handle, Relation::Literal, text)?;
        }
        InterpolatedString => {
            let text = ctx.node_text(&node);
            ctx.emit_text(handle, Relation::Literal, text)?;
            let holes: Vec<_> = find_children_by_type(&node, "interpolation")
                .into_iter()
                .filter_map(first_named)
                .collect();
            ctx.extract_children(handle, Role::Operand, &holes, Category::Expression)?;
        }
        Name => {
            let name = simple_name(ctx.source(), node);
            ctx.emit_text(handle, Relation::Name, name)?;
            let type_args = slots::type_argument_nodes(node);
            ctx.extract_children(handle, Role::TypeArgument, &type_args, Category::Type)?;
            ctx.bind(handle, node)?;
        }
        This | Base => {}
        TypeAccess => {
            ctx.type_name(handle, node)?;
        }
        Paren | Await => {
            ctx.extract_required(handle, Role::Operand, first_named(node), Category::Expression)?;
        }
        Binary | Assign => {
            if let Some(op) = operator_text(ctx.source(), node) {
                ctx.emit_text(handle, Relation::Operator, op)?;
            }
            ctx.extract_required(handle, Role::Left, field(node, "left"), Category::Expression)?;
            ctx.extract_required(handle, Role::Right, field(node, "right"), Category::Expression)?;
        }
        PrefixUnary | PostfixUnary => {
            if let Some(op) = operator_text(ctx.source(), node) {
                ctx.emit_text(handle, Relation::Operator, op)?;
            }
            let operand = field(node, "operand").or_else(|| first_named(node));
            ctx.extract_required(handle, Role::Operand, operand, Category::Expression)?;
        }
        Conditional => {
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
                Category::Expression,
            )?;
            ctx.extract_required(
                handle,
                Role::Else,
                field(node, "alternative"),
                Category::Expression,
            )?;
        }
        Invocation => {
            ctx.extract_required(
                handle,
                Role::Function,
                field(node, "function"),
                Category::Expression,
            )?;
            let args = slots::argument_list(node)
                .map(slots::argument_nodes)
                .unwrap_or_default();
            ctx.extract_children(handle, Role::Argument, &args, Category::Expression)?;
        }
        MemberAccess => {
            ctx.extract_required(
                handle,
                Role::Target,
                field(node, "expression"),
                Category::Expression,
            )?;
            let name = field(node, "name").ok_or(ExtractionError::MissingSlot(Role::Member))?;
            let text = simple_name(ctx.source(), name);
            ctx.emit_text(handle, Relation::Name, text)?;
            let type_args = slots::type_argument_nodes(name);
            ctx.extract_children(handle, Role::TypeArgument, &type_args, Category::Type)?;
            ctx.bind(handle, name)?;
        }
        ElementAccess => {
            ctx.extract_required(
                handle,
                Role::Target,
                field(node, "expression"),
                Category::Expression,
            )?;
            let subscripts = field(node, "subscript")
                .map(slots::argument_nodes)
                .unwrap_or_default();
            ctx.extract_children(handle, Role::Subscript, &subscripts, Category::Expression)?;
        }
        ObjectCreation => {
            ctx.extract_optional(handle, Role::Type, field(node, "type"), Category::Type)?;
            let args = slots::argument_list(node)
                .map(slots::argument_nodes)
                .unwrap_or_default();
            ctx.extract_children(handle, Role::Argument, &args, Category::Expression)?;
            ctx.extract_optional(
                handle,
                Role::Initializer,
                initializer(node),
                Category::Expression,
            )?;
        }
        ArrayCreation => {
            ctx.extract_optional(handle, Role::Type, field(node, "type"), Category::Type)?;
            ctx.extract_optional(
                handle,
                Role::Initializer,
                initializer(node),
                Category::Expression,
            )?;
        }
        Initializer => {
            let elements = named_children(&node);
            ctx.extract_children(handle, Role::Value, &elements, Category::Expression)?;
        }
        Cast => {
            ctx.extract_required(handle, Role::Type, field(node, "type"), Category::Type)?;
            ctx.extract_required(handle, Role::Operand, field(node, "value"), Category::Expression)?;
        }
        As => {
            ctx.extract_required(handle, Role::Operand, field(node, "left"), Category::Expression)?;
            ctx.extract_required(handle, Role::Type, field(node, "right"), Category::Type)?;
        }
        SizeOf | TypeOf => {
            let operand_type = field(node, "type").or_else(|| first_named(node));
            ctx.extract_required(handle, Role::OperandType, operand_type, Category::Type)?;
        }
        Default => {
            ctx.extract_optional(handle, Role::Type, field(node, "type"), Category::Type)?;
        }
        ThrowExpr => {
            ctx.extract_optional(handle, Role::Thrown, first_named(node), Category::Expression)?;
        }
        Lambda => {
            emit_modifiers(ctx, handle, &node)?;
            let params = slots::parameter_nodes(node);
            ctx.extract_children(handle, Role::Parameter, &params, Category::Declaration)?;
            ctx.extract_optional(handle, Role::ReturnType, field(node, "type"), Category::Type)?;
            if let Some((body, category)) = slots::function_body(node) {
                ctx.extract_child(handle, Role::Body, body, category, 0)?;
            }
        }
        _ => {
            return Err(ExtractionError::Malformed(format!(
                "{} is not an expression kind",
                entity.tag()
            )))
        }
    }
    Ok(outcome)
}

fn initializer<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    field(node, "initializer").or_else(|| find_child_by_type(&node, "initializer_expression"))
}

#[cfg(test)]
mod tests {
    use crate::extractors::base::Relation;
    use crate::extractors::csharp::test_support::{extract, find_entity};

    #[test]
    fn test_sizeof_has_exactly_one_operand_type_child() {
        let run = extract("class A { int M() { return sizeof(int); } }");
        let sizeof = find_entity(&run, "SIZEOF");

        let children = run.sink.children_of(sizeof);
        assert_eq!(children.len(), 1);
        let (role, operand, ord) = &children[0];
        assert_eq!(role, "operand_type");
        assert_eq!(*ord, 0);
        assert_eq!(run.sink.kind_of(*operand), Some("PREDEFINED"));
        assert_eq!(run.sink.text_of(*operand, Relation::TypeName), Some("int"));
        assert_eq!(run.sink.text_of(sizeof, Relation::ExprType), Some("int"));
    }

    #[test]
    fn test_sizeof_over_complex_type_still_one_child() {
        let run = extract("unsafe class A { int M() { return sizeof(System.Collections.Generic.KeyValuePair<int, long>); } }");
        let sizeof = find_entity(&run, "SIZEOF");
        let children = run.sink.children_of(sizeof);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].0, "operand_type");
        assert_eq!(children[0].2, 0);
    }

    #[test]
    fn test_throw_expression_operand_at_ordinal_zero() {
        let run = extract(
            "class A { string M(string s) { return s ?? throw new System.ArgumentNullException(\"s\"); } }",
        );
        let throw = find_entity(&run, "THROW");
        let children = run.sink.children_of(throw);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].0, "thrown");
        assert_eq!(children[0].2, 0);
        assert_eq!(run.sink.kind_of(children[0].1), Some("OBJECT_CREATION"));
    }

    #[test]
    fn test_binary_operands_and_type() {
        let run = extract("class A { void M() { int x = 1; var y = x * 2L; } }");
        let binary = find_entity(&run, "BINARY");
        assert_eq!(run.sink.text_of(binary, Relation::Operator), Some("*"));
        assert_eq!(run.sink.text_of(binary, Relation::ExprType), Some("long"));

        let roles: Vec<String> = run
            .sink
            .children_of(binary)
            .into_iter()
            .map(|(role, _, _)| role)
            .collect();
        assert_eq!(roles, vec!["left", "right"]);
    }

    #[test]
    fn test_name_binds_to_local_declarator() {
        let run = extract("class A { void M() { int count = 0; count++; } }");
        let variable = find_entity(&run, "VARIABLE");
        let name = run
            .sink
            .entities_of_kind("NAME")
            .find(|h| run.sink.text_of(*h, Relation::Name) == Some("count"))
            .unwrap();
        let bound: Vec<_> = run
            .sink
            .about(name)
            .filter(|f| f.relation == Relation::BindsTo)
            .filter_map(|f| f.args[0].as_handle())
            .collect();
        assert_eq!(bound, vec![variable]);
        assert_eq!(run.report.diagnostics.for_entity(name).count(), 0);
    }

    #[test]
    fn test_unresolved_call_is_soft() {
        let run = extract("class A { void M() { Console.WriteLine(1); } }");
        let call = find_entity(&run, "INVOCATION");
        assert!(!run.report.failed.contains(&call));
        assert!(run.report.diagnostics.for_entity(call).count() > 0);
        assert_eq!(run.sink.children_of(call).len(), 2);
    }

    #[test]
    fn test_lambda_parameters_precede_body() {
        let run = extract("class A { void M() { System.Func<int, int> f = x => x + 1; } }");
        let lambda = find_entity(&run, "LAMBDA");
        let roles: Vec<String> = run
            .sink
            .children_of(lambda)
            .into_iter()
            .map(|(role, _, _)| role)
            .collect();
        assert_eq!(roles, vec!["parameter", "body"]);

        let parameter = find_entity(&run, "PARAMETER");
        let use_of_x = run
            .sink
            .entities_of_kind("NAME")
            .find(|h| run.sink.text_of(*h, Relation::Name) == Some("x"))
            .unwrap();
        let bound = run
            .sink
            .about(use_of_x)
            .find(|f| f.relation == Relation::BindsTo)
            .and_then(|f| f.args[0].as_handle());
        assert_eq!(bound, Some(parameter));
    }
}
