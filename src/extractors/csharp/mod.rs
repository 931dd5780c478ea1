// C# Language Schema
//
// Plugs C# into the generic engine: the closed kind set, node classification
// per category and the populators for each kind.
//
// - kinds.rs: the `CSharpKind` enumeration
// - expressions.rs / statements.rs / types.rs / declarations.rs: populators
// - slots.rs: child-slot lookup shared by populators and `enclosing`
// - helpers.rs: modifiers, operator text, name text
// - oracle.rs: `SyntacticOracle`, the tree-only semantic oracle

mod declarations;
mod expressions;
mod helpers;
mod kinds;
pub mod oracle;
mod slots;
mod statements;
mod types;

use tree_sitter::Node;

use crate::extractors::base::{
    Category, Context, Entity, ExtractionError, Outcome, Owner, Schema,
};

pub use kinds::CSharpKind;
pub use oracle::SyntacticOracle;

pub(crate) type Ctx<'a, 'tree> = Context<'a, 'tree, CSharp>;
pub(crate) type CsEntity<'tree> = Entity<'tree, CSharpKind>;

/// C# schema for tree-sitter-c-sharp trees.
pub struct CSharp;

impl Schema for CSharp {
    type Kind = CSharpKind;

    fn classify(category: Category, node: Node<'_>) -> Option<CSharpKind> {
        match category {
            Category::Expression => classify_expression(node),
            Category::Statement => classify_statement(node),
            Category::Type => classify_type(node),
            Category::Declaration => classify_declaration(node),
            Category::File => None,
        }
    }

    fn populate<'tree>(
        ctx: &mut Ctx<'_, 'tree>,
        entity: &CsEntity<'tree>,
    ) -> Result<Outcome, ExtractionError> {
        match entity.category {
            Category::Expression => expressions::populate(ctx, entity),
            Category::Statement => statements::populate(ctx, entity),
            Category::Type => types::populate(ctx, entity),
            Category::Declaration => declarations::populate(ctx, entity),
            Category::File => Ok(Outcome::complete()),
        }
    }

    fn enclosing<'tree>(node: Node<'tree>) -> Option<Owner<'tree>> {
        slots::owner_of(node)
    }
}

fn classify_expression(node: Node<'_>) -> Option<CSharpKind> {
    use CSharpKind::*;
    let kind = match node.kind() {
        "integer_literal" => IntLiteral,
        "real_literal" => RealLiteral,
        "string_literal" | "verbatim_string_literal" | "raw_string_literal" => StringLiteral,
        "character_literal" => CharLiteral,
        "boolean_literal" => BoolLiteral,
        "null_literal" => NullLiteral,
        "interpolated_string_expression" => InterpolatedString,
        "identifier" | "generic_name" => Name,
        "this_expression" | "this" => This,
        "base_expression" | "base" => Base,
        "predefined_type" => TypeAccess,
        "parenthesized_expression" => Paren,
        "binary_expression" => Binary,
        "prefix_unary_expression" => PrefixUnary,
        "postfix_unary_expression" => PostfixUnary,
        "assignment_expression" => Assign,
        "conditional_expression" => Conditional,
        "invocation_expression" => Invocation,
        "member_access_expression" => MemberAccess,
        "element_access_expression" => ElementAccess,
        "object_creation_expression" | "implicit_object_creation_expression" => ObjectCreation,
        "array_creation_expression" | "implicit_array_creation_expression" => ArrayCreation,
        "initializer_expression" => Initializer,
        "cast_expression" => Cast,
        "as_expression" => As,
        "sizeof_expression" => SizeOf,
        "typeof_expression" => TypeOf,
        "default_expression" => Default,
        "throw_expression" => ThrowExpr,
        "await_expression" => Await,
        "lambda_expression" => Lambda,
        _ => return None,
    };
    Some(kind)
}

fn classify_statement(node: Node<'_>) -> Option<CSharpKind> {
    use CSharpKind::*;
    let kind = match node.kind() {
        "block" => Block,
        "expression_statement" => ExprStmt,
        "local_declaration_statement" => LocalDecl,
        "if_statement" => If,
        "while_statement" => While,
        "do_statement" => Do,
        "for_statement" => For,
        "foreach_statement" => Foreach,
        "return_statement" => Return,
        "throw_statement" => ThrowStmt,
        "break_statement" => Break,
        "continue_statement" => Continue,
        "empty_statement" => Empty,
        "try_statement" => Try,
        "catch_clause" => Catch,
        "switch_statement" => Switch,
        "switch_section" => SwitchSection,
        "using_statement" => Using,
        "lock_statement" => Lock,
        "yield_statement" => Yield,
        "local_function_statement" => LocalFunction,
        _ => return None,
    };
    Some(kind)
}

fn classify_type(node: Node<'_>) -> Option<CSharpKind> {
    use CSharpKind::*;
    let kind = match node.kind() {
        "predefined_type" => Predefined,
        "identifier" => Named,
        "generic_name" => Generic,
        "qualified_name" | "alias_qualified_name" => Qualified,
        "array_type" => Array,
        "nullable_type" => Nullable,
        "pointer_type" => Pointer,
        "tuple_type" => Tuple,
        "implicit_type" => Implicit,
        _ => return None,
    };
    Some(kind)
}

fn classify_declaration(node: Node<'_>) -> Option<CSharpKind> {
    use CSharpKind::*;
    let kind = match node.kind() {
        "compilation_unit" => CompilationUnit,
        "using_directive" => UsingDirective,
        "namespace_declaration" | "file_scoped_namespace_declaration" => Namespace,
        "class_declaration" => Class,
        "struct_declaration" => Struct,
        "interface_declaration" => Interface,
        "record_declaration" | "record_struct_declaration" => Record,
        "enum_declaration" => Enum,
        "enum_member_declaration" => EnumMember,
        "delegate_declaration" => Delegate,
        "method_declaration" => Method,
        "constructor_declaration" => Constructor,
        "destructor_declaration" => Destructor,
        "operator_declaration" | "conversion_operator_declaration" => Operator,
        "indexer_declaration" => Indexer,
        "field_declaration" => Field,
        "event_field_declaration" | "event_declaration" => Event,
        "property_declaration" => Property,
        "accessor_declaration" => Accessor,
        "variable_declarator" => Variable,
        "parameter" => Parameter,
        "type_parameter" => TypeParameter,
        "catch_declaration" => CatchVariable,
        "global_statement" => GlobalStatement,
        "implicit_parameter" => Parameter,
        // Implicitly typed lambda parameter or `foreach` variable
        "identifier" => match node.parent().map(|p| p.kind()) {
            Some("lambda_expression") => Parameter,
            Some("foreach_statement") => Variable,
            _ => return None,
        },
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
pub(crate) mod test_support {
    use tree_sitter::{Parser, Tree};

    use super::{CSharp, SyntacticOracle};
    use crate::config::ExtractorConfig;
    use crate::extractors::base::{
        FatalError, Handle, MemorySink, Relation, SemanticOracle, UnitId, UnitReport,
    };
    use crate::extractors::factory::extract_unit;

    pub struct Run {
        pub sink: MemorySink,
        pub report: UnitReport,
        pub root: Handle,
    }

    pub fn parse(code: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .expect("Error loading C# grammar");
        parser.parse(code, None).expect("Error parsing C# source")
    }

    pub fn extract(code: &str) -> Run {
        let tree = parse(code);
        let oracle = SyntacticOracle::new(&tree, code);
        extract_with(code, &tree, &oracle, &ExtractorConfig::default()).expect("extraction aborted")
    }

    pub fn extract_with<'tree>(
        code: &'tree str,
        tree: &'tree Tree,
        oracle: &dyn SemanticOracle<'tree>,
        config: &ExtractorConfig,
    ) -> Result<Run, FatalError> {
        let mut sink = MemorySink::new();
        let report = extract_unit::<CSharp>(tree, "Test.cs", code, UnitId(1), oracle, &mut sink, config)?;
        let root = sink
            .entities_of_kind("COMPILATION_UNIT")
            .next()
            .unwrap_or(Handle::UNRESOLVED);
        Ok(Run { sink, report, root })
    }

    /// First entity of kind `tag`, in emission order.
    pub fn find_entity(run: &Run, tag: &str) -> Handle {
        run.sink
            .entities_of_kind(tag)
            .next()
            .unwrap_or_else(|| panic!("no {tag} entity"))
    }

    pub fn find_named(run: &Run, tag: &str, name: &str) -> Handle {
        run.sink
            .entities_of_kind(tag)
            .find(|h| run.sink.text_of(*h, Relation::Name) == Some(name))
            .unwrap_or_else(|| panic!("no {tag} named {name}"))
    }
}
