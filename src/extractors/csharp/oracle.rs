// Syntactic semantic oracle for C#
//
// Answers name and type questions from the parse tree alone: scoped lookup of
// locals, parameters and members, declared types, literal typing and simple
// operator typing. Anything that needs metadata from referenced assemblies is
// reported as unresolved.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use tree_sitter::{Node, Tree};

use super::helpers::{normalize, simple_name};
use super::slots;
use crate::extractors::base::tree_methods::{find_child_by_type, named_children, node_text};
use crate::extractors::base::{ResolutionError, SemanticOracle};

static UNSIGNED_LONG_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(ul|lu)$").expect("valid literal suffix pattern"));
static UNSIGNED_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[uU]$").expect("valid literal suffix pattern"));
static LONG_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[lL]$").expect("valid literal suffix pattern"));
static REAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([fFdDmM])$").expect("valid literal suffix pattern"));
static HEX_OR_BINARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[xXbB]").expect("valid literal prefix pattern"));
/// `List<T>`, `IEnumerable<T>` and friends: a single type argument at the end.
static SINGLE_ARGUMENT_GENERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.]+<([^<>,]+)>$").expect("valid generic pattern"));

/// Numeric types in promotion order.
const NUMERIC_RANK: &[&str] = &["int", "uint", "long", "ulong", "float", "double", "decimal"];
const SMALL_INTEGRALS: &[&str] = &["sbyte", "byte", "short", "ushort", "char"];

pub struct SyntacticOracle<'tree> {
    source: &'tree str,
    root: Node<'tree>,
    /// Simple name of every type declared in the unit, first declaration wins
    types: HashMap<String, Node<'tree>>,
    /// Expression types already answered, by node id
    known: RefCell<HashMap<usize, Result<Option<String>, ResolutionError>>>,
    /// Expressions whose type is being computed; a repeat is a cycle
    in_flight: RefCell<HashSet<usize>>,
}

impl<'tree> SyntacticOracle<'tree> {
    pub fn new(tree: &'tree Tree, source: &'tree str) -> Self {
        let root = tree.root_node();
        let mut types = HashMap::new();
        collect_types(source, root, &mut types);
        Self {
            source,
            root,
            types,
            known: RefCell::new(HashMap::new()),
            in_flight: RefCell::new(HashSet::new()),
        }
    }

    fn text(&self, node: &Node) -> String {
        node_text(self.source, node)
    }

    /// Dotted name of a type declaration including namespaces and outer types.
    pub fn qualified_name(&self, decl: Node<'tree>) -> String {
        let mut parts = Vec::new();
        let mut current = Some(decl);
        let mut in_namespace = false;
        while let Some(node) = current {
            if slots::is_type_declaration(node.kind()) || node.kind() == "delegate_declaration" {
                if let Some(name) = slots::name_node(node) {
                    parts.push(self.text(&name));
                }
            } else if node.kind() == "namespace_declaration" {
                if let Some(name) = slots::field(node, "name") {
                    parts.push(normalize(&self.text(&name)));
                }
                in_namespace = true;
            }
            current = node.parent();
        }
        if !in_namespace {
            if let Some(ns) = self.file_scoped_namespace() {
                parts.push(ns);
            }
        }
        parts.reverse();
        parts.join(".")
    }

    fn file_scoped_namespace(&self) -> Option<String> {
        let ns = find_child_by_type(&self.root, "file_scoped_namespace_declaration")?;
        slots::field(ns, "name").map(|name| normalize(&self.text(&name)))
    }

    /// Declaration visible as `name` from `use_site`, innermost scope first.
    fn lookup_value(&self, name: &str, use_site: Node<'tree>) -> Option<Node<'tree>> {
        let mut current = use_site.parent();
        while let Some(scope) = current {
            if let Some(found) = self.lookup_in_scope(scope, name, use_site) {
                return Some(found);
            }
            current = scope.parent();
        }
        self.types.get(name).copied()
    }

    fn lookup_in_scope(
        &self,
        scope: Node<'tree>,
        name: &str,
        use_site: Node<'tree>,
    ) -> Option<Node<'tree>> {
        match scope.kind() {
            "block" | "switch_section" | "compilation_unit" => {
                self.lookup_statements(scope, name, use_site)
            }
            "for_statement" | "using_statement" => self
                .find_declarator(slots::field(scope, "initializer").unwrap_or(scope), name)
                .filter(|found| found.end_byte() <= use_site.start_byte()),
            // The iteration variable is only visible in the body, not in the collection
            "foreach_statement" => slots::field(scope, "left")
                .filter(|left| left.kind() == "identifier" && self.text(left) == name)
                .filter(|_| slots::field(scope, "body").is_some_and(|body| contains(body, use_site))),
            "catch_clause" => find_child_by_type(&scope, "catch_declaration").filter(|decl| {
                slots::field(*decl, "name").is_some_and(|n| self.text(&n) == name)
            }),
            "lambda_expression"
            | "local_function_statement"
            | "method_declaration"
            | "constructor_declaration"
            | "operator_declaration"
            | "conversion_operator_declaration"
            | "indexer_declaration"
            | "delegate_declaration" => self
                .find_parameter(scope, name)
                .or_else(|| self.find_type_parameter(scope, name)),
            kind if slots::is_type_declaration(kind) => self
                .find_member(scope, name)
                .or_else(|| self.find_parameter(scope, name))
                .or_else(|| self.find_type_parameter(scope, name)),
            _ => None,
        }
    }

    /// Locals declared before `use_site` and local functions anywhere in the block.
    fn lookup_statements(
        &self,
        scope: Node<'tree>,
        name: &str,
        use_site: Node<'tree>,
    ) -> Option<Node<'tree>> {
        for statement in named_children(&scope) {
            let statement = if statement.kind() == "global_statement" {
                match statement.named_child(0) {
                    Some(inner) => inner,
                    None => continue,
                }
            } else {
                statement
            };
            match statement.kind() {
                "local_declaration_statement" => {
                    if let Some(found) = self.find_declarator(statement, name) {
                        if found.end_byte() <= use_site.start_byte() {
                            return Some(found);
                        }
                    }
                }
                "local_function_statement" => {
                    if slots::name_node(statement).is_some_and(|n| self.text(&n) == name) {
                        return Some(statement);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn find_declarator(&self, node: Node<'tree>, name: &str) -> Option<Node<'tree>> {
        slots::declarator_nodes(node)
            .into_iter()
            .find(|d| slots::name_node(*d).is_some_and(|n| self.text(&n) == name))
    }

    fn find_parameter(&self, node: Node<'tree>, name: &str) -> Option<Node<'tree>> {
        slots::parameter_nodes(node).into_iter().find(|p| {
            let name_node = if slots::is_implicit_parameter(p.kind()) {
                Some(*p)
            } else {
                slots::field(*p, "name")
            };
            name_node.is_some_and(|n| self.text(&n) == name)
        })
    }

    fn find_type_parameter(&self, node: Node<'tree>, name: &str) -> Option<Node<'tree>> {
        slots::type_parameter_nodes(node)
            .into_iter()
            .find(|p| slots::name_node(*p).is_some_and(|n| self.text(&n) == name))
    }

    fn find_member(&self, type_decl: Node<'tree>, name: &str) -> Option<Node<'tree>> {
        for member in slots::member_nodes(type_decl) {
            match member.kind() {
                "field_declaration" | "event_field_declaration" => {
                    if let Some(found) = self.find_declarator(member, name) {
                        return Some(found);
                    }
                }
                _ => {
                    if slots::name_node(member).is_some_and(|n| self.text(&n) == name) {
                        return Some(member);
                    }
                }
            }
        }
        None
    }

    /// Member named by the right side of `target.name`, when the target's
    /// type is declared in this unit.
    fn lookup_member_access(&self, access: Node<'tree>, name: &str) -> Option<Node<'tree>> {
        let target = slots::field(access, "expression")?;
        let target_type = self.expression_type(target).ok().flatten()?;
        let type_decl = self.type_declaration(&target_type)?;
        self.find_member(type_decl, name)
    }

    /// Declaration of a type spelled `name`, ignoring namespace and type arguments.
    fn type_declaration(&self, name: &str) -> Option<Node<'tree>> {
        let base = name.split('<').next().unwrap_or(name);
        let simple = base.rsplit('.').next().unwrap_or(base);
        self.types.get(simple).copied()
    }

    /// Type parameter in scope, or a type declared in this unit.
    fn lookup_type(&self, name: &str, use_site: Node<'tree>) -> Option<Node<'tree>> {
        let mut current = use_site.parent();
        while let Some(scope) = current {
            if let Some(found) = self.find_type_parameter(scope, name) {
                return Some(found);
            }
            current = scope.parent();
        }
        self.types.get(name).copied()
    }

    fn enclosing_type(&self, node: Node<'tree>) -> Option<Node<'tree>> {
        let mut current = node.parent();
        while let Some(parent) = current {
            if slots::is_type_declaration(parent.kind()) {
                return Some(parent);
            }
            current = parent.parent();
        }
        None
    }

    /// Static type of whatever a declaration introduces.
    fn declared_value_type(&self, decl: Node<'tree>) -> Result<Option<String>, ResolutionError> {
        match decl.kind() {
            "variable_declarator" => {
                let declaration = decl.parent().filter(|p| p.kind() == "variable_declaration");
                match declaration.and_then(slots::declared_type) {
                    Some(ty) if ty.kind() != "implicit_type" => self.type_name(ty).map(Some),
                    _ => match slots::initializer_of(decl) {
                        Some(init) => self.expression_type(init),
                        None => Err(ResolutionError::UnresolvedType(self.text(&decl))),
                    },
                }
            }
            "identifier" | "implicit_parameter" => self.foreach_variable_type(decl),
            "parameter" | "property_declaration" | "event_declaration"
            | "indexer_declaration" | "catch_declaration" => match slots::declared_type(decl) {
                Some(ty) => self.type_name(ty).map(Some),
                None => Err(ResolutionError::UnresolvedType(self.text(&decl))),
            },
            "enum_member_declaration" => Ok(decl
                .parent()
                .and_then(|list| list.parent())
                .map(|e| self.qualified_name(e))),
            kind if slots::is_type_declaration(kind) => Ok(Some(self.qualified_name(decl))),
            _ => Ok(None),
        }
    }

    /// Type of an implicitly typed `foreach` variable or lambda parameter.
    fn foreach_variable_type(&self, ident: Node<'tree>) -> Result<Option<String>, ResolutionError> {
        let unresolved = || ResolutionError::UnresolvedType(self.text(&ident));
        let foreach = ident
            .parent()
            .filter(|p| p.kind() == "foreach_statement")
            .ok_or_else(unresolved)?;
        if let Some(ty) = slots::field(foreach, "type").filter(|t| t.kind() != "implicit_type") {
            return self.type_name(ty).map(Some);
        }
        let iterable = slots::field(foreach, "right").ok_or_else(unresolved)?;
        let collection = self.expression_type(iterable)?.ok_or_else(unresolved)?;
        element_type(&collection).ok_or_else(unresolved).map(Some)
    }

    fn invocation_type(&self, call: Node<'tree>) -> Result<Option<String>, ResolutionError> {
        let unresolved = || ResolutionError::UnresolvedType(self.text(&call));
        let function = slots::field(call, "function").ok_or_else(unresolved)?;
        let name = match function.kind() {
            "member_access_expression" => slots::field(function, "name"),
            _ => Some(function),
        }
        .ok_or_else(unresolved)?;
        let decl = self.declaration_of(name).ok_or_else(unresolved)?;
        match decl.kind() {
            "method_declaration" | "local_function_statement" | "delegate_declaration" => {
                match slots::declared_type(decl) {
                    Some(ty) => self.type_name(ty).map(Some),
                    None => Err(unresolved()),
                }
            }
            _ => Err(unresolved()),
        }
    }

    fn binary_type(&self, node: Node<'tree>) -> Result<Option<String>, ResolutionError> {
        let op = super::helpers::operator_text(self.source, node).unwrap_or_default();
        if matches!(
            op.as_str(),
            "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" | "is"
        ) {
            return Ok(Some("bool".to_string()));
        }
        let unresolved = || ResolutionError::UnresolvedType(self.text(&node));
        let left = slots::field(node, "left").ok_or_else(unresolved)?;
        let right = slots::field(node, "right").ok_or_else(unresolved)?;
        let left_type = self.expression_type(left)?;
        if op == "??" {
            return match left_type {
                Some(t) => Ok(Some(t.trim_end_matches('?').to_string())),
                None => self.expression_type(right),
            };
        }
        if op == "<<" || op == ">>" || op == ">>>" {
            return left_type.map(|t| Some(promote(&t, &t))).ok_or_else(unresolved);
        }
        let right_type = self.expression_type(right)?;
        match (left_type, right_type) {
            (Some(l), Some(r)) if op == "+" && (l == "string" || r == "string") => {
                Ok(Some("string".to_string()))
            }
            (Some(l), Some(r)) if l == "bool" && r == "bool" => Ok(Some("bool".to_string())),
            (Some(l), Some(r)) => Ok(Some(promote(&l, &r))),
            _ => Err(unresolved()),
        }
    }

    fn unary_type(&self, node: Node<'tree>) -> Result<Option<String>, ResolutionError> {
        let op = super::helpers::operator_text(self.source, node).unwrap_or_default();
        if op == "!" && node.kind() == "prefix_unary_expression" {
            return Ok(Some("bool".to_string()));
        }
        let operand = node
            .named_child(0)
            .ok_or_else(|| ResolutionError::UnresolvedType(self.text(&node)))?;
        let operand_type = self.expression_type(operand)?;
        Ok(match op.as_str() {
            "-" | "+" | "~" => operand_type.map(|t| promote(&t, &t)),
            _ => operand_type,
        })
    }

    fn literal_type(&self, node: Node<'tree>) -> Option<String> {
        let text = self.text(&node);
        let ty = match node.kind() {
            "integer_literal" => {
                let digits = text.replace('_', "");
                if UNSIGNED_LONG_SUFFIX.is_match(&digits) {
                    "ulong"
                } else if UNSIGNED_SUFFIX.is_match(&digits) {
                    "uint"
                } else if LONG_SUFFIX.is_match(&digits) {
                    "long"
                } else if HEX_OR_BINARY.is_match(&digits) || digits.parse::<i32>().is_ok() {
                    "int"
                } else if digits.parse::<u32>().is_ok() {
                    "uint"
                } else if digits.parse::<i64>().is_ok() {
                    "long"
                } else {
                    "ulong"
                }
            }
            "real_literal" => match REAL_SUFFIX.captures(&text).map(|c| c[1].to_ascii_lowercase()) {
                Some(suffix) if suffix == "f" => "float",
                Some(suffix) if suffix == "m" => "decimal",
                _ => "double",
            },
            "string_literal"
            | "verbatim_string_literal"
            | "raw_string_literal"
            | "interpolated_string_expression" => "string",
            "character_literal" => "char",
            "boolean_literal" => "bool",
            _ => return None,
        };
        Some(ty.to_string())
    }

    /// Whether an identifier sits where the grammar expects a type.
    fn is_type_position(&self, node: Node<'tree>) -> bool {
        let Some(parent) = node.parent() else {
            return false;
        };
        let is_field = |name: &str| slots::field(parent, name).is_some_and(|n| n.id() == node.id());
        match parent.kind() {
            "type_argument_list" | "array_type" | "nullable_type" | "pointer_type"
            | "base_list" | "ref_type" | "type_parameter_constraint" => true,
            "as_expression" | "is_expression" => is_field("right"),
            "variable_declaration" | "parameter" | "cast_expression" | "object_creation_expression"
            | "typeof_expression" | "sizeof_expression" | "default_expression"
            | "property_declaration" | "indexer_declaration" | "event_declaration"
            | "tuple_element" | "catch_declaration" | "foreach_statement"
            | "declaration_expression" | "delegate_declaration" | "lambda_expression"
            | "operator_declaration" | "conversion_operator_declaration" => is_field("type"),
            "method_declaration" | "local_function_statement" => {
                is_field("returns") || is_field("type")
            }
            _ => false,
        }
    }
}

impl<'tree> SemanticOracle<'tree> for SyntacticOracle<'tree> {
    fn expression_type(&self, node: Node<'tree>) -> Result<Option<String>, ResolutionError> {
        let id = node.id();
        let known = self.known.borrow().get(&id).cloned();
        if let Some(answer) = known {
            return answer;
        }
        if !self.in_flight.borrow_mut().insert(id) {
            return Err(ResolutionError::UnresolvedType(self.text(&node)));
        }
        let answer = self.infer_expression_type(node);
        self.in_flight.borrow_mut().remove(&id);
        self.known.borrow_mut().insert(id, answer.clone());
        answer
    }

    fn type_name(&self, node: Node<'tree>) -> Result<String, ResolutionError> {
        match node.kind() {
            "predefined_type" => Ok(self.text(&node)),
            "implicit_type" => self.implicit_type(node),
            "identifier" => {
                let name = self.text(&node);
                match self.lookup_type(&name, node) {
                    Some(decl) if decl.kind() != "type_parameter" => Ok(self.qualified_name(decl)),
                    _ => Ok(name),
                }
            }
            "generic_name" => {
                let base = simple_name(self.source, node);
                let base = match self.lookup_type(&base, node) {
                    Some(decl) if decl.kind() != "type_parameter" => self.qualified_name(decl),
                    _ => base,
                };
                let args = slots::type_argument_nodes(node)
                    .into_iter()
                    .map(|arg| self.type_name(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{}<{}>", base, args.join(", ")))
            }
            "array_type" => {
                let element = slots::field(node, "type")
                    .or_else(|| node.named_child(0))
                    .ok_or_else(|| ResolutionError::UnresolvedType(self.text(&node)))?;
                let rank = slots::field(node, "rank")
                    .or_else(|| find_child_by_type(&node, "array_rank_specifier"))
                    // `new int[n, m]` spells sizes; the type only keeps the rank
                    .map(|r| format!("[{}]", ",".repeat(self.text(&r).matches(',').count())))
                    .unwrap_or_else(|| "[]".to_string());
                Ok(format!("{}{}", self.type_name(element)?, rank))
            }
            "nullable_type" | "pointer_type" => {
                let inner = slots::field(node, "type")
                    .or_else(|| node.named_child(0))
                    .ok_or_else(|| ResolutionError::UnresolvedType(self.text(&node)))?;
                let suffix = if node.kind() == "nullable_type" { "?" } else { "*" };
                Ok(format!("{}{}", self.type_name(inner)?, suffix))
            }
            "tuple_type" => {
                let elements = find_children_tuple(node)
                    .into_iter()
                    .map(|ty| self.type_name(ty))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("({})", elements.join(", ")))
            }
            _ => Ok(normalize(&self.text(&node))),
        }
    }

    fn declaration_of(&self, node: Node<'tree>) -> Option<Node<'tree>> {
        let name = simple_name(self.source, node);
        if let Some(parent) = node.parent() {
            if parent.kind() == "member_access_expression" {
                let is_member = slots::field(parent, "name").is_some_and(|n| n.id() == node.id());
                if is_member {
                    return self.lookup_member_access(parent, &name);
                }
            }
        }
        if self.is_type_position(node) {
            return self.lookup_type(&name, node);
        }
        self.lookup_value(&name, node)
    }
}

impl<'tree> SyntacticOracle<'tree> {
    fn infer_expression_type(&self, node: Node<'tree>) -> Result<Option<String>, ResolutionError> {
        if let Some(literal) = self.literal_type(node) {
            return Ok(Some(literal));
        }
        let unresolved = || ResolutionError::UnresolvedType(self.text(&node));
        match node.kind() {
            "null_literal" | "lambda_expression" | "throw_expression" | "initializer_expression" => {
                Ok(None)
            }
            "identifier" | "generic_name" => match self.declaration_of(node) {
                Some(decl) => self.declared_value_type(decl),
                None => Err(ResolutionError::UnknownSymbol(simple_name(self.source, node))),
            },
            "member_access_expression" => {
                let name = slots::field(node, "name").ok_or_else(unresolved)?;
                match self.declaration_of(name) {
                    Some(decl) => self.declared_value_type(decl),
                    None => Err(unresolved()),
                }
            }
            "this_expression" | "this" => self
                .enclosing_type(node)
                .map(|t| Some(self.qualified_name(t)))
                .ok_or_else(unresolved),
            "base_expression" | "base" => {
                let ty = self.enclosing_type(node).ok_or_else(unresolved)?;
                match slots::base_type_nodes(ty).first() {
                    Some(base) => self.type_name(*base).map(Some),
                    None => Ok(Some("object".to_string())),
                }
            }
            "predefined_type" => self.type_name(node).map(Some),
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) => self.expression_type(inner),
                None => Err(unresolved()),
            },
            "binary_expression" => self.binary_type(node),
            "prefix_unary_expression" | "postfix_unary_expression" => self.unary_type(node),
            "assignment_expression" => match slots::field(node, "left") {
                Some(left) => self.expression_type(left),
                None => Err(unresolved()),
            },
            "conditional_expression" => {
                let consequence = slots::field(node, "consequence").ok_or_else(unresolved)?;
                match self.expression_type(consequence) {
                    Ok(Some(ty)) => Ok(Some(ty)),
                    _ => {
                        let alternative = slots::field(node, "alternative").ok_or_else(unresolved)?;
                        self.expression_type(alternative)
                    }
                }
            }
            "invocation_expression" => self.invocation_type(node),
            "element_access_expression" => {
                let target = slots::field(node, "expression").ok_or_else(unresolved)?;
                let target_type = self.expression_type(target)?.ok_or_else(unresolved)?;
                if target_type == "string" {
                    return Ok(Some("char".to_string()));
                }
                element_type(&target_type).map(Some).ok_or_else(unresolved)
            }
            "object_creation_expression" | "array_creation_expression" | "cast_expression"
            | "default_expression" => match slots::field(node, "type") {
                Some(ty) => self.type_name(ty).map(Some),
                None => Err(unresolved()),
            },
            "as_expression" => match slots::field(node, "right") {
                Some(ty) => self.type_name(ty).map(|t| Some(format!("{}?", t.trim_end_matches('?')))),
                None => Err(unresolved()),
            },
            "is_expression" | "is_pattern_expression" => Ok(Some("bool".to_string())),
            "sizeof_expression" => Ok(Some("int".to_string())),
            "typeof_expression" => Ok(Some("System.Type".to_string())),
            "await_expression" => {
                let operand = node.named_child(0).ok_or_else(unresolved)?;
                let task = self.expression_type(operand)?.ok_or_else(unresolved)?;
                match SINGLE_ARGUMENT_GENERIC.captures(&task) {
                    Some(caps) if task.contains("Task<") => Ok(Some(caps[1].trim().to_string())),
                    _ if task.ends_with("Task") => Ok(None),
                    _ => Err(unresolved()),
                }
            }
            _ => Err(unresolved()),
        }
    }

    /// `var`: the type of the initializer, or the element type for `foreach`.
    fn implicit_type(&self, node: Node<'tree>) -> Result<String, ResolutionError> {
        let unresolved = || ResolutionError::UnresolvedType("var".to_string());
        let parent = node.parent().ok_or_else(unresolved)?;
        let ty = match parent.kind() {
            "variable_declaration" => {
                let declarator = slots::declarator_nodes(parent)
                    .into_iter()
                    .next()
                    .ok_or_else(unresolved)?;
                let init = slots::initializer_of(declarator).ok_or_else(unresolved)?;
                self.expression_type(init)?
            }
            "foreach_statement" => match slots::field(parent, "left") {
                Some(left) if left.kind() == "identifier" => self.foreach_variable_type(left)?,
                _ => None,
            },
            _ => None,
        };
        ty.ok_or_else(unresolved)
    }
}

fn contains(outer: Node<'_>, inner: Node<'_>) -> bool {
    outer.start_byte() <= inner.start_byte() && inner.end_byte() <= outer.end_byte()
}

/// Element type of an array or single-argument generic collection.
fn element_type(collection: &str) -> Option<String> {
    if let Some(element) = collection.strip_suffix("[]") {
        return Some(element.to_string());
    }
    SINGLE_ARGUMENT_GENERIC
        .captures(collection)
        .map(|caps| caps[1].trim().to_string())
}

/// Binary numeric promotion of two operand types.
fn promote(left: &str, right: &str) -> String {
    let rank = |t: &str| {
        if SMALL_INTEGRALS.contains(&t) {
            Some(0)
        } else {
            NUMERIC_RANK.iter().position(|n| *n == t)
        }
    };
    match (rank(left), rank(right)) {
        (Some(l), Some(r)) => NUMERIC_RANK[l.max(r)].to_string(),
        _ => left.to_string(),
    }
}

fn find_children_tuple(node: Node<'_>) -> Vec<Node<'_>> {
    named_children(&node)
        .into_iter()
        .filter(|c| c.kind() == "tuple_element")
        .filter_map(|e| slots::field(e, "type").or_else(|| e.named_child(0)))
        .collect()
}

fn collect_types<'tree>(source: &str, node: Node<'tree>, types: &mut HashMap<String, Node<'tree>>) {
    for child in named_children(&node) {
        let kind = child.kind();
        if slots::is_type_declaration(kind) || kind == "delegate_declaration" {
            if let Some(name) = slots::name_node(child) {
                types.entry(node_text(source, &name)).or_insert(child);
            }
        }
        if slots::is_member_container(kind) || kind == "declaration_list" {
            collect_types(source, child, types);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(code: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .unwrap();
        parser.parse(code, None).unwrap()
    }

    fn find<'t>(node: Node<'t>, source: &str, kind: &str, text: &str) -> Option<Node<'t>> {
        if node.kind() == kind && node_text(source, &node) == text {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
        children.into_iter().find_map(|c| find(c, source, kind, text))
    }

    #[test]
    fn test_literal_types() {
        let code = "class A { void M() { var a = 1; var b = 2L; var c = 1.5f; var d = 'x'; var e = 3000000000; } }";
        let tree = parse(code);
        let oracle = SyntacticOracle::new(&tree, code);
        let root = tree.root_node();
        let ty = |text: &str, kind: &str| {
            oracle
                .expression_type(find(root, code, kind, text).unwrap())
                .unwrap()
        };
        assert_eq!(ty("1", "integer_literal").as_deref(), Some("int"));
        assert_eq!(ty("2L", "integer_literal").as_deref(), Some("long"));
        assert_eq!(ty("1.5f", "real_literal").as_deref(), Some("float"));
        assert_eq!(ty("'x'", "character_literal").as_deref(), Some("char"));
        assert_eq!(ty("3000000000", "integer_literal").as_deref(), Some("uint"));
    }

    #[test]
    fn test_local_lookup_respects_declaration_order() {
        let code = "class A { void M() { int x = 1; var y = x + 2; } }";
        let tree = parse(code);
        let oracle = SyntacticOracle::new(&tree, code);
        let root = tree.root_node();
        let binary = find(root, code, "binary_expression", "x + 2").unwrap();
        let use_of_x = slots::field(binary, "left").unwrap();

        let decl = oracle.declaration_of(use_of_x).unwrap();
        assert_eq!(decl.kind(), "variable_declarator");
        assert_eq!(oracle.expression_type(binary).unwrap().as_deref(), Some("int"));

        let var = find(root, code, "implicit_type", "var").unwrap();
        assert_eq!(oracle.type_name(var).unwrap(), "int");
    }

    #[test]
    fn test_qualified_names_through_namespaces() {
        let code = "namespace Outer.Inner { class A { class B {} B b; } }";
        let tree = parse(code);
        let oracle = SyntacticOracle::new(&tree, code);
        let root = tree.root_node();
        let declaration = find(root, code, "variable_declaration", "B b").unwrap();
        let field_type = slots::declared_type(declaration).unwrap();
        assert_eq!(oracle.type_name(field_type).unwrap(), "Outer.Inner.A.B");
        assert!(oracle.declaration_of(field_type).is_some());
    }

    #[test]
    fn test_unknown_names_are_resolution_failures() {
        let code = "class A { void M() { Missing(); var q = nothing; } }";
        let tree = parse(code);
        let oracle = SyntacticOracle::new(&tree, code);
        let root = tree.root_node();
        let call = find(root, code, "invocation_expression", "Missing()").unwrap();
        assert!(matches!(
            oracle.expression_type(call),
            Err(ResolutionError::UnresolvedType(_))
        ));
        let var = find(root, code, "implicit_type", "var").unwrap();
        assert!(oracle.type_name(var).is_err());
    }

    #[test]
    fn test_this_member_access_binds_to_field() {
        let code = "class A { int count; void M() { this.count = 2; } }";
        let tree = parse(code);
        let oracle = SyntacticOracle::new(&tree, code);
        let access = find(tree.root_node(), code, "member_access_expression", "this.count").unwrap();
        let name = slots::field(access, "name").unwrap();
        let decl = oracle.declaration_of(name).unwrap();
        assert_eq!(decl.kind(), "variable_declarator");
        assert_eq!(oracle.expression_type(access).unwrap().as_deref(), Some("int"));
    }

    #[test]
    fn test_foreach_collection_does_not_see_iteration_variable() {
        let code = "class A { int[] x; void M() { foreach (var x in x) { x.ToString(); } } }";
        let tree = parse(code);
        let oracle = SyntacticOracle::new(&tree, code);
        let root = tree.root_node();
        let foreach =
            find(root, code, "foreach_statement", "foreach (var x in x) { x.ToString(); }").unwrap();
        let collection = slots::field(foreach, "right").unwrap();

        let decl = oracle.declaration_of(collection).unwrap();
        assert_eq!(decl.kind(), "variable_declarator");
        assert_eq!(oracle.expression_type(collection).unwrap().as_deref(), Some("int[]"));
        let var = find(root, code, "implicit_type", "var").unwrap();
        assert_eq!(oracle.type_name(var).unwrap(), "int");

        let in_body = find(root, code, "member_access_expression", "x.ToString").unwrap();
        let target = slots::field(in_body, "expression").unwrap();
        assert_eq!(oracle.declaration_of(target).unwrap().kind(), "identifier");
    }

    #[test]
    fn test_declarator_not_visible_in_its_own_initializer() {
        let code = "class A { void M() { for (var i = i + 1; ; ) { } using (var r = r) { } } }";
        let tree = parse(code);
        let oracle = SyntacticOracle::new(&tree, code);
        let root = tree.root_node();

        let binary = find(root, code, "binary_expression", "i + 1").unwrap();
        let use_of_i = slots::field(binary, "left").unwrap();
        assert!(oracle.declaration_of(use_of_i).is_none());
        assert!(oracle.expression_type(binary).is_err());

        let declarator = find(root, code, "variable_declarator", "r = r").unwrap();
        let use_of_r = slots::initializer_of(declarator).unwrap();
        assert!(oracle.declaration_of(use_of_r).is_none());
        let var = find(root, code, "implicit_type", "var").unwrap();
        assert!(oracle.type_name(var).is_err());
    }

    #[test]
    fn test_cyclic_query_is_unresolved() {
        let code = "class A { void M() { var a = 1 + 2; } }";
        let tree = parse(code);
        let oracle = SyntacticOracle::new(&tree, code);
        let binary = find(tree.root_node(), code, "binary_expression", "1 + 2").unwrap();

        oracle.in_flight.borrow_mut().insert(binary.id());
        assert!(matches!(
            oracle.expression_type(binary),
            Err(ResolutionError::UnresolvedType(_))
        ));
        oracle.in_flight.borrow_mut().clear();
        assert_eq!(oracle.expression_type(binary).unwrap().as_deref(), Some("int"));
    }

    #[test]
    fn test_expression_types_are_remembered() {
        let code = "class A { void M() { var s = 1 + 2L + 3; } }";
        let tree = parse(code);
        let oracle = SyntacticOracle::new(&tree, code);
        let root = tree.root_node();
        let outer = find(root, code, "binary_expression", "1 + 2L + 3").unwrap();
        let inner = find(root, code, "binary_expression", "1 + 2L").unwrap();

        assert_eq!(oracle.expression_type(outer).unwrap().as_deref(), Some("long"));
        assert!(oracle.known.borrow().contains_key(&inner.id()));
        assert!(oracle.in_flight.borrow().is_empty());
        assert_eq!(oracle.expression_type(inner).unwrap().as_deref(), Some("long"));
    }

    #[test]
    fn test_shift_takes_the_left_operand_type() {
        let code = "class A { void M() { long a = 1; var b = a << 2; } }";
        let tree = parse(code);
        let oracle = SyntacticOracle::new(&tree, code);
        let root = tree.root_node();
        let shift = find(root, code, "binary_expression", "a << 2").unwrap();
        assert_eq!(oracle.expression_type(shift).unwrap().as_deref(), Some("long"));
    }

    #[test]
    fn test_promotion() {
        assert_eq!(promote("int", "long"), "long");
        assert_eq!(promote("byte", "byte"), "int");
        assert_eq!(promote("double", "int"), "double");
        assert_eq!(element_type("int[]").as_deref(), Some("int"));
        assert_eq!(element_type("List<string>").as_deref(), Some("string"));
    }
}
