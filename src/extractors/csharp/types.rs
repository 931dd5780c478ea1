// C# type populators
//
// Every type entity records its spelled name. A name the oracle cannot produce
// (an uninferable `var`) fails the entity.

use super::slots::{self, field, first_named};
use super::{CSharpKind, CsEntity, Ctx};
use crate::extractors::base::tree_methods::{find_child_by_type, named_children};
use crate::extractors::base::{Category, ExtractionError, Outcome, Role};

pub(super) fn populate<'tree>(
    ctx: &mut Ctx<'_, 'tree>,
    entity: &CsEntity<'tree>,
) -> Result<Outcome, ExtractionError> {
    use CSharpKind::*;

    let node = entity.node;
    let handle = entity.handle;
    ctx.type_name(handle, node)?;

    match entity.kind {
        Predefined | Implicit => {}
        Named => {
            ctx.bind(handle, node)?;
        }
        Generic => {
            let args = slots::type_argument_nodes(node);
            ctx.extract_children(handle, Role::TypeArgument, &args, Category::Type)?;
            ctx.bind(handle, node)?;
        }
        Qualified => {
            let qualifier = field(node, "qualifier").or_else(|| field(node, "alias"));
            ctx.extract_optional(handle, Role::Qualifier, qualifier, Category::Type)?;
            ctx.extract_optional(handle, Role::Member, field(node, "name"), Category::Type)?;
        }
        Array => {
            let element = field(node, "type").or_else(|| first_named(node));
            ctx.extract_required(handle, Role::ElementType, element, Category::Type)?;
            // `new int[n]` carries its sizes in the rank specifier
            let sizes = field(node, "rank")
                .or_else(|| find_child_by_type(&node, "array_rank_specifier"))
                .map(|rank| named_children(&rank))
                .unwrap_or_default();
            ctx.extract_children(handle, Role::Subscript, &sizes, Category::Expression)?;
        }
        Nullable | Pointer => {
            let element = field(node, "type").or_else(|| first_named(node));
            ctx.extract_required(handle, Role::ElementType, element, Category::Type)?;
        }
        Tuple => {
            let elements: Vec<_> = named_children(&node)
                .into_iter()
                .filter(|c| c.kind() == "tuple_element")
                .filter_map(|e| field(e, "type").or_else(|| first_named(e)))
                .collect();
            ctx.extract_children(handle, Role::Field, &elements, Category::Type)?;
        }
        _ => {
            return Err(ExtractionError::Malformed(format!(
                "{} is not a type kind",
                entity.tag()
            )))
        }
    }
    Ok(Outcome::complete())
}
