//! Hover contents.

use crate::base::TextSize;
use crate::hir::{is_constant_fetch, ProjectIndex, ReadableIndex, SemanticResolver};
use crate::syntax::{NodeKind, SyntaxTree};

/// What a hover shows: the declaration line and its doc summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverResult {
    /// Single-line declaration, e.g. `public function load(): Item`.
    pub declaration: String,
    pub documentation: Option<String>,
    /// Rendered type of the symbol.
    pub ty: String,
}

/// Hover for the symbol at `offset`.
///
/// Works on both references and the declarations themselves: hovering a
/// definition shows its own record.
pub fn hover(tree: &SyntaxTree, index: &ProjectIndex, offset: TextSize) -> Option<HoverResult> {
    let node = tree.node_at_offset(offset)?;
    let resolver = SemanticResolver::new(tree, index);

    let fqn = resolver
        .defined_fqn(node)
        .or_else(|| resolver.reference_fqn(node))?;
    let global_fallback = is_constant_fetch(node) || node.is_call_target();
    let def = index.definition_or_global(fqn.as_str(), global_fallback)?;

    Some(HoverResult {
        declaration: def.declaration_line.clone(),
        documentation: def.documentation.clone(),
        ty: def.ty.to_string(),
    })
}

/// Hover for a local variable: its inferred type, no index involved.
pub fn hover_variable(
    tree: &SyntaxTree,
    index: &ProjectIndex,
    offset: TextSize,
) -> Option<HoverResult> {
    let node = tree.node_at_offset(offset)?;
    if node.kind() != NodeKind::Variable {
        return None;
    }
    let name = node.name()?;
    let resolver = SemanticResolver::new(tree, index);
    let ty = resolver.type_of_expression(node);
    Some(HoverResult {
        declaration: format!("${name}"),
        documentation: None,
        ty: ty.to_string(),
    })
}
