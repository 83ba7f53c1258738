//! Find references.

use crate::base::{Location, TextSize};
use crate::hir::{ProjectIndex, ReadableIndex, SemanticResolver};
use crate::syntax::SyntaxTree;

/// All recorded references to the symbol at `offset`.
///
/// Works from either end: on a declaration it reports the uses, on a use
/// it reports the other uses. Results reflect the index state at query
/// time.
pub fn find_references(
    tree: &SyntaxTree,
    index: &ProjectIndex,
    offset: TextSize,
) -> Vec<Location> {
    let Some(node) = tree.node_at_offset(offset) else {
        return Vec::new();
    };
    let resolver = SemanticResolver::new(tree, index);
    let Some(fqn) = resolver
        .defined_fqn(node)
        .or_else(|| resolver.reference_fqn(node))
    else {
        return Vec::new();
    };
    index.references(fqn.as_str()).to_vec()
}
