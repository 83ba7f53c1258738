//! Goto definition.

use crate::base::{FileId, Location, TextSize};
use crate::hir::{is_constant_fetch, ProjectIndex, ReadableIndex, SemanticResolver};
use crate::syntax::{NodeKind, SyntaxTree};

/// Resolve the symbol at `offset` to its definition location.
///
/// Local variables jump to the parameter, capture, or assignment that
/// introduced them; everything else goes through the reference resolver
/// and the index. Function calls and constant fetches retry in the root
/// namespace when the namespaced lookup misses.
pub fn goto_definition(
    tree: &SyntaxTree,
    index: &ProjectIndex,
    file: FileId,
    offset: TextSize,
) -> Option<Location> {
    let node = tree.node_at_offset(offset)?;
    let resolver = SemanticResolver::new(tree, index);

    if node.kind() == NodeKind::Variable && node.name() != Some("this") {
        let definition = resolver.variable_definition(node)?;
        return Some(Location::new(file, definition.range()));
    }

    let fqn = resolver.reference_fqn(node)?;
    let global_fallback = is_constant_fetch(node) || node.is_call_target();
    let def = index.definition_or_global(fqn.as_str(), global_fallback)?;
    def.symbol.location
}
