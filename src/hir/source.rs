//! The per-document indexing pass.
//!
//! One round of [`index_document`] replaces everything a document
//! contributed to the index: its previous definitions and references go
//! out, the current revision's come in. The pass resolves against the
//! index state it was handed, so cross-file knowledge is whatever earlier
//! passes already produced — missing information is tolerated and filled
//! in by later passes.
//!
//! Collection and application are split so a bulk loader can collect many
//! documents in parallel against a read snapshot and serialize only the
//! index writes.

use tracing::debug;

use crate::base::{FileId, Location};
use crate::hir::def::Definition;
use crate::hir::fqn::Fqn;
use crate::hir::index::ProjectIndex;
use crate::hir::resolve::SemanticResolver;
use crate::hir::types::Type;
use crate::syntax::{NodeId, NodeKind, NodeRef, SyntaxTree};

/// Everything one document contributes to the index.
#[derive(Debug)]
pub struct DocumentSymbols {
    pub file: FileId,
    pub definitions: Vec<(Fqn, Definition)>,
    pub references: Vec<(Fqn, Location)>,
}

/// Re-index one document into the project tier.
pub fn index_document(tree: &SyntaxTree, file: FileId, index: &mut ProjectIndex) {
    let batch = collect_document(tree, file, index);
    apply_document(batch, index);
}

/// Walk a document and resolve its declarations and references against the
/// given index snapshot. Read-only.
pub fn collect_document(
    tree: &SyntaxTree,
    file: FileId,
    index: &ProjectIndex,
) -> DocumentSymbols {
    let resolver = SemanticResolver::new(tree, index);
    let mut definitions = Vec::new();
    let mut references = Vec::new();

    for raw in 0..tree.len() as u32 {
        let node = tree.node(NodeId(raw));
        match node.kind() {
            NodeKind::ClassDeclaration
            | NodeKind::InterfaceDeclaration
            | NodeKind::TraitDeclaration
            | NodeKind::NamespaceDefinition
            | NodeKind::FunctionDeclaration
            | NodeKind::MethodDeclaration
            | NodeKind::ConstElement => {
                if let Some(def) = resolver.create_definition(node, file) {
                    definitions.push((def.fqn.clone(), def));
                }
            }
            NodeKind::Variable => {
                // Property elements define; other variables are local.
                let is_property = node
                    .parent()
                    .is_some_and(|p| p.kind() == NodeKind::PropertyDeclaration);
                if is_property {
                    if let Some(def) = resolver.create_definition(node, file) {
                        definitions.push((def.fqn.clone(), def));
                    }
                }
            }
            NodeKind::QualifiedName => {
                if is_reference_name(node) {
                    if let Some(fqn) = resolver.reference_fqn(node) {
                        references.push((fqn, Location::new(file, node.range())));
                    }
                }
            }
            NodeKind::MemberAccessExpression
            | NodeKind::ScopedPropertyAccessExpression => {
                if let Some(fqn) = resolver.reference_fqn(node) {
                    references.push((fqn, Location::new(file, node.range())));
                }
            }
            _ => {}
        }
    }

    DocumentSymbols {
        file,
        definitions,
        references,
    }
}

/// Replace a document's contribution with a freshly collected batch.
pub fn apply_document(batch: DocumentSymbols, index: &mut ProjectIndex) {
    index.remove_definitions_for_file(batch.file);
    index.remove_references_for_file(batch.file);

    debug!(
        target: "phoxide::index",
        file = batch.file.index(),
        definitions = batch.definitions.len(),
        references = batch.references.len(),
        "indexed document"
    );

    for (fqn, def) in batch.definitions {
        index.set_definition(fqn, def);
    }
    for (fqn, location) in batch.references {
        index.add_reference(fqn, location);
    }
}

/// Whether a qualified name should be recorded as a reference: outermost
/// name parts only, and never the resolution keywords.
fn is_reference_name(node: NodeRef<'_>) -> bool {
    if node
        .parent()
        .is_some_and(|p| p.kind() == NodeKind::QualifiedName)
    {
        return false;
    }
    let word = match node.name() {
        Some(name) if !name.is_empty() => name,
        _ => node.text(),
    };
    if word.is_empty() {
        return false;
    }
    let keyword = ["self", "static", "parent", "null"]
        .iter()
        .any(|k| word.eq_ignore_ascii_case(k))
        || Type::from_keyword(word).is_some();
    !keyword
}
