//! The analysis facade: documents in, queries out.

use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::base::{CancelToken, FileId, FileSet, Location, TextSize};
use crate::hir::{
    apply_document, collect_document, index_document, ProjectIndex, SemanticResolver, Type,
};
use crate::ide::{goto, hover, references};
use crate::syntax::SyntaxTree;

/// Owns the documents and the index; the stateful entry point LSP
/// handlers talk to.
///
/// Writer/reader split per the core's concurrency model: document updates
/// take the write lock and re-index atomically; queries take the read lock
/// and see a consistent snapshot. Trees are immutable and shared.
#[derive(Default)]
pub struct Analysis {
    files: FileSet,
    documents: RwLock<FxHashMap<FileId, Arc<SyntaxTree>>>,
    index: RwLock<ProjectIndex>,
}

impl Analysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or update a document and re-index it.
    pub fn set_document(&self, uri: &str, tree: SyntaxTree) -> FileId {
        let file = self.files.file_id(uri);
        if let Some(source) = tree.source() {
            self.files.set_contents(file, source);
        }
        let tree = Arc::new(tree);
        self.documents.write().insert(file, Arc::clone(&tree));

        let mut index = self.index.write();
        index_document(&tree, file, &mut index);
        file
    }

    /// Forget a document and everything it contributed.
    pub fn remove_document(&self, uri: &str) {
        let Some(file) = self.files.existing_id(uri) else {
            return;
        };
        self.documents.write().remove(&file);
        {
            let mut index = self.index.write();
            index.remove_definitions_for_file(file);
            index.remove_references_for_file(file);
        }
        self.files.remove(file);
        debug!(target: "phoxide::ide", file = file.index(), "removed document");
    }

    /// Bulk-load a workspace: collection runs in parallel against the
    /// current snapshot, index writes are serialized.
    pub fn load_documents(&self, documents: Vec<(String, SyntaxTree)>) {
        let registered: Vec<(FileId, Arc<SyntaxTree>)> = documents
            .into_iter()
            .map(|(uri, tree)| {
                let file = self.files.file_id(&uri);
                if let Some(source) = tree.source() {
                    self.files.set_contents(file, source);
                }
                let tree = Arc::new(tree);
                self.documents.write().insert(file, Arc::clone(&tree));
                (file, tree)
            })
            .collect();

        let batches = {
            let index = self.index.read();
            registered
                .par_iter()
                .map(|(file, tree)| collect_document(tree, *file, &index))
                .collect::<Vec<_>>()
        };

        let mut index = self.index.write();
        for batch in batches {
            apply_document(batch, &mut index);
        }
        debug!(
            target: "phoxide::ide",
            files = registered.len(),
            "bulk-loaded documents"
        );
    }

    pub fn file_id(&self, uri: &str) -> Option<FileId> {
        self.files.existing_id(uri)
    }

    fn document(&self, file: FileId) -> Option<Arc<SyntaxTree>> {
        self.documents.read().get(&file).cloned()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn goto_definition(&self, uri: &str, offset: TextSize) -> Option<Location> {
        let file = self.files.existing_id(uri)?;
        let tree = self.document(file)?;
        let index = self.index.read();
        goto::goto_definition(&tree, &index, file, offset)
    }

    pub fn hover(&self, uri: &str, offset: TextSize) -> Option<hover::HoverResult> {
        let file = self.files.existing_id(uri)?;
        let tree = self.document(file)?;
        let index = self.index.read();
        hover::hover(&tree, &index, offset)
            .or_else(|| hover::hover_variable(&tree, &index, offset))
    }

    pub fn find_references(&self, uri: &str, offset: TextSize) -> Vec<Location> {
        let Some(file) = self.files.existing_id(uri) else {
            return Vec::new();
        };
        let Some(tree) = self.document(file) else {
            return Vec::new();
        };
        let index = self.index.read();
        references::find_references(&tree, &index, offset)
    }

    /// Infer the type of the expression at `offset`, honoring a caller's
    /// cancellation token.
    pub fn type_at(&self, uri: &str, offset: TextSize, cancel: CancelToken) -> Option<Type> {
        let file = self.files.existing_id(uri)?;
        let tree = self.document(file)?;
        let index = self.index.read();
        let node = tree.node_at_offset(offset)?;
        let resolver = SemanticResolver::new(&tree, &*index).with_cancel(cancel);
        Some(resolver.type_of_expression(node))
    }

    /// Run a closure against a read snapshot of the index.
    pub fn with_index<R>(&self, f: impl FnOnce(&ProjectIndex) -> R) -> R {
        f(&self.index.read())
    }

    /// Mutate the index directly; used to seed the dependency tier.
    pub fn with_index_mut<R>(&self, f: impl FnOnce(&mut ProjectIndex) -> R) -> R {
        f(&mut self.index.write())
    }
}
