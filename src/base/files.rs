//! Document identifiers and the uri registry.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

/// An interned identifier for an open document.
///
/// `FileId` is a 4-byte handle assigned by a [`FileSet`]; the uri it stands
/// for lives in the registry. Handles compare, copy, and hash in O(1), which
/// is what the index wants for its per-file invalidation lists.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// Registry mapping document uris to [`FileId`]s and their current contents.
///
/// Ids are stable for the lifetime of the set: re-registering a known uri
/// returns the id it already has. Interior locking keeps the registry usable
/// from the parallel bulk-load path while queries read it.
#[derive(Debug, Default)]
pub struct FileSet {
    inner: RwLock<FileSetInner>,
}

#[derive(Debug, Default)]
struct FileSetInner {
    uri_to_id: IndexMap<Arc<str>, FileId>,
    id_to_uri: IndexMap<FileId, Arc<str>>,
    contents: IndexMap<FileId, Arc<str>>,
    next_id: u32,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id for a uri, assigning a fresh one on first sight.
    pub fn file_id(&self, uri: &str) -> FileId {
        {
            let inner = self.inner.read();
            if let Some(&id) = inner.uri_to_id.get(uri) {
                return id;
            }
        }

        let mut inner = self.inner.write();
        // Re-check: another writer may have registered the uri meanwhile.
        if let Some(&id) = inner.uri_to_id.get(uri) {
            return id;
        }

        let id = FileId::new(inner.next_id);
        inner.next_id += 1;
        let uri: Arc<str> = Arc::from(uri);
        inner.uri_to_id.insert(uri.clone(), id);
        inner.id_to_uri.insert(id, uri);
        id
    }

    /// Look up the id of an already-registered uri.
    pub fn existing_id(&self, uri: &str) -> Option<FileId> {
        self.inner.read().uri_to_id.get(uri).copied()
    }

    pub fn uri(&self, file: FileId) -> Option<Arc<str>> {
        self.inner.read().id_to_uri.get(&file).cloned()
    }

    pub fn set_contents(&self, file: FileId, contents: impl Into<Arc<str>>) {
        self.inner.write().contents.insert(file, contents.into());
    }

    pub fn contents(&self, file: FileId) -> Option<Arc<str>> {
        self.inner.read().contents.get(&file).cloned()
    }

    /// Drop a document from the registry entirely.
    pub fn remove(&self, file: FileId) {
        let mut inner = self.inner.write();
        if let Some(uri) = inner.id_to_uri.swap_remove(&file) {
            inner.uri_to_id.swap_remove(&uri);
        }
        inner.contents.swap_remove(&file);
    }

    pub fn files(&self) -> Vec<FileId> {
        self.inner.read().id_to_uri.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().uri_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_ids_per_uri() {
        let files = FileSet::new();

        let a = files.file_id("file:///src/a.php");
        let b = files.file_id("file:///src/b.php");
        let a2 = files.file_id("file:///src/a.php");

        assert_ne!(a, b);
        assert_eq!(a, a2);
    }

    #[test]
    fn contents_roundtrip() {
        let files = FileSet::new();
        let id = files.file_id("file:///src/a.php");

        assert!(files.contents(id).is_none());
        files.set_contents(id, "<?php echo 1;");
        assert_eq!(files.contents(id).as_deref(), Some("<?php echo 1;"));
    }

    #[test]
    fn remove_forgets_uri_and_contents() {
        let files = FileSet::new();
        let id = files.file_id("file:///src/a.php");
        files.set_contents(id, "<?php");

        files.remove(id);

        assert!(files.uri(id).is_none());
        assert!(files.contents(id).is_none());
        assert!(files.existing_id("file:///src/a.php").is_none());
    }
}
