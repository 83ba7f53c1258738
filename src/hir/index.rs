//! The definition and reference index.
//!
//! Two tiers: the project's own symbols and the symbols of its
//! dependencies. The project tier wins on lookup. Both map FQN to
//! [`Definition`] injectively within one document revision; re-indexing a
//! document first drops everything the previous revision contributed.

use rustc_hash::FxHashMap;

use crate::base::{FileId, Location};
use crate::hir::def::Definition;
use crate::hir::fqn::Fqn;

/// Read-only queries against an index.
///
/// This is the seam the resolver depends on; features and tests can swap
/// the concrete store.
pub trait ReadableIndex {
    /// Exact lookup. Absence means "not resolvable right now", never an
    /// error.
    fn definition(&self, fqn: &str) -> Option<&Definition>;

    /// Lookup with the global fallback: when enabled and the name path is
    /// namespaced, a miss retries the bare last segment in the root
    /// namespace. Callers enable this for function calls and constant
    /// fetches only.
    fn definition_or_global(&self, fqn: &str, global_fallback: bool) -> Option<&Definition> {
        if let Some(def) = self.definition(fqn) {
            return Some(def);
        }
        if !global_fallback {
            return None;
        }
        let global = Fqn::new(fqn).global_form();
        if global.as_str() == fqn {
            return None;
        }
        self.definition(global.as_str())
    }

    /// Recorded reference locations for a symbol.
    fn references(&self, fqn: &str) -> &[Location];
}

/// One tier of the index.
#[derive(Debug, Default)]
pub struct Index {
    definitions: FxHashMap<Fqn, Definition>,
    defs_by_file: FxHashMap<FileId, Vec<Fqn>>,
    references: FxHashMap<Fqn, Vec<Location>>,
    refs_by_file: FxHashMap<FileId, Vec<Fqn>>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the definition for an FQN.
    pub fn set_definition(&mut self, fqn: Fqn, def: Definition) {
        if let Some(location) = def.symbol.location {
            let fqns = self.defs_by_file.entry(location.file).or_default();
            if !fqns.contains(&fqn) {
                fqns.push(fqn.clone());
            }
        }
        self.definitions.insert(fqn, def);
    }

    /// Drop every definition the given document contributed.
    pub fn remove_definitions_for_file(&mut self, file: FileId) {
        if let Some(fqns) = self.defs_by_file.remove(&file) {
            for fqn in fqns {
                // Only remove if the stored definition still points into
                // this file; a newer revision may have re-homed the FQN.
                let stale = self
                    .definitions
                    .get(&fqn)
                    .and_then(|d| d.symbol.location)
                    .is_some_and(|loc| loc.file == file);
                if stale {
                    self.definitions.remove(&fqn);
                }
            }
        }
    }

    pub fn add_reference(&mut self, fqn: Fqn, location: Location) {
        self.refs_by_file
            .entry(location.file)
            .or_default()
            .push(fqn.clone());
        self.references.entry(fqn).or_default().push(location);
    }

    /// Drop every reference recorded from the given document.
    pub fn remove_references_for_file(&mut self, file: FileId) {
        if let Some(fqns) = self.refs_by_file.remove(&file) {
            for fqn in fqns {
                if let Some(locations) = self.references.get_mut(&fqn) {
                    locations.retain(|loc| loc.file != file);
                    if locations.is_empty() {
                        self.references.remove(&fqn);
                    }
                }
            }
        }
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&Fqn, &Definition)> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl ReadableIndex for Index {
    fn definition(&self, fqn: &str) -> Option<&Definition> {
        self.definitions.get(fqn)
    }

    fn references(&self, fqn: &str) -> &[Location] {
        self.references
            .get(fqn)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// The project tier composed with a dependencies tier.
#[derive(Debug, Default)]
pub struct ProjectIndex {
    project: Index,
    dependencies: Index,
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self) -> &Index {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut Index {
        &mut self.project
    }

    /// The dependency tier, populated once from stubs or a package scan.
    pub fn dependencies_mut(&mut self) -> &mut Index {
        &mut self.dependencies
    }

    pub fn set_definition(&mut self, fqn: Fqn, def: Definition) {
        self.project.set_definition(fqn, def);
    }

    pub fn remove_definitions_for_file(&mut self, file: FileId) {
        self.project.remove_definitions_for_file(file);
    }

    pub fn add_reference(&mut self, fqn: Fqn, location: Location) {
        self.project.add_reference(fqn, location);
    }

    pub fn remove_references_for_file(&mut self, file: FileId) {
        self.project.remove_references_for_file(file);
    }
}

impl ReadableIndex for ProjectIndex {
    fn definition(&self, fqn: &str) -> Option<&Definition> {
        self.project
            .definition(fqn)
            .or_else(|| self.dependencies.definition(fqn))
    }

    fn references(&self, fqn: &str) -> &[Location] {
        let refs = self.project.references(fqn);
        if refs.is_empty() {
            self.dependencies.references(fqn)
        } else {
            refs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::TextRange;
    use crate::hir::def::{SymbolInformation, SymbolKind};
    use crate::hir::types::Type;
    use smol_str::SmolStr;

    fn def(fqn: &str, file: Option<u32>) -> Definition {
        let fqn = Fqn::new(fqn);
        Definition {
            fqn: fqn.clone(),
            is_class: false,
            is_global: true,
            is_static: false,
            extends: Vec::new(),
            ty: Type::Mixed,
            declaration_line: String::new(),
            documentation: None,
            symbol: SymbolInformation {
                name: SmolStr::new(fqn.simple_name()),
                kind: SymbolKind::Function,
                container_name: None,
                location: file.map(|f| {
                    Location::new(FileId::new(f), TextRange::empty(0.into()))
                }),
            },
        }
    }

    #[test]
    fn project_shadows_dependencies() {
        let mut index = ProjectIndex::new();
        let mut dep = def("A\\f()", None);
        dep.documentation = Some("from deps".into());
        index.dependencies_mut().set_definition(Fqn::new("A\\f()"), dep);
        index.set_definition(Fqn::new("A\\f()"), def("A\\f()", Some(0)));

        let hit = index.definition("A\\f()").unwrap();
        assert!(hit.documentation.is_none());
    }

    #[test]
    fn global_fallback_strips_namespace() {
        let mut index = ProjectIndex::new();
        index.set_definition(Fqn::new("strlen()"), def("strlen()", Some(0)));

        assert!(index.definition("N\\strlen()").is_none());
        assert!(index
            .definition_or_global("N\\strlen()", true)
            .is_some());
        assert!(index
            .definition_or_global("N\\strlen()", false)
            .is_none());
    }

    #[test]
    fn fallback_is_monotone() {
        let mut index = ProjectIndex::new();
        index.set_definition(Fqn::new("N\\f()"), def("N\\f()", Some(0)));

        // Anything found without the fallback is found with it.
        assert!(index.definition_or_global("N\\f()", false).is_some());
        assert!(index.definition_or_global("N\\f()", true).is_some());
    }

    #[test]
    fn file_removal_drops_only_that_file() {
        let mut index = ProjectIndex::new();
        index.set_definition(Fqn::new("A"), def("A", Some(0)));
        index.set_definition(Fqn::new("B"), def("B", Some(1)));

        index.remove_definitions_for_file(FileId::new(0));

        assert!(index.definition("A").is_none());
        assert!(index.definition("B").is_some());
    }

    #[test]
    fn references_are_scoped_to_their_file() {
        let mut index = ProjectIndex::new();
        let loc0 = Location::new(FileId::new(0), TextRange::empty(3.into()));
        let loc1 = Location::new(FileId::new(1), TextRange::empty(9.into()));
        index.add_reference(Fqn::new("A"), loc0);
        index.add_reference(Fqn::new("A"), loc1);

        index.remove_references_for_file(FileId::new(0));

        assert_eq!(index.references("A"), &[loc1]);
    }
}
