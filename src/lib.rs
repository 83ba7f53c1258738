//! # phoxide
//!
//! Semantic resolution core for a PHP-style language server. Given a
//! syntax tree, phoxide answers two questions about any position:
//!
//! 1. **What fully-qualified name does this reference target?**
//! 2. **What type does this expression evaluate to?**
//!
//! The answers feed an index of definitions and references that IDE
//! features (goto-definition, hover, find-references) consume.
//!
//! ## Module structure (dependency order)
//!
//! ```text
//! ide     → IDE features over the index (goto, hover, references)
//!   ↓
//! hir     → semantic model: types, definitions, index, resolver
//!   ↓
//! syntax  → AST contract: kinds, arena tree, navigation, builder
//!   ↓
//! base    → primitives (FileId, spans, locations, cancellation)
//! ```
//!
//! The concrete parser is an external collaborator: an adapter maps its
//! output onto [`syntax::SyntaxTree`] through [`syntax::SyntaxTreeBuilder`]
//! and everything above is parser-agnostic.
//!
//! The resolver is total: unresolvable names are `None`, unknown types are
//! [`hir::Type::Mixed`], and no error type crosses the crate boundary.

/// Foundation types: file ids, spans, locations, cancellation.
pub mod base;

/// Semantic model: FQNs, types, definitions, the index, and the resolver.
pub mod hir;

/// IDE features: goto-definition, hover, find-references.
pub mod ide;

/// The AST surface the resolver navigates.
pub mod syntax;

pub use base::{CancelToken, FileId, FileSet, LineCol, LineIndex, Location, TextRange, TextSize};
pub use hir::{
    Definition, Fqn, Index, ProjectIndex, ReadableIndex, SemanticResolver, Type,
};
pub use syntax::{NodeKind, SyntaxTree, SyntaxTreeBuilder};
