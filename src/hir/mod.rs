//! The semantic model: types, definitions, the index, and the resolver.
//!
//! Layering inside this module:
//!
//! ```text
//! source            → per-document indexing pass
//!   ↓
//! resolve + infer   → FQN resolution and type inference (one resolver,
//!                     two mutually recursive halves)
//!   ↓
//! index             → FQN → Definition store, two tiers + references
//!   ↓
//! def, docblock     → definition records, doc-comment tags
//!   ↓
//! fqn, types        → the value vocabulary everything above speaks
//! ```

pub mod def;
pub mod docblock;
pub mod fqn;
pub mod index;
mod infer;
pub mod resolve;
pub mod source;
pub mod types;

pub use def::{Definition, SymbolInformation, SymbolKind};
pub use docblock::{DocBlock, DocTag};
pub use fqn::Fqn;
pub use index::{Index, ProjectIndex, ReadableIndex};
pub use resolve::{is_constant_fetch, SemanticResolver};
pub use source::{apply_document, collect_document, index_document, DocumentSymbols};
pub use types::Type;
