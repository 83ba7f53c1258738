//! The AST surface the resolver works against.
//!
//! The concrete parser lives outside this crate; a parser adapter produces a
//! [`SyntaxTree`] through [`SyntaxTreeBuilder`], and everything above this
//! module reads the tree through [`NodeRef`] handles. Nodes live in an arena
//! owned by the document; parents and children are handle-valued, never
//! owning (so the tree is freely shareable read-only).

mod builder;
mod kind;
mod tree;

pub use builder::SyntaxTreeBuilder;
pub use kind::NodeKind;
pub use tree::{NodeId, NodeRef, SyntaxTree};
