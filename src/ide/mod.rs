//! IDE features — high-level APIs for LSP handlers.
//!
//! Each function corresponds to an LSP request and is a pure function over
//! a document tree and the index; [`Analysis`] is the stateful facade that
//! owns both and hands them to the functions under its locks.
//!
//! No LSP protocol types appear here; the transport layer converts at its
//! own boundary.

mod analysis;
mod goto;
mod hover;
mod references;

pub use analysis::Analysis;
pub use goto::goto_definition;
pub use hover::{hover, hover_variable, HoverResult};
pub use references::find_references;
