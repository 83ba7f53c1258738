//! Foundation types for the phoxide core.
//!
//! This module provides the primitives used by every other layer:
//! - [`FileId`], [`FileSet`] - interned document identifiers and contents
//! - [`TextRange`], [`TextSize`] - source positions
//! - [`LineCol`], [`LineIndex`] - line/column conversion
//! - [`Location`] - a range inside a document, as stored in the index
//! - [`CancelToken`] - cooperative cancellation for long queries
//!
//! This module has NO dependencies on other phoxide modules.

mod cancel;
mod files;
mod span;

pub use cancel::CancelToken;
pub use files::{FileId, FileSet};
pub use span::{LineCol, LineIndex, Location, TextRange, TextSize};
