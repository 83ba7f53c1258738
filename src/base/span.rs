//! Source text positions, ranges, and index locations.

use std::fmt;

use crate::base::FileId;

pub use text_size::{TextRange, TextSize};

/// A line and column position, 0-indexed internally, 1-indexed for display.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct LineCol {
    pub line: u32,
    /// Column in UTF-8 bytes.
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Debug for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

/// A text range inside a specific document.
///
/// This is what the index stores for every definition and reference.
/// Locations never hold pointers into the tree; re-parsing a document
/// invalidates its locations wholesale by [`FileId`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Location {
    pub file: FileId,
    pub range: TextRange,
}

impl Location {
    #[inline]
    pub const fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }
}

/// Index for converting between byte offsets and line/column positions.
#[derive(Clone, Debug)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::from((offset + 1) as u32));
            }
        }
        Self { line_starts }
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = offset - self.line_starts[line];
        LineCol {
            line: line as u32,
            col: col.into(),
        }
    }

    pub fn offset(&self, pos: LineCol) -> Option<TextSize> {
        let line_start = self.line_starts.get(pos.line as usize)?;
        Some(*line_start + TextSize::from(pos.col))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
