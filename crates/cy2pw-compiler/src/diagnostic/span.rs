//! Source location tracking.

use std::path::PathBuf;

/// A span in the source code. Rows and columns are zero-based, as tree-sitter reports them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Span {
    pub file: PathBuf,
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Span {
    pub fn new(file: PathBuf, start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            file,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// One-based line number for human-facing messages.
    pub fn line(&self) -> usize {
        self.start_line + 1
    }
}
