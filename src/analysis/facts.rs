//! Fact structures produced by the analyzer.

use std::fmt;

use serde::Serialize;

/// A source position, shaped like Go's `token.Position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    /// File the position belongs to.
    pub file: String,
    /// Byte offset (0-indexed).
    pub offset: usize,
    /// Line (1-indexed).
    pub line: usize,
    /// Byte column (1-indexed).
    pub column: usize,
}

impl Position {
    /// Position of the first byte of a node.
    pub fn start_of(file: &str, node: tree_sitter::Node) -> Self {
        let point = node.start_position();
        Self {
            file: file.to_string(),
            offset: node.start_byte(),
            line: point.row + 1, // tree-sitter is 0-indexed
            column: point.column + 1,
        }
    }

    /// Position of the last byte of a node (e.g. a closing brace).
    pub fn last_of(file: &str, node: tree_sitter::Node) -> Self {
        let point = node.end_position();
        Self {
            file: file.to_string(),
            offset: node.end_byte().saturating_sub(1),
            line: point.row + 1,
            column: point.column.max(1),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A top-level function or method declared in a non-test file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredFunction {
    /// `Name` for functions, `Receiver.Name` for methods.
    pub name: String,
    /// File the declaration lives in.
    pub file: String,
    /// Position of the `func` keyword.
    pub decl: Position,
    /// Position of the body's `{`, absent for bodyless declarations.
    pub body_open: Option<Position>,
    /// Position of the body's `}`.
    pub body_close: Option<Position>,
}

impl DeclaredFunction {
    /// Whether a byte offset falls between this function's body braces.
    pub fn body_contains(&self, offset: usize) -> bool {
        match (&self.body_open, &self.body_close) {
            (Some(open), Some(close)) => open.offset <= offset && offset <= close.offset,
            _ => false,
        }
    }
}
