//! Errors surfaced by the analyzer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an analysis run.
///
/// Every variant is fatal: no partial report is produced.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("package directory doesn't exist: {}", .0.display())]
    PackageNotFound(PathBuf),
    #[error("no Go files found in {}", .0.display())]
    NoSourceFiles(PathBuf),
    #[error("syntax error in {path} at line {line}, column {column}")]
    Syntax {
        path: String,
        line: usize,
        column: usize,
    },
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("loading Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("compiling query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    #[error("no declared functions found, nothing to score")]
    NoDeclaredFunctions,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
