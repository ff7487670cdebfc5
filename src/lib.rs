//! Blanket - find Go functions without direct unit tests.
//!
//! Statement coverage says a line ran; it does not say a test exercised the
//! function that line belongs to. Blanket parses a Go package and reports
//! every declared function or method that no test in the package calls by
//! name, with a score of how many are.
//!
//! # Architecture
//!
//! The codebase uses tree-sitter for syntax-only analysis:
//!
//! - `analysis`: package loading, declaration collection, call resolution, diff
//! - `config`: optional YAML configuration
//! - `report`: output formatting (text, JSON)
//! - `score`: letter grades for the score
//! - `cover`: coverage-profile HTML overlay
//! - `cli`: command-line entry points

pub mod analysis;
pub mod cli;
pub mod config;
pub mod cover;
pub mod report;
pub mod score;

pub use analysis::{AnalysisError, Analyzer, DeclaredFunction, DiffReport, Options, Report};
pub use config::Config;
