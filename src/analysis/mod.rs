//! Test-gap analysis over a Go package.
//!
//! The analyzer finds functions and methods that are declared in a package's
//! non-test files but never called directly from any of its tests. It works
//! on syntax alone (tree-sitter-go); there is no type checking, so method
//! calls resolve only when a variable's type can be read off the test source.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │ Package     │────▶│ HelperSignatures │────▶│ CallResolver │
//! │ (parsed     │     │ (test files)     │     │ (test bodies,│
//! │  .go files) │     └──────────────────┘     │  Bindings)   │
//! └─────────────┘                              └──────────────┘
//!        │                                            │
//!        ▼                                            ▼
//! ┌──────────────┐                             ┌──────────────┐
//! │ declarations │────────────────────────────▶│ Report       │──▶ DiffReport
//! │ (non-test)   │                             │ (pruned)     │
//! └──────────────┘                             └──────────────┘
//! ```
//!
//! Helper signatures are complete before any call is resolved, so a helper
//! declared after the test that uses it still binds its results.

mod analyzer;
mod calls;
mod declarations;
mod diff;
mod error;
mod facts;
mod helpers;
mod source;
mod syntax;

pub use analyzer::{Analyzer, Report};
pub use calls::{Bindings, CallResolver, IMPLICIT_ENTRY};
pub use diff::DiffReport;
pub use error::{AnalysisError, Result};
pub use facts::{DeclaredFunction, Position};
pub use helpers::{HelperSignatures, Signature};
pub use source::{GoSource, Options, Package, ParsedFile};
