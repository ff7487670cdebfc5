//! Declared-minus-called difference and score.

use std::collections::BTreeMap;

use serde::Serialize;

use super::analyzer::Report;
use super::error::{AnalysisError, Result};
use super::facts::DeclaredFunction;

/// Functions no test calls directly, grouped by file, with the score.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub declared_count: usize,
    pub called_count: usize,
    /// floor(100 × called / declared).
    pub score: u32,
    /// Uncalled functions per file, each list in line order.
    pub details: BTreeMap<String, Vec<DeclaredFunction>>,
    /// Longest uncalled name, in characters, for column alignment.
    pub longest_name_length: usize,
}

impl DiffReport {
    /// Compute the difference for a finished analysis.
    pub fn from_report(report: &Report) -> Result<Self> {
        if report.declared.is_empty() {
            return Err(AnalysisError::NoDeclaredFunctions);
        }

        let mut missing: Vec<&DeclaredFunction> = report
            .declared
            .difference(&report.called)
            .filter_map(|name| report.declared_details.get(name))
            .collect();
        missing.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.decl.line.cmp(&b.decl.line))
                .then(a.decl.offset.cmp(&b.decl.offset))
        });

        let mut details: BTreeMap<String, Vec<DeclaredFunction>> = BTreeMap::new();
        let mut longest_name_length = 0;
        for func in missing {
            longest_name_length = longest_name_length.max(func.name.chars().count());
            details
                .entry(func.file.clone())
                .or_default()
                .push(func.clone());
        }

        let declared_count = report.declared.len();
        let called_count = report.called.len();
        let score = (100 * called_count / declared_count) as u32;

        Ok(Self {
            declared_count,
            called_count,
            score,
            details,
            longest_name_length,
        })
    }

    /// Whether every declared function is called by some test.
    pub fn is_complete(&self) -> bool {
        self.details.is_empty()
    }

    /// Number of uncalled functions across all files.
    pub fn missing_count(&self) -> usize {
        self.details.values().map(Vec::len).sum()
    }
}
