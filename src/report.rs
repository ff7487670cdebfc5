//! Output formatting for analysis results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use std::collections::BTreeMap;
use std::fmt::Write as _;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analysis::DiffReport;
use crate::score::{self, Band};

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub declared: usize,
    pub called: usize,
    pub score: u32,
    pub grade: String,
    /// Uncalled functions keyed by file, each list in line order.
    pub details: BTreeMap<String, Vec<JsonFunction>>,
}

/// One function without a direct test.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFunction {
    pub name: String,
    pub line: usize,
}

impl From<&DiffReport> for JsonReport {
    fn from(diff: &DiffReport) -> Self {
        let details = diff
            .details
            .iter()
            .map(|(file, funcs)| {
                let funcs = funcs
                    .iter()
                    .map(|f| JsonFunction {
                        name: f.name.clone(),
                        line: f.decl.line,
                    })
                    .collect();
                (file.clone(), funcs)
            })
            .collect();

        JsonReport {
            declared: diff.declared_count,
            called: diff.called_count,
            score: diff.score,
            grade: score::grade(diff.score).to_string(),
            details,
        }
    }
}

/// Write results in JSON format.
pub fn write_json(diff: &DiffReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::from(diff))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format (colored terminal output)
// =============================================================================

/// Write results in pretty format with colors.
pub fn write_pretty(diff: &DiffReport) {
    println!("{}", render_pretty(diff));
}

/// Render the pretty report without the trailing newline.
pub fn render_pretty(diff: &DiffReport) -> String {
    let mut out = String::new();

    if !diff.is_complete() {
        out.push_str("Functions without direct unit tests:");
        for (file, funcs) in &diff.details {
            let _ = write!(out, "\nin {}:", file.white().bold());
            for func in funcs {
                let _ = write!(
                    out,
                    "\n\t{:>width$} on line {}",
                    func.name,
                    func.decl.line,
                    width = diff.longest_name_length
                );
            }
        }
        out.push_str("\n\n");
    }

    let _ = write!(
        out,
        "Grade: {} ({}/{} functions)",
        colored_score(diff.score),
        diff.called_count,
        diff.declared_count
    );
    if !diff.is_complete() {
        out.push('\n');
    }
    out
}

fn colored_score(score: u32) -> ColoredString {
    let text = format!("{}% {}", score, score::grade(score));
    match Band::for_score(score) {
        Band::Green => text.green(),
        Band::Blue => text.blue(),
        Band::Cyan => text.cyan(),
        Band::Yellow => text.yellow(),
        Band::Magenta => text.magenta(),
        Band::Red => text.red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DeclaredFunction, Position};

    fn func(name: &str, line: usize) -> DeclaredFunction {
        DeclaredFunction {
            name: name.to_string(),
            file: "simple.go".to_string(),
            decl: Position {
                file: "simple.go".to_string(),
                offset: 0,
                line,
                column: 1,
            },
            body_open: None,
            body_close: None,
        }
    }

    fn diff(missing: Vec<DeclaredFunction>, called: usize, declared: usize) -> DiffReport {
        let longest_name_length = missing.iter().map(|f| f.name.chars().count()).max().unwrap_or(0);
        let mut details = BTreeMap::new();
        if !missing.is_empty() {
            details.insert("simple.go".to_string(), missing);
        }
        DiffReport {
            declared_count: declared,
            called_count: called,
            score: (100 * called / declared) as u32,
            details,
            longest_name_length,
        }
    }

    #[test]
    fn test_render_pretty_with_missing() {
        colored::control::set_override(false);
        let report = diff(vec![func("b", 7), func("wrapper", 15)], 2, 4);
        let text = render_pretty(&report);
        assert_eq!(
            text,
            "Functions without direct unit tests:\n\
             in simple.go:\n\
             \t      b on line 7\n\
             \twrapper on line 15\n\
             \n\
             Grade: 50% F (2/4 functions)\n"
        );
    }

    #[test]
    fn test_render_pretty_perfect() {
        colored::control::set_override(false);
        let report = diff(vec![], 4, 4);
        assert_eq!(render_pretty(&report), "Grade: 100% A (4/4 functions)");
    }

    #[test]
    fn test_json_report_fields() {
        let report = diff(vec![func("b", 7)], 3, 4);
        let json = serde_json::to_value(JsonReport::from(&report)).unwrap();
        assert_eq!(json["declared"], 4);
        assert_eq!(json["called"], 3);
        assert_eq!(json["score"], 75);
        assert_eq!(json["grade"], "C");
        assert_eq!(json["details"]["simple.go"][0]["name"], "b");
        assert_eq!(json["details"]["simple.go"][0]["line"], 7);
    }
}
