//! Tests for the report output formats.
//!
//! These tests verify the JSON field layout and the text report against the
//! testdata packages.

use std::path::PathBuf;

use blanket::analysis::{Analyzer, DiffReport};
use blanket::report::{self, JsonReport};

fn testdata_path(package: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(package)
}

fn diff_for(package: &str) -> DiffReport {
    let report = Analyzer::default()
        .analyze(&testdata_path(package))
        .expect("analysis should succeed");
    DiffReport::from_report(&report).expect("package declares functions")
}

#[test]
fn test_json_report_structure() {
    let report = JsonReport::from(&diff_for("simple"));

    assert_eq!(report.declared, 4);
    assert_eq!(report.called, 3);
    assert_eq!(report.score, 75);
    assert_eq!(report.grade, "C");
    assert_eq!(report.details.len(), 1);

    let (file, funcs) = report.details.iter().next().unwrap();
    assert!(file.ends_with("main.go"), "details keyed by file: {}", file);
    assert_eq!(funcs.len(), 1);
    assert_eq!(funcs[0].name, "b");
    assert_eq!(funcs[0].line, 7);
}

#[test]
fn test_json_serialization() {
    let report = JsonReport::from(&diff_for("methods"));

    let json = serde_json::to_string_pretty(&report).expect("should serialize to JSON");
    let parsed: JsonReport = serde_json::from_str(&json).expect("should deserialize from JSON");

    assert_eq!(parsed.score, report.score);
    assert_eq!(parsed.grade, report.grade);
    assert_eq!(parsed.details.len(), report.details.len());
}

#[test]
fn test_json_field_names() {
    let report = JsonReport::from(&diff_for("simple"));
    let json = serde_json::to_string(&report).expect("should serialize");

    for field in ["declared", "called", "score", "grade", "details", "name", "line"] {
        assert!(
            json.contains(&format!("\"{}\"", field)),
            "should have '{}' field",
            field
        );
    }
}

#[test]
fn test_json_output_is_deterministic() {
    let first = serde_json::to_string(&JsonReport::from(&diff_for("methods"))).unwrap();
    let second = serde_json::to_string(&JsonReport::from(&diff_for("methods"))).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_text_report_lists_missing_functions() {
    colored::control::set_override(false);
    let text = report::render_pretty(&diff_for("methods"));

    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "Functions without direct unit tests:");
    assert!(lines[1].starts_with("in ") && lines[1].ends_with("main.go:"));
    assert_eq!(lines[2], "\tExample.F on line 25");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "Grade: 85% B (6/7 functions)");
}

#[test]
fn test_text_report_perfect_score() {
    colored::control::set_override(false);
    let text = report::render_pretty(&diff_for("deferred_functions"));
    assert_eq!(text, "Grade: 100% A (1/1 functions)");
}
