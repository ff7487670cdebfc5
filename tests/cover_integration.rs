//! Integration tests for the coverage-profile HTML overlay.

use std::path::PathBuf;

use blanket::analysis::Analyzer;
use blanket::cover::{self, profile, ProfileError};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn render(profile_name: &str) -> Result<String, ProfileError> {
    let testdata = testdata_path();
    let profiles = profile::parse_file(&testdata.join("profiles").join(profile_name))?;
    let package = testdata.join("simple");
    let report = Analyzer::default()
        .analyze(&package)
        .expect("analysis should succeed");
    cover::render(&profiles, &package, &report)
}

#[test]
fn test_count_profile_page() {
    let html = render("simple_count.coverprofile").unwrap();

    assert!(html.contains(
        r#"<option value="file0">example.com/blanket/testdata/simple/main.go (100.0%)</option>"#
    ));
    assert!(html.contains(r#"<span class="cov0">no coverage</span>"#));

    let body = r#"<pre class="file" id="file0" >package simple

func a() string <span class="cov10" title="2">{
        return "A"
}</span>

func b() string <span class="blanket-uncovered" title="1">{
        return "B"
}</span>

func c() string <span class="cov10" title="2">{
        return "C"
}</span>

func wrapper() <span class="cov1" title="1">{
        a()
        b()
        c()
}</span>
</pre>"#;
    assert!(html.contains(body), "unexpected body:\n{}", html);
}

#[test]
fn test_set_profile_page() {
    let html = render("simple_set.coverprofile").unwrap();

    assert!(html.contains(r#"<span class="cov0">not covered</span>"#));
    assert!(html.contains(r#"<span class="cov8">covered</span>"#));
    assert!(html.contains(r#"func a() string <span class="cov8" title="1">{"#));
    assert!(html.contains(r#"func b() string <span class="blanket-uncovered" title="1">{"#));
    assert!(html.contains(r#"func wrapper() <span class="cov8" title="1">{"#));
}

#[test]
fn test_missing_source_file() {
    let result = render("missing_source.coverprofile");
    assert!(matches!(result, Err(ProfileError::SourceNotFound { .. })));
}

#[test]
fn test_missing_profile() {
    let result = profile::parse_file(&testdata_path().join("profiles").join("nope.coverprofile"));
    assert!(matches!(result, Err(ProfileError::Io { .. })));
}

#[test]
fn test_page_written_to_output() {
    let html = render("simple_count.coverprofile").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("coverage.html");

    let written = cover::write_page(&html, Some(&out)).unwrap();
    assert_eq!(written, out);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), html);
}
