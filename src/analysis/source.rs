//! Loading and parsing the Go files of a package directory.

use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use tracing::debug;
use tree_sitter::{Language, Node, Parser, Tree};
use walkdir::WalkDir;

use super::error::{AnalysisError, Result};

/// Holds a parsed tree-sitter tree and associated metadata.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path, as reported in positions.
    pub path: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// The `source_file` node.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// How files of a package are classified and filtered.
#[derive(Debug, Clone)]
pub struct Options {
    /// File name suffix marking test files.
    pub test_file_suffix: String,
    /// Function name prefix marking test entry points.
    pub test_func_prefix: String,
    /// File name patterns left out of the analysis entirely.
    pub excluded_files: GlobSet,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            test_file_suffix: "_test.go".to_string(),
            test_func_prefix: "Test".to_string(),
            excluded_files: GlobSet::empty(),
        }
    }
}

impl Options {
    /// Whether a file name belongs to the test side of the package.
    pub fn is_test_file(&self, name: &str) -> bool {
        name.ends_with(&self.test_file_suffix)
    }
}

/// Every parsed file of one package directory, split by role.
pub struct Package {
    /// The directory that was parsed.
    pub dir: PathBuf,
    /// Non-test files, sorted by path.
    pub sources: Vec<ParsedFile>,
    /// Test files, sorted by path.
    pub tests: Vec<ParsedFile>,
}

impl Package {
    /// Parse every `.go` file directly inside `dir`.
    ///
    /// Subdirectories are separate packages and are not descended into.
    pub fn load(dir: &Path, options: &Options) -> Result<Self> {
        if !dir.is_dir() {
            return Err(AnalysisError::PackageNotFound(dir.to_path_buf()));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| AnalysisError::Io {
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !name.ends_with(".go") {
                continue;
            }
            if options.excluded_files.is_match(name.as_ref()) {
                debug!(file = %name, "excluded by configuration");
                continue;
            }
            paths.push(entry.path().to_path_buf());
        }

        if paths.is_empty() {
            return Err(AnalysisError::NoSourceFiles(dir.to_path_buf()));
        }

        // Directory iteration order is platform dependent.
        paths.sort();

        let source = GoSource::new()?;
        let mut package = Package {
            dir: dir.to_path_buf(),
            sources: Vec::new(),
            tests: Vec::new(),
        };

        for path in paths {
            let bytes = fs::read(&path).map_err(|e| AnalysisError::Io {
                path: path.clone(),
                source: e,
            })?;
            let parsed = source.parse(&path, bytes)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            debug!(file = %parsed.path, test = options.is_test_file(&name), "parsed");
            if options.is_test_file(&name) {
                package.tests.push(parsed);
            } else {
                package.sources.push(parsed);
            }
        }

        Ok(package)
    }
}

/// Parses Go source with tree-sitter-go.
pub struct GoSource {
    language: Language,
}

impl GoSource {
    pub fn new() -> Result<Self> {
        let source = Self {
            language: tree_sitter_go::LANGUAGE.into(),
        };
        // Surface an ABI mismatch once, up front.
        source.create_parser()?;
        Ok(source)
    }

    /// The Go grammar.
    pub fn language(&self) -> &Language {
        &self.language
    }

    fn create_parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    /// Parse one file. Any syntax error is fatal.
    pub fn parse(&self, path: &Path, source: Vec<u8>) -> Result<ParsedFile> {
        let display = path.to_string_lossy().to_string();
        let mut parser = self.create_parser()?;
        let tree = parser.parse(&source, None).ok_or(AnalysisError::Syntax {
            path: display.clone(),
            line: 1,
            column: 1,
        })?;

        if let Some(bad) = first_error(tree.root_node()) {
            let point = bad.start_position();
            return Err(AnalysisError::Syntax {
                path: display,
                line: point.row + 1,
                column: point.column + 1,
            });
        }

        Ok(ParsedFile {
            tree,
            source,
            path: display,
        })
    }
}

/// Find the first ERROR or MISSING node in document order.
fn first_error(node: Node) -> Option<Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    // has_error() on the parent with no erroring child means the parent itself is bad.
    found.or(Some(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_valid_source() {
        let source = GoSource::new().unwrap();
        let parsed = source
            .parse(Path::new("main.go"), b"package main\n\nfunc a() {}\n".to_vec())
            .unwrap();
        assert_eq!(parsed.root().kind(), "source_file");
        assert_eq!(parsed.path, "main.go");
    }

    #[test]
    fn test_parse_reports_syntax_error_position() {
        let source = GoSource::new().unwrap();
        let result = source.parse(
            Path::new("broken.go"),
            b"package main\n\nfunc a( {\n".to_vec(),
        );
        match result {
            Err(AnalysisError::Syntax { path, line, .. }) => {
                assert_eq!(path, "broken.go");
                assert!(line >= 3);
            }
            _ => panic!("expected a syntax error"),
        }
    }

    #[test]
    fn test_load_splits_test_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.go"), "package x\n\nfunc a() {}\n").unwrap();
        fs::write(dir.path().join("main_test.go"), "package x\n").unwrap();
        fs::write(dir.path().join("README.md"), "not go").unwrap();

        let package = Package::load(dir.path(), &Options::default()).unwrap();
        assert_eq!(package.sources.len(), 1);
        assert_eq!(package.tests.len(), 1);
        assert!(package.tests[0].path.ends_with("main_test.go"));
    }

    #[test]
    fn test_load_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = Package::load(&missing, &Options::default());
        assert!(matches!(result, Err(AnalysisError::PackageNotFound(_))));
    }

    #[test]
    fn test_load_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = Package::load(dir.path(), &Options::default());
        assert!(matches!(result, Err(AnalysisError::NoSourceFiles(_))));
    }

    #[test]
    fn test_load_honours_exclusions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.go"), "package x\n").unwrap();
        fs::write(dir.path().join("zz_generated.go"), "package x\n").unwrap();

        let mut builder = globset::GlobSetBuilder::new();
        builder.add(globset::Glob::new("zz_*.go").unwrap());
        let options = Options {
            excluded_files: builder.build().unwrap(),
            ..Options::default()
        };

        let package = Package::load(dir.path(), &options).unwrap();
        assert_eq!(package.sources.len(), 1);
        assert!(package.sources[0].path.ends_with("main.go"));
    }
}
