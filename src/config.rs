//! Optional per-package configuration.
//!
//! A `blanket.yaml` (or `.blanket.yaml`) in the package directory adjusts how
//! files and tests are recognised. Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::analysis::Options;

/// File names probed, in order, when no config path is given.
pub const CONFIG_FILE_NAMES: &[&str] = &["blanket.yaml", ".blanket.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// File name suffix marking test files (default: `_test.go`).
    #[serde(default)]
    pub test_file_suffix: Option<String>,
    /// Prefix of test entry points (default: `Test`).
    #[serde(default)]
    pub test_func_prefix: Option<String>,
    /// Glob patterns for file names to leave out (e.g. "zz_generated*.go").
    #[serde(default)]
    pub excluded_files: Vec<String>,
    /// Exit non-zero when any function lacks a direct test.
    #[serde(default)]
    pub fail_on_found: bool,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load `explicit` if given, else the first config file found in `dir`.
    ///
    /// A missing explicit path is an error; finding nothing in `dir` is not.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        match explicit.map(Path::to_path_buf).or_else(|| discover(dir)) {
            Some(path) => Self::parse_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Analysis options with defaults filled in.
    pub fn to_options(&self) -> anyhow::Result<Options> {
        let defaults = Options::default();

        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_files {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid excluded_files pattern {:?}", pattern))?;
            builder.add(glob);
        }

        Ok(Options {
            test_file_suffix: self
                .test_file_suffix
                .clone()
                .unwrap_or(defaults.test_file_suffix),
            test_func_prefix: self
                .test_func_prefix
                .clone()
                .unwrap_or(defaults.test_func_prefix),
            excluded_files: builder.build()?,
        })
    }
}

fn discover(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
