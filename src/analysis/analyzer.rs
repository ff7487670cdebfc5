//! The analysis pipeline for one package directory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use super::calls::{self, Bindings, CallResolver};
use super::declarations;
use super::error::Result;
use super::facts::DeclaredFunction;
use super::helpers::HelperSignatures;
use super::source::{GoSource, Options, Package};

/// What a package declares and what its tests call directly.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Declared functions keyed by qualified name.
    pub declared_details: BTreeMap<String, DeclaredFunction>,
    /// Qualified names of every declared function.
    pub declared: BTreeSet<String>,
    /// Declared names a test calls directly.
    pub called: BTreeSet<String>,
}

/// Runs the analysis phases over a package directory.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: Options,
}

impl Analyzer {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Analyze the package rooted at `dir`.
    pub fn analyze(&self, dir: &Path) -> Result<Report> {
        let package = Package::load(dir, &self.options)?;
        debug!(
            dir = %package.dir.display(),
            sources = package.sources.len(),
            tests = package.tests.len(),
            "loaded package"
        );

        let helpers = HelperSignatures::collect(&package.tests, &self.options);
        let declared_details = self.declarations(&package)?;
        let called = self.calls(&package, &helpers);

        Ok(prune(declared_details, called))
    }

    fn declarations(&self, package: &Package) -> Result<BTreeMap<String, DeclaredFunction>> {
        let go = GoSource::new()?;
        let mut details = BTreeMap::new();
        for file in &package.sources {
            for func in declarations::collect(go.language(), file)? {
                // Last writer wins, as with any redeclaration.
                details.insert(func.name.clone(), func);
            }
        }
        debug!(declared = details.len(), "collected declarations");
        Ok(details)
    }

    fn calls(&self, package: &Package, helpers: &HelperSignatures) -> BTreeSet<String> {
        let mut scope = Bindings::new(calls::package_bindings(&package.tests));
        let mut resolver = CallResolver::new(helpers);
        for file in &package.tests {
            resolver.resolve_file(file, &mut scope);
        }
        let called = resolver.into_called();
        debug!(called = called.len(), "resolved calls");
        called
    }
}

/// Drop every called name that is not a declared function.
fn prune(declared_details: BTreeMap<String, DeclaredFunction>, called: BTreeSet<String>) -> Report {
    let declared: BTreeSet<String> = declared_details.keys().cloned().collect();
    let called: BTreeSet<String> = called.intersection(&declared).cloned().collect();
    Report {
        declared_details,
        declared,
        called,
    }
}
