//! Helper-signature extraction from test files.
//!
//! A helper is a function in a test file that does not carry the test prefix
//! and declares at least one result. Helpers never count as called; their
//! only contribution is the list of result types, which lets
//! `x, err := newThing(t)` bind `x` to a type.

use std::collections::HashMap;

use tracing::debug;

use super::source::{Options, ParsedFile};
use super::syntax::{self, FuncDecl};

/// Return signature of one helper, one slot per declared result.
///
/// Results with no canonical type name (slices, maps, funcs, ...) keep their
/// slot as `None` so later results still line up with their position.
pub type Signature = Vec<Option<String>>;

/// Helper name → return signature, complete before any call is resolved.
#[derive(Debug, Clone, Default)]
pub struct HelperSignatures {
    signatures: HashMap<String, Signature>,
}

impl HelperSignatures {
    /// Scan every test file for helpers.
    pub fn collect(tests: &[ParsedFile], options: &Options) -> Self {
        let mut helpers = Self::default();
        for file in tests {
            for func in syntax::top_level_funcs(file) {
                helpers.visit(file, func, options);
            }
        }
        debug!(helpers = helpers.len(), "collected helper signatures");
        helpers
    }

    fn visit(&mut self, file: &ParsedFile, func: FuncDecl, options: &Options) {
        let Some(name) = func.name.map(|n| file.node_text(n)) else {
            return;
        };
        if name.starts_with(&options.test_func_prefix) {
            return;
        }
        let Some(result) = func.result else {
            return;
        };

        let signature: Signature = syntax::result_types(result)
            .into_iter()
            .map(|ty| syntax::signature_type(file, ty))
            .collect();
        if signature.is_empty() {
            return;
        }
        debug!(helper = name, ?signature, "helper");
        self.signatures.insert(name.to_string(), signature);
    }

    /// Whether `name` is a helper.
    pub fn contains(&self, name: &str) -> bool {
        self.signatures.contains_key(name)
    }

    /// The signature of helper `name`.
    pub fn get(&self, name: &str) -> Option<&[Option<String>]> {
        self.signatures.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, name: &str, signature: &[&str]) {
        self.signatures.insert(
            name.to_string(),
            signature.iter().map(|s| Some(s.to_string())).collect(),
        );
    }
}
