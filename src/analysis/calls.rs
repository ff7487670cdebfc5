//! Call resolution over test-file bodies.
//!
//! The resolver walks each test declaration with a [`Bindings`] map from
//! variable name to inferred type name, and turns every call it can express
//! into a canonical name: `f` for functions, `Type.Method` for methods on a
//! bound receiver. A selector whose operand has no binding is dropped rather
//! than guessed, so the analysis can only under-report what tests call.

use std::collections::{BTreeSet, HashMap};

use tracing::trace;
use tree_sitter::Node;

use super::helpers::HelperSignatures;
use super::source::ParsedFile;
use super::syntax::{self, Element, Expr, Stmt};

/// Name the called set is seeded with: Go runs `init` without any test calling it.
pub const IMPLICIT_ENTRY: &str = "init";

/// Variable → type bindings in scope for one top-level declaration.
///
/// Package-level bindings come from `var` declarations at the top of test
/// files and are visible everywhere. Local bindings belong to a single test
/// function, including every function literal nested inside it.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    package: HashMap<String, String>,
    local: HashMap<String, String>,
}

impl Bindings {
    /// A fresh scope over the given package-level bindings.
    pub fn new(package: HashMap<String, String>) -> Self {
        Self {
            package,
            local: HashMap::new(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.local
            .get(name)
            .or_else(|| self.package.get(name))
            .map(String::as_str)
    }

    pub fn bind(&mut self, name: &str, ty: &str) {
        if name == "_" {
            return;
        }
        trace!(name, ty, "bind");
        self.local.insert(name.to_string(), ty.to_string());
    }

    /// Drop local bindings, keeping package-level ones.
    pub fn reset_local(&mut self) {
        self.local.clear();
    }

    /// Move the current local bindings into the package scope.
    fn promote(&mut self) {
        let local = std::mem::take(&mut self.local);
        self.package.extend(local);
    }

    #[cfg(test)]
    pub(crate) fn local_view(&self) -> &HashMap<String, String> {
        &self.local
    }
}

/// Resolves calls in test files into canonical names.
pub struct CallResolver<'a> {
    helpers: &'a HelperSignatures,
    called: BTreeSet<String>,
}

impl<'a> CallResolver<'a> {
    pub fn new(helpers: &'a HelperSignatures) -> Self {
        let mut called = BTreeSet::new();
        called.insert(IMPLICIT_ENTRY.to_string());
        Self { helpers, called }
    }

    /// Walk every non-helper declaration of one test file.
    pub fn resolve_file(&mut self, file: &ParsedFile, scope: &mut Bindings) {
        for func in syntax::top_level_funcs(file) {
            let Some(body) = func.body else {
                continue;
            };
            let name = func.name.map(|n| file.node_text(n)).unwrap_or("");
            if self.helpers.contains(name) {
                continue;
            }
            scope.reset_local();
            trace!(file = %file.path, func = name, "resolving");
            self.walk_block(file, body, scope);
        }
    }

    /// Every name recorded so far, unpruned.
    pub fn into_called(self) -> BTreeSet<String> {
        self.called
    }

    fn record(&mut self, name: String) {
        trace!(called = %name, "call");
        self.called.insert(name);
    }

    fn walk_block(&mut self, file: &ParsedFile, block: Node, scope: &mut Bindings) {
        for stmt in syntax::statements(block) {
            self.walk_stmt(file, stmt, scope);
        }
    }

    fn walk_stmt(&mut self, file: &ParsedFile, node: Node, scope: &mut Bindings) {
        match Stmt::classify(node) {
            Stmt::Assign { left, right } => self.assign(file, &left, &right, scope),
            Stmt::Var(decl) => {
                // Only the first spec of a local group is considered.
                if let Some(spec) = syntax::var_specs(decl).into_iter().next() {
                    bind_var_spec(file, spec, scope);
                    let names = spec_names(spec);
                    let values = syntax::var_values(spec);
                    self.assign(file, &names, &values, scope);
                }
            }
            Stmt::Expr(expr) => {
                if let Expr::Call { .. } = Expr::classify(expr) {
                    self.call(file, expr, scope);
                }
            }
            Stmt::Defer(expr) | Stmt::Go(expr) => {
                if let Expr::Call { function, .. } = Expr::classify(expr) {
                    self.callee(file, function, scope);
                }
            }
            Stmt::Return(results) => {
                for result in results {
                    if let Expr::Call { function, .. } = Expr::classify(result) {
                        self.callee(file, function, scope);
                    }
                }
            }
            Stmt::Send { value } => {
                if let Some(value) = value {
                    if let Expr::Call { .. } = Expr::classify(value) {
                        self.call(file, value, scope);
                    }
                }
            }
            Stmt::Loop { body } => {
                if let Some(body) = body {
                    self.walk_block(file, body, scope);
                }
            }
            Stmt::If { consequence } => {
                if let Some(block) = consequence {
                    self.walk_block(file, block, scope);
                }
            }
            Stmt::Clauses(clauses) => {
                for clause in clauses {
                    self.walk_block(file, clause, scope);
                }
            }
            Stmt::Other => {}
        }
    }

    /// A full call: arguments first, then the callee.
    fn call(&mut self, file: &ParsedFile, node: Node, scope: &mut Bindings) {
        let Expr::Call {
            function,
            arguments,
        } = Expr::classify(node)
        else {
            return;
        };
        for arg in arguments {
            match Expr::classify(arg) {
                Expr::Call { .. } => self.call(file, arg, scope),
                Expr::FuncLit { body } => self.func_lit(file, body, scope),
                _ => {}
            }
        }
        self.callee(file, function, scope);
    }

    /// Resolve only the thing being called.
    fn callee(&mut self, file: &ParsedFile, node: Node, scope: &mut Bindings) {
        match Expr::classify(node) {
            Expr::Ident(ident) => {
                let name = file.node_text(ident);
                if !self.helpers.contains(name) {
                    self.record(name.to_string());
                }
            }
            Expr::Selector { operand, field } => {
                let Expr::Ident(var) = Expr::classify(operand) else {
                    return;
                };
                if let Some(ty) = scope.lookup(file.node_text(var)) {
                    let name = format!("{}.{}", ty, file.node_text(field));
                    self.record(name);
                }
            }
            Expr::FuncLit { body } => self.func_lit(file, body, scope),
            Expr::Call { .. } | Expr::Unary { .. } | Expr::Composite { .. } | Expr::Other => {}
        }
    }

    fn func_lit(&mut self, file: &ParsedFile, body: Option<Node>, scope: &mut Bindings) {
        if let Some(body) = body {
            self.walk_block(file, body, scope);
        }
    }

    fn assign(&mut self, file: &ParsedFile, left: &[Node], right: &[Node], scope: &mut Bindings) {
        let targets: Vec<Option<&str>> = left
            .iter()
            .map(|n| match n.kind() {
                "identifier" => Some(file.node_text(*n)),
                _ => None,
            })
            .collect();
        let target = |i: usize| targets.get(i).copied().flatten();

        for (j, value) in right.iter().enumerate() {
            match Expr::classify(*value) {
                Expr::FuncLit { body } => self.func_lit(file, body, scope),
                Expr::Unary { operand } => {
                    if let Some(operand) = operand {
                        self.composite(file, operand, target(j), scope);
                    }
                }
                Expr::Composite { .. } => self.composite(file, *value, target(j), scope),
                Expr::Call { function, .. } => {
                    // Only the unpacking form `a, b := h()` binds from a signature.
                    let signature = match right.len() {
                        1 => self.helper_signature(file, function),
                        _ => None,
                    };
                    for (i, ty) in signature.iter().flatten().enumerate() {
                        if let (Some(name), Some(ty)) = (target(i), ty) {
                            scope.bind(name, ty);
                        }
                    }
                    self.call(file, *value, scope);
                }
                Expr::Ident(_) | Expr::Selector { .. } | Expr::Other => {}
            }
        }
    }

    /// Signature of the helper a call targets, by bare or selected name.
    fn helper_signature(&self, file: &ParsedFile, function: Node) -> Option<Vec<Option<String>>> {
        let name = match Expr::classify(function) {
            Expr::Ident(ident) => file.node_text(ident),
            Expr::Selector { field, .. } => file.node_text(field),
            _ => return None,
        };
        self.helpers.get(name).map(<[_]>::to_vec)
    }

    /// `T{...}` (possibly behind `&`): scan the elements, then bind the target.
    fn composite(&mut self, file: &ParsedFile, node: Node, target: Option<&str>, scope: &mut Bindings) {
        let Expr::Composite { ty, elements } = Expr::classify(node) else {
            return;
        };
        self.elements(file, elements, scope);
        if let (Some(name), Some(ty)) = (target, ty.and_then(|t| syntax::binding_type(file, t))) {
            scope.bind(name, &ty);
        }
    }

    /// Calls and function literals inside literal elements, nested bodies included.
    fn elements(&mut self, file: &ParsedFile, elements: Vec<Element>, scope: &mut Bindings) {
        for element in elements {
            let (value, keyed) = match element {
                Element::Plain(value) => (value, false),
                Element::Keyed(value) => (value, true),
            };
            match Expr::classify(value) {
                Expr::Call { .. } if keyed => self.call(file, value, scope),
                Expr::Call { function, .. } => self.callee(file, function, scope),
                Expr::FuncLit { body } => self.func_lit(file, body, scope),
                Expr::Composite { elements, .. } => self.elements(file, elements, scope),
                Expr::Unary {
                    operand: Some(operand),
                } => {
                    if let Expr::Composite { elements, .. } = Expr::classify(operand) {
                        self.elements(file, elements, scope);
                    }
                }
                Expr::Ident(_) | Expr::Selector { .. } | Expr::Unary { .. } | Expr::Other => {}
            }
        }
    }
}

/// Bindings established by package-level `var` declarations of the test files.
///
/// Only bindings are taken from these declarations; their initialisers run
/// at package setup, not from a test.
pub fn package_bindings(tests: &[ParsedFile]) -> HashMap<String, String> {
    let mut scope = Bindings::default();
    for file in tests {
        for decl in syntax::top_level_vars(file) {
            for spec in syntax::var_specs(decl) {
                bind_var_spec(file, spec, &mut scope);
            }
        }
    }
    scope.promote();
    scope.package
}

/// `var name Type` binds the first name to the declared type.
fn bind_var_spec(file: &ParsedFile, spec: Node, scope: &mut Bindings) {
    let name = spec.child_by_field_name("name").map(|n| file.node_text(n));
    let ty = spec
        .child_by_field_name("type")
        .and_then(|t| syntax::binding_type(file, t));
    match (name, ty) {
        (Some(name), Some(ty)) => scope.bind(name, &ty),
        (Some(name), None) => {
            // `var x = &T{}` at package level still tells us the type.
            if let Some(value) = syntax::var_values(spec).first() {
                let literal = match Expr::classify(*value) {
                    Expr::Unary { operand } => operand,
                    Expr::Composite { .. } => Some(*value),
                    _ => None,
                };
                if let Some(Expr::Composite { ty: Some(ty), .. }) = literal.map(Expr::classify) {
                    if let Some(ty) = syntax::binding_type(file, ty) {
                        scope.bind(name, &ty);
                    }
                }
            }
        }
        _ => {}
    }
}

/// Identifiers declared by one `var_spec`, in order.
fn spec_names(spec: Node) -> Vec<Node> {
    let mut cursor = spec.walk();
    let names: Vec<_> = spec.children_by_field_name("name", &mut cursor).collect();
    names
}
