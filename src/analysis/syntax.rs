//! Typed views over tree-sitter-go nodes.
//!
//! The call resolver never matches on raw `kind()` strings. Every statement and
//! expression it cares about is classified once into [`Stmt`] or [`Expr`], and
//! everything else lands in an `Other` variant, so the resolver's `match` is
//! exhaustive over the forms it understands.
//!
//! The helpers here tolerate both shapes the grammar has had for statement
//! lists (a visible `statement_list` node, or statements as direct children).

use tree_sitter::Node;

use super::source::ParsedFile;

/// A statement form the resolver distinguishes.
#[derive(Debug, Clone)]
pub enum Stmt<'t> {
    /// `a, b := x, y` or `a, b = x, y`.
    Assign {
        left: Vec<Node<'t>>,
        right: Vec<Node<'t>>,
    },
    /// `var ...` inside a function body.
    Var(Node<'t>),
    /// A stand-alone expression.
    Expr(Node<'t>),
    /// `defer <expr>`.
    Defer(Node<'t>),
    /// `go <expr>`.
    Go(Node<'t>),
    /// `return a, b`.
    Return(Vec<Node<'t>>),
    /// `ch <- value`.
    Send { value: Option<Node<'t>> },
    /// `for`/`range` loops; only the body is of interest.
    Loop { body: Option<Node<'t>> },
    /// `if`; only the consequence block is of interest.
    If { consequence: Option<Node<'t>> },
    /// `select`, `switch` and type switches: their case clauses.
    Clauses(Vec<Node<'t>>),
    /// Anything else (labels, nested blocks, inc/dec, branches, ...).
    Other,
}

impl<'t> Stmt<'t> {
    pub fn classify(node: Node<'t>) -> Self {
        match node.kind() {
            "short_var_declaration" | "assignment_statement" => Stmt::Assign {
                left: node
                    .child_by_field_name("left")
                    .map(list_items)
                    .unwrap_or_default(),
                right: node
                    .child_by_field_name("right")
                    .map(list_items)
                    .unwrap_or_default(),
            },
            "var_declaration" => Stmt::Var(node),
            "expression_statement" => match first_named(node) {
                Some(expr) => Stmt::Expr(expr),
                None => Stmt::Other,
            },
            "defer_statement" => match first_named(node) {
                Some(expr) => Stmt::Defer(expr),
                None => Stmt::Other,
            },
            "go_statement" => match first_named(node) {
                Some(expr) => Stmt::Go(expr),
                None => Stmt::Other,
            },
            "return_statement" => Stmt::Return(
                first_named(node).map(list_items).unwrap_or_default(),
            ),
            "send_statement" => Stmt::Send {
                value: node.child_by_field_name("value"),
            },
            "for_statement" => Stmt::Loop {
                body: node.child_by_field_name("body"),
            },
            "if_statement" => Stmt::If {
                consequence: node.child_by_field_name("consequence"),
            },
            "select_statement" | "expression_switch_statement" | "type_switch_statement" => {
                let clauses = named_non_comments(node)
                    .into_iter()
                    .filter(|c| {
                        matches!(
                            c.kind(),
                            "communication_case" | "expression_case" | "type_case" | "default_case"
                        )
                    })
                    .collect();
                Stmt::Clauses(clauses)
            }
            _ => Stmt::Other,
        }
    }
}

/// An expression form the resolver distinguishes.
#[derive(Debug, Clone)]
pub enum Expr<'t> {
    /// A bare identifier.
    Ident(Node<'t>),
    /// `operand.field`.
    Selector { operand: Node<'t>, field: Node<'t> },
    /// `function(arguments...)`.
    Call {
        function: Node<'t>,
        arguments: Vec<Node<'t>>,
    },
    /// `func(...) { body }`.
    FuncLit { body: Option<Node<'t>> },
    /// `&x`, `-x`, `<-x`, ...
    Unary { operand: Option<Node<'t>> },
    /// `Type{elements...}`, or a bare `{elements...}` nested in another literal.
    Composite {
        ty: Option<Node<'t>>,
        elements: Vec<Element<'t>>,
    },
    Other,
}

impl<'t> Expr<'t> {
    pub fn classify(node: Node<'t>) -> Self {
        match node.kind() {
            "identifier" => Expr::Ident(node),
            "selector_expression" => {
                match (
                    node.child_by_field_name("operand"),
                    node.child_by_field_name("field"),
                ) {
                    (Some(operand), Some(field)) => Expr::Selector { operand, field },
                    _ => Expr::Other,
                }
            }
            "call_expression" => match node.child_by_field_name("function") {
                Some(function) => Expr::Call {
                    function,
                    arguments: node
                        .child_by_field_name("arguments")
                        .map(named_non_comments)
                        .unwrap_or_default(),
                },
                None => Expr::Other,
            },
            "func_literal" => Expr::FuncLit {
                body: node.child_by_field_name("body"),
            },
            "unary_expression" => Expr::Unary {
                operand: node.child_by_field_name("operand"),
            },
            "composite_literal" => Expr::Composite {
                ty: node.child_by_field_name("type"),
                elements: node
                    .child_by_field_name("body")
                    .map(literal_elements)
                    .unwrap_or_default(),
            },
            "literal_value" => Expr::Composite {
                ty: None,
                elements: literal_elements(node),
            },
            _ => Expr::Other,
        }
    }
}

/// One element of a composite literal body.
#[derive(Debug, Clone, Copy)]
pub enum Element<'t> {
    /// `value`
    Plain(Node<'t>),
    /// `key: value`, carrying the value.
    Keyed(Node<'t>),
}

fn literal_elements(body: Node) -> Vec<Element> {
    named_non_comments(body)
        .into_iter()
        .filter_map(|child| match child.kind() {
            "keyed_element" => {
                let value = child.child_by_field_name("value").or_else(|| {
                    let count = child.named_child_count();
                    count.checked_sub(1).and_then(|last| child.named_child(last))
                })?;
                Some(Element::Keyed(unwrap_element(value)))
            }
            _ => Some(Element::Plain(unwrap_element(child))),
        })
        .collect()
}

fn unwrap_element(node: Node) -> Node {
    match node.kind() {
        "literal_element" | "element" => first_named(node).unwrap_or(node),
        _ => node,
    }
}

/// A top-level `func` declaration, with or without a receiver.
#[derive(Debug, Clone, Copy)]
pub struct FuncDecl<'t> {
    pub name: Option<Node<'t>>,
    pub result: Option<Node<'t>>,
    pub body: Option<Node<'t>>,
}

/// Function and method declarations at the top of a file.
pub fn top_level_funcs(file: &ParsedFile) -> Vec<FuncDecl<'_>> {
    named_non_comments(file.root())
        .into_iter()
        .filter(|n| matches!(n.kind(), "function_declaration" | "method_declaration"))
        .map(|node| FuncDecl {
            name: node.child_by_field_name("name"),
            result: node.child_by_field_name("result"),
            body: node.child_by_field_name("body"),
        })
        .collect()
}

/// Package-level `var` declarations of a file.
pub fn top_level_vars(file: &ParsedFile) -> Vec<Node<'_>> {
    named_non_comments(file.root())
        .into_iter()
        .filter(|n| n.kind() == "var_declaration")
        .collect()
}

/// Statements of a block or case clause, in source order.
///
/// Children attached to a field (a case's value list, a select's
/// communication) are not statements and are skipped.
pub fn statements(node: Node) -> Vec<Node> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    if !cursor.goto_first_child() {
        return out;
    }
    loop {
        let child = cursor.node();
        if child.is_named() && cursor.field_name().is_none() {
            match child.kind() {
                "statement_list" => out.extend(named_non_comments(child)),
                "comment" => {}
                _ => out.push(child),
            }
        }
        if !cursor.goto_next_sibling() {
            break;
        }
    }
    out
}

/// Items of an `expression_list`, or the node itself for a lone expression.
pub fn list_items(node: Node) -> Vec<Node> {
    if node.kind() == "expression_list" {
        named_non_comments(node)
    } else {
        vec![node]
    }
}

/// `var_spec` nodes of a `var` declaration, grouped or not.
pub fn var_specs(node: Node) -> Vec<Node> {
    let mut specs = Vec::new();
    for child in named_non_comments(node) {
        match child.kind() {
            "var_spec" => specs.push(child),
            "var_spec_list" => specs.extend(
                named_non_comments(child)
                    .into_iter()
                    .filter(|c| c.kind() == "var_spec"),
            ),
            _ => {}
        }
    }
    specs
}

/// Values of a `var_spec` (`var a, b = x, y`).
pub fn var_values(spec: Node) -> Vec<Node> {
    spec.child_by_field_name("value")
        .map(list_items)
        .unwrap_or_default()
}

fn first_named(node: Node) -> Option<Node> {
    named_non_comments(node).into_iter().next()
}

fn named_non_comments(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    let children: Vec<_> = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect();
    children
}

/// Type name used for variable bindings: pointers and package qualifiers dropped.
///
/// `Example`, `*Example` and `pkg.Example` all bind as `Example`.
pub fn binding_type(file: &ParsedFile, node: Node) -> Option<String> {
    match node.kind() {
        "type_identifier" => Some(file.node_text(node).to_string()),
        "qualified_type" => node
            .child_by_field_name("name")
            .map(|n| file.node_text(n).to_string()),
        "pointer_type" => first_named(node).and_then(|inner| binding_type(file, inner)),
        _ => None,
    }
}

/// Type name recorded in a helper's return signature.
///
/// Qualified types keep their package (`pkg.Type`); a pointer marker is
/// stripped. Other type shapes have no canonical name.
pub fn signature_type(file: &ParsedFile, node: Node) -> Option<String> {
    match node.kind() {
        "type_identifier" => Some(file.node_text(node).to_string()),
        "qualified_type" => {
            let package = node.child_by_field_name("package")?;
            let name = node.child_by_field_name("name")?;
            Some(format!(
                "{}.{}",
                file.node_text(package),
                file.node_text(name)
            ))
        }
        "pointer_type" => {
            let inner = first_named(node)?;
            match inner.kind() {
                "type_identifier" | "qualified_type" => signature_type(file, inner),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Type nodes of a function's declared results, one per result field.
pub fn result_types(result: Node) -> Vec<Node> {
    if result.kind() != "parameter_list" {
        return vec![result];
    }
    named_non_comments(result)
        .into_iter()
        .filter_map(|param| match param.kind() {
            "parameter_declaration" => param.child_by_field_name("type"),
            _ => None,
        })
        .collect()
}
