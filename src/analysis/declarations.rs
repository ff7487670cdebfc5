//! Declaration collection from non-test files.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Query, QueryCursor};

use super::error::Result;
use super::facts::{DeclaredFunction, Position};
use super::source::ParsedFile;

/// Tree-sitter query for top-level function and method declarations.
const DECLARATION_QUERY: &str = r#"
; Function declarations
(function_declaration
  name: (identifier) @func_name
) @function

; Method declarations (with receiver)
(method_declaration
  receiver: (parameter_list) @receiver
  name: (field_identifier) @method_name
) @method
"#;

/// Extract every declared function and method of one file, in source order.
pub fn collect(language: &Language, parsed: &ParsedFile) -> Result<Vec<DeclaredFunction>> {
    let query = Query::new(language, DECLARATION_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, parsed.tree.root_node(), &parsed.source[..]);

    let mut declared = Vec::new();

    while let Some(m) = matches.next() {
        let mut name = None;
        let mut receiver = None;
        let mut decl_node = None;

        for capture in m.captures {
            match query.capture_names()[capture.index as usize] {
                "func_name" | "method_name" => name = Some(parsed.node_text(capture.node)),
                "receiver" => receiver = receiver_type(parsed, capture.node),
                "function" | "method" => decl_node = Some(capture.node),
                _ => {}
            }
        }

        let (Some(name), Some(node)) = (name, decl_node) else {
            continue;
        };

        let qualified = match receiver {
            Some(recv) => format!("{}.{}", recv, name),
            None => name.to_string(),
        };

        let body = node.child_by_field_name("body");
        declared.push(DeclaredFunction {
            name: qualified,
            file: parsed.path.clone(),
            decl: Position::start_of(&parsed.path, node),
            body_open: body.map(|b| Position::start_of(&parsed.path, b)),
            body_close: body.map(|b| Position::last_of(&parsed.path, b)),
        });
    }

    declared.sort_by_key(|d| d.decl.offset);
    Ok(declared)
}

/// Receiver type name, with pointer and type parameters stripped.
///
/// An empty or unrecognisable receiver yields `None`, and the method is then
/// treated as a plain function.
fn receiver_type<'a>(parsed: &'a ParsedFile, receiver: Node) -> Option<&'a str> {
    let mut cursor = receiver.walk();
    let param = receiver
        .named_children(&mut cursor)
        .find(|n| n.kind() == "parameter_declaration")?;
    let mut ty = param.child_by_field_name("type")?;

    if ty.kind() == "pointer_type" {
        ty = ty.named_child(0)?;
    }
    if ty.kind() == "generic_type" {
        ty = ty.child_by_field_name("type")?;
    }

    match ty.kind() {
        "type_identifier" => Some(parsed.node_text(ty)),
        _ => None,
    }
}
