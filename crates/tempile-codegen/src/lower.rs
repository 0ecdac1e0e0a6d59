//! Node lowering.
//!
//! Walks the template tree in pre-order and produces a flat list of
//! [`Chunk`]s. Literal markup becomes `Literal` chunks, embedded expressions
//! become `Expr` chunks and directives become Go control code.

use tempile_ast::{Attribute, Element, ExprNode, Import, Node, RawCode};

use crate::chunk::Chunk;
use crate::control_flow;
use crate::tracker::Tracker;
use crate::LowerError;

/// Language tag of `RawCode` blocks that are spliced into the output.
pub const HOST_LANG: &str = "go";

/// Attribute on `<import>` that names a Go package.
pub const IMPORT_ATTR: &str = "go";

/// HTML void elements (never closed).
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Check if a tag name is an HTML void element.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Lower one node (and its subtree) into chunks.
///
/// On error nothing is returned; partial output is dropped.
#[tracing::instrument(skip_all, fields(kind = ?node.kind()))]
pub fn lower(node: &Node, tracker: &mut Tracker) -> Result<Vec<Chunk>, LowerError> {
    let mut out = Vec::new();
    lower_node(node, tracker, &mut out)?;
    Ok(out)
}

/// Lower a sibling list in order.
pub fn lower_nodes(
    nodes: &[Node],
    tracker: &mut Tracker,
    out: &mut Vec<Chunk>,
) -> Result<(), LowerError> {
    for node in nodes {
        lower_node(node, tracker, out)?;
    }
    Ok(())
}

fn lower_node(
    node: &Node,
    tracker: &mut Tracker,
    out: &mut Vec<Chunk>,
) -> Result<(), LowerError> {
    match node {
        Node::Import(import) => lower_import(import, tracker),
        Node::DocumentType(text) | Node::Comment(text) | Node::Text(text) => {
            out.push(Chunk::literal(text.data.as_str()));
        }
        Node::Element(el) => lower_element(el, tracker, out)?,
        Node::If(node) => control_flow::lower_if(node, tracker, out)?,
        Node::For(node) => control_flow::lower_for(node, tracker, out)?,
        Node::RawCode(raw) => lower_raw_code(raw, out),
        Node::RawExpr(raw) => out.push(Chunk::expr(raw.expr.as_str())),
        Node::Expr(expr) => out.push(lower_expr(expr, tracker)),
        // elseif/else only mean something under their parent `if`; the
        // resolver-only kinds should be gone by now.
        other => {
            tracing::trace!(kind = ?other.kind(), pos = %other.pos(), "node has no output");
        }
    }
    Ok(())
}

fn lower_import(import: &Import, tracker: &mut Tracker) {
    for attr in &import.attrs {
        if attr.name == IMPORT_ATTR {
            tracker.add_package(&attr.value);
        }
    }
}

/// `{{ expr }}` → `html.EscapeString(fmt.Sprint(expr))`.
fn lower_expr(node: &ExprNode, tracker: &mut Tracker) -> Chunk {
    tracker.uses_html = true;
    tracker.uses_fmt = true;
    Chunk::Expr(format!("html.EscapeString(fmt.Sprint({}))", node.expr))
}

fn lower_raw_code(raw: &RawCode, out: &mut Vec<Chunk>) {
    if raw.lang == HOST_LANG {
        out.push(Chunk::Code(format!("{}\n", raw.code)));
    } else {
        tracing::trace!(lang = %raw.lang, pos = %raw.pos, "skipping raw code for another language");
    }
}

fn lower_element(
    el: &Element,
    tracker: &mut Tracker,
    out: &mut Vec<Chunk>,
) -> Result<(), LowerError> {
    let tag = &el.tag;

    if el.attrs.is_empty() {
        out.push(Chunk::Literal(format!("<{tag}>")));
    } else {
        out.push(Chunk::Literal(format!("<{tag}")));
        for attr in &el.attrs {
            lower_attribute(attr, tracker, out);
        }
        out.push(Chunk::literal(">"));
    }

    // Void elements keep any children they were given; only the closing
    // tag is suppressed.
    lower_nodes(&el.children, tracker, out)?;

    if !is_void_element(tag) {
        out.push(Chunk::Literal(format!("</{tag}>")));
    }

    Ok(())
}

fn lower_attribute(attr: &Attribute, tracker: &mut Tracker, out: &mut Vec<Chunk>) {
    out.push(Chunk::Literal(format!(" {}=\"", attr.name)));
    for value in &attr.value_nodes {
        match value {
            Node::Text(text) => out.push(Chunk::literal(text.data.as_str())),
            Node::Expr(expr) => out.push(lower_expr(expr, tracker)),
            other => {
                tracing::trace!(kind = ?other.kind(), attr = %attr.name, "ignoring attribute value node");
            }
        }
    }
    out.push(Chunk::literal("\""));
}
