//! Syntax tree for tempile templates.
//!
//! The parser builds these nodes and the resolver rewrites them in place
//! (includes, slots). The code generator only reads them.

use std::fmt;

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// A location in a template source file, used for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pos {
    pub file_name: String,
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(file_name: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file_name: file_name.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "file: {} line: {} col: {}",
            self.file_name, self.line, self.column
        )
    }
}

// ---------------------------------------------------------------------------
// Document-level nodes
// ---------------------------------------------------------------------------

/// A parsed template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub children: Vec<Node>,
}

/// A node in the template tree.
///
/// New kinds may be added by the parser; consumers must treat kinds they
/// do not know as producing no output.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Node {
    /// `<import go="strings">`: declares packages for the generated program.
    Import(Import),

    /// `<!DOCTYPE html>`, stored verbatim.
    DocumentType(Text),

    /// `<!-- ... -->`, stored verbatim including delimiters.
    Comment(Text),

    /// Literal markup text.
    Text(Text),

    /// A markup element with attributes and children.
    Element(Element),

    /// `<if go-cond="...">` with its `elseif`/`else` branches attached.
    If(If),

    /// An `elseif` branch. Normally only reachable through [`If::else_ifs`].
    ElseIf(ElseIf),

    /// An `else` branch. Normally only reachable through [`If::else_branch`].
    Else(Else),

    /// `<for go-loop="...">`.
    For(For),

    /// A block of host-language code, tagged with its language.
    RawCode(RawCode),

    /// `{{! expr }}`: expression written without escaping.
    RawExpr(ExprNode),

    /// `{{ expr }}`: expression written HTML-escaped.
    Expr(ExprNode),

    /// `<include src="...">`, replaced by the resolver.
    Include(Include),

    /// `<slot name="...">` placeholder inside an included file.
    Slot(Slot),

    /// `<content slot="...">` supplied by the including file.
    Content(Content),
}

/// Fieldless mirror of [`Node`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NodeKind {
    Import,
    DocumentType,
    Comment,
    Text,
    Element,
    If,
    ElseIf,
    Else,
    For,
    RawCode,
    RawExpr,
    Expr,
    Include,
    Slot,
    Content,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Import(_) => NodeKind::Import,
            Node::DocumentType(_) => NodeKind::DocumentType,
            Node::Comment(_) => NodeKind::Comment,
            Node::Text(_) => NodeKind::Text,
            Node::Element(_) => NodeKind::Element,
            Node::If(_) => NodeKind::If,
            Node::ElseIf(_) => NodeKind::ElseIf,
            Node::Else(_) => NodeKind::Else,
            Node::For(_) => NodeKind::For,
            Node::RawCode(_) => NodeKind::RawCode,
            Node::RawExpr(_) => NodeKind::RawExpr,
            Node::Expr(_) => NodeKind::Expr,
            Node::Include(_) => NodeKind::Include,
            Node::Slot(_) => NodeKind::Slot,
            Node::Content(_) => NodeKind::Content,
        }
    }

    pub fn pos(&self) -> &Pos {
        match self {
            Node::Import(n) => &n.pos,
            Node::DocumentType(n) | Node::Comment(n) | Node::Text(n) => &n.pos,
            Node::Element(n) => &n.pos,
            Node::If(n) => &n.pos,
            Node::ElseIf(n) => &n.pos,
            Node::Else(n) => &n.pos,
            Node::For(n) => &n.pos,
            Node::RawCode(n) => &n.pos,
            Node::RawExpr(n) | Node::Expr(n) => &n.pos,
            Node::Include(n) => &n.pos,
            Node::Slot(n) => &n.pos,
            Node::Content(n) => &n.pos,
        }
    }

    /// Shorthand for a `Text` node without position information.
    pub fn text(data: impl Into<String>) -> Self {
        Node::Text(Text::new(data))
    }

    /// Shorthand for an escaped `Expr` node without position information.
    pub fn expr(expr: impl Into<String>) -> Self {
        Node::Expr(ExprNode::new(expr))
    }
}

/// Verbatim text payload shared by text, comment and doctype nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub data: String,
    pub pos: Pos,
}

impl Text {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            pos: Pos::default(),
        }
    }
}

/// An attribute on an element or directive.
///
/// `value` is the attribute text as written. `value_nodes` is the same text
/// split into interleaved `Text` and `Expr` nodes, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub value_nodes: Vec<Node>,
}

impl Attribute {
    /// An attribute whose value holds no expressions.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let value_nodes = if value.is_empty() {
            Vec::new()
        } else {
            vec![Node::text(value.clone())]
        };
        Self {
            name: name.into(),
            value,
            value_nodes,
        }
    }
}

/// Returns the value of the first attribute called `name`.
///
/// An empty value is treated the same as a missing attribute.
pub fn find_clause<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|a| a.name == name)
        .map(|a| a.value.as_str())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Import {
    pub attrs: Vec<Attribute>,
    pub pos: Pos,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub pos: Pos,
}

// ---------------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct If {
    /// Directive attributes; `go-cond` carries the condition.
    pub conds: Vec<Attribute>,
    pub then: Vec<Node>,
    pub else_ifs: Vec<ElseIf>,
    pub else_branch: Option<Else>,
    pub pos: Pos,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElseIf {
    pub conds: Vec<Attribute>,
    pub children: Vec<Node>,
    pub pos: Pos,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Else {
    pub children: Vec<Node>,
    pub pos: Pos,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct For {
    /// Directive attributes; `go-loop` carries the loop header.
    pub loops: Vec<Attribute>,
    pub children: Vec<Node>,
    pub pos: Pos,
}

// ---------------------------------------------------------------------------
// Embedded code
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCode {
    pub lang: String,
    pub code: String,
    pub pos: Pos,
}

/// Expression text embedded in a template. Never validated here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprNode {
    pub expr: String,
    pub pos: Pos,
}

impl ExprNode {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            pos: Pos::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver-only nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Include {
    pub src: String,
    /// `content` nodes and anything else written inside the include tag.
    pub children: Vec<Node>,
    pub pos: Pos,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slot {
    pub name: String,
    /// Fallback markup used when no matching content is supplied.
    pub children: Vec<Node>,
    pub pos: Pos,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Content {
    pub slot: String,
    pub children: Vec<Node>,
    pub pos: Pos,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_clause_first_match_wins() {
        let attrs = vec![
            Attribute::new("class", "x"),
            Attribute::new("go-cond", "data.A"),
            Attribute::new("go-cond", "data.B"),
        ];
        assert_eq!(find_clause(&attrs, "go-cond"), Some("data.A"));
    }

    #[test]
    fn test_find_clause_empty_is_missing() {
        let attrs = vec![Attribute::new("go-loop", "")];
        assert_eq!(find_clause(&attrs, "go-loop"), None);
        assert_eq!(find_clause(&[], "go-loop"), None);
    }

    #[test]
    fn test_attribute_new_splits_plain_value() {
        let attr = Attribute::new("href", "/about");
        assert_eq!(attr.value_nodes, vec![Node::text("/about")]);
        assert!(Attribute::new("disabled", "").value_nodes.is_empty());
    }

    #[test]
    fn test_kind_and_pos() {
        let node = Node::For(For {
            pos: Pos::new("list.html", 4, 9),
            ..For::default()
        });
        assert_eq!(node.kind(), NodeKind::For);
        assert_eq!(node.pos().to_string(), "file: list.html line: 4 col: 9");
    }
}
