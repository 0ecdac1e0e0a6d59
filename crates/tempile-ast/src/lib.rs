//! Tempile AST
//!
//! The template tree handed from the front end (parser and include/slot
//! resolver) to the Go code generator, plus the traits those front-end
//! collaborators implement.
//!
//! ```text
//! source → TemplateParser → Document → Resolver (in place) → codegen
//! ```

pub mod ast;

use std::path::Path;

pub use ast::{
    find_clause, Attribute, Content, Document, Element, Else, ElseIf, ExprNode, For, If,
    Import, Include, Node, NodeKind, Pos, RawCode, Slot, Text,
};

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error: {message}. {pos}")]
pub struct ParseError {
    pub message: String,
    pub pos: Pos,
}

/// Turns template source into a [`Document`].
pub trait TemplateParser {
    fn parse(&self, source: &str, file_name: &str) -> Result<Document, ParseError>;
}

impl<F> TemplateParser for F
where
    F: Fn(&str, &str) -> Result<Document, ParseError>,
{
    fn parse(&self, source: &str, file_name: &str) -> Result<Document, ParseError> {
        self(source, file_name)
    }
}

/// Rewrites a parsed document in place before code generation.
///
/// Both passes report problems through the tree itself (for example by
/// leaving an unresolved `Include` node behind); they have no error channel.
pub trait Resolver {
    /// Replace `Include` nodes with the documents they name, looked up
    /// relative to `src_path`.
    fn resolve_includes(&self, doc: &mut Document, src_path: &Path);

    /// Move `Content` nodes into the `Slot` placeholders they target.
    fn match_slots_and_contents(&self, doc: &mut Document);
}

/// Resolver for templates that use neither includes nor slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl Resolver for NoopResolver {
    fn resolve_includes(&self, _doc: &mut Document, _src_path: &Path) {}

    fn match_slots_and_contents(&self, _doc: &mut Document) {}
}
