//! Intermediate representation between the template tree and Go source.

/// One lowered fragment of the render function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Static text written to the sink. Adjacent literals may be merged.
    Literal(String),
    /// A Go expression whose string value is written to the sink.
    /// Always gets its own write call.
    Expr(String),
    /// Go statements spliced verbatim into the function body.
    Code(String),
}

impl Chunk {
    pub fn literal(data: impl Into<String>) -> Self {
        Chunk::Literal(data.into())
    }

    pub fn expr(data: impl Into<String>) -> Self {
        Chunk::Expr(data.into())
    }

    pub fn code(data: impl Into<String>) -> Self {
        Chunk::Code(data.into())
    }

    /// True if the chunk produces output at render time.
    pub fn is_writable(&self) -> bool {
        !matches!(self, Chunk::Code(_))
    }

    /// True if the chunk may be concatenated with neighbouring literals.
    pub fn is_mergeable(&self) -> bool {
        matches!(self, Chunk::Literal(_))
    }

    pub fn data(&self) -> &str {
        match self {
            Chunk::Literal(s) | Chunk::Expr(s) | Chunk::Code(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }
}
