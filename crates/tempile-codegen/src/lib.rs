//! Tempile Go Code Generator
//!
//! Compiles a tempile template into Go source for a render function that
//! streams the template to an `io.Writer`.
//!
//! ```text
//! source → parse → resolve → lower → merge → assemble → format → Go source
//! ```
//!
//! The parser, include/slot resolver and formatter are collaborators
//! supplied by the caller; this crate owns lowering and assembly.

pub mod chunk;
pub mod control_flow;
pub mod format;
pub mod lower;
pub mod merge;
pub mod program;
pub mod tracker;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tempile_ast::{ParseError, Pos, Resolver, TemplateParser};

pub use chunk::Chunk;
pub use format::{FormatError, Formatter, Gofmt, Reindent};
pub use lower::lower;
pub use merge::merge;
pub use program::assemble;
pub use tracker::Tracker;

/// Names and paths needed to compile one template. All fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Go package clause of the generated file.
    pub package_name: String,
    /// Name of the generated render function.
    pub template_name: String,
    /// Template file name, used in diagnostics.
    pub file_name: String,
    /// Directory includes are resolved against.
    pub src_path: PathBuf,
}

impl CompileOptions {
    /// Fail on the first empty field.
    pub fn validate(&self) -> Result<(), CompileError> {
        if self.package_name.is_empty() {
            return Err(CompileError::MissingOption("package name"));
        }
        if self.template_name.is_empty() {
            return Err(CompileError::MissingOption("template name"));
        }
        if self.file_name.is_empty() {
            return Err(CompileError::MissingOption("file name"));
        }
        if self.src_path.as_os_str().is_empty() {
            return Err(CompileError::MissingOption("src path"));
        }
        Ok(())
    }
}

/// A control directive without the clause its Go statement needs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("missing {clause} in \"{element}\" element. {pos}")]
pub struct LowerError {
    /// `go-cond` or `go-loop`.
    pub clause: &'static str,
    /// `if`, `elseif` or `for`.
    pub element: &'static str,
    pub pos: Pos,
}

/// Anything that stops a template from compiling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("missing {0} in compile options")]
    MissingOption(&'static str),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Lower(#[from] LowerError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Template compiler wired to its front-end and formatter collaborators.
#[derive(Debug, Clone, Default)]
pub struct Compiler<P, R, F> {
    pub parser: P,
    pub resolver: R,
    pub formatter: F,
}

impl<P, R, F> Compiler<P, R, F>
where
    P: TemplateParser,
    R: Resolver,
    F: Formatter,
{
    pub fn new(parser: P, resolver: R, formatter: F) -> Self {
        Self {
            parser,
            resolver,
            formatter,
        }
    }

    /// Compile `source` into formatted Go source.
    pub fn compile(&self, source: &str, options: &CompileOptions) -> Result<String, CompileError> {
        compile(
            source,
            options,
            &self.parser,
            &self.resolver,
            &self.formatter,
        )
    }
}

/// Compile `source` with the given collaborators.
///
/// Stops at the first error; no partial output is returned.
#[tracing::instrument(skip_all, fields(file = %options.file_name, func = %options.template_name))]
pub fn compile<P, R, F>(
    source: &str,
    options: &CompileOptions,
    parser: &P,
    resolver: &R,
    formatter: &F,
) -> Result<String, CompileError>
where
    P: TemplateParser + ?Sized,
    R: Resolver + ?Sized,
    F: Formatter + ?Sized,
{
    options.validate()?;

    let mut doc = parser.parse(source, &options.file_name)?;
    resolver.resolve_includes(&mut doc, &options.src_path);
    resolver.match_slots_and_contents(&mut doc);

    let mut tracker = Tracker::new();
    let mut chunks = Vec::new();
    for node in &doc.children {
        chunks.extend(lower(node, &mut tracker)?);
    }
    tracing::debug!(chunks = chunks.len(), "lowered template");

    let chunks = merge(chunks);
    let program = assemble(
        &chunks,
        &tracker,
        &options.package_name,
        &options.template_name,
    );

    Ok(formatter.format(&program)?)
}
