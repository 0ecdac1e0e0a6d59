//! Formatting of the assembled Go source.
//!
//! The compiler hands its raw output to a [`Formatter`] and surfaces any
//! failure as a compile error: unformattable output means lowering
//! produced broken Go.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Formatting error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("format error: {message}")]
pub struct FormatError {
    pub message: String,
}

impl FormatError {
    fn at(line: usize, message: impl std::fmt::Display) -> Self {
        Self {
            message: format!("line {line}: {message}"),
        }
    }
}

/// Canonicalizes Go source, failing if it is not well formed.
pub trait Formatter {
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

impl<F> Formatter for F
where
    F: Fn(&str) -> Result<String, FormatError>,
{
    fn format(&self, source: &str) -> Result<String, FormatError> {
        self(source)
    }
}

// =========================================================================
// gofmt
// =========================================================================

/// Runs the source through an external `gofmt` binary.
#[derive(Debug, Clone)]
pub struct Gofmt {
    pub binary: PathBuf,
}

impl Gofmt {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for Gofmt {
    fn default() -> Self {
        Self::new("gofmt")
    }
}

impl Formatter for Gofmt {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let spawn_error = |e: std::io::Error| FormatError {
            message: format!("running {}: {e}", self.binary.display()),
        };

        let mut child = Command::new(&self.binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // gofmt reads all of stdin before writing, so this cannot deadlock.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(spawn_error)?;
        }

        let output = child.wait_with_output().map_err(spawn_error)?;
        if !output.status.success() {
            return Err(FormatError {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| FormatError {
            message: format!("gofmt produced invalid UTF-8: {e}"),
        })
    }
}

// =========================================================================
// Built-in re-indenter
// =========================================================================

/// Formatter that needs no Go toolchain.
///
/// Checks that brackets balance, that string, rune and comment literals
/// are terminated and that no NUL or stray byte-order mark is present,
/// then re-indents every line with tabs by bracket depth. Trailing whitespace goes, runs of blank lines collapse to
/// one, and the file ends with a single newline. Lines that continue a raw
/// string or block comment are copied unchanged.
///
/// This is a lexical check only. It does not parse Go, so output such as
/// `io.WriteString(w, )` is accepted. Use [`Gofmt`] where the generated
/// program must be known to be syntactically valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reindent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lex {
    Code,
    RawString,
    BlockComment,
}

impl Formatter for Reindent {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let mut out = String::with_capacity(source.len());
        let mut stack: Vec<(char, usize)> = Vec::new();
        let mut state = Lex::Code;
        let mut pending_blank = false;
        let mut last_line = 0;

        if let Some((offset, c)) = source
            .char_indices()
            .find(|&(i, c)| c == '\0' || (c == '\u{feff}' && i > 0))
        {
            let line = source[..offset].matches('\n').count() + 1;
            let what = if c == '\0' {
                "illegal character NUL"
            } else {
                "invalid BOM in the middle of the file"
            };
            return Err(FormatError::at(line, what));
        }

        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;
            last_line = line_no;

            if state != Lex::Code {
                state = scan_line(line, state, &mut stack, line_no)?;
                out.push_str(line);
                out.push('\n');
                continue;
            }

            let text = line.trim_start();
            if text.trim_end().is_empty() {
                pending_blank = !out.is_empty();
                continue;
            }
            if pending_blank {
                out.push('\n');
                pending_blank = false;
            }

            let closers = text
                .chars()
                .take_while(|c| matches!(c, '}' | ')' | ']'))
                .count();
            let depth = stack.len().saturating_sub(closers);

            state = scan_line(text, Lex::Code, &mut stack, line_no)?;
            // Trailing spaces inside an open raw string are content.
            let text = if state == Lex::RawString {
                text
            } else {
                text.trim_end()
            };

            out.extend(std::iter::repeat('\t').take(depth));
            out.push_str(text);
            out.push('\n');
        }

        match state {
            Lex::RawString => {
                return Err(FormatError::at(last_line, "raw string literal not terminated"))
            }
            Lex::BlockComment => return Err(FormatError::at(last_line, "comment not terminated")),
            Lex::Code => {}
        }
        if let Some((open, line)) = stack.last() {
            return Err(FormatError::at(*line, format!("'{open}' is never closed")));
        }

        Ok(out)
    }
}

/// Scan one line, updating the bracket stack. Returns the lexer state at
/// the end of the line.
fn scan_line(
    text: &str,
    mut state: Lex,
    stack: &mut Vec<(char, usize)>,
    line_no: usize,
) -> Result<Lex, FormatError> {
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Lex::RawString => {
                if c == '`' {
                    state = Lex::Code;
                }
            }
            Lex::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = Lex::Code;
                }
            }
            Lex::Code => match c {
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = Lex::BlockComment;
                }
                '`' => state = Lex::RawString,
                '"' | '\'' => {
                    if !skip_quoted(&mut chars, c) {
                        let what = if c == '"' { "string" } else { "rune" };
                        return Err(FormatError::at(
                            line_no,
                            format!("{what} literal not terminated"),
                        ));
                    }
                }
                '(' | '[' | '{' => stack.push((c, line_no)),
                ')' | ']' | '}' => {
                    let expected = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match stack.pop() {
                        Some((open, _)) if open == expected => {}
                        Some((open, opened_on)) => {
                            return Err(FormatError::at(
                                line_no,
                                format!("unexpected '{c}', '{open}' from line {opened_on} is still open"),
                            ))
                        }
                        None => return Err(FormatError::at(line_no, format!("unexpected '{c}'"))),
                    }
                }
                _ => {}
            },
        }
    }

    Ok(state)
}

/// Consume an interpreted string or rune body up to its closing quote.
fn skip_quoted(chars: &mut impl Iterator<Item = char>, quote: char) -> bool {
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return true;
        }
    }
    false
}
