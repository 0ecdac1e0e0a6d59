//! Go program assembly.
//!
//! Turns merged chunks into the body of the render function and wraps it
//! in the fixed file layout: package clause, imports, function.

use std::fmt::Write;

use crate::chunk::Chunk;
use crate::tracker::Tracker;

/// Assemble the unformatted Go source for one template.
#[tracing::instrument(skip_all, fields(package = package_name, func = template_name))]
pub fn assemble(
    chunks: &[Chunk],
    tracker: &Tracker,
    package_name: &str,
    template_name: &str,
) -> String {
    let mut body = String::new();
    for chunk in chunks {
        match chunk {
            Chunk::Literal(text) => guarded_write(&mut body, &go_string_literal(text)),
            Chunk::Expr(expr) => guarded_write(&mut body, expr),
            Chunk::Code(code) => body.push_str(code),
        }
    }

    let imports = tracker.imports();
    tracing::debug!(imports = imports.len(), body_len = body.len(), "assembled program");

    let mut import_block = String::new();
    for import in imports {
        let _ = writeln!(import_block, "\t\"{import}\"");
    }

    format!(
        "package {package_name}\n\
         \n\
         import (\n\
         \t\"io\"\n\
         {import_block}\
         )\n\
         \n\
         func {template_name}(w io.Writer, data map[string]any) error {{\n\
         \tvar err error\n\
         \n\
         {body}\
         \n\
         \treturn err\n\
         }}\n"
    )
}

/// Write `arg` and return from the render function if the write fails.
fn guarded_write(out: &mut String, arg: &str) {
    let _ = writeln!(
        out,
        "if _, err = io.WriteString(w, {arg}); err != nil {{ return err }}"
    );
}

/// Quote `text` as a Go string literal.
///
/// Raw (backtick) strings are preferred. They cannot contain a backtick and
/// silently lose carriage returns. Go source may not contain NUL or a
/// byte-order mark at all. Such text is written as an interpreted literal
/// instead.
pub fn go_string_literal(text: &str) -> String {
    if text.contains(['`', '\r', '\0', '\u{feff}']) {
        go_quote(text)
    } else {
        format!("`{text}`")
    }
}

/// Quote `text` as an interpreted Go string literal (`"..."`).
pub fn go_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{feff}' => out.push_str("\\ufeff"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
