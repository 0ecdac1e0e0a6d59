//! `if`/`elseif`/`else` and `for` lowering.
//!
//! Condition and loop-header text is copied into the Go statement as is.
//! The only check made here is that the clause exists at all.

use tempile_ast::{find_clause, Attribute, Else, ElseIf, For, If, Pos};

use crate::chunk::Chunk;
use crate::lower::lower_nodes;
use crate::tracker::Tracker;
use crate::LowerError;

/// Clause carrying the boolean expression of `if` and `elseif`.
pub const COND_CLAUSE: &str = "go-cond";
/// Clause carrying the header of a `for` loop.
pub const LOOP_CLAUSE: &str = "go-loop";

fn require_clause<'a>(
    attrs: &'a [Attribute],
    clause: &'static str,
    element: &'static str,
    pos: &Pos,
) -> Result<&'a str, LowerError> {
    find_clause(attrs, clause).ok_or_else(|| LowerError {
        clause,
        element,
        pos: pos.clone(),
    })
}

/// ```text
/// if <cond> {
///     ...then
/// }else if <cond> {
///     ...
/// }else {
///     ...
/// }
/// ```
pub(crate) fn lower_if(
    node: &If,
    tracker: &mut Tracker,
    out: &mut Vec<Chunk>,
) -> Result<(), LowerError> {
    let cond = require_clause(&node.conds, COND_CLAUSE, "if", &node.pos)?;

    out.push(Chunk::Code(format!("if {cond} {{\n")));
    lower_nodes(&node.then, tracker, out)?;
    // No newline: a following `else` must stay on the closing brace's line.
    out.push(Chunk::code("}"));

    for branch in &node.else_ifs {
        lower_else_if(branch, tracker, out)?;
    }

    if let Some(branch) = &node.else_branch {
        lower_else(branch, tracker, out)?;
    }

    out.push(Chunk::code("\n"));
    Ok(())
}

fn lower_else_if(
    node: &ElseIf,
    tracker: &mut Tracker,
    out: &mut Vec<Chunk>,
) -> Result<(), LowerError> {
    let cond = require_clause(&node.conds, COND_CLAUSE, "elseif", &node.pos)?;

    out.push(Chunk::Code(format!("else if {cond} {{\n")));
    lower_nodes(&node.children, tracker, out)?;
    out.push(Chunk::code("}"));
    Ok(())
}

fn lower_else(
    node: &Else,
    tracker: &mut Tracker,
    out: &mut Vec<Chunk>,
) -> Result<(), LowerError> {
    out.push(Chunk::code("else {\n"));
    lower_nodes(&node.children, tracker, out)?;
    out.push(Chunk::code("}"));
    Ok(())
}

pub(crate) fn lower_for(
    node: &For,
    tracker: &mut Tracker,
    out: &mut Vec<Chunk>,
) -> Result<(), LowerError> {
    let header = require_clause(&node.loops, LOOP_CLAUSE, "for", &node.pos)?;

    out.push(Chunk::Code(format!("for {header} {{\n")));
    lower_nodes(&node.children, tracker, out)?;
    out.push(Chunk::code("}\n"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lower::lower;
    use pretty_assertions::assert_eq;
    use tempile_ast::{Element, Node};

    fn code_of(chunks: &[Chunk]) -> String {
        chunks.iter().map(Chunk::data).collect()
    }

    fn flag_if() -> If {
        If {
            conds: vec![Attribute::new("go-cond", "data.Flag")],
            then: vec![Node::text("Yes")],
            else_ifs: vec![ElseIf {
                conds: vec![Attribute::new("go-cond", "data.OtherFlag")],
                children: vec![Node::text("Maybe")],
                pos: Pos::new("test.html", 3, 1),
            }],
            else_branch: Some(Else {
                children: vec![Node::text("No")],
                pos: Pos::new("test.html", 5, 1),
            }),
            pos: Pos::new("test.html", 1, 1),
        }
    }

    // =========================================================================
    // if / elseif / else
    // =========================================================================

    #[test]
    fn test_if_elseif_else_sequence() {
        let mut tracker = Tracker::new();
        let chunks = lower(&Node::If(flag_if()), &mut tracker).unwrap();
        assert_eq!(
            chunks,
            vec![
                Chunk::code("if data.Flag {\n"),
                Chunk::literal("Yes"),
                Chunk::code("}"),
                Chunk::code("else if data.OtherFlag {\n"),
                Chunk::literal("Maybe"),
                Chunk::code("}"),
                Chunk::code("else {\n"),
                Chunk::literal("No"),
                Chunk::code("}"),
                Chunk::code("\n"),
            ]
        );
    }

    #[test]
    fn test_if_contains_each_branch_in_order() {
        let code = code_of(&lower(&Node::If(flag_if()), &mut Tracker::new()).unwrap());
        let a = code.find("if data.Flag {").unwrap();
        let b = code.find("else if data.OtherFlag {").unwrap();
        let c = code.find("else {").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_if_without_branches() {
        let node = If {
            conds: vec![Attribute::new("go-cond", "len(data) > 0")],
            then: vec![Node::text("x")],
            ..If::default()
        };
        let code = code_of(&lower(&Node::If(node), &mut Tracker::new()).unwrap());
        assert_eq!(code, "if len(data) > 0 {\nx}\n");
    }

    #[test]
    fn test_if_missing_cond() {
        let node = If {
            conds: vec![Attribute::new("class", "x")],
            then: vec![Node::text("Yes")],
            pos: Pos::new("page.html", 7, 3),
            ..If::default()
        };
        let err = lower(&Node::If(node), &mut Tracker::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing go-cond in \"if\" element. file: page.html line: 7 col: 3"
        );
    }

    #[test]
    fn test_elseif_missing_cond_aborts_whole_if() {
        let mut node = flag_if();
        node.else_ifs[0].conds.clear();
        let err = lower(&Node::If(node), &mut Tracker::new()).unwrap_err();
        assert_eq!(err.element, "elseif");
        assert_eq!(err.pos, Pos::new("test.html", 3, 1));
    }

    #[test]
    fn test_nested_error_propagates_through_element() {
        let node = Node::Element(Element {
            tag: "ul".into(),
            children: vec![Node::For(For {
                pos: Pos::new("list.html", 2, 5),
                ..For::default()
            })],
            ..Element::default()
        });
        let err = lower(&node, &mut Tracker::new()).unwrap_err();
        assert_eq!(err.clause, LOOP_CLAUSE);
        assert_eq!(err.pos.line, 2);
    }

    #[test]
    fn test_orphan_else_has_no_output() {
        let node = Node::Else(Else {
            children: vec![Node::text("No")],
            pos: Pos::default(),
        });
        assert!(lower(&node, &mut Tracker::new()).unwrap().is_empty());
    }

    // =========================================================================
    // for
    // =========================================================================

    #[test]
    fn test_for_loop() {
        let node = For {
            loops: vec![Attribute::new("go-loop", "i, v := range data.Items")],
            children: vec![Node::text("Item")],
            pos: Pos::new("test.html", 1, 1),
        };
        let chunks = lower(&Node::For(node), &mut Tracker::new()).unwrap();
        assert_eq!(
            chunks,
            vec![
                Chunk::code("for i, v := range data.Items {\n"),
                Chunk::literal("Item"),
                Chunk::code("}\n"),
            ]
        );
    }

    #[test]
    fn test_for_missing_loop() {
        let node = For {
            loops: vec![Attribute::new("go-loop", "")],
            children: vec![Node::text("Item")],
            pos: Pos::new("test.html", 9, 2),
        };
        let err = lower(&Node::For(node), &mut Tracker::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing go-loop in \"for\" element. file: test.html line: 9 col: 2"
        );
    }
}
