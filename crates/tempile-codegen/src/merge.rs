//! Coalesces runs of literal chunks so the render function issues one
//! write per run instead of one per node.

use crate::chunk::Chunk;

/// Merge adjacent `Literal` chunks. `Expr` and `Code` chunks are kept in
/// place and break runs. Empty chunks are dropped.
#[tracing::instrument(skip_all, fields(chunks = chunks.len()))]
pub fn merge(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut merged = Vec::with_capacity(chunks.len());
    let mut buffer = String::new();

    for chunk in chunks {
        if chunk.is_empty() {
            continue;
        }

        match chunk {
            Chunk::Literal(text) => buffer.push_str(&text),
            other => {
                flush(&mut buffer, &mut merged);
                merged.push(other);
            }
        }
    }

    flush(&mut buffer, &mut merged);
    tracing::debug!(merged = merged.len(), "merged literal chunks");
    merged
}

fn flush(buffer: &mut String, merged: &mut Vec<Chunk>) {
    if !buffer.is_empty() {
        merged.push(Chunk::Literal(std::mem::take(buffer)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_merge_basic() {
        let merged = merge(vec![
            Chunk::literal("a"),
            Chunk::literal("b"),
            Chunk::code("X"),
            Chunk::literal("c"),
        ]);
        assert_eq!(
            merged,
            vec![Chunk::literal("ab"), Chunk::code("X"), Chunk::literal("c")]
        );
    }

    #[test]
    fn test_expr_breaks_run() {
        let merged = merge(vec![
            Chunk::literal("<p>"),
            Chunk::expr("v"),
            Chunk::literal("</p>"),
            Chunk::literal("\n"),
        ]);
        assert_eq!(
            merged,
            vec![Chunk::literal("<p>"), Chunk::expr("v"), Chunk::literal("</p>\n")]
        );
    }

    #[test]
    fn test_empty_chunks_skipped() {
        let merged = merge(vec![
            Chunk::literal(""),
            Chunk::literal("a"),
            Chunk::code(""),
            Chunk::literal("b"),
        ]);
        assert_eq!(merged, vec![Chunk::literal("ab")]);
        assert!(merge(Vec::new()).is_empty());
    }

    fn chunk_strategy() -> impl Strategy<Value = Chunk> {
        prop_oneof![
            "[a-z<>/ ]{0,4}".prop_map(Chunk::Literal),
            "[a-z.]{1,4}".prop_map(Chunk::Expr),
            "[a-z{}]{1,4}".prop_map(Chunk::Code),
        ]
    }

    fn written(chunks: &[Chunk]) -> String {
        chunks
            .iter()
            .filter(|c| c.is_writable())
            .map(Chunk::data)
            .collect()
    }

    fn non_literals(chunks: &[Chunk]) -> Vec<Chunk> {
        chunks
            .iter()
            .filter(|c| !c.is_mergeable() && !c.is_empty())
            .cloned()
            .collect()
    }

    proptest! {
        #[test]
        fn merge_preserves_output_and_order(chunks in prop::collection::vec(chunk_strategy(), 0..24)) {
            let merged = merge(chunks.clone());
            prop_assert_eq!(written(&merged), written(&chunks));
            prop_assert_eq!(non_literals(&merged), non_literals(&chunks));
        }

        #[test]
        fn merge_leaves_no_adjacent_literals(chunks in prop::collection::vec(chunk_strategy(), 0..24)) {
            let merged = merge(chunks);
            for pair in merged.windows(2) {
                prop_assert!(!(pair[0].is_mergeable() && pair[1].is_mergeable()));
            }
            prop_assert!(merged.iter().all(|c| !c.is_empty()));
        }

        #[test]
        fn merge_is_idempotent(chunks in prop::collection::vec(chunk_strategy(), 0..24)) {
            let once = merge(chunks);
            prop_assert_eq!(merge(once.clone()), once);
        }
    }
}
