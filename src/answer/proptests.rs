//! Property tests for chunking and context selection

use super::chunk::{chunk_text, MAX_CHUNK_CHARS};
use super::relevance::select_chunks;
use proptest::prelude::*;

fn arb_document() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{1,12}[.!?]?", 0..300).prop_map(|words| words.join(" "))
}

fn arb_question() -> impl Strategy<Value = String> {
    "[a-z ]{0,40}"
}

/// True if the chunk contains a sentence boundary the chunker could
/// have split at.
fn has_internal_split_point(chunk: &str) -> bool {
    chunk
        .chars()
        .zip(chunk.chars().skip(1))
        .any(|(c, next)| matches!(c, '.' | '!' | '?') && next.is_whitespace())
}

proptest! {
    #[test]
    fn chunks_respect_the_limit_unless_unbreakable(doc in arb_document()) {
        for chunk in chunk_text(&doc) {
            if chunk.chars().count() > MAX_CHUNK_CHARS {
                prop_assert!(!has_internal_split_point(&chunk));
            }
        }
    }

    #[test]
    fn chunking_preserves_every_word(doc in arb_document()) {
        let chunks = chunk_text(&doc);
        let rebuilt: Vec<&str> = chunks.iter().flat_map(|c| c.split_whitespace()).collect();
        let original: Vec<&str> = doc.split_whitespace().collect();
        prop_assert_eq!(rebuilt, original);
    }

    #[test]
    fn chunks_are_never_blank(doc in arb_document()) {
        for chunk in chunk_text(&doc) {
            prop_assert!(!chunk.trim().is_empty());
        }
    }

    #[test]
    fn selected_context_fits_the_budget(doc in arb_document(), question in arb_question()) {
        let chunks = chunk_text(&doc);
        let selected = select_chunks(&chunks, &question);
        let total: usize = selected.iter().map(|c| c.chars().count()).sum();
        prop_assert!(total <= 4000);
    }

    #[test]
    fn selection_preserves_document_order(doc in arb_document(), question in arb_question()) {
        let chunks = chunk_text(&doc);
        let selected = select_chunks(&chunks, &question);

        // Each selected item is a chunk (or a truncated prefix of one)
        // appearing strictly after the previous selection.
        let mut cursor = 0;
        for item in &selected {
            let pos = chunks[cursor..]
                .iter()
                .position(|c| c == item || c.starts_with(item.as_str()));
            prop_assert!(pos.is_some(), "selected item not found in document order");
            cursor += pos.unwrap() + 1;
        }
    }
}
