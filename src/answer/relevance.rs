//! Keyword-based relevance scoring and chunk selection
//!
//! Each chunk is scored against the question's keywords; the best
//! chunks and their immediate neighbors are selected, restored to
//! document order, and trimmed to a context budget.

use std::collections::BTreeSet;

/// At most this many chunks are picked by score. Neighbor pull-in can
/// add a couple more.
const MAX_CHUNKS: usize = 8;

/// Character budget for the assembled context.
const MAX_CONTEXT_CHARS: usize = 4000;

/// A truncated final chunk shorter than this is dropped instead.
const MIN_PARTIAL_CHARS: usize = 100;

/// Chunks scoring above this pull in their neighbors for continuity.
const NEIGHBOR_THRESHOLD: f64 = 0.1;

const STOP_WORDS: &[&str] = &[
    "what", "when", "where", "who", "why", "how", "is", "are", "the", "a", "an", "in", "on", "at",
    "to", "for", "of", "with", "by",
];

/// Questions mentioning one of these get a boost for chunks carrying
/// document metadata.
const METADATA_TERMS: &[&str] = &[
    "title",
    "author",
    "authors",
    "written",
    "published",
    "publication",
    "copyright",
    "version",
    "edition",
    "year",
];

/// Pick the most relevant chunks for `question`, in document order,
/// within the context budget.
pub fn select_chunks(chunks: &[String], question: &str) -> Vec<String> {
    let keywords = extract_keywords(question);
    let mut ranked = score_chunks(chunks, &keywords);
    // Descending score; on ties, later chunks first.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    let mut selected: BTreeSet<usize> = BTreeSet::new();
    for &(idx, score) in &ranked {
        if selected.len() >= MAX_CHUNKS {
            break;
        }
        if selected.insert(idx) && score > NEIGHBOR_THRESHOLD {
            if idx > 0 {
                selected.insert(idx - 1);
            }
            if idx + 1 < chunks.len() {
                selected.insert(idx + 1);
            }
        }
    }

    // BTreeSet iteration restores document order.
    let mut result = Vec::new();
    let mut total_chars = 0usize;
    for idx in selected {
        let chunk = &chunks[idx];
        let chunk_chars = chunk.chars().count();
        if total_chars + chunk_chars <= MAX_CONTEXT_CHARS {
            result.push(chunk.clone());
            total_chars += chunk_chars;
        } else {
            let remaining = MAX_CONTEXT_CHARS - total_chars;
            if remaining > MIN_PARTIAL_CHARS {
                result.push(chunk.chars().take(remaining).collect());
            }
            break;
        }
    }
    result
}

/// Lowercased word tokens of the question minus stop words, in first
/// occurrence order.
pub(crate) fn extract_keywords(question: &str) -> Vec<String> {
    let lowered = question.to_lowercase();
    let mut seen = BTreeSet::new();
    lowered
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|word| !word.is_empty())
        .filter(|word| !STOP_WORDS.contains(word))
        .filter(|word| seen.insert(word.to_string()))
        .map(ToString::to_string)
        .collect()
}

/// Score every chunk against `keywords`, keeping original indexes.
pub(crate) fn score_chunks(chunks: &[String], keywords: &[String]) -> Vec<(usize, f64)> {
    let is_metadata_question = keywords.iter().any(|k| METADATA_TERMS.contains(&k.as_str()));

    let lowered: Vec<String> = chunks.iter().map(|c| c.to_lowercase()).collect();
    let word_counts: Vec<usize> = lowered.iter().map(|c| c.split_whitespace().count()).collect();

    let mut scores = Vec::new();
    for (i, chunk_lower) in lowered.iter().enumerate() {
        let word_count = word_counts[i];
        if word_count == 0 {
            continue;
        }

        // Keywords appearing anywhere in the chunk.
        let exact_matches = keywords
            .iter()
            .filter(|k| chunk_lower.contains(k.as_str()))
            .count();

        // Keyword/word pairs where one contains the other.
        let partial_matches: usize = keywords
            .iter()
            .map(|keyword| {
                chunk_lower
                    .split_whitespace()
                    .filter(|word| word.contains(keyword.as_str()) || keyword.contains(word))
                    .count()
            })
            .sum();

        let density = exact_matches as f64 / word_count as f64;
        let partial_score = partial_matches as f64 / word_count as f64;

        let mut context_score = 0.0;
        if i > 0 {
            context_score += keyword_density(&lowered[i - 1], word_counts[i - 1], keywords);
        }
        if i + 1 < lowered.len() {
            context_score += keyword_density(&lowered[i + 1], word_counts[i + 1], keywords);
        }
        context_score /= 2.0;

        let metadata_score = if is_metadata_question {
            let matches = METADATA_TERMS
                .iter()
                .filter(|term| chunk_lower.contains(**term))
                .count();
            matches as f64 / word_count as f64
        } else {
            0.0
        };

        let score =
            density * 0.4 + partial_score * 0.2 + context_score * 0.2 + metadata_score * 0.2;
        scores.push((i, score));
    }
    scores
}

fn keyword_density(chunk_lower: &str, word_count: usize, keywords: &[String]) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    let matches = keywords
        .iter()
        .filter(|k| chunk_lower.contains(k.as_str()))
        .count();
    matches as f64 / word_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(texts: &[&str]) -> Vec<String> {
        texts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn keywords_drop_stop_words() {
        assert_eq!(
            extract_keywords("What is the capital of France?"),
            vec!["capital", "france"]
        );
    }

    #[test]
    fn keywords_are_deduplicated() {
        assert_eq!(extract_keywords("port, port, PORT!"), vec!["port"]);
    }

    #[test]
    fn matching_chunk_outranks_unrelated_ones() {
        let docs = chunks(&[
            "The weather today is sunny and warm.",
            "Ownership rules in Rust prevent data races.",
            "Pasta should boil for nine minutes.",
        ]);
        let keywords = extract_keywords("How does ownership work in Rust?");
        let scores = score_chunks(&docs, &keywords);

        let best = scores
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|&(i, _)| i);
        assert_eq!(best, Some(1));
    }

    #[test]
    fn high_scoring_chunk_pulls_in_neighbors() {
        let mut docs: Vec<String> = (0..12).map(|i| format!("plain filler text number {i}")).collect();
        docs[5] = "Ownership rules in Rust prevent data races at compile time.".to_string();

        let selected = select_chunks(&docs, "rust ownership");
        assert!(selected.contains(&docs[4]));
        assert!(selected.contains(&docs[5]));
        assert!(selected.contains(&docs[6]));

        // Selection is capped and comes back in document order.
        assert_eq!(selected.len(), MAX_CHUNKS);
        let positions: Vec<usize> = selected
            .iter()
            .map(|c| docs.iter().position(|d| d == c).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn all_stop_word_question_still_selects_chunks() {
        let docs = chunks(&["first chunk here", "second chunk here", "third chunk here"]);
        let selected = select_chunks(&docs, "what is the");
        assert_eq!(selected, docs);
    }

    #[test]
    fn metadata_question_boosts_metadata_chunk() {
        let docs = chunks(&[
            "This chapter covers networking protocols in detail today.",
            "The author is Jane Doe. Copyright notice follows below.",
        ]);
        let keywords = extract_keywords("Who is the author?");
        let scores = score_chunks(&docs, &keywords);
        assert!(scores[1].1 > scores[0].1);
    }

    #[test]
    fn overlong_tail_chunk_is_truncated() {
        let first = "a".repeat(3000);
        let second = "b".repeat(1500);
        let docs = chunks(&[&first, &second]);
        let selected = select_chunks(&docs, "anything");

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[1].chars().count(), 1000);
        let total: usize = selected.iter().map(|c| c.chars().count()).sum();
        assert_eq!(total, MAX_CONTEXT_CHARS);
    }

    #[test]
    fn tiny_tail_remainder_is_dropped() {
        let first = "a".repeat(3950);
        let second = "b".repeat(300);
        let docs = chunks(&[&first, &second]);
        let selected = select_chunks(&docs, "anything");

        // Only 50 characters of budget remain, not worth a partial chunk.
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].chars().count(), 3950);
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select_chunks(&[], "question").is_empty());
    }
}
