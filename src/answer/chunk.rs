//! Sentence-boundary chunking of extracted document text

/// Target chunk size in characters. Only a single unbreakable
/// sentence may exceed it.
pub const MAX_CHUNK_CHARS: usize = 500;

/// Normalize whitespace and greedily pack sentences into chunks.
pub fn chunk_text(text: &str) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for sentence in split_sentences(&normalized) {
        let sentence_chars = sentence.chars().count();
        if current_chars + sentence_chars < MAX_CHUNK_CHARS {
            current.push_str(sentence);
            current.push(' ');
            current_chars += sentence_chars + 1;
        } else {
            if !current.is_empty() {
                chunks.push(current.trim_end().to_string());
            }
            current = format!("{sentence} ");
            current_chars = sentence_chars + 1;
        }
    }
    if !current.is_empty() {
        chunks.push(current.trim_end().to_string());
    }
    chunks
}

/// Split after `.`, `!` or `?` when followed by whitespace, keeping
/// the punctuation with the preceding sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let Some(&(_, next)) = chars.peek() else {
                continue;
            };
            if next.is_whitespace() {
                sentences.push(&text[start..i + c.len_utf8()]);
                while let Some(&(j, w)) = chars.peek() {
                    if w.is_whitespace() {
                        chars.next();
                        start = j + w.len_utf8();
                    } else {
                        start = j;
                        break;
                    }
                }
            }
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}
