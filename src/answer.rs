//! Answer engine
//!
//! Orchestrates a single question: answer-cache probe, document
//! content lookup, context selection, prompt assembly, provider call,
//! and cache fill.

mod chunk;
#[cfg(test)]
mod proptests;
mod relevance;

pub use chunk::chunk_text;
pub use relevance::select_chunks;

use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::cache::TtlCache;
use crate::llm::{CompletionRequest, LlmError, LlmService};
use crate::store::{DocumentStore, StoreError};

/// How long a computed answer stays served from cache.
const ANSWER_TTL: Duration = Duration::from_secs(3600);

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;

const SYSTEM_MESSAGE: &str = "You are a helpful assistant that provides accurate answers based \
     ONLY on the given content. Never make up information or infer details not present in the \
     content.";

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error(transparent)]
    Document(#[from] StoreError),
    #[error("provider request failed: {0}")]
    Provider(#[from] LlmError),
}

pub struct AnswerEngine {
    store: Arc<DocumentStore>,
    llm: Arc<dyn LlmService>,
    answers: TtlCache<String, String>,
}

impl AnswerEngine {
    pub fn new(store: Arc<DocumentStore>, llm: Arc<dyn LlmService>) -> Self {
        Self {
            store,
            llm,
            answers: TtlCache::new(ANSWER_TTL),
        }
    }

    /// Answer `question` from the stored document's content.
    pub async fn answer(&self, document_id: &str, question: &str) -> Result<String, AnswerError> {
        let key = cache_key(document_id, question);
        if let Some(answer) = self.answers.get(&key) {
            tracing::debug!(document_id = %document_id, "answer cache hit");
            return Ok(answer);
        }

        let content = self.store.content(document_id)?;
        let chunks = chunk_text(&content);
        let context = select_chunks(&chunks, question).join(" ");
        tracing::debug!(
            document_id = %document_id,
            chunks = chunks.len(),
            context_chars = context.chars().count(),
            "selected context"
        );

        let request = CompletionRequest {
            system: SYSTEM_MESSAGE.to_string(),
            user: build_prompt(&context, question),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let response = self.llm.complete(&request).await?;

        self.answers.insert(key, response.text.clone());
        Ok(response.text)
    }
}

/// Instruction scaffold wrapped around the selected context.
fn build_prompt(content: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant that answers questions based on the provided document \
         content. Your task is to:\n\
         1. Read the following content carefully\n\
         2. Answer the question accurately using ONLY the provided content\n\
         3. If you cannot find the answer in the content, say so\n\
         4. Do not make up or infer information not present in the content\n\
         \n\
         Important: For questions about title, author, or other metadata, look for explicit \
         mentions in the text. Do not guess or infer.\n\
         \n\
         Content:\n{content}\n\nQuestion: {question}\n\nAnswer: "
    )
}

/// SHA-256 of the document id and the normalized question, so case
/// and surrounding whitespace do not defeat the cache.
fn cache_key(document_id: &str, question: &str) -> String {
    let lowered = question.to_lowercase();
    let normalized = lowered.trim();
    format!(
        "{:x}",
        Sha256::digest(format!("{document_id}:{normalized}").as_bytes())
    )
}
