//! LLM provider client
//!
//! `LlmService` is the seam the answer engine calls through.
//! `GroqService` is the production implementation; `LoggingService`
//! wraps any implementation with request timing and usage logging.

mod error;
mod groq;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use groq::GroqService;
pub use types::{CompletionRequest, CompletionResponse, Usage};

use async_trait::async_trait;
use std::sync::Arc;

/// Chat-completion provider abstraction
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Run a single chat completion
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Identifier of the underlying model, for logging
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: LlmService + ?Sized> LlmService for Arc<T> {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        (**self).complete(request).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Wrapper that logs every completion with timing and token usage
pub struct LoggingService<S> {
    inner: S,
}

impl<S: LlmService> LoggingService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: LlmService> LlmService for LoggingService<S> {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.inner.model_id(),
                    duration_ms = %duration.as_millis(),
                    input_tokens = %response.usage.input_tokens,
                    output_tokens = %response.usage.output_tokens,
                    "LLM request completed"
                );
            }
            Err(error) => {
                tracing::error!(
                    model = %self.inner.model_id(),
                    duration_ms = %duration.as_millis(),
                    error = %error,
                    retryable = %error.kind.is_retryable(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}
