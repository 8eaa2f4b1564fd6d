//! HTTP backend for ask requests
//!
//! `AskBackend` is the session's only seam to the outside world; the
//! production implementation talks to the server's `/api/ask` route.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generous ceiling; the server itself waits on the model provider.
const ASK_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AskError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response payload: {0}")]
    Payload(String),
}

/// Sends a question about a document and returns the answer text.
#[async_trait]
pub trait AskBackend: Send + Sync {
    async fn ask(&self, document_id: &str, question: &str) -> Result<String, AskError>;
}

#[async_trait]
impl<T: AskBackend + ?Sized> AskBackend for Arc<T> {
    async fn ask(&self, document_id: &str, question: &str) -> Result<String, AskError> {
        (**self).ask(document_id, question).await
    }
}

/// `AskBackend` over the document Q&A server's HTTP API.
#[derive(Clone)]
pub struct HttpAskBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAskBackend {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(ASK_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AskBackend for HttpAskBackend {
    async fn ask(&self, document_id: &str, question: &str) -> Result<String, AskError> {
        let url = format!("{}/api/ask", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&AskPayload {
                question,
                document_id,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AskError::Timeout
                } else {
                    AskError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(AskError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: AnswerBody = response
            .json()
            .await
            .map_err(|e| AskError::Payload(e.to_string()))?;
        Ok(body.answer)
    }
}

// Ask API types

#[derive(Debug, Serialize)]
struct AskPayload<'a> {
    question: &'a str,
    document_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnswerBody {
    answer: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}
