//! Groq provider, speaking the OpenAI-compatible chat completions API

use super::types::{CompletionRequest, CompletionResponse, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hosted Groq endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub struct GroqService {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GroqService {
    /// `base_url` replaces the hosted endpoint prefix (everything
    /// before `/chat/completions`) when set.
    pub fn new(api_key: String, model: String, base_url: Option<&str>) -> Self {
        let endpoint = format!(
            "{}/chat/completions",
            base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/')
        );

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            model,
            endpoint,
        }
    }

    fn translate_request(&self, request: &CompletionRequest) -> GroqRequest {
        GroqRequest {
            model: self.model.clone(),
            messages: vec![
                GroqMessage {
                    role: "system".to_string(),
                    content: Some(request.system.clone()),
                },
                GroqMessage {
                    role: "user".to_string(),
                    content: Some(request.user.clone()),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }

    fn classify_status(
        status: StatusCode,
        message: String,
        retry_after: Option<Duration>,
    ) -> LlmError {
        match status.as_u16() {
            401 | 403 => LlmError::auth(format!("Authentication failed: {message}")),
            429 => {
                let mut error = LlmError::rate_limit(format!("Rate limit exceeded: {message}"));
                error.retry_after = retry_after;
                error
            }
            400..=499 => LlmError::invalid_request(format!("Invalid request: {message}")),
            500..=599 => LlmError::server_error(format!("Server error: {message}")),
            _ => LlmError::unknown(format!("HTTP {status}: {message}")),
        }
    }

    fn normalize_response(resp: GroqResponse) -> Result<CompletionResponse, LlmError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::unknown("No choices in response"))?;

        Ok(CompletionResponse {
            text: choice.message.content.unwrap_or_default(),
            usage: Usage {
                input_tokens: u64::from(resp.usage.prompt_tokens),
                output_tokens: u64::from(resp.usage.completion_tokens),
            },
        })
    }
}

#[async_trait]
impl LlmService for GroqService {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let groq_request = self.translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&groq_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::timeout(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {e}"))
                } else {
                    LlmError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<GroqErrorResponse>(&body) {
                Ok(error_resp) => error_resp.error.message,
                Err(_) => body,
            };
            return Err(Self::classify_status(status, message, retry_after));
        }

        let groq_response: GroqResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Self::normalize_response(groq_response)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

// Groq API types

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
    usage: GroqUsage,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqMessage,
    #[allow(dead_code)] // Part of the API response, not consumed
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GroqErrorResponse {
    error: GroqErrorBody,
}

#[derive(Debug, Deserialize)]
struct GroqErrorBody {
    message: String,
}
