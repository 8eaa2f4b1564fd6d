//! Request and response types for chat completion providers

/// A single-exchange chat completion request: one system message and
/// one user message.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Completion result from a provider
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text of the first choice
    pub text: String,
    pub usage: Usage,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
