//! API request and response types

use crate::store::DocumentMeta;
use serde::{Deserialize, Serialize};

/// Request to ask a question about an uploaded document
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub document_id: String,
    pub question: String,
}

/// Response carrying the model's answer
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Response for a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub document_id: String,
    pub message: String,
}

/// Response with all stored documents
#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentMeta>,
}

/// Response for the service-info root route
#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    pub message: String,
    pub version: String,
    pub endpoints: ServiceEndpoints,
}

/// Endpoint map advertised by the root route
#[derive(Debug, Serialize)]
pub struct ServiceEndpoints {
    pub upload_document: String,
    pub ask_question: String,
    pub list_documents: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
