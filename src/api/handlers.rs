//! HTTP request handlers

use super::types::{
    AskRequest, AskResponse, DocumentListResponse, ErrorResponse, ServiceEndpoints,
    ServiceInfoResponse, UploadResponse,
};
use super::AppState;
use crate::answer::AnswerError;
use crate::store::StoreError;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Slack on top of the upload limit for multipart framing overhead
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.store.max_size() + MULTIPART_OVERHEAD;
    Router::new()
        // Service info
        .route("/", get(service_info))
        // Document upload
        .route("/api/upload", post(upload_document))
        // Question answering
        .route("/api/ask", post(ask_question))
        // Document listing
        .route("/api/documents", get(list_documents))
        // Version
        .route("/version", get(get_version))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

// ============================================================
// Service Info
// ============================================================

async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        message: "Welcome to Document Q&A API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ServiceEndpoints {
            upload_document: "/api/upload".to_string(),
            ask_question: "/api/ask".to_string(),
            list_documents: "/api/documents".to_string(),
        },
    })
}

// ============================================================
// Document Upload
// ============================================================

async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(ToString::to_string)
            .ok_or_else(|| AppError::BadRequest("File field has no filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        let document_id = state.store.save(&filename, &bytes)?;
        return Ok(Json(UploadResponse {
            document_id,
            message: "Document uploaded successfully".to_string(),
        }));
    }

    Err(AppError::BadRequest(
        "Missing \"file\" field in upload".to_string(),
    ))
}

// ============================================================
// Question Answering
// ============================================================

async fn ask_question(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let answer = state.engine.answer(&req.document_id, &req.question).await?;
    Ok(Json(AskResponse { answer }))
}

// ============================================================
// Document Listing
// ============================================================

async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let documents = state.store.list()?;
    Ok(Json(DocumentListResponse { documents }))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("docqa ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Upstream(String),
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(_) => AppError::NotFound(error.to_string()),
            StoreError::UnsupportedType(_) | StoreError::TooLarge { .. } => {
                AppError::BadRequest(error.to_string())
            }
            StoreError::Extract(_) => AppError::BadRequest(error.to_string()),
            StoreError::Verification | StoreError::Io(_) => AppError::Internal(error.to_string()),
        }
    }
}

impl From<AnswerError> for AppError {
    fn from(error: AnswerError) -> Self {
        match error {
            AnswerError::Document(e) => e.into(),
            AnswerError::Provider(e) => AppError::Upstream(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "upstream provider failure");
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
