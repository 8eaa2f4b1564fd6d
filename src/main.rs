//! Document Q&A server
//!
//! Serves document upload, listing, and question answering over HTTP.

use docqa::api::{create_router, AppState};
use docqa::config::Settings;
use docqa::llm::{GroqService, LlmService, LoggingService};
use docqa::store::DocumentStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration; a missing GROQ_API_KEY is fatal
    let settings = Settings::from_env()?;

    let store = Arc::new(DocumentStore::new(
        &settings.upload_dir,
        settings.max_upload_size,
        settings.allowed_extensions.clone(),
    )?);

    let llm: Arc<dyn LlmService> = Arc::new(LoggingService::new(GroqService::new(
        settings.groq_api_key.clone(),
        settings.model.clone(),
        settings.groq_base_url.as_deref(),
    )));
    tracing::info!(model = %settings.model, "LLM provider initialized");

    let state = AppState::new(store, llm);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(
        upload_dir = %settings.upload_dir.display(),
        "Document Q&A server listening on {addr}"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
