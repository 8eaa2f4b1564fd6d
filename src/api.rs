//! HTTP API for the document Q&A service

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::answer::AnswerEngine;
use crate::llm::LlmService;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub engine: Arc<AnswerEngine>,
}

impl AppState {
    pub fn new(store: Arc<DocumentStore>, llm: Arc<dyn LlmService>) -> Self {
        Self {
            engine: Arc::new(AnswerEngine::new(Arc::clone(&store), llm)),
            store,
        }
    }
}
