//! Test doubles for session tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::http::{AskBackend, AskError};
use super::notify::{Notice, Notifier};

/// Scripted backend: answers and errors are served in push order.
#[derive(Clone, Default)]
pub struct MockAskBackend {
    responses: Arc<Mutex<VecDeque<Result<String, AskError>>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAskBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_answer(&self, answer: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(answer.to_string()));
    }

    pub fn push_error(&self, error: AskError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// `(document_id, question)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AskBackend for MockAskBackend {
    async fn ask(&self, document_id: &str, question: &str) -> Result<String, AskError> {
        self.calls
            .lock()
            .unwrap()
            .push((document_id.to_string(), question.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AskError::Transport("no scripted response".to_string())))
    }
}

/// Backend that blocks every ask until [`DelayedAskBackend::release`]
/// is called, for exercising the busy state.
#[derive(Clone)]
pub struct DelayedAskBackend {
    answer: String,
    release: Arc<Notify>,
}

impl DelayedAskBackend {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            release: Arc::new(Notify::new()),
        }
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl AskBackend for DelayedAskBackend {
    async fn ask(&self, _document_id: &str, _question: &str) -> Result<String, AskError> {
        self.release.notified().await;
        Ok(self.answer.clone())
    }
}

/// Notifier that records every notice for later assertions.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
