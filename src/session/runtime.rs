//! Session event loop
//!
//! Owns the state, applies effects in order, and feeds ask completions
//! back in as events. Network calls run on spawned tasks so the loop
//! itself never blocks; the `Submitting` state is what keeps a second
//! question from starting while one is in flight.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

use super::http::AskBackend;
use super::notify::Notifier;
use super::state::{SessionContext, SessionState, Turn};
use super::transition::transition;
use super::{Effect, Event};

const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Observable changes pushed to handle subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    TurnAppended(Turn),
    TranscriptCleared,
    StateChanged(SessionState),
}

#[derive(Debug, Error)]
#[error("session task has shut down")]
pub struct SessionClosed;

/// The running half of a session. Create with [`ChatSession::new`],
/// then drive it with [`ChatSession::run`] on its own task.
pub struct ChatSession<B, N> {
    state: SessionState,
    context: SessionContext,
    transcript: Arc<Mutex<Vec<Turn>>>,
    backend: B,
    notifier: N,
    // Weak so the loop ends once every handle is gone.
    event_tx: mpsc::WeakUnboundedSender<Event>,
    event_rx: mpsc::UnboundedReceiver<Event>,
    update_tx: broadcast::Sender<SessionUpdate>,
}

/// Cheap-to-clone front for submitting input and observing updates.
#[derive(Clone)]
pub struct SessionHandle {
    event_tx: mpsc::UnboundedSender<Event>,
    update_tx: broadcast::Sender<SessionUpdate>,
    transcript: Arc<Mutex<Vec<Turn>>>,
}

impl<B, N> ChatSession<B, N>
where
    B: AskBackend + Clone + Send + Sync + 'static,
    N: Notifier,
{
    pub fn new(backend: B, notifier: N) -> (Self, SessionHandle) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let transcript = Arc::new(Mutex::new(Vec::new()));

        let handle = SessionHandle {
            event_tx,
            update_tx: update_tx.clone(),
            transcript: Arc::clone(&transcript),
        };
        let session = Self {
            state: SessionState::Idle,
            context: SessionContext::default(),
            transcript,
            backend,
            notifier,
            event_tx: handle.event_tx.downgrade(),
            event_rx,
            update_tx,
        };
        (session, handle)
    }

    /// Drive the session until every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
        }
    }

    fn process_event(&mut self, event: Event) {
        tracing::debug!(state = ?self.state, event = ?event, "session event");
        let result = transition(&self.state, &self.context, event);
        let state_changed = result.new_state != self.state;
        self.state = result.new_state;

        for effect in result.effects {
            self.apply_effect(effect);
        }
        // Emitted after the effects so a subscriber seeing Idle has
        // the complete transcript for the turn.
        if state_changed {
            let _ = self
                .update_tx
                .send(SessionUpdate::StateChanged(self.state));
        }
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendTurn(turn) => {
                self.transcript
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(turn.clone());
                let _ = self.update_tx.send(SessionUpdate::TurnAppended(turn));
            }
            Effect::ClearTranscript => {
                self.transcript
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clear();
                let _ = self.update_tx.send(SessionUpdate::TranscriptCleared);
            }
            Effect::SetDocument(id) => {
                tracing::info!(document_id = %id, "active document changed");
                self.context.document_id = Some(id);
            }
            Effect::SendAsk {
                question,
                document_id,
            } => self.spawn_ask(question, document_id),
            Effect::Notify(notice) => self.notifier.notify(notice),
        }
    }

    fn spawn_ask(&self, question: String, document_id: String) {
        let backend = self.backend.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match backend.ask(&document_id, &question).await {
                Ok(answer) => Event::AskSucceeded { answer },
                Err(error) => {
                    tracing::warn!(error = %error, "ask request failed");
                    Event::AskFailed { error }
                }
            };
            // The session may already be gone; the answer has nowhere
            // to go then.
            if let Some(tx) = event_tx.upgrade() {
                let _ = tx.send(event);
            }
        });
    }
}

impl SessionHandle {
    /// Queue a line of user input.
    pub fn submit(&self, text: impl Into<String>) -> Result<(), SessionClosed> {
        self.event_tx
            .send(Event::InputSubmitted { text: text.into() })
            .map_err(|_| SessionClosed)
    }

    /// Queue a document selection.
    pub fn select_document(&self, id: impl Into<String>) -> Result<(), SessionClosed> {
        self.event_tx
            .send(Event::DocumentSelected { id: id.into() })
            .map_err(|_| SessionClosed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.update_tx.subscribe()
    }

    /// Snapshot of the transcript so far.
    pub fn transcript(&self) -> Vec<Turn> {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
