//! Pure state transition function

use super::notify::Notice;
use super::state::{SessionContext, SessionState, Turn};
use super::{Effect, Event};

/// Canned assistant reply appended when an ask request fails.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function: the same state, context and event always
/// produce the same result, with no I/O.
pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> TransitionResult {
    match (state, event) {
        // ============================================================
        // User input
        // ============================================================
        (SessionState::Idle, Event::InputSubmitted { text }) => {
            let question = text.trim();
            if question.is_empty() {
                return TransitionResult::new(SessionState::Idle);
            }
            let Some(document_id) = context.document_id.clone() else {
                return TransitionResult::new(SessionState::Idle).with_effect(Effect::Notify(
                    Notice::warning("No document selected", "Please upload a document first"),
                ));
            };
            TransitionResult::new(SessionState::Submitting)
                .with_effect(Effect::AppendTurn(Turn::user(question)))
                .with_effect(Effect::SendAsk {
                    question: question.to_string(),
                    document_id,
                })
        }

        // A question is already in flight; further input is dropped.
        (SessionState::Submitting, Event::InputSubmitted { .. }) => {
            TransitionResult::new(SessionState::Submitting)
        }

        // ============================================================
        // Ask completion
        // ============================================================
        (SessionState::Submitting, Event::AskSucceeded { answer }) => {
            TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::AppendTurn(Turn::assistant(answer)))
        }

        (SessionState::Submitting, Event::AskFailed { .. }) => {
            TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::AppendTurn(Turn::assistant(ERROR_REPLY)))
                .with_effect(Effect::Notify(Notice::error(
                    "Request failed",
                    "Failed to get answer from the AI",
                )))
        }

        // Stale completions after the session already settled.
        (SessionState::Idle, Event::AskSucceeded { .. })
        | (SessionState::Idle, Event::AskFailed { .. }) => {
            TransitionResult::new(SessionState::Idle)
        }

        // ============================================================
        // Document selection
        // ============================================================
        (SessionState::Submitting, Event::DocumentSelected { .. }) => {
            TransitionResult::new(SessionState::Submitting)
        }

        (SessionState::Idle, Event::DocumentSelected { id }) => {
            if context.document_id.as_deref() == Some(id.as_str()) {
                return TransitionResult::new(SessionState::Idle);
            }
            TransitionResult::new(SessionState::Idle)
                .with_effect(Effect::SetDocument(id))
                .with_effect(Effect::ClearTranscript)
        }
    }
}
