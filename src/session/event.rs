//! Events fed into the session state machine

use super::http::AskError;

/// Everything that can happen to a session, from the user or from a
/// completed ask request.
#[derive(Debug, Clone)]
pub enum Event {
    /// The user submitted a line of input.
    InputSubmitted { text: String },
    /// The user picked (or switched) the active document.
    DocumentSelected { id: String },
    /// The in-flight ask request came back with an answer.
    AskSucceeded { answer: String },
    /// The in-flight ask request failed.
    AskFailed { error: AskError },
}
