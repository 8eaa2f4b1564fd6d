//! Effects requested by transitions and executed by the runtime

use super::notify::Notice;
use super::state::Turn;

/// Side effects a transition asks the runtime to perform, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a turn to the transcript.
    AppendTurn(Turn),
    /// Drop the transcript, e.g. after switching documents.
    ClearTranscript,
    /// Record the active document in the session context.
    SetDocument(String),
    /// Start the ask request for the in-flight question.
    SendAsk { question: String, document_id: String },
    /// Surface a notice to the user outside the transcript.
    Notify(Notice),
}
