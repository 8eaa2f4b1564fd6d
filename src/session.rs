//! Interactive chat session
//!
//! Implements the Elm Architecture pattern: a pure transition function
//! computes the next state plus a list of effects, and the runtime
//! executes the effects and feeds ask completions back in as events.

mod effect;
pub mod event;
pub mod http;
pub mod notify;
pub mod runtime;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub(crate) mod testing;

pub use effect::Effect;
pub use event::Event;
pub use http::{AskBackend, AskError, HttpAskBackend};
pub use notify::{Notice, Notifier, Severity};
pub use runtime::{ChatSession, SessionClosed, SessionHandle, SessionUpdate};
pub use state::{Role, SessionContext, SessionState, Turn};
pub use transition::{transition, TransitionResult};
