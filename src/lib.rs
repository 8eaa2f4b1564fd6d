//! Document Q&A service
//!
//! A Rust backend for uploading documents and asking questions about
//! their content, plus the chat session state machine the CLI client
//! drives against the server.

pub mod answer;
pub mod api;
pub mod cache;
pub mod config;
pub mod llm;
pub mod session;
pub mod store;
