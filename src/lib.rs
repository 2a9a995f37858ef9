//! Developer assistant CLI backed by a local text-generation server
//!
//! Builds prompts for common development tasks, streams replies from an
//! Ollama-compatible backend as they are generated, and keeps a bounded
//! conversation history for the interactive chat mode.

pub mod ai;
pub mod app;
pub mod chat;
pub mod error;
pub mod models;
pub mod prompts;

pub use error::{Error, Result};
