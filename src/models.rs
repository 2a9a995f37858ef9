//! Data models and structures
//!
//! Defines the wire types for the generation backend's `/api/generate`
//! endpoint and the process configuration.

use serde::{Deserialize, Serialize};

/// Request body for a streaming generate call.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub temperature: f32,
    pub top_p: f32,
}

/// One newline-delimited record of a streaming generate response.
///
/// Records without a `response` field carry no output text, such as the
/// terminal `done` record with timing stats.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateChunk {
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
}

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "mistral";
pub const DEFAULT_MAX_HISTORY_TURNS: usize = 5;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub model: String,
    pub max_history_turns: usize,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let max_history_turns = match std::env::var("LOCALPILOT_MAX_HISTORY_TURNS") {
            Ok(raw) => raw.parse().map_err(|_| {
                crate::Error::Config(format!(
                    "LOCALPILOT_MAX_HISTORY_TURNS must be a number, got '{}'",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_MAX_HISTORY_TURNS,
        };

        Ok(Self {
            backend_url: std::env::var("LOCALPILOT_BACKEND_URL")
                .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
            model: std::env::var("LOCALPILOT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_history_turns,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_history_turns: DEFAULT_MAX_HISTORY_TURNS,
        }
    }
}
