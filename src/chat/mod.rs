//! Interactive chat mode
//!
//! Runs the conversational loop: read a line, prepend the rendered history,
//! stream the reply to the terminal while accumulating it, then record the
//! completed turn. Stream errors are rendered inline as diagnostics and the
//! failed turn is not recorded, so a backend hiccup never kills the session.

pub mod session;

pub use session::{ConversationSession, Turn};

use std::io::Write;

use futures_util::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::ai::GenerateService;
use crate::{Error, Result};

const EXIT_COMMAND: &str = "exit";
const CLEAR_COMMAND: &str = "clear";

/// Outcome of a single prompt/reply exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Stream drained cleanly; the turn was recorded.
    Completed(String),
    /// The stream surfaced an error; a diagnostic was printed and nothing
    /// was recorded.
    Failed,
}

/// Render a stream error as the text shown to the user.
///
/// This is the only place errors become presentation: everything upstream
/// stays typed so the failure taxonomy is testable on its own.
pub fn diagnostic(error: &Error) -> String {
    match error {
        Error::BackendUnreachable(_) => {
            "Generation backend is not reachable.\nStart it with: ollama serve".to_string()
        }
        other => format!("Generation failed: {}", other),
    }
}

/// Run one exchange: stream the reply for `input`, forwarding each fragment
/// to `out` as it arrives, and record the turn on clean completion.
pub async fn take_turn(
    service: &dyn GenerateService,
    session: &mut ConversationSession,
    input: &str,
    out: &mut dyn Write,
) -> Result<TurnOutcome> {
    let context = session.render_context();
    let mut stream = service.stream_generate(input, &context).await;

    let mut reply = String::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => {
                write!(out, "{}", fragment)?;
                out.flush()?;
                reply.push_str(&fragment);
            }
            Err(e) => {
                writeln!(out, "{}", diagnostic(&e))?;
                out.flush()?;
                return Ok(TurnOutcome::Failed);
            }
        }
    }

    session.record_turn(input.to_string(), reply.clone());
    Ok(TurnOutcome::Completed(reply))
}

/// Run the interactive loop until `exit`, end of input, or Ctrl-C.
pub async fn run(service: &dyn GenerateService, max_history_turns: usize) -> Result<()> {
    let mut session = ConversationSession::new(max_history_turns);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    println!("Chat mode (type 'exit' to quit, 'clear' for a new conversation)\n");

    loop {
        print!("You: ");
        stdout.flush()?;

        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\nGoodbye!");
                return Ok(());
            }
            line = lines.next_line() => line?,
        };

        let input = match line {
            Some(line) => line.trim().to_string(),
            // stdin closed
            None => {
                println!("\nGoodbye!");
                return Ok(());
            }
        };

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case(EXIT_COMMAND) {
            println!("Goodbye!");
            return Ok(());
        }
        if input.eq_ignore_ascii_case(CLEAR_COMMAND) {
            session.reset();
            info!("Conversation history cleared");
            println!("Conversation cleared\n");
            continue;
        }

        print!("Assistant: ");
        stdout.flush()?;

        // Ctrl-C mid-generation drops the in-flight turn: the stream (and its
        // connection) is released and the partial reply is discarded, not
        // recorded.
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\nGoodbye!");
                return Ok(());
            }
            outcome = take_turn(service, &mut session, &input, &mut stdout) => {
                outcome?;
                println!("\n");
            }
        }
    }
}
