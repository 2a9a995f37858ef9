//! Application orchestration for the CLI subcommands.

use std::io::Write;

use futures_util::StreamExt;
use tracing::info;

use crate::ai::{GenerateService, OllamaClient};
use crate::chat;
use crate::models::Config;
use crate::{prompts, Result};

/// One-shot prompt-and-print task. Unlike chat, tasks carry no conversation
/// state.
#[derive(Debug, Clone)]
pub enum Task {
    Analyze { path: String },
    Fix { issue: String },
    Feature { name: String },
    Test { target: String },
    Schema { description: String },
}

impl Task {
    fn banner(&self) -> String {
        match self {
            Task::Analyze { path } => format!("Analyzing project at {}", path),
            Task::Fix { issue } => format!("Fixing: {}", issue),
            Task::Feature { name } => format!("Generating feature: {}", name),
            Task::Test { target } => format!("Writing tests for: {}", target),
            Task::Schema { description } => format!("Schema migration: {}", description),
        }
    }

    fn render_prompt(&self) -> String {
        match self {
            Task::Analyze { path } => prompts::render(prompts::ANALYZE, &[("path", path)]),
            Task::Fix { issue } => prompts::render(prompts::FIX, &[("issue", issue)]),
            Task::Feature { name } => prompts::render(prompts::FEATURE, &[("name", name)]),
            Task::Test { target } => prompts::render(prompts::TEST, &[("target", target)]),
            Task::Schema { description } => {
                prompts::render(prompts::SCHEMA, &[("description", description)])
            }
        }
    }
}

/// Wires configuration into the generation client and dispatches subcommands.
pub struct App {
    generate: Box<dyn GenerateService>,
    max_history_turns: usize,
}

impl App {
    /// Build an app from a concrete generation service.
    ///
    /// This is primarily useful for tests that need to inject a mock.
    pub fn with_service(generate: Box<dyn GenerateService>, max_history_turns: usize) -> Self {
        Self {
            generate,
            max_history_turns,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        info!(
            "Using backend {} with model {}",
            config.backend_url, config.model
        );

        let generate = Box::new(OllamaClient::new(&config));
        Ok(Self::with_service(generate, config.max_history_turns))
    }

    /// Enter the interactive chat loop.
    pub async fn chat(&self) -> Result<()> {
        chat::run(self.generate.as_ref(), self.max_history_turns).await
    }

    /// Run a one-shot task: render its prompt template and print the streamed
    /// reply.
    ///
    /// Stream errors propagate to the caller here: a one-shot invocation has
    /// no session to keep alive, so it fails fast instead of printing a
    /// diagnostic and carrying on.
    pub async fn run_task(&self, task: Task) -> Result<()> {
        self.generate.check_backend().await?;

        println!("{}\n", task.banner());
        let mut stdout = std::io::stdout();
        self.run_task_to(&task, &mut stdout).await?;
        println!("\n");
        Ok(())
    }

    async fn run_task_to(&self, task: &Task, out: &mut dyn Write) -> Result<()> {
        let prompt = task.render_prompt();
        let mut stream = self.generate.stream_generate(&prompt, "").await;

        while let Some(item) = stream.next().await {
            let fragment = item?;
            write!(out, "{}", fragment)?;
            out.flush()?;
        }
        Ok(())
    }
}
