use anyhow::Result;
use clap::{Parser, Subcommand};
use localpilot::app::{App, Task};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "localpilot")]
#[command(about = "Developer assistant backed by a local generation server")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive chat mode
    Chat,
    /// Analyze a project for common issues
    Analyze {
        /// Project path to analyze
        #[arg(default_value = ".")]
        path: String,
    },
    /// Fix a specific issue
    Fix {
        /// Issue description
        issue: Vec<String>,
    },
    /// Generate code for a new feature
    Feature {
        /// Feature name
        name: Vec<String>,
    },
    /// Write tests for a target
    Test {
        /// What to test
        target: Vec<String>,
    },
    /// Create a database migration
    Schema {
        /// Migration description
        description: Vec<String>,
    },
}

impl Command {
    fn into_task(self) -> Option<Task> {
        match self {
            Command::Chat => None,
            Command::Analyze { path } => Some(Task::Analyze { path }),
            Command::Fix { issue } => Some(Task::Fix {
                issue: join_or_default(issue, "bugs"),
            }),
            Command::Feature { name } => Some(Task::Feature {
                name: join_or_default(name, "new feature"),
            }),
            Command::Test { target } => Some(Task::Test {
                target: join_or_default(target, "code"),
            }),
            Command::Schema { description } => Some(Task::Schema {
                description: join_or_default(description, "new table"),
            }),
        }
    }
}

fn join_or_default(words: Vec<String>, default: &str) -> String {
    if words.is_empty() {
        default.to_string()
    } else {
        words.join(" ")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "localpilot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    match App::new() {
        Ok(app) => {
            let result = match args.command.into_task() {
                None => app.chat().await,
                Some(task) => app.run_task(task).await,
            };
            match result {
                Ok(()) => Ok(()),
                Err(e) => {
                    error!("Command failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    }
}
