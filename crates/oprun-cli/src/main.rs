//! oprun - run a command through the operation runner and report the outcome
//!
//! ## Commands
//!
//! - `run`: execute a command as an operation and present its outcome
//! - `settings`: print the effective runner settings as TOML
//! - `channels`: list the available presentation channels

mod command;
mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oprun_core::{ChannelKind, OperationRunner, RunConfig, RunnerSettings};
use tracing::{info, Level};

use crate::command::ShellCommand;
use crate::console::console_context;

#[derive(Parser)]
#[command(name = "oprun")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run operations with pluggable success/failure reporting", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Runner settings file (TOML)
    #[arg(long, global = true, env = "OPRUN_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a command as an operation and present the outcome
    Run {
        /// Message shown when the command succeeds
        #[arg(long)]
        success_message: Option<String>,

        /// Fallback message when the failure carries none
        #[arg(long)]
        error_message: Option<String>,

        /// Channel for the success message
        #[arg(long)]
        on_success: Option<ChannelKind>,

        /// Channel for the failure message
        #[arg(long)]
        on_failure: Option<ChannelKind>,

        /// Modal title for failures
        #[arg(long)]
        title: Option<String>,

        /// Timeout in seconds (0 disables)
        #[arg(long, default_value = "0")]
        timeout: u64,

        /// Label attached to log events
        #[arg(long)]
        label: Option<String>,

        /// Command and arguments
        #[arg(last = true, required = true)]
        argv: Vec<String>,
    },

    /// Print the effective runner settings as TOML
    Settings,

    /// List the presentation channels
    Channels,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    oprun_core::init_tracing(cli.json, level);

    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Commands::Run {
            success_message,
            error_message,
            on_success,
            on_failure,
            title,
            timeout,
            label,
            argv,
        } => {
            let mut config = RunConfig::new();
            config.success_message = success_message;
            config.error_message = error_message;
            config.success_channel = on_success;
            config.failure_channel = on_failure;
            config.modal_title = title;
            config.label = label;

            let succeeded = cmd_run(settings, ShellCommand::new(argv, timeout), config).await;
            if !succeeded {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Settings => cmd_settings(&settings),
        Commands::Channels => {
            cmd_channels(&settings);
            Ok(())
        }
    }
}

fn load_settings(path: Option<&std::path::Path>) -> Result<RunnerSettings> {
    match path {
        Some(path) => RunnerSettings::load(path)
            .with_context(|| format!("Failed to load settings from {:?}", path)),
        None => RunnerSettings::default()
            .with_env_overrides()
            .context("Invalid OPRUN_* environment override"),
    }
}

/// Run the command through the runner; returns whether the outcome succeeded.
async fn cmd_run(
    settings: RunnerSettings,
    command: ShellCommand,
    config: RunConfig<'_, command::CommandOutput>,
) -> bool {
    let context = Arc::new(console_context());
    let runner = OperationRunner::with_settings(context.clone(), settings);

    info!(command = ?command.argv, "Running command");
    let outcome = runner.run_dual(|| command.execute(), config).await;
    context.metrics().flush();

    if let Some(output) = outcome.value() {
        print!("{}", output.stdout);
    }
    outcome.succeeded
}

fn cmd_settings(settings: &RunnerSettings) -> Result<()> {
    let text = toml::to_string_pretty(settings).context("Failed to render settings")?;
    println!("{}", text);
    Ok(())
}

fn cmd_channels(settings: &RunnerSettings) {
    for channel in ChannelKind::ALL {
        let mut marks = Vec::new();
        if channel == settings.success_channel {
            marks.push("default for success");
        }
        if channel == settings.failure_channel {
            marks.push("default for failure");
        }
        if marks.is_empty() {
            println!("{}", channel);
        } else {
            println!("{} ({})", channel, marks.join(", "));
        }
    }
}
