use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod app;
mod cli;
mod config;
mod pagination;
mod tui;
mod utils;

use cli::Cli;
use config::Config;

#[tokio::main]
async fn main() {
    // Set up panic hook for graceful error recovery
    std::panic::set_hook(Box::new(|panic_info| {
        // The TUI may still own the terminal
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        error!("Application panicked: {}", panic_info);
        eprintln!("roster panicked: {}", panic_info);
        std::process::exit(1);
    }));

    // Load environment variables from .env file
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match Config::init().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = init_logging(&config, cli.is_interactive(), cli.debug) {
        eprintln!("Failed to initialize logging: {:#}", e);
        std::process::exit(1);
    }
    if let Err(e) = dotenv {
        // Don't error if .env file doesn't exist, just log it
        tracing::debug!("No .env file found or error loading it: {}", e);
    }

    // Execute CLI command
    if let Err(e) = cli.execute(config).await {
        error!("Application error: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(config: &Config, interactive: bool, debug: bool) -> Result<()> {
    let default_filter = if debug { "roster=debug" } else { "roster=info" };
    let env_filter = if debug {
        EnvFilter::new(default_filter)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into())
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if interactive {
        // The alternate screen owns stdout/stderr, so log to a file
        let log_file = config.log_file();
        if let Some(parent) = log_file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("Failed to open {}", log_file.display()))?;

        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}
