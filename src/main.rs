use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod discord;
mod git;
mod notify;
mod types;

use cli::Cli;
use config::Config;
use git::GitContext;
use notify::{Notification, Outcome};
use types::AlertError;

const DEFAULT_LOG_DIRECTIVE: &str = "discord_alert=info";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env first so RUST_LOG and webhook settings can live there
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    info!("discord-alert v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(cli.config.clone());
    Ok(run(&cli, config).await)
}

/// Send one notification and decide the process exit status.
///
/// Configuration errors fail the process; delivery problems are printed to
/// stdout and leave the exit status clean.
async fn run(cli: &Cli, config: Result<Config, AlertError>) -> ExitCode {
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let git = GitContext::collect(&cli.repo_dir).await;
    info!("Branch: {}, last commit: {}", git.branch, git.last_commit);

    let notification = Notification::from(cli);
    let outcome = match notify::execute(&notification, &git, &config, cli.dry_run).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Notification aborted: {}", e);
            eprintln!("Error: {}", e);
            return if e.is_fatal() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match outcome {
        Outcome::Sent => println!(
            "Discord notification sent: {} {}",
            notification.status.emoji(),
            notification.title
        ),
        Outcome::DryRun(json) => println!("{}", json),
        Outcome::DeliveryFailed(reason) => {
            println!("Failed to send Discord notification: {}", reason)
        }
    }

    ExitCode::SUCCESS
}

/// Logs go to stderr; stdout is reserved for the result line and dry-run JSON.
fn init_tracing() -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.compact().with_target(false).init();
    }
    Ok(())
}

/// `RUST_LOG` wins when it parses; otherwise the crate logs at info.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}
