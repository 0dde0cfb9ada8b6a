use std::path::PathBuf;

use clap::Parser;

use crate::types::Status;

pub const DEFAULT_TITLE: &str = "Task completed";

/// Post a task status notification to a Discord webhook.
///
/// The webhook URL is read from .discord_webhook (or --config / DISCORD_WEBHOOK_FILE),
/// falling back to the DISCORD_WEBHOOK_URL environment variable.
#[derive(Parser, Debug)]
#[command(name = "discord-alert", version, about)]
pub struct Cli {
    /// Notification title
    #[arg(default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Longer description shown in the embed body
    pub description: Option<String>,

    /// Status indicator: ✅, ⚠️ or ❌ (also success, warning, failure)
    #[arg(default_value = "✅", value_parser = parse_status)]
    pub status: Status,

    /// Related issue number, e.g. 42 or #42
    #[arg(value_parser = parse_issue)]
    pub issue: Option<u64>,

    /// Print the JSON payload instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// File holding the webhook URL
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Git working tree used for branch and commit details
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo_dir: PathBuf,
}

fn parse_status(input: &str) -> Result<Status, String> {
    Ok(Status::parse(input))
}

fn parse_issue(input: &str) -> Result<u64, String> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not an issue number", input));
    }
    match digits.parse::<u64>() {
        Ok(0) => Err("issue number must be positive".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not an issue number", input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["discord-alert"]).unwrap();
        assert_eq!(cli.title, "Task completed");
        assert_eq!(cli.description, None);
        assert_eq!(cli.status, Status::Success);
        assert_eq!(cli.issue, None);
        assert!(!cli.dry_run);
        assert_eq!(cli.repo_dir, PathBuf::from("."));
    }

    #[test]
    fn test_all_positionals() {
        let cli = Cli::try_parse_from([
            "discord-alert",
            "Nightly build",
            "3 tests flaky",
            "⚠️",
            "#17",
        ])
        .unwrap();
        assert_eq!(cli.title, "Nightly build");
        assert_eq!(cli.description.as_deref(), Some("3 tests flaky"));
        assert_eq!(cli.status, Status::Warning);
        assert_eq!(cli.issue, Some(17));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "discord-alert",
            "--dry-run",
            "--config",
            "/tmp/hook",
            "Deploy",
        ])
        .unwrap();
        assert!(cli.dry_run);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/hook")));
        assert_eq!(cli.title, "Deploy");
    }

    #[test]
    fn test_invalid_issue_rejected() {
        assert!(Cli::try_parse_from(["discord-alert", "t", "d", "✅", "abc"]).is_err());
        assert!(Cli::try_parse_from(["discord-alert", "t", "d", "✅", "0"]).is_err());
    }

    #[test]
    fn test_parse_issue() {
        assert_eq!(parse_issue("42"), Ok(42));
        assert_eq!(parse_issue("#42"), Ok(42));
        assert!(parse_issue("-1").is_err());
        assert!(parse_issue("##5").is_err());
        assert!(parse_issue("+5").is_err());
        assert!(parse_issue("#").is_err());
    }
}
