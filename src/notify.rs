use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::Config;
use crate::discord::DiscordClient;
use crate::git::GitContext;
use crate::types::{
    truncate, AlertError, Embed, EmbedField, EmbedFooter, Status, WebhookPayload,
    MAX_CONTENT_LEN, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN,
};

/// What the user asked to announce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub issue: Option<u64>,
}

impl From<&Cli> for Notification {
    fn from(cli: &Cli) -> Self {
        Self {
            title: cli.title.clone(),
            description: cli.description.clone().unwrap_or_default(),
            status: cli.status,
            issue: cli.issue,
        }
    }
}

/// Result of a best-effort notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    DryRun(String),
    /// Delivery failed; the message is shown to the operator and otherwise ignored
    DeliveryFailed(String),
}

/// Assemble the webhook body
pub fn build_payload(
    notification: &Notification,
    git: &GitContext,
    config: &Config,
    now: DateTime<Utc>,
) -> WebhookPayload {
    let status = notification.status;

    let headline = format!("{} {}", status.emoji(), notification.title);
    let content = match &config.mention {
        Some(mention) => format!("{} {}", mention, headline),
        None => headline,
    };

    let mut fields = vec![
        EmbedField::new("Branch", git.branch.as_str(), true),
        EmbedField::new("Commit", git.last_commit.as_str(), true),
    ];
    if let Some(issue) = notification.issue {
        fields.push(EmbedField::new(
            "Issue",
            issue_reference(issue, config.issue_url_base.as_deref()),
            true,
        ));
    }

    WebhookPayload {
        content: truncate(&content, MAX_CONTENT_LEN),
        username: config.username.clone(),
        avatar_url: config.avatar_url.clone(),
        embeds: vec![Embed {
            title: truncate(&notification.title, MAX_TITLE_LEN),
            description: truncate(&notification.description, MAX_DESCRIPTION_LEN),
            color: status.color(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            fields,
            footer: Some(EmbedFooter {
                text: concat!("discord-alert v", env!("CARGO_PKG_VERSION")).to_string(),
            }),
        }],
    }
}

fn issue_reference(issue: u64, base: Option<&str>) -> String {
    match base {
        Some(base) => format!("[#{}]({}/{})", issue, base, issue),
        None => format!("#{}", issue),
    }
}

/// Build and deliver (or print) one notification.
///
/// Only payload serialization errors are returned. Anything that stops the
/// message from reaching Discord is reported through `Outcome::DeliveryFailed`.
pub async fn execute(
    notification: &Notification,
    git: &GitContext,
    config: &Config,
    dry_run: bool,
) -> Result<Outcome, AlertError> {
    let payload = build_payload(notification, git, config, Utc::now());

    if dry_run {
        let json = serde_json::to_string_pretty(&payload)?;
        info!("Dry run, not sending to {}", config.redacted_url());
        return Ok(Outcome::DryRun(json));
    }

    info!(
        "Sending {} notification to {} (from {})",
        notification.status,
        config.redacted_url(),
        config.webhook_source.describe()
    );

    let client = DiscordClient::new(config.webhook_url.clone(), config.timeout);
    Ok(deliver(client, &payload).await)
}

async fn deliver(client: Result<DiscordClient, AlertError>, payload: &WebhookPayload) -> Outcome {
    let result = match client {
        Ok(client) => client.send(payload).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Outcome::Sent,
        Err(e) => {
            warn!("Notification not delivered: {}", e);
            Outcome::DeliveryFailed(e.to_string())
        }
    }
}
