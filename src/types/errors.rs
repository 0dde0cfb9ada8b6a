use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error(
        "No Discord webhook configured. Put the webhook URL in {} or set DISCORD_WEBHOOK_URL \
         (Discord: Server Settings > Integrations > Webhooks > Copy Webhook URL)",
        .file.display()
    )]
    MissingWebhook { file: PathBuf },

    #[error("Invalid webhook URL from {source_name}: {reason}")]
    InvalidWebhookUrl { source_name: String, reason: String },

    #[error("Failed to read webhook file {}: {reason}", .path.display())]
    ConfigRead { path: PathBuf, reason: String },

    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    #[error("Webhook delivery failed: {0}")]
    Delivery(String),

    #[error("Webhook rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Payload serialization failed: {0}")]
    Serialization(String),
}

impl AlertError {
    /// Configuration problems stop the process; delivery problems do not.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AlertError::MissingWebhook { .. }
                | AlertError::InvalidWebhookUrl { .. }
                | AlertError::ConfigRead { .. }
                | AlertError::InvalidConfig(_)
        )
    }
}

impl From<reqwest::Error> for AlertError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL embeds the webhook token
        AlertError::Delivery(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for AlertError {
    fn from(err: serde_json::Error) -> Self {
        AlertError::Serialization(err.to_string())
    }
}
