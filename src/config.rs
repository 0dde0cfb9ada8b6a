use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::types::AlertError;

/// Default location of the local webhook file
pub const DEFAULT_WEBHOOK_FILE: &str = ".discord_webhook";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where the webhook URL was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookSource {
    File(PathBuf),
    Env,
}

impl WebhookSource {
    pub fn describe(&self) -> String {
        match self {
            WebhookSource::File(path) => format!("file {}", path.display()),
            WebhookSource::Env => "DISCORD_WEBHOOK_URL".to_string(),
        }
    }
}

/// Notifier configuration
///
/// The webhook URL comes from the local file first, then from the
/// environment. Everything else is optional and read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: Url,
    pub webhook_source: WebhookSource,
    /// Display name override for the webhook
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    /// Prepended to the message content, e.g. `<@&123>`
    pub mention: Option<String>,
    /// Base URL that issue numbers are appended to
    pub issue_url_base: Option<String>,
    pub timeout: Duration,
}

impl Config {
    /// Load from the process environment.
    ///
    /// `file_override` takes precedence over `DISCORD_WEBHOOK_FILE`.
    pub fn load(file_override: Option<PathBuf>) -> Result<Self, AlertError> {
        Self::resolve(file_override, |key| env::var(key).ok())
    }

    pub fn resolve<F>(file_override: Option<PathBuf>, lookup: F) -> Result<Self, AlertError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup_nonempty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let webhook_file = file_override
            .or_else(|| lookup_nonempty("DISCORD_WEBHOOK_FILE").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WEBHOOK_FILE));

        let (raw_url, webhook_source) = match read_webhook_file(&webhook_file)? {
            Some(url) => (url, WebhookSource::File(webhook_file.clone())),
            None => match lookup_nonempty("DISCORD_WEBHOOK_URL") {
                Some(url) => (url, WebhookSource::Env),
                None => return Err(AlertError::MissingWebhook { file: webhook_file }),
            },
        };

        let webhook_url = parse_webhook_url(&raw_url, &webhook_source)?;
        debug!("Webhook loaded from {}", webhook_source.describe());

        let timeout = match lookup_nonempty("DISCORD_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    AlertError::InvalidConfig(format!("DISCORD_TIMEOUT_SECS={} is not a number", raw))
                })?;
                if secs == 0 {
                    return Err(AlertError::InvalidConfig(
                        "DISCORD_TIMEOUT_SECS must be at least 1".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            webhook_url,
            webhook_source,
            username: lookup_nonempty("DISCORD_USERNAME"),
            avatar_url: lookup_nonempty("DISCORD_AVATAR_URL"),
            mention: lookup_nonempty("DISCORD_MENTION"),
            issue_url_base: lookup_nonempty("ISSUE_URL_BASE")
                .map(|base| base.trim_end_matches('/').to_string()),
            timeout,
        })
    }

    /// Webhook URL safe for logs (token segment hidden)
    pub fn redacted_url(&self) -> String {
        redact(&self.webhook_url)
    }
}

/// First non-empty, non-comment line of the webhook file.
///
/// A missing file is not an error; the environment is consulted next.
fn read_webhook_file(path: &Path) -> Result<Option<String>, AlertError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(AlertError::ConfigRead {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    Ok(contents
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string))
}

fn parse_webhook_url(raw: &str, source: &WebhookSource) -> Result<Url, AlertError> {
    let invalid = |reason: String| AlertError::InvalidWebhookUrl {
        source_name: source.describe(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

fn redact(url: &Url) -> String {
    let mut segments: Vec<&str> = url.path().split('/').collect();
    if segments.len() > 2 {
        if let Some(last) = segments.last_mut() {
            if !last.is_empty() {
                *last = "***";
            }
        }
    }
    format!(
        "{}://{}{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        segments.join("/")
    )
}
