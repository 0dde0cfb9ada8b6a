use std::path::Path;

use tokio::process::Command;
use tracing::debug;

/// Placeholder when git information cannot be read
pub const UNKNOWN: &str = "unknown";

/// Version-control details attached to a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitContext {
    pub branch: String,
    /// Short hash and subject of the last commit
    pub last_commit: String,
}

impl Default for GitContext {
    fn default() -> Self {
        Self {
            branch: UNKNOWN.to_string(),
            last_commit: UNKNOWN.to_string(),
        }
    }
}

impl GitContext {
    /// Read branch and last commit from the repository at `repo_dir`.
    ///
    /// Never fails: each field falls back to `"unknown"` on its own.
    pub async fn collect(repo_dir: &Path) -> Self {
        // Detached HEAD reports the literal "HEAD" instead of a branch name
        let branch = git_output(repo_dir, &["rev-parse", "--abbrev-ref", "HEAD"])
            .await
            .filter(|name| name != "HEAD");
        let last_commit = git_output(repo_dir, &["log", "-1", "--pretty=format:%h %s"]).await;

        Self {
            branch: branch.unwrap_or_else(|| UNKNOWN.to_string()),
            last_commit: last_commit.unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

async fn git_output(repo_dir: &Path, args: &[&str]) -> Option<String> {
    let output = match Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            debug!("git {} could not run: {}", args.join(" "), e);
            return None;
        }
    };

    if !output.status.success() {
        debug!(
            "git {} exited with {}: {}",
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return None;
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
