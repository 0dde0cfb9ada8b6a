use std::fmt;

use tracing::warn;

/// Embed color for a successful task (Discord green)
pub const COLOR_SUCCESS: u32 = 0x57F287;
/// Embed color for a task that finished with warnings (Discord yellow)
pub const COLOR_WARNING: u32 = 0xFEE75C;
/// Embed color for a failed task (Discord red)
pub const COLOR_FAILURE: u32 = 0xED4245;

/// Task outcome carried by a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Success,
    Warning,
    Failure,
}

impl Status {
    /// Parse a status indicator.
    ///
    /// The three emoji are compared directly; a few plain words are accepted
    /// for shells where typing emoji is awkward. Unrecognized input maps to
    /// `Warning`.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed {
            "✅" => return Status::Success,
            "⚠️" | "⚠" => return Status::Warning,
            "❌" => return Status::Failure,
            _ => {}
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "success" | "ok" => Status::Success,
            "warning" | "warn" => Status::Warning,
            "failure" | "fail" | "error" => Status::Failure,
            _ => {
                warn!("Unrecognized status {:?}, treating as warning", input);
                Status::Warning
            }
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            Status::Success => COLOR_SUCCESS,
            Status::Warning => COLOR_WARNING,
            Status::Failure => COLOR_FAILURE,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Status::Success => "✅",
            Status::Warning => "⚠️",
            Status::Failure => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Warning => "warning",
            Status::Failure => "failure",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emoji_selects_color() {
        assert_eq!(Status::parse("✅").color(), 5763719);
        assert_eq!(Status::parse("⚠️").color(), 16705372);
        assert_eq!(Status::parse("❌").color(), 15548997);
    }

    #[test]
    fn test_warning_without_variation_selector() {
        assert_eq!(Status::parse("\u{26A0}"), Status::Warning);
        assert_eq!(Status::parse("\u{26A0}\u{FE0F}"), Status::Warning);
    }

    #[test]
    fn test_word_aliases() {
        assert_eq!(Status::parse("SUCCESS"), Status::Success);
        assert_eq!(Status::parse(" fail "), Status::Failure);
        assert_eq!(Status::parse("warn"), Status::Warning);
    }

    #[test]
    fn test_unknown_falls_back_to_warning() {
        assert_eq!(Status::parse("🚀"), Status::Warning);
        assert_eq!(Status::parse(""), Status::Warning);
    }

    #[test]
    fn test_default_is_success() {
        assert_eq!(Status::default(), Status::Success);
        assert_eq!(Status::default().emoji(), "✅");
    }
}
