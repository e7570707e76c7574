use regex::Regex;
use std::sync::LazyLock;

/// Compiled regex patterns that are reused across the codebase
pub struct RegexPatterns;

impl RegexPatterns {
    /// Regex for matching a Slack bracket token (`<...>`, non-greedy so each
    /// bracket pair is handled independently)
    pub fn bracket_token() -> &'static Regex {
        static RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"<(.*?)>").expect("Failed to compile bracket token regex"));
        &RE
    }

    /// Regex for matching an emoji shortcode (`:name:`, lowercase alnum,
    /// underscore, hyphen)
    pub fn emoji_shortcode() -> &'static Regex {
        static RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r":([a-z0-9_-]+):").expect("Failed to compile emoji shortcode regex")
        });
        &RE
    }

    /// Regex extracting the identifier of a special mention (`!here`,
    /// `!channel|label`): everything between `!` and an optional `|label`
    pub fn special_mention() -> &'static Regex {
        static RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^!(.*?)(?:\|.*)?$").expect("Failed to compile special mention regex")
        });
        &RE
    }

    /// Regex for matching markdown bold (**text**)
    pub fn markdown_bold() -> &'static Regex {
        static RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\*\*(.+?)\*\*").expect("Failed to compile markdown bold regex")
        });
        &RE
    }

    /// Regex for matching markdown strike-through (~~text~~)
    pub fn markdown_strike() -> &'static Regex {
        static RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"~~(.+?)~~").expect("Failed to compile markdown strike regex")
        });
        &RE
    }

    /// Regex for matching markdown links ([text](url))
    pub fn markdown_link() -> &'static Regex {
        static RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("Failed to compile markdown link regex")
        });
        &RE
    }
}
