//! Rewrites Slack wire-format markup into neutral tagged text.
//!
//! Completion APIs have no notion of Slack's `<...>` mention/link syntax or
//! `:emoji:` shortcodes, so message text is normalized before it is sent:
//! every recognized token is replaced by a tagged equivalent that keeps the
//! content readable without being mistaken for prompt content structure.
//! The transform is total — any string in, a string out, never a panic.

use crate::utils::regex::RegexPatterns;
use regex::Captures;

/// The closed set of token kinds a `<...>` bracket token can classify as.
///
/// Classification order matters: several shapes are prefix-compatible
/// (`!subteam^...` would also match the generic `!...` rule), so `classify`
/// tries these in declaration order and the first match wins.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Channel or user mention (`#C...` / `@U...`), kept verbatim as markup.
    Mention(&'a str),
    /// Subteam mention; the subteam ID is discarded entirely.
    Subteam,
    /// Date-formatting token, kept verbatim as markup.
    Date(&'a str),
    /// Other special mention (`!here`, `!channel|label`). Carries the
    /// extracted identifier, or `None` if the extraction pattern failed.
    Special(Option<&'a str>),
    /// Formatted link: `url|label`.
    Link { url: &'a str, label: &'a str },
    /// Bare URL, empty, or unrecognized content.
    Fallback(&'a str),
}

pub(crate) fn classify(inner: &str) -> Token<'_> {
    if inner.starts_with('#') || inner.starts_with('@') {
        return Token::Mention(inner);
    }
    if inner.starts_with("!subteam") {
        return Token::Subteam;
    }
    if inner.starts_with("!date") {
        return Token::Date(inner);
    }
    if inner.starts_with('!') {
        // Defensive: the extraction regex can only fail on input the outer
        // bracket pattern would not produce, but keep the fallback anyway.
        return Token::Special(
            RegexPatterns::special_mention()
                .captures(inner)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str()),
        );
    }
    if let Some((url, label)) = inner.split_once('|') {
        return Token::Link { url, label };
    }
    Token::Fallback(inner)
}

fn render(token: &Token<'_>) -> String {
    match token {
        // The whole token, brackets included, survives inside the wrapper so
        // downstream echoes still carry the original Slack markup
        Token::Mention(inner) | Token::Date(inner) | Token::Fallback(inner) => {
            format!("<mrkdwn><{}></mrkdwn>", inner)
        }
        Token::Subteam => "@[subteam mention removed]".to_string(),
        Token::Special(Some(id)) => format!("<ignore>@{}</ignore>", id),
        Token::Special(None) => "<ignore>@[special mention]</ignore>".to_string(),
        Token::Link { url, label } => format!("<a href=\"{}\">{}</a>", url, label),
    }
}

/// Rewrite Slack markup into tagged neutral text.
///
/// Two sequential passes: bracket tokens first, then emoji shortcodes over
/// the result. Unmatched `<`/`>` characters are left untouched. Not
/// idempotent — the output tags would themselves be re-wrapped on a second
/// call.
pub fn rewrite(raw: &str) -> String {
    let pass1 = RegexPatterns::bracket_token()
        .replace_all(raw, |caps: &Captures| render(&classify(&caps[1])));
    RegexPatterns::emoji_shortcode()
        .replace_all(&pass1, "<emoji>${1}</emoji>")
        .into_owned()
}
