//! Pure rule evaluation. No I/O, never fails.

use regex::Regex;

use crate::core::models::{ChatMessage, PurgeRule};

// URL-shaped substrings: http(s) scheme followed by letters, digits, and the
// punctuation that legitimately appears in URLs, including percent-encoded
// octets. Anchoring or full URL validation is deliberately out of scope.
static URL_RE: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"https?://[A-Za-z0-9%\-._~:/?#\[\]@!$&'()*+,;=]+").unwrap_or_else(|_| {
        // Extremely defensive: in practice this cannot fail.
        Regex::new(r"$^").expect("fallback regex compiles")
    })
});

/// Whether `message` is purge-eligible under `rule`.
///
/// `ByTimestamp` always answers true: the history source is bounded to
/// messages after the threshold instead, so the filtering work already
/// happened upstream.
#[must_use]
pub fn matches(rule: &PurgeRule, message: &ChatMessage) -> bool {
    match rule {
        PurgeRule::ByAuthor(id) => message.author == *id,
        PurgeRule::BySubstring(needle) => message
            .content
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        PurgeRule::ByAttachmentPresence => !message.attachments.is_empty(),
        PurgeRule::ByLinkPattern => URL_RE.is_match(&message.content),
        PurgeRule::ByTimestamp(_) => true,
        PurgeRule::Unconditional => true,
    }
}
