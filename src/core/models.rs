use chrono::{DateTime, Utc};
use serde::Serialize;

pub type MessageId = u64;
pub type UserId = u64;
pub type ChannelId = u64;

/// A message as observed from the platform. Immutable once observed; the
/// engine only deletes the remote resource it refers to.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: MessageId,
    pub author: UserId,
    pub content: String,
    /// Attachment URLs, empty when the message carries none.
    pub attachments: Vec<String>,
    pub channel: ChannelId,
    pub created_at: DateTime<Utc>,
}

/// Stateless deletion criterion, evaluated per message.
#[derive(Debug, Clone, PartialEq)]
pub enum PurgeRule {
    ByAuthor(UserId),
    /// Case-insensitive containment check on the message text.
    BySubstring(String),
    ByAttachmentPresence,
    /// Matches messages whose text contains an http(s) URL.
    ByLinkPattern,
    /// Satisfied by bounding the history source, not by per-message checks;
    /// see `PurgeOptions::after`.
    ByTimestamp(DateTime<Utc>),
    Unconditional,
}

/// Final counters of one purge run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub scanned: u64,
    pub deleted: u64,
    pub cancelled: bool,
}
