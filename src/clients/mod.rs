//! Platform client seam.
//!
//! The purge engine and live monitor talk to the chat platform exclusively
//! through [`ChatClient`], so they can be driven by an in-memory fake in
//! tests and by the serenity-backed [`discord::DiscordClient`] in production.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::models::{ChannelId, ChatMessage, MessageId, UserId};
use crate::errors::BotError;

pub mod discord;

pub use discord::DiscordClient;

/// Outcome of a failed delete attempt.
///
/// Throttling is recovered locally by the caller (mandatory wait plus a
/// single retry); anything else is logged and the run continues.
#[derive(Debug, Clone, Error)]
pub enum DeleteError {
    #[error("throttled by platform, retry after {retry_after:?}")]
    Throttled { retry_after: Duration },

    #[error("delete failed: {0}")]
    Other(String),
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// One page of channel history, reverse-chronological, strictly older
    /// than `before` when a cursor is given. A page shorter than `limit`
    /// means the history is exhausted.
    async fn history_page(
        &self,
        channel: ChannelId,
        before: Option<MessageId>,
        limit: u8,
    ) -> Result<Vec<ChatMessage>, BotError>;

    async fn delete_message(&self, channel: ChannelId, id: MessageId) -> Result<(), DeleteError>;

    /// Ids of the channel's active threads, for full-history sweeps.
    /// Channels that cannot carry threads (DMs) yield an empty list.
    async fn active_threads(&self, channel: ChannelId) -> Result<Vec<ChannelId>, BotError>;

    /// Whether `user` may delete other users' messages in `channel`.
    async fn can_manage_messages(&self, channel: ChannelId, user: UserId)
    -> Result<bool, BotError>;

    /// Identity of the authenticated account.
    fn self_id(&self) -> UserId;
}
