//! serenity-backed [`ChatClient`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::http::{Http, HttpError, StatusCode};
use serenity::model::id::{
    ChannelId as DiscordChannelId, MessageId as DiscordMessageId, UserId as DiscordUserId,
};

use crate::clients::{ChatClient, DeleteError};
use crate::core::models::{ChannelId, ChatMessage, MessageId, UserId};
use crate::errors::BotError;

/// Discord's 429 body carries the retry-after, but serenity does not surface
/// it on the error type; with the built-in ratelimiter disabled we fall back
/// to a flat wait.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(5);

pub struct DiscordClient {
    http: Arc<Http>,
    self_id: UserId,
}

impl DiscordClient {
    #[must_use]
    pub fn new(http: Arc<Http>, self_id: UserId) -> Self {
        Self { http, self_id }
    }
}

/// Projects a gateway or history message into the engine's message model.
#[must_use]
pub fn from_gateway(msg: &serenity::model::channel::Message) -> ChatMessage {
    ChatMessage {
        id: msg.id.get(),
        author: msg.author.id.get(),
        content: msg.content.clone(),
        attachments: msg.attachments.iter().map(|a| a.url.clone()).collect(),
        channel: msg.channel_id.get(),
        created_at: to_datetime(&msg.timestamp),
    }
}

/// Millisecond precision is kept: a whole-second truncation can push a
/// message created in the same second as a time bound below that bound.
fn to_datetime(timestamp: &serenity::model::Timestamp) -> DateTime<Utc> {
    let millis = i64::try_from(timestamp.unix_timestamp_nanos() / 1_000_000).unwrap_or_default();
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

fn map_delete_error(error: serenity::Error) -> DeleteError {
    if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &error
        && response.status_code == StatusCode::TOO_MANY_REQUESTS
    {
        return DeleteError::Throttled {
            retry_after: DEFAULT_RETRY_AFTER,
        };
    }
    DeleteError::Other(error.to_string())
}

#[async_trait]
impl ChatClient for DiscordClient {
    async fn history_page(
        &self,
        channel: ChannelId,
        before: Option<MessageId>,
        limit: u8,
    ) -> Result<Vec<ChatMessage>, BotError> {
        let target = before.map(|id| {
            serenity::http::MessagePagination::Before(DiscordMessageId::new(id))
        });
        let page = self
            .http
            .get_messages(DiscordChannelId::new(channel), target, Some(limit))
            .await?;
        Ok(page.iter().map(from_gateway).collect())
    }

    async fn delete_message(&self, channel: ChannelId, id: MessageId) -> Result<(), DeleteError> {
        self.http
            .delete_message(
                DiscordChannelId::new(channel),
                DiscordMessageId::new(id),
                None,
            )
            .await
            .map_err(map_delete_error)
    }

    async fn active_threads(&self, channel: ChannelId) -> Result<Vec<ChannelId>, BotError> {
        let chan = self.http.get_channel(DiscordChannelId::new(channel)).await?;
        let Some(guild_channel) = chan.guild() else {
            return Ok(Vec::new());
        };
        // The active-thread listing is guild-wide; keep only threads parented
        // to the requested channel.
        let listing = self.http.get_guild_active_threads(guild_channel.guild_id).await?;
        Ok(listing
            .threads
            .iter()
            .filter(|t| t.parent_id == Some(DiscordChannelId::new(channel)))
            .map(|t| t.id.get())
            .collect())
    }

    async fn can_manage_messages(
        &self,
        channel: ChannelId,
        user: UserId,
    ) -> Result<bool, BotError> {
        let chan = self.http.get_channel(DiscordChannelId::new(channel)).await?;
        let Some(guild_channel) = chan.guild() else {
            // DMs: others' messages cannot be deleted there.
            return Ok(false);
        };
        let guild = self.http.get_guild(guild_channel.guild_id).await?;
        let member = self
            .http
            .get_member(guild_channel.guild_id, DiscordUserId::new(user))
            .await?;
        Ok(guild
            .user_permissions_in(&guild_channel, &member)
            .manage_messages())
    }

    fn self_id(&self) -> UserId {
        self.self_id
    }
}
