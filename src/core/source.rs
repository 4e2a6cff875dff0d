//! Lazy, paginated channel history.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clients::ChatClient;
use crate::core::models::{ChannelId, ChatMessage, MessageId};
use crate::errors::BotError;

const PAGE_SIZE: u8 = 100;

/// Pulls history pages on demand and hands out one message at a time,
/// newest first as delivered by the platform. An `after` bound turns the
/// first message older than the threshold into exhaustion, since pages are
/// reverse-chronological.
pub struct MessageSource {
    client: Arc<dyn ChatClient>,
    channel: ChannelId,
    after: Option<DateTime<Utc>>,
    cursor: Option<MessageId>,
    buffer: VecDeque<ChatMessage>,
    exhausted: bool,
}

impl MessageSource {
    #[must_use]
    pub fn new(client: Arc<dyn ChatClient>, channel: ChannelId, after: Option<DateTime<Utc>>) -> Self {
        Self {
            client,
            channel,
            after,
            cursor: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// # Errors
    ///
    /// Returns an error when a history page cannot be fetched.
    pub async fn next_message(&mut self) -> Result<Option<ChatMessage>, BotError> {
        loop {
            if let Some(msg) = self.buffer.pop_front() {
                if let Some(bound) = self.after
                    && msg.created_at < bound
                {
                    // Everything from here on is older than the bound.
                    self.buffer.clear();
                    self.exhausted = true;
                    return Ok(None);
                }
                self.cursor = Some(msg.id);
                return Ok(Some(msg));
            }

            if self.exhausted {
                return Ok(None);
            }

            let page = self
                .client
                .history_page(self.channel, self.cursor, PAGE_SIZE)
                .await?;
            if page.len() < PAGE_SIZE as usize {
                self.exhausted = true;
            }
            if page.is_empty() {
                return Ok(None);
            }
            self.buffer.extend(page);
        }
    }
}
