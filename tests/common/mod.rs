#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use purgecord::clients::{ChatClient, DeleteError};
use purgecord::core::cancel::CancelToken;
use purgecord::core::models::{ChannelId, ChatMessage, MessageId, UserId};
use purgecord::errors::BotError;

pub const CHANNEL: ChannelId = 500;
pub const SELF_ID: UserId = 1;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Builds a message whose creation time grows with its id, so histories
/// listed newest-first just use descending ids.
pub fn msg(id: MessageId, author: UserId, content: &str) -> ChatMessage {
    msg_in(CHANNEL, id, author, content)
}

pub fn msg_in(channel: ChannelId, id: MessageId, author: UserId, content: &str) -> ChatMessage {
    ChatMessage {
        id,
        author,
        content: content.to_string(),
        attachments: Vec::new(),
        channel,
        created_at: base_time() + chrono::Duration::seconds(id as i64),
    }
}

pub fn msg_with_attachment(id: MessageId, author: UserId) -> ChatMessage {
    let mut m = msg(id, author, "");
    m.attachments.push("https://cdn.example/file.png".to_string());
    m
}

/// In-memory stand-in for the platform. History is served newest-first with
/// `before`-cursor pagination, and delete behavior is scripted per id.
#[derive(Default)]
pub struct FakeClient {
    pub history: Mutex<Vec<ChatMessage>>,
    /// Active threads of [`CHANNEL`], each with its own history.
    pub threads: Mutex<Vec<(ChannelId, Vec<ChatMessage>)>>,
    pub can_manage: bool,
    pub attempts: Mutex<Vec<MessageId>>,
    pub deleted: Mutex<Vec<MessageId>>,
    /// Ids that answer the first delete attempt with a throttle signal.
    pub throttle_once: Mutex<HashSet<MessageId>>,
    /// Ids that answer every delete attempt with a throttle signal.
    pub throttle_always: Mutex<HashSet<MessageId>>,
    /// Ids whose deletes always fail with a non-throttle error.
    pub broken: Mutex<HashSet<MessageId>>,
    pub retry_after: Duration,
    /// Trigger this token once the given number of deletes succeeded.
    pub cancel_after: Mutex<Option<(u64, CancelToken)>>,
}

impl FakeClient {
    pub fn new(mut history: Vec<ChatMessage>) -> Self {
        // Newest first, as the platform delivers it.
        history.sort_by(|a, b| b.id.cmp(&a.id));
        Self {
            history: Mutex::new(history),
            can_manage: true,
            retry_after: Duration::from_secs(3),
            ..Self::default()
        }
    }

    pub fn add_thread(&self, thread: ChannelId, mut history: Vec<ChatMessage>) {
        history.sort_by(|a, b| b.id.cmp(&a.id));
        self.threads.lock().unwrap().push((thread, history));
    }

    pub fn attempt_count(&self, id: MessageId) -> usize {
        self.attempts.lock().unwrap().iter().filter(|a| **a == id).count()
    }

    pub fn deleted_ids(&self) -> Vec<MessageId> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for FakeClient {
    async fn history_page(
        &self,
        channel: ChannelId,
        before: Option<MessageId>,
        limit: u8,
    ) -> Result<Vec<ChatMessage>, BotError> {
        let page = |history: &[ChatMessage]| {
            history
                .iter()
                .filter(|m| before.is_none_or(|cursor| m.id < cursor))
                .take(limit as usize)
                .cloned()
                .collect()
        };
        if channel == CHANNEL {
            return Ok(page(&self.history.lock().unwrap()));
        }
        let threads = self.threads.lock().unwrap();
        Ok(threads
            .iter()
            .find(|(id, _)| *id == channel)
            .map(|(_, history)| page(history))
            .unwrap_or_default())
    }

    async fn delete_message(&self, _channel: ChannelId, id: MessageId) -> Result<(), DeleteError> {
        self.attempts.lock().unwrap().push(id);

        if self.broken.lock().unwrap().contains(&id) {
            return Err(DeleteError::Other("message already deleted".to_string()));
        }
        if self.throttle_always.lock().unwrap().contains(&id)
            || self.throttle_once.lock().unwrap().remove(&id)
        {
            return Err(DeleteError::Throttled {
                retry_after: self.retry_after,
            });
        }

        self.deleted.lock().unwrap().push(id);

        if let Some((after, token)) = self.cancel_after.lock().unwrap().as_ref() {
            if self.deleted.lock().unwrap().len() as u64 >= *after {
                token.trigger();
            }
        }
        Ok(())
    }

    async fn active_threads(&self, channel: ChannelId) -> Result<Vec<ChannelId>, BotError> {
        if channel != CHANNEL {
            return Ok(Vec::new());
        }
        Ok(self.threads.lock().unwrap().iter().map(|(id, _)| *id).collect())
    }

    async fn can_manage_messages(
        &self,
        _channel: ChannelId,
        _user: UserId,
    ) -> Result<bool, BotError> {
        Ok(self.can_manage)
    }

    fn self_id(&self) -> UserId {
        SELF_ID
    }
}
