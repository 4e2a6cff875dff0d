//! Reactive deletion of newly arriving messages.

use std::sync::Arc;

use tracing::debug;

use crate::clients::ChatClient;
use crate::core::context::BotContext;
use crate::core::models::ChatMessage;
use crate::core::watch::WatchTarget;

pub struct LiveMonitor {
    client: Arc<dyn ChatClient>,
    ctx: Arc<BotContext>,
}

impl LiveMonitor {
    #[must_use]
    pub fn new(client: Arc<dyn ChatClient>, ctx: Arc<BotContext>) -> Self {
        Self { client, ctx }
    }

    /// Applies the current watch configuration to one incoming message.
    ///
    /// The target trigger and the watched-word trigger are independent, but
    /// a message is deleted at most once per pass. Self-authored messages
    /// are never deleted by the target trigger, even under `Everyone`.
    /// Returns true when a delete attempt succeeded.
    pub async fn observe(&self, message: &ChatMessage) -> bool {
        if self
            .ctx
            .whitelist
            .read()
            .unwrap()
            .is_protected(message.id)
        {
            return false;
        }

        let (target, word_hit) = {
            let watch = self.ctx.watch.read().unwrap();
            (watch.target, watch.matches_word(&message.content))
        };

        let self_id = self.client.self_id();
        let target_hit = match target {
            WatchTarget::Everyone => message.author != self_id,
            WatchTarget::User(id) => message.author == id && message.author != self_id,
            WatchTarget::None => false,
        };

        if !target_hit && !word_hit {
            return false;
        }

        match self
            .client
            .delete_message(message.channel, message.id)
            .await
        {
            Ok(()) => {
                debug!(message = message.id, target_hit, word_hit, "auto-deleted watched message");
                true
            }
            Err(e) => {
                // Deliberately discarded: a single failed delete is not worth
                // interrupting the event stream for.
                debug!(message = message.id, error = %e, "auto-delete failed, ignoring");
                false
            }
        }
    }
}
