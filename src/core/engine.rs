//! The scan/filter/delete loop.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::clients::{ChatClient, DeleteError};
use crate::core::cancel::CancelToken;
use crate::core::context::BotContext;
use crate::core::models::{ChannelId, PurgeRule, RunSummary, UserId};
use crate::core::predicate;
use crate::core::rate::RateController;
use crate::core::source::MessageSource;
use crate::errors::BotError;

const PROGRESS_LOG_EVERY: u64 = 1000;

/// Parameters of one purge invocation.
#[derive(Debug, Clone)]
pub struct PurgeOptions {
    pub rule: PurgeRule,
    /// Stop after this many scanned messages; `None` scans the full history.
    pub scan_ceiling: Option<u64>,
    /// Bound the source to messages created after this instant.
    pub after: Option<DateTime<Utc>>,
}

impl PurgeOptions {
    #[must_use]
    pub fn new(rule: PurgeRule) -> Self {
        let after = match &rule {
            PurgeRule::ByTimestamp(threshold) => Some(*threshold),
            _ => None,
        };
        Self {
            rule,
            scan_ceiling: None,
            after,
        }
    }

    #[must_use]
    pub fn with_scan_ceiling(mut self, ceiling: Option<u64>) -> Self {
        self.scan_ceiling = ceiling;
        self
    }
}

pub struct PurgeEngine {
    client: Arc<dyn ChatClient>,
    ctx: Arc<BotContext>,
}

impl PurgeEngine {
    #[must_use]
    pub fn new(client: Arc<dyn ChatClient>, ctx: Arc<BotContext>) -> Self {
        Self { client, ctx }
    }

    /// Runs one scan-and-delete pass over the channel history. Unbounded
    /// runs also sweep the channel's active threads, accumulating into the
    /// same counters.
    ///
    /// The permission gate is resolved once up front: without the right to
    /// manage others' messages, deletion is narrowed to messages authored by
    /// `caller`, no matter what the rule says. Whitelisted messages are
    /// skipped before the rule is ever evaluated. The token is polled per
    /// scanned message; cancellation freezes the counters and returns them.
    ///
    /// # Errors
    ///
    /// Returns an error only when history pages, the thread listing, or the
    /// permission lookup fail. Individual delete failures never fail the run.
    pub async fn run(
        &self,
        channel: ChannelId,
        caller: UserId,
        options: PurgeOptions,
        cancel: CancelToken,
    ) -> Result<RunSummary, BotError> {
        // A stop request issued before this run began must not apply to it.
        cancel.clear();

        let can_manage_others = self.client.can_manage_messages(channel, caller).await?;
        let rate = RateController::new(self.ctx.delay.clone());
        let mut summary = RunSummary::default();

        info!(
            channel,
            rule = ?options.rule,
            ceiling = ?options.scan_ceiling,
            can_manage_others,
            "purge run started"
        );

        let cancelled = self
            .sweep(
                channel,
                caller,
                &options,
                &cancel,
                can_manage_others,
                &rate,
                &mut summary,
            )
            .await?;
        if cancelled {
            summary.cancelled = true;
            info!(channel, summary.scanned, summary.deleted, "purge run cancelled");
            return Ok(summary);
        }

        // Full-history runs also clean out the channel's threads, each as
        // one more pass with the same rule and counters.
        if options.scan_ceiling.is_none() {
            for thread in self.client.active_threads(channel).await? {
                info!(channel, thread, "sweeping thread");
                let cancelled = self
                    .sweep(
                        thread,
                        caller,
                        &options,
                        &cancel,
                        can_manage_others,
                        &rate,
                        &mut summary,
                    )
                    .await?;
                if cancelled {
                    summary.cancelled = true;
                    info!(channel, summary.scanned, summary.deleted, "purge run cancelled");
                    return Ok(summary);
                }
            }
        }

        info!(channel, summary.scanned, summary.deleted, "purge run completed");
        Ok(summary)
    }

    /// One pass over a single channel or thread. Returns true when the run
    /// was cancelled mid-pass.
    #[allow(clippy::too_many_arguments)]
    async fn sweep(
        &self,
        channel: ChannelId,
        caller: UserId,
        options: &PurgeOptions,
        cancel: &CancelToken,
        can_manage_others: bool,
        rate: &RateController,
        summary: &mut RunSummary,
    ) -> Result<bool, BotError> {
        let mut source = MessageSource::new(self.client.clone(), channel, options.after);

        loop {
            if cancel.is_cancelled() {
                return Ok(true);
            }
            // The ceiling caps how many messages are pulled at all, so a
            // bounded run scans exactly the requested number (or fewer) and
            // evaluates every one of them.
            if let Some(ceiling) = options.scan_ceiling
                && summary.scanned >= ceiling
            {
                return Ok(false);
            }

            let Some(message) = source.next_message().await? else {
                return Ok(false);
            };

            summary.scanned += 1;
            if summary.scanned % PROGRESS_LOG_EVERY == 0 {
                info!(channel, summary.scanned, summary.deleted, "purge run progress");
            }

            if self.ctx.whitelist.read().unwrap().is_protected(message.id) {
                continue;
            }

            let matched = predicate::matches(&options.rule, &message)
                && (can_manage_others || message.author == caller);
            if !matched {
                continue;
            }

            match self.client.delete_message(channel, message.id).await {
                Ok(()) => {
                    summary.deleted += 1;
                    sleep(rate.delay_before_next()).await;
                }
                Err(DeleteError::Throttled { retry_after }) => {
                    let wait = rate.on_throttled(retry_after);
                    warn!(channel, message = message.id, ?wait, "throttled, waiting before retry");
                    sleep(wait).await;
                    match self.client.delete_message(channel, message.id).await {
                        Ok(()) => {
                            summary.deleted += 1;
                            sleep(rate.delay_before_next()).await;
                        }
                        Err(e) => {
                            // One retry only; looping against a hard rate
                            // ceiling risks livelock.
                            warn!(channel, message = message.id, error = %e, "retry after throttle failed, moving on");
                        }
                    }
                }
                Err(DeleteError::Other(detail)) => {
                    warn!(channel, message = message.id, error = %detail, "delete failed, moving on");
                }
            }
        }
    }
}
