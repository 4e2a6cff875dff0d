//! Discord gateway handler.
//!
//! Receives gateway events, feeds every incoming message through the live
//! monitor, and dispatches operator commands. Purge runs are spawned as
//! separate tasks so the gateway loop stays responsive to new messages and
//! to the stop command while a long scan is in flight.

use std::sync::{Arc, OnceLock};

use serenity::all::{Context, CreateMessage, EventHandler, GatewayIntents, Message, Ready, User};
use serenity::async_trait;
use serenity::http::{CacheHttp, HttpBuilder};
use tracing::{debug, error, info};

use crate::clients::ChatClient;
use crate::clients::discord::{DiscordClient, from_gateway};
use crate::commands::{self, Command, DelaySetting};
use crate::core::config::AppConfig;
use crate::core::context::BotContext;
use crate::core::engine::{PurgeEngine, PurgeOptions};
use crate::core::models::RunSummary;
use crate::core::monitor::LiveMonitor;
use crate::core::rate::DelayPreset;
use crate::core::watch::WatchTarget;

struct Runtime {
    client: Arc<DiscordClient>,
    engine: Arc<PurgeEngine>,
    monitor: LiveMonitor,
}

pub struct Handler {
    state: Arc<BotContext>,
    prefix: String,
    token: String,
    runtime: OnceLock<Arc<Runtime>>,
}

impl Handler {
    #[must_use]
    pub fn new(state: Arc<BotContext>, config: &AppConfig) -> Self {
        Self {
            state,
            prefix: config.command_prefix.clone(),
            token: config.discord_token.clone(),
            runtime: OnceLock::new(),
        }
    }

    /// Required gateway intents.
    #[must_use]
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    async fn dispatch(&self, ctx: &Context, msg: &Message, command: Command, rt: &Arc<Runtime>) {
        match command {
            Command::Purge { rule, limit } => {
                let cancel = self.state.begin_run();
                let options = PurgeOptions::new(rule).with_scan_ceiling(limit);
                let engine = rt.engine.clone();
                let channel = msg.channel_id.get();
                let caller = rt.client.self_id();
                let operator = msg.author.clone();
                let http = ctx.http.clone();
                tokio::spawn(async move {
                    match engine.run(channel, caller, options, cancel).await {
                        Ok(summary) => dm(&http, &operator, &summary_text(&summary)).await,
                        Err(e) => {
                            error!(channel, error = %e, "purge run failed");
                            dm(&http, &operator, &format!("Purge failed: {}", e)).await;
                        }
                    }
                });
            }
            Command::WatchUser(None) => {
                self.state.watch.write().unwrap().clear_target();
                dm(ctx, &msg.author, "Real-time monitoring disabled.").await;
            }
            Command::WatchUser(Some(id)) => {
                let target = self.state.watch.write().unwrap().toggle_user(id);
                let text = match target {
                    WatchTarget::User(_) => format!(
                        "Real-time monitoring enabled for user {}. Repeat the command to disable.",
                        id
                    ),
                    _ => "Real-time monitoring disabled.".to_string(),
                };
                dm(ctx, &msg.author, &text).await;
            }
            Command::WatchAll => {
                let target = self.state.watch.write().unwrap().toggle_everyone();
                let text = match target {
                    WatchTarget::Everyone => {
                        "Now watching everyone (own messages excluded).".to_string()
                    }
                    _ => "Real-time monitoring disabled.".to_string(),
                };
                dm(ctx, &msg.author, &text).await;
            }
            Command::WatchWord(word) => {
                let watching = self.state.watch.write().unwrap().toggle_word(&word);
                let text = if watching {
                    format!("Now watching word \"{}\".", word)
                } else {
                    format!("Stopped watching word \"{}\".", word)
                };
                dm(ctx, &msg.author, &text).await;
            }
            Command::Protect(id) => {
                let added = self.state.whitelist.write().unwrap().add(id);
                let text = if added {
                    format!("Message {} is now protected.", id)
                } else {
                    format!("Message {} was already protected.", id)
                };
                dm(ctx, &msg.author, &text).await;
            }
            Command::Unprotect(id) => {
                let removed = self.state.whitelist.write().unwrap().remove(id);
                let text = if removed {
                    format!("Message {} is no longer protected.", id)
                } else {
                    format!("Message {} was not protected.", id)
                };
                dm(ctx, &msg.author, &text).await;
            }
            Command::ProtectedList => {
                let entries = self.state.whitelist.read().unwrap().entries();
                let text = if entries.is_empty() {
                    "No protected messages.".to_string()
                } else {
                    format!(
                        "Protected messages: {}",
                        entries
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                };
                dm(ctx, &msg.author, &text).await;
            }
            Command::UnprotectAll => {
                self.state.whitelist.write().unwrap().clear();
                dm(ctx, &msg.author, "Cleared all protected messages.").await;
            }
            Command::SetDelay(setting) => {
                match setting {
                    DelaySetting::Preset(preset) => self.state.delay.set_preset(preset),
                    DelaySetting::Seconds(secs) => self
                        .state
                        .delay
                        .set(std::time::Duration::from_secs_f64(secs)),
                }
                let text = format!(
                    "Deletion delay set to {:.1}s.",
                    self.state.delay.get().as_secs_f64()
                );
                dm(ctx, &msg.author, &text).await;
            }
            Command::ShowDelay => {
                let text = format!(
                    "Deletion delay is {:.1}s (presets: conservative {:.1}s, fast {:.1}s, aggressive {:.1}s).",
                    self.state.delay.get().as_secs_f64(),
                    DelayPreset::Conservative.duration().as_secs_f64(),
                    DelayPreset::Fast.duration().as_secs_f64(),
                    DelayPreset::Aggressive.duration().as_secs_f64(),
                );
                dm(ctx, &msg.author, &text).await;
            }
            Command::Stop => {
                let text = if self.state.stop_current_run() {
                    "Stop requested for the current purge run."
                } else {
                    "No purge run to stop."
                };
                dm(ctx, &msg.author, text).await;
            }
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            account = %ready.user.name,
            guilds = ready.guilds.len(),
            "gateway ready"
        );

        // Deletes go through a dedicated Http with serenity's ratelimiter
        // disabled: pacing and throttle recovery belong to the engine.
        let http = Arc::new(
            HttpBuilder::new(&self.token)
                .ratelimiter_disabled(true)
                .build(),
        );
        let client = Arc::new(DiscordClient::new(http, ready.user.id.get()));
        let runtime = Arc::new(Runtime {
            client: client.clone(),
            engine: Arc::new(PurgeEngine::new(client.clone(), self.state.clone())),
            monitor: LiveMonitor::new(client, self.state.clone()),
        });
        let _ = self.runtime.set(runtime);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let Some(rt) = self.runtime.get() else {
            return;
        };

        let observed = from_gateway(&msg);
        rt.monitor.observe(&observed).await;

        // Commands are accepted from the authenticated account only.
        if msg.author.id.get() != rt.client.self_id() {
            return;
        }
        let Some(parsed) = commands::parse(&msg.content, &self.prefix, msg.author.id.get()) else {
            return;
        };

        // The command message itself is removed best-effort, as is every
        // operator notification below.
        if let Err(e) = msg.delete(&ctx.http).await {
            debug!(error = %e, "failed to delete command message");
        }

        match parsed {
            Ok(command) => self.dispatch(&ctx, &msg, command, rt).await,
            Err(e) => dm(&ctx, &msg.author, &format!("{}", e)).await,
        }
    }
}

fn summary_text(summary: &RunSummary) -> String {
    let verdict = if summary.cancelled {
        "Cancelled"
    } else {
        "Finished"
    };
    format!(
        "{}: deleted {} of {} scanned messages.",
        verdict, summary.deleted, summary.scanned
    )
}

async fn dm(cache_http: impl CacheHttp, user: &User, text: &str) {
    if let Err(e) = user
        .direct_message(cache_http, CreateMessage::new().content(text))
        .await
    {
        debug!(error = %e, "failed to notify operator");
    }
}
