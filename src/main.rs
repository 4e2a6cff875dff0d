use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::error;

use purgecord::bot::Handler;
use purgecord::core::config::AppConfig;
use purgecord::core::context::BotContext;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    purgecord::setup_logging();

    let config = AppConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("loading configuration")?;

    let state = Arc::new(BotContext::new(config.initial_delay()));
    let handler = Handler::new(state, &config);

    let mut client = serenity::Client::builder(&config.discord_token, Handler::intents())
        .event_handler(handler)
        .await
        .context("building Discord client")?;

    if let Err(e) = client.start().await {
        error!(error = %e, "gateway connection ended");
        return Err(e.into());
    }

    Ok(())
}
