use std::env;
use std::time::Duration;

use crate::core::rate::DelayPreset;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord_token: String,
    pub command_prefix: String,
    pub purge_delay_secs: Option<f64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            discord_token: env::var("DISCORD_TOKEN").map_err(|e| format!("DISCORD_TOKEN: {}", e))?,
            command_prefix: env::var("COMMAND_PREFIX").unwrap_or_else(|_| ".".to_string()),
            purge_delay_secs: env::var("PURGE_DELAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
        })
    }

    /// Inter-delete delay at startup; the conservative preset unless
    /// overridden by `PURGE_DELAY_SECS`.
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        self.purge_delay_secs
            .filter(|s| *s >= 0.0)
            .map(Duration::from_secs_f64)
            .unwrap_or_else(|| DelayPreset::Conservative.duration())
    }
}
