//! purgecord - bulk-deletes Discord messages matching configurable rules and
//! optionally auto-deletes newly arriving ones.
//!
//! The crate splits into:
//! 1. A purge core: rule predicates, a whitelist, adaptive rate control, and
//!    the scan/filter/delete engine plus the live-monitoring callback.
//! 2. A thin platform binding: a [`clients::ChatClient`] trait with a
//!    serenity-backed implementation, and the gateway/command plumbing.
//!
//! The core never talks to Discord directly, so every engine behavior is
//! testable against an in-memory client.

pub mod bot;
pub mod clients;
pub mod commands;
pub mod core;
pub mod errors;

/// Configure structured logging for terminal output.
///
/// Level filtering follows `RUST_LOG` when set and defaults to `info`.
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
