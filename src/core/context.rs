//! Shared operator-facing state.
//!
//! One explicit context object instead of ambient globals, passed to the
//! engine and the live monitor so tests can run independent instances and
//! concurrent channel runs stay isolated.

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use crate::core::cancel::CancelToken;
use crate::core::rate::{DelayPreset, DeletionDelay};
use crate::core::watch::WatchState;
use crate::core::whitelist::Whitelist;

pub struct BotContext {
    pub whitelist: RwLock<Whitelist>,
    pub watch: RwLock<WatchState>,
    pub delay: Arc<DeletionDelay>,
    // Token of the most recently started run; the operator stop command
    // targets this one. Each run owns its own token, so one run's stop never
    // terminates another.
    current_run: Mutex<Option<CancelToken>>,
}

impl BotContext {
    #[must_use]
    pub fn new(initial_delay: Duration) -> Self {
        Self {
            whitelist: RwLock::new(Whitelist::new()),
            watch: RwLock::new(WatchState::new()),
            delay: Arc::new(DeletionDelay::new(initial_delay)),
            current_run: Mutex::new(None),
        }
    }

    /// Mints a fresh token for a new run and registers it as the current
    /// target of the stop command.
    #[must_use]
    pub fn begin_run(&self) -> CancelToken {
        let token = CancelToken::new();
        *self.current_run.lock().unwrap() = Some(token.clone());
        token
    }

    /// Cancels the most recently started run. Returns false when no run has
    /// ever been started.
    pub fn stop_current_run(&self) -> bool {
        match self.current_run.lock().unwrap().as_ref() {
            Some(token) => {
                token.trigger();
                true
            }
            None => false,
        }
    }
}

impl Default for BotContext {
    fn default() -> Self {
        Self::new(DelayPreset::Conservative.duration())
    }
}
