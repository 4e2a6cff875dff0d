//! Pacing between delete calls.
//!
//! The controller is reactive: it holds a configured inter-delete delay and
//! answers throttling signals with the platform's own retry-after plus a
//! fixed safety margin. No attempt is made to predict the platform's rate
//! ceiling.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Added on top of the platform's retry-after before the single retry.
pub const THROTTLE_SAFETY_MARGIN: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayPreset {
    Conservative,
    Fast,
    Aggressive,
}

impl DelayPreset {
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            DelayPreset::Conservative => Duration::from_millis(2200),
            DelayPreset::Fast => Duration::from_millis(1200),
            DelayPreset::Aggressive => Duration::from_millis(600),
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "conservative" => Some(DelayPreset::Conservative),
            "fast" => Some(DelayPreset::Fast),
            "aggressive" => Some(DelayPreset::Aggressive),
            _ => None,
        }
    }
}

/// Process-wide inter-delete delay, mutable by operator command and read by
/// the rate controller before every delete. Stored as millis so reads stay
/// lock-free on the cooperative scheduler.
#[derive(Debug)]
pub struct DeletionDelay(AtomicU64);

impl DeletionDelay {
    #[must_use]
    pub fn new(initial: Duration) -> Self {
        Self(AtomicU64::new(initial.as_millis() as u64))
    }

    #[must_use]
    pub fn get(&self) -> Duration {
        Duration::from_millis(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, delay: Duration) {
        self.0.store(delay.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn set_preset(&self, preset: DelayPreset) {
        self.set(preset.duration());
    }
}

impl Default for DeletionDelay {
    fn default() -> Self {
        Self::new(DelayPreset::Conservative.duration())
    }
}

#[derive(Debug, Clone)]
pub struct RateController {
    delay: Arc<DeletionDelay>,
}

impl RateController {
    #[must_use]
    pub fn new(delay: Arc<DeletionDelay>) -> Self {
        Self { delay }
    }

    /// The pause between a confirmed delete and the next scan step. Read
    /// fresh per delete, so operator changes apply mid-run.
    #[must_use]
    pub fn delay_before_next(&self) -> Duration {
        self.delay.get()
    }

    /// The mandatory wait before the single retry of a throttled delete.
    #[must_use]
    pub fn on_throttled(&self, retry_after: Duration) -> Duration {
        retry_after + THROTTLE_SAFETY_MARGIN
    }
}
