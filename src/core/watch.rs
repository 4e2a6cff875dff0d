//! Live-monitoring configuration.
//!
//! Every mutation is a toggle: re-issuing the command that established a
//! piece of state tears it down again. The target is an explicit tagged
//! union with pure transition functions so the toggle laws are testable
//! without any gateway plumbing.

use std::collections::HashSet;

use crate::core::models::UserId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WatchTarget {
    #[default]
    None,
    User(UserId),
    Everyone,
}

impl WatchTarget {
    /// Toggling the same user off returns to `None`; any other user (or an
    /// active `Everyone`) is replaced, not merged.
    #[must_use]
    pub fn toggle_user(self, id: UserId) -> Self {
        match self {
            WatchTarget::User(current) if current == id => WatchTarget::None,
            _ => WatchTarget::User(id),
        }
    }

    #[must_use]
    pub fn toggle_everyone(self) -> Self {
        match self {
            WatchTarget::Everyone => WatchTarget::None,
            _ => WatchTarget::Everyone,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct WatchState {
    pub target: WatchTarget,
    // Stored lowercase; membership is case-insensitive.
    words: HashSet<String>,
}

impl WatchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_user(&mut self, id: UserId) -> WatchTarget {
        self.target = self.target.toggle_user(id);
        self.target
    }

    pub fn toggle_everyone(&mut self) -> WatchTarget {
        self.target = self.target.toggle_everyone();
        self.target
    }

    /// Clears the target outright (the no-argument form of the watch command).
    pub fn clear_target(&mut self) {
        self.target = WatchTarget::None;
    }

    /// Adds the word, or removes it if already present. Returns true when the
    /// word is watched after the call.
    pub fn toggle_word(&mut self, word: &str) -> bool {
        let normalized = word.to_lowercase();
        if self.words.remove(&normalized) {
            false
        } else {
            self.words.insert(normalized);
            true
        }
    }

    /// Whether `content` contains any watched word, case-insensitively.
    #[must_use]
    pub fn matches_word(&self, content: &str) -> bool {
        if self.words.is_empty() {
            return false;
        }
        let lowered = content.to_lowercase();
        self.words.iter().any(|w| lowered.contains(w))
    }

    #[must_use]
    pub fn words(&self) -> Vec<String> {
        let mut out: Vec<String> = self.words.iter().cloned().collect();
        out.sort();
        out
    }
}
