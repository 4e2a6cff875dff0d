use std::collections::HashSet;

use crate::core::models::MessageId;

/// Message ids exempted from every deletion path. Checked before the purge
/// predicate in the batch path and before watch evaluation in the live path.
#[derive(Debug, Default, Clone)]
pub struct Whitelist {
    ids: HashSet<MessageId>,
}

impl Whitelist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the id was already protected (idempotent).
    pub fn add(&mut self, id: MessageId) -> bool {
        self.ids.insert(id)
    }

    /// Returns false if the id was not protected (idempotent).
    pub fn remove(&mut self, id: MessageId) -> bool {
        self.ids.remove(&id)
    }

    #[must_use]
    pub fn is_protected(&self, id: MessageId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sorted snapshot, for operator-facing listings.
    #[must_use]
    pub fn entries(&self) -> Vec<MessageId> {
        let mut out: Vec<MessageId> = self.ids.iter().copied().collect();
        out.sort_unstable();
        out
    }
}
