//! In-flight mutation tracking.
//!
//! Each dialog submission holds a [`PendingGuard`] while its backend request
//! runs. A second submission for the same key is refused until the guard is
//! dropped, which happens when the handler returns (success or failure).

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shelfdesk_core::ProductId;
use uuid::Uuid;

/// What a pending mutation is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MutationKey {
    /// A create dialog, identified by the token rendered into its form.
    Create(Uuid),
    /// An update or delete of an existing product.
    Product(ProductId),
}

/// Set of mutations currently waiting on the backend.
#[derive(Debug, Clone, Default)]
pub struct PendingMutations {
    keys: Arc<Mutex<HashSet<MutationKey>>>,
}

impl PendingMutations {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as in flight.
    ///
    /// Returns `None` if the same key is already in flight.
    #[must_use]
    pub fn try_begin(&self, key: MutationKey) -> Option<PendingGuard> {
        if !self.lock().insert(key.clone()) {
            return None;
        }

        Some(PendingGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    #[cfg(test)]
    fn is_pending(&self, key: &MutationKey) -> bool {
        self.lock().contains(key)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<MutationKey>> {
        // The set holds plain keys; a panic mid-insert cannot leave it inconsistent.
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears its key from [`PendingMutations`] when dropped.
#[derive(Debug)]
#[must_use = "the mutation is only marked pending while the guard is alive"]
pub struct PendingGuard {
    keys: Arc<Mutex<HashSet<MutationKey>>>,
    key: MutationKey,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_key(id: i64) -> MutationKey {
        MutationKey::Product(ProductId::from_number(id))
    }

    #[test]
    fn test_second_begin_for_same_key_is_refused() {
        let pending = PendingMutations::new();
        let guard = pending.try_begin(product_key(1));
        assert!(guard.is_some());
        assert!(pending.try_begin(product_key(1)).is_none());
        assert!(pending.is_pending(&product_key(1)));
    }

    #[test]
    fn test_different_keys_are_independent() {
        let pending = PendingMutations::new();
        let _a = pending.try_begin(product_key(1));
        let b = pending.try_begin(product_key(2));
        assert!(b.is_some());
    }

    #[test]
    fn test_drop_releases_key() {
        let pending = PendingMutations::new();
        {
            let guard = pending.try_begin(product_key(1));
            assert!(guard.is_some());
        }
        assert!(!pending.is_pending(&product_key(1)));
        assert!(pending.try_begin(product_key(1)).is_some());
    }

    #[test]
    fn test_create_tokens_are_distinct_keys() {
        let pending = PendingMutations::new();
        let token = Uuid::new_v4();
        let _first = pending.try_begin(MutationKey::Create(token));
        assert!(pending.try_begin(MutationKey::Create(token)).is_none());
        assert!(pending.try_begin(MutationKey::Create(Uuid::new_v4())).is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let pending = PendingMutations::new();
        let clone = pending.clone();
        let _guard = pending.try_begin(product_key(5));
        assert!(clone.is_pending(&product_key(5)));
    }
}
