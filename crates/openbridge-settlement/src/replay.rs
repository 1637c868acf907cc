//! Release-side replay defense: the used-deposit-key set.
//!
//! Each (source chain, deposit number) key can authorize exactly one
//! release on this ledger. The set is checked and updated in the same
//! atomic step as the asset transfer, so no window exists in which a
//! release is authorized twice.
//!
//! The set is deliberately unbounded. A bounded cache with eviction
//! would re-open the replay window for evicted keys, and there is no
//! sequencing on the release side that could make old keys unreplayable.

use std::collections::HashSet;

use openbridge_types::{constants::RELEASED_KEYS_INITIAL_CAPACITY, BridgeError, DepositKey, Result};

/// The set of deposit keys that have already been released here.
pub struct ReleasedKeys {
    keys: HashSet<DepositKey>,
}

impl ReleasedKeys {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: HashSet::with_capacity(RELEASED_KEYS_INITIAL_CAPACITY),
        }
    }

    /// Check whether a key has been used (without marking it).
    #[must_use]
    pub fn is_released(&self, key: &DepositKey) -> bool {
        self.keys.contains(key)
    }

    /// Consume a key. Returns an error if it was already used.
    ///
    /// # Errors
    /// Returns [`BridgeError::ReplayedDeposit`] if `key` is present.
    pub fn mark_released(&mut self, key: DepositKey) -> Result<()> {
        if !self.keys.insert(key) {
            return Err(BridgeError::ReplayedDeposit(key));
        }
        Ok(())
    }

    /// Number of keys consumed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key has been consumed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for ReleasedKeys {
    fn default() -> Self {
        Self::new()
    }
}
