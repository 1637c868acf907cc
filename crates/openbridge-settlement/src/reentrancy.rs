//! Reentrancy exclusion for transferring operations.
//!
//! The execution model serializes operations, so the only way two
//! settlement operations could interleave is a transfer callback
//! re-entering the core while an operation is mid-flight. The guard
//! makes that re-entry fail instead.

use openbridge_types::{BridgeError, Result};

/// Single-entry guard around operations that perform asset transfers.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    entered: bool,
}

impl ReentrancyGuard {
    /// Create a guard in the open state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the guarded section.
    ///
    /// # Errors
    /// Returns [`BridgeError::ReentrantCall`] if already entered.
    pub fn enter(&mut self) -> Result<()> {
        if self.entered {
            return Err(BridgeError::ReentrantCall);
        }
        self.entered = true;
        Ok(())
    }

    /// Leave the guarded section.
    pub fn exit(&mut self) {
        self.entered = false;
    }

    /// Whether a guarded operation is currently in flight.
    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.entered
    }
}
