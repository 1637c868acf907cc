//! # Deposit: the cross-ledger transfer record
//!
//! A `Deposit` is created when a holder locks value on the source ledger.
//! The record never leaves the ledger (audit trail); its status moves
//! through a one-way state machine:
//!
//! ```text
//!   ┌─────────┐  quorum-authorized release   ┌──────────┐
//!   │ PENDING ├─────────────────────────────▶│ RELEASED │
//!   └─────────┘                              └──────────┘
//! ```
//!
//! The transition is **irreversible** and happens exactly once. On the
//! release side of the bridge, the same guarantee is enforced by the
//! used-deposit-key set rather than by mirrored records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Asset, BridgeError, ChainId, DepositKey, DepositNumber};

/// The lifecycle state of a deposit.
///
/// Transitions are monotonic: `Pending → Released`, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepositStatus {
    /// Value is locked on the source ledger, awaiting release elsewhere.
    Pending,
    /// The bridged value has been delivered. **Irreversible.**
    Released,
}

impl DepositStatus {
    /// Can this status transition to the given target?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Pending, Self::Released))
    }
}

impl std::fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Released => write!(f, "RELEASED"),
        }
    }
}

/// An inbound deposit recorded by the deposit ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    /// The ledger this deposit was recorded on.
    pub source_chain: ChainId,
    /// Sequence number, unique and strictly increasing per direction.
    pub number: DepositNumber,
    /// The locked asset.
    pub asset: Asset,
    /// The locked amount (gross; the bridge fee is applied at release).
    pub amount: Decimal,
    /// Who receives the bridged value on the target ledger.
    pub receiver: Address,
    /// The ledger the value is to be released on.
    pub target_chain: ChainId,
    /// Current lifecycle state.
    pub status: DepositStatus,
    /// When the deposit was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl Deposit {
    /// The globally unique replay key of this deposit.
    #[must_use]
    pub fn key(&self) -> DepositKey {
        DepositKey::new(self.source_chain, self.number)
    }

    /// Attempt the one-way transition to RELEASED.
    ///
    /// # Errors
    /// Returns [`BridgeError::AlreadyReleased`] if the deposit is not Pending.
    pub fn mark_released(&mut self) -> crate::Result<()> {
        if !self.status.can_transition_to(DepositStatus::Released) {
            return Err(BridgeError::AlreadyReleased(self.key()));
        }
        self.status = DepositStatus::Released;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_deposit() -> Deposit {
        Deposit {
            source_chain: ChainId(1),
            number: DepositNumber(1),
            asset: "USDC".to_string(),
            amount: Decimal::new(50_000, 2),
            receiver: Address([1u8; 32]),
            target_chain: ChainId(2),
            status: DepositStatus::Pending,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn status_transitions() {
        assert!(DepositStatus::Pending.can_transition_to(DepositStatus::Released));
        assert!(!DepositStatus::Released.can_transition_to(DepositStatus::Pending));
        assert!(!DepositStatus::Released.can_transition_to(DepositStatus::Released));
    }

    #[test]
    fn mark_released_from_pending() {
        let mut dep = make_deposit();
        assert!(dep.mark_released().is_ok());
        assert_eq!(dep.status, DepositStatus::Released);
    }

    #[test]
    fn double_release_blocked() {
        let mut dep = make_deposit();
        dep.mark_released().unwrap();
        let err = dep.mark_released().unwrap_err();
        assert!(matches!(err, BridgeError::AlreadyReleased(key) if key == dep.key()));
    }

    #[test]
    fn key_binds_chain_and_number() {
        let dep = make_deposit();
        assert_eq!(dep.key(), DepositKey::new(ChainId(1), DepositNumber(1)));
    }

    #[test]
    fn serde_roundtrip() {
        let dep = make_deposit();
        let json = serde_json::to_string(&dep).unwrap();
        let back: Deposit = serde_json::from_str(&json).unwrap();
        assert_eq!(dep.key(), back.key());
        assert_eq!(dep.amount, back.amount);
        assert_eq!(dep.status, back.status);
    }
}
