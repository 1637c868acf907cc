//! The deposit ledger: outbound deposit records and sequence assignment.
//!
//! Every inbound deposit gets the next sequence number for its direction
//! (this ledger, target ledger), strictly increasing for the lifetime of
//! the bridge. The number is returned to the caller for inclusion in the
//! emitted event: the off-ledger relay needs it to construct the release
//! digest on the target ledger.
//!
//! Records are never deleted. They are the audit trail of everything the
//! bridge has escrowed.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::debug;

use openbridge_types::{
    Address, Asset, BridgeError, ChainId, Deposit, DepositKey, DepositNumber, DepositStatus,
    Result,
};

/// Outbound deposit records plus per-direction sequence counters.
pub struct DepositLedger {
    /// The ledger these deposits originate from (this deployment's chain).
    chain_id: ChainId,
    /// Highest assigned sequence number per target chain.
    counters: HashMap<ChainId, DepositNumber>,
    /// Full records, keyed by their replay key.
    deposits: HashMap<DepositKey, Deposit>,
}

impl DepositLedger {
    /// Create an empty ledger for this chain.
    #[must_use]
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            counters: HashMap::new(),
            deposits: HashMap::new(),
        }
    }

    /// Record a deposit and assign the next sequence number for the
    /// (this ledger, `target_chain`) direction. Numbers start at 1.
    pub fn record(
        &mut self,
        asset: impl Into<Asset>,
        amount: Decimal,
        receiver: Address,
        target_chain: ChainId,
    ) -> DepositNumber {
        let counter = self
            .counters
            .entry(target_chain)
            .or_insert(DepositNumber(0));
        *counter = counter.next();
        let number = *counter;

        let deposit = Deposit {
            source_chain: self.chain_id,
            number,
            asset: asset.into(),
            amount,
            receiver,
            target_chain,
            status: DepositStatus::Pending,
            recorded_at: Utc::now(),
        };
        debug!(
            key = %deposit.key(),
            asset = %deposit.asset,
            amount = %deposit.amount,
            target = %target_chain,
            "Deposit recorded"
        );
        self.deposits.insert(deposit.key(), deposit);
        number
    }

    /// Mark a mirrored deposit record as released.
    ///
    /// Used by deployments that mirror deposit state from the source side.
    /// (The more common release-side replay defense is [`crate::ReleasedKeys`].)
    ///
    /// # Errors
    /// - [`BridgeError::DepositNotFound`] if no record exists for the key
    /// - [`BridgeError::AlreadyReleased`] if the record is not Pending
    pub fn mark_released(&mut self, key: DepositKey) -> Result<()> {
        let deposit = self
            .deposits
            .get_mut(&key)
            .ok_or(BridgeError::DepositNotFound(key))?;
        deposit.mark_released()
    }

    /// Look up a deposit record.
    #[must_use]
    pub fn get(&self, key: &DepositKey) -> Option<&Deposit> {
        self.deposits.get(key)
    }

    /// The last assigned sequence number toward a target chain.
    #[must_use]
    pub fn last_number(&self, target_chain: ChainId) -> Option<DepositNumber> {
        self.counters.get(&target_chain).copied()
    }

    /// Number of records in the ledger.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deposits.len()
    }

    /// Whether the ledger has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deposits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL: ChainId = ChainId(1);
    const TARGET: ChainId = ChainId(2);

    fn record(ledger: &mut DepositLedger, target: ChainId) -> DepositNumber {
        ledger.record("USDC", Decimal::new(100, 0), Address([1u8; 32]), target)
    }

    #[test]
    fn numbers_are_strictly_increasing_per_direction() {
        let mut ledger = DepositLedger::new(LOCAL);
        assert_eq!(record(&mut ledger, TARGET), DepositNumber(1));
        assert_eq!(record(&mut ledger, TARGET), DepositNumber(2));
        assert_eq!(record(&mut ledger, TARGET), DepositNumber(3));
    }

    #[test]
    fn directions_count_independently() {
        let mut ledger = DepositLedger::new(LOCAL);
        record(&mut ledger, TARGET);
        record(&mut ledger, TARGET);
        // A different target chain starts its own sequence.
        assert_eq!(record(&mut ledger, ChainId(9)), DepositNumber(1));
        assert_eq!(ledger.last_number(TARGET), Some(DepositNumber(2)));
        assert_eq!(ledger.last_number(ChainId(9)), Some(DepositNumber(1)));
    }

    #[test]
    fn records_are_retrievable_and_pending() {
        let mut ledger = DepositLedger::new(LOCAL);
        let number = record(&mut ledger, TARGET);
        let key = DepositKey::new(LOCAL, number);
        let deposit = ledger.get(&key).unwrap();
        assert_eq!(deposit.status, DepositStatus::Pending);
        assert_eq!(deposit.amount, Decimal::new(100, 0));
        assert_eq!(deposit.target_chain, TARGET);
    }

    #[test]
    fn mark_released_exactly_once() {
        let mut ledger = DepositLedger::new(LOCAL);
        let number = record(&mut ledger, TARGET);
        let key = DepositKey::new(LOCAL, number);

        ledger.mark_released(key).unwrap();
        assert_eq!(ledger.get(&key).unwrap().status, DepositStatus::Released);

        let err = ledger.mark_released(key).unwrap_err();
        assert!(matches!(err, BridgeError::AlreadyReleased(k) if k == key));
    }

    #[test]
    fn mark_released_unknown_key_fails() {
        let mut ledger = DepositLedger::new(LOCAL);
        let key = DepositKey::new(LOCAL, DepositNumber(42));
        let err = ledger.mark_released(key).unwrap_err();
        assert!(matches!(err, BridgeError::DepositNotFound(k) if k == key));
    }

    #[test]
    fn records_are_never_deleted() {
        let mut ledger = DepositLedger::new(LOCAL);
        let number = record(&mut ledger, TARGET);
        let key = DepositKey::new(LOCAL, number);
        ledger.mark_released(key).unwrap();
        // Released records stay in the ledger as the audit trail.
        assert_eq!(ledger.len(), 1);
        assert!(ledger.get(&key).is_some());
    }
}
