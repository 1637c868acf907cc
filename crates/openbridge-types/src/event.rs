//! Domain events for the OpenBridge audit trail.
//!
//! Every state-changing operation appends an [`EventRecord`] to the
//! orchestrator's journal. The off-ledger relay drains the journal to
//! observe deposits (and the deposit numbers it needs to construct
//! release digests on the other ledger).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Asset, ChainId, DepositKey, EventId, PoolKind, StakePoolKind};

/// A domain notification emitted by a settlement operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeEvent {
    /// A deposit was recorded; the relay needs `key.number` for the
    /// future release digest.
    DepositRecorded {
        key: DepositKey,
        asset: Asset,
        amount: Decimal,
        receiver: Address,
        target_chain: ChainId,
    },
    /// A quorum-authorized release was delivered.
    Released {
        key: DepositKey,
        asset: Asset,
        amount: Decimal,
        fee: Decimal,
        receiver: Address,
    },
    /// A pool was initialized for a newly listed asset.
    PoolCreated { asset: Asset, kind: PoolKind },
    /// Liquidity was added and shares minted.
    LiquidityAdded {
        provider: Address,
        asset: Asset,
        amount: Decimal,
        shares_minted: Decimal,
    },
    /// Shares were burned and principal redeemed.
    LiquidityRemoved {
        provider: Address,
        asset: Asset,
        shares_burned: Decimal,
        amount_out: Decimal,
        fee: Decimal,
    },
    /// Stake was added to an accrual pool.
    StakeAdded {
        staker: Address,
        kind: StakePoolKind,
        asset: Asset,
        amount: Decimal,
        reward_paid: Decimal,
    },
    /// Stake was withdrawn from an accrual pool.
    StakeWithdrawn {
        staker: Address,
        kind: StakePoolKind,
        asset: Asset,
        amount: Decimal,
        reward_paid: Decimal,
    },
    /// Pending rewards were harvested without touching the stake.
    RewardsHarvested {
        staker: Address,
        kind: StakePoolKind,
        asset: Asset,
        reward: Decimal,
    },
    /// A source-ledger asset was mapped to a local asset.
    MappingAdded {
        source_asset: Asset,
        local_asset: Asset,
    },
    /// A mapping was removed.
    MappingRemoved { source_asset: Asset },
}

impl BridgeEvent {
    /// Stable event name for logs and relay filters.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DepositRecorded { .. } => "DEPOSIT_RECORDED",
            Self::Released { .. } => "RELEASED",
            Self::PoolCreated { .. } => "POOL_CREATED",
            Self::LiquidityAdded { .. } => "LIQUIDITY_ADDED",
            Self::LiquidityRemoved { .. } => "LIQUIDITY_REMOVED",
            Self::StakeAdded { .. } => "STAKE_ADDED",
            Self::StakeWithdrawn { .. } => "STAKE_WITHDRAWN",
            Self::RewardsHarvested { .. } => "REWARDS_HARVESTED",
            Self::MappingAdded { .. } => "MAPPING_ADDED",
            Self::MappingRemoved { .. } => "MAPPING_REMOVED",
        }
    }
}

/// A journal entry: event payload plus identity and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub at: DateTime<Utc>,
    pub event: BridgeEvent,
}

impl EventRecord {
    #[must_use]
    pub fn new(event: BridgeEvent) -> Self {
        Self {
            id: EventId::new(),
            at: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChainId, DepositNumber};

    #[test]
    fn event_names_are_stable() {
        let ev = BridgeEvent::MappingRemoved {
            source_asset: "0xabc".to_string(),
        };
        assert_eq!(ev.name(), "MAPPING_REMOVED");

        let ev = BridgeEvent::PoolCreated {
            asset: "USDC".to_string(),
            kind: PoolKind::Farm,
        };
        assert_eq!(ev.name(), "POOL_CREATED");
    }

    #[test]
    fn records_are_time_ordered() {
        let a = EventRecord::new(BridgeEvent::MappingRemoved {
            source_asset: "x".to_string(),
        });
        let b = EventRecord::new(BridgeEvent::MappingRemoved {
            source_asset: "y".to_string(),
        });
        assert!(a.id < b.id);
    }

    #[test]
    fn serde_roundtrip() {
        let ev = BridgeEvent::DepositRecorded {
            key: DepositKey::new(ChainId(1), DepositNumber(9)),
            asset: "USDC".to_string(),
            amount: Decimal::new(100, 0),
            receiver: Address([3u8; 32]),
            target_chain: ChainId(2),
        };
        let record = EventRecord::new(ev.clone());
        let json = serde_json::to_string(&record).unwrap();
        let back: EventRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event, ev);
        assert_eq!(back.id, record.id);
    }
}
