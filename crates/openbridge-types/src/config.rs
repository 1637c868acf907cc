//! Configuration types for an OpenBridge deployment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, Asset, ChainId};

/// Configuration for a single bridge deployment (one ledger's side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// This ledger's own chain identifier. Bound into every release
    /// digest so signatures cannot be replayed across ledgers.
    pub chain_id: ChainId,
    /// Fee rate configuration.
    pub fees: FeeConfig,
    /// Accrual pool reward configuration.
    pub rewards: RewardConfig,
}

impl BridgeConfig {
    /// Create a config for the given ledger with default fee and reward
    /// settings.
    #[must_use]
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            fees: FeeConfig::default(),
            rewards: RewardConfig::default(),
        }
    }
}

/// Default fee rates in parts-per-million.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Bridge fee rate, applied at release against the bridged amount.
    pub bridge_ppm: u64,
    /// Withdrawal fee rate, applied on liquidity redemption.
    pub withdrawal_ppm: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            bridge_ppm: constants::DEFAULT_BRIDGE_FEE_PPM,
            withdrawal_ppm: constants::DEFAULT_WITHDRAWAL_FEE_PPM,
        }
    }
}

/// Reward settings applied when accrual pools are created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardConfig {
    /// The asset accrual pools pay rewards in.
    pub reward_asset: Asset,
    /// Emission rate for liquidity mining pools (reward units per second).
    pub mining_rate_per_sec: Decimal,
    /// Emission rate for bridge farms (reward units per second).
    pub farm_rate_per_sec: Decimal,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            reward_asset: "OBR".to_string(),
            mining_rate_per_sec: Decimal::ONE,
            farm_rate_per_sec: Decimal::ONE,
        }
    }
}
