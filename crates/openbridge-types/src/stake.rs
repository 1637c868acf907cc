//! Accrual pool state: the share-accounting shape shared by liquidity
//! mining pools, bridge farms, and staking-reward pools.
//!
//! All three are the same primitive with a different funding source:
//!
//! - mining pools and farms pull from a fixed **emission schedule**;
//! - reward pools pull from a **deposited reward balance**.
//!
//! The invariant that makes rewards exact:
//!
//! ```text
//! pending(position) = staked_amount × acc_reward_per_share − reward_debt
//! ```
//!
//! `reward_debt` is resynchronized to the current accumulator on every
//! stake, unstake, and harvest, so rewards are never double-counted and
//! never lost. The mutation logic lives in `openbridge-accounting`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Asset};

/// Every pool a `createPools` call can initialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    /// Share-based liquidity pool.
    Liquidity,
    /// Liquidity mining pool (emission-funded accrual).
    Mining,
    /// Bridge farm (emission-funded accrual).
    Farm,
    /// Staking-reward pool (balance-funded accrual).
    Reward,
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Liquidity => write!(f, "LIQUIDITY"),
            Self::Mining => write!(f, "MINING"),
            Self::Farm => write!(f, "FARM"),
            Self::Reward => write!(f, "REWARD"),
        }
    }
}

/// The accrual pool kinds (everything except the liquidity pool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakePoolKind {
    Mining,
    Farm,
    Reward,
}

impl StakePoolKind {
    #[must_use]
    pub fn as_pool_kind(self) -> PoolKind {
        match self {
            Self::Mining => PoolKind::Mining,
            Self::Farm => PoolKind::Farm,
            Self::Reward => PoolKind::Reward,
        }
    }
}

impl std::fmt::Display for StakePoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_pool_kind().fmt(f)
    }
}

/// Which pools a `createPools` call should initialize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSelection {
    pub liquidity: bool,
    pub mining: bool,
    pub farm: bool,
    pub reward: bool,
}

impl PoolSelection {
    /// Select every pool kind.
    #[must_use]
    pub fn all() -> Self {
        Self {
            liquidity: true,
            mining: true,
            farm: true,
            reward: true,
        }
    }

    /// Select only the liquidity pool.
    #[must_use]
    pub fn liquidity_only() -> Self {
        Self {
            liquidity: true,
            ..Self::default()
        }
    }

    /// Whether the selection names at least one pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.liquidity || self.mining || self.farm || self.reward)
    }
}

/// Where an accrual pool's rewards come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingSource {
    /// Fixed emission: `rate_per_sec` reward units accrue per second
    /// while the pool has stake. Intervals with zero stake never mint.
    Emission { rate_per_sec: Decimal },
    /// Deposited reward funds, distributed in full at the next accrual
    /// point that finds a non-zero stake.
    RewardBalance { available: Decimal },
}

impl FundingSource {
    /// Reward this source would produce for an elapsed interval, given the
    /// stake that stood for that interval. Pure; used for read-only
    /// pending-reward projections.
    ///
    /// With zero stake nothing is produced: emission for the interval is
    /// simply never minted, and a reward balance stays put until stake
    /// exists. The accumulated total is never divided by zero and no
    /// reward is retroactively granted to a later staker.
    #[must_use]
    pub fn preview(&self, elapsed_secs: u64, total_staked: Decimal) -> Decimal {
        if total_staked.is_zero() {
            return Decimal::ZERO;
        }
        match self {
            Self::Emission { rate_per_sec } => *rate_per_sec * Decimal::from(elapsed_secs),
            Self::RewardBalance { available } => *available,
        }
    }

    /// Like [`preview`](Self::preview), but actually draws the reward:
    /// a reward balance drains when it pays out.
    pub fn accrue(&mut self, elapsed_secs: u64, total_staked: Decimal) -> Decimal {
        let payout = self.preview(elapsed_secs, total_staked);
        if let Self::RewardBalance { available } = self {
            *available -= payout;
        }
        payout
    }

    /// Top up a reward-balance source. No effect on emission schedules
    /// (their budget lives outside the pool).
    pub fn fund(&mut self, amount: Decimal) {
        if let Self::RewardBalance { available } = self {
            *available += amount;
        }
    }
}

/// A staker's slice of an accrual pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakePosition {
    pub staker: Address,
    pub staked_amount: Decimal,
    /// `staked_amount × acc_reward_per_share` at the last settlement point.
    pub reward_debt: Decimal,
}

impl StakePosition {
    #[must_use]
    pub fn new(staker: Address) -> Self {
        Self {
            staker,
            staked_amount: Decimal::ZERO,
            reward_debt: Decimal::ZERO,
        }
    }

    /// Pending reward against a given accumulator value.
    #[must_use]
    pub fn pending_at(&self, acc_reward_per_share: Decimal) -> Decimal {
        (self.staked_amount * acc_reward_per_share - self.reward_debt).max(Decimal::ZERO)
    }

    /// Resynchronize the debt to the current accumulator, zeroing pending.
    pub fn sync_debt(&mut self, acc_reward_per_share: Decimal) {
        self.reward_debt = self.staked_amount * acc_reward_per_share;
    }
}

/// An accrual pool: principal total plus a reward-per-share accumulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrualPool {
    /// The staked asset.
    pub asset: Asset,
    /// The asset rewards are paid in.
    pub reward_asset: Asset,
    /// Sum of all positions' `staked_amount`.
    pub total_staked: Decimal,
    /// Accumulated reward per staked unit since pool creation.
    pub acc_reward_per_share: Decimal,
    /// Unix seconds of the last accrual update.
    pub last_update: u64,
    /// Where rewards come from.
    pub funding: FundingSource,
    /// Per-staker positions.
    pub positions: HashMap<Address, StakePosition>,
}

impl AccrualPool {
    /// Create an empty pool. The accumulator baseline is zero and the
    /// clock starts at `now`.
    #[must_use]
    pub fn new(asset: impl Into<Asset>, reward_asset: impl Into<Asset>, funding: FundingSource, now: u64) -> Self {
        Self {
            asset: asset.into(),
            reward_asset: reward_asset.into(),
            total_staked: Decimal::ZERO,
            acc_reward_per_share: Decimal::ZERO,
            last_update: now,
            funding,
            positions: HashMap::new(),
        }
    }

    /// A staker's position, if any.
    #[must_use]
    pub fn position(&self, staker: Address) -> Option<&StakePosition> {
        self.positions.get(&staker)
    }

    /// A staker's staked amount (zero if no position).
    #[must_use]
    pub fn staked_amount(&self, staker: Address) -> Decimal {
        self.positions
            .get(&staker)
            .map_or(Decimal::ZERO, |p| p.staked_amount)
    }
}
