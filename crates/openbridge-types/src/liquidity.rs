//! Liquidity pool state: pooled reserve plus fungible share claims.
//!
//! Shares are a proportional claim on the reserve. While the supply is
//! positive, `reserve / share_supply` is the redemption rate. The first
//! provider mints 1:1; later providers mint pro-rata (the math lives in
//! `openbridge-accounting`).

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Asset, BridgeError};

/// A single-asset liquidity pool backing liquidity-routed releases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityPool {
    /// The pooled asset.
    pub asset: Asset,
    /// Principal currently held by the pool.
    pub reserve: Decimal,
    /// Total shares outstanding.
    pub share_supply: Decimal,
    /// Per-provider share balances.
    pub shares: HashMap<Address, Decimal>,
}

impl LiquidityPool {
    /// Create an empty pool for an asset.
    #[must_use]
    pub fn new(asset: impl Into<Asset>) -> Self {
        Self {
            asset: asset.into(),
            reserve: Decimal::ZERO,
            share_supply: Decimal::ZERO,
            shares: HashMap::new(),
        }
    }

    /// Share balance of a provider (zero if never deposited).
    #[must_use]
    pub fn share_balance(&self, provider: Address) -> Decimal {
        self.shares.get(&provider).copied().unwrap_or(Decimal::ZERO)
    }

    /// Whether the pool holds no reserve and no shares.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reserve.is_zero() && self.share_supply.is_zero()
    }

    /// Grant freshly minted shares to a provider and grow the supply.
    pub fn grant_shares(&mut self, provider: Address, shares: Decimal) {
        *self.shares.entry(provider).or_insert(Decimal::ZERO) += shares;
        self.share_supply += shares;
    }

    /// Burn a provider's shares and shrink the supply.
    ///
    /// # Errors
    /// Returns [`BridgeError::InsufficientLiquidity`] if the provider holds
    /// fewer shares than requested. The pool is unchanged on failure.
    pub fn burn_shares(&mut self, provider: Address, shares: Decimal) -> crate::Result<()> {
        let held = self.share_balance(provider);
        if shares > held {
            return Err(BridgeError::InsufficientLiquidity {
                needed: shares,
                available: held,
            });
        }
        let remaining = held - shares;
        if remaining.is_zero() {
            self.shares.remove(&provider);
        } else {
            self.shares.insert(provider, remaining);
        }
        self.share_supply -= shares;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pool_is_empty() {
        let pool = LiquidityPool::new("USDC");
        assert!(pool.is_empty());
        assert_eq!(pool.share_balance(Address([1u8; 32])), Decimal::ZERO);
    }

    #[test]
    fn grant_and_burn_shares() {
        let mut pool = LiquidityPool::new("USDC");
        let alice = Address([1u8; 32]);

        pool.grant_shares(alice, Decimal::new(100, 0));
        assert_eq!(pool.share_balance(alice), Decimal::new(100, 0));
        assert_eq!(pool.share_supply, Decimal::new(100, 0));

        pool.burn_shares(alice, Decimal::new(40, 0)).unwrap();
        assert_eq!(pool.share_balance(alice), Decimal::new(60, 0));
        assert_eq!(pool.share_supply, Decimal::new(60, 0));
    }

    #[test]
    fn burn_more_than_held_fails() {
        let mut pool = LiquidityPool::new("USDC");
        let alice = Address([1u8; 32]);
        pool.grant_shares(alice, Decimal::new(10, 0));

        let err = pool.burn_shares(alice, Decimal::new(11, 0)).unwrap_err();
        assert!(matches!(err, BridgeError::InsufficientLiquidity { .. }));
        // Pool unchanged
        assert_eq!(pool.share_balance(alice), Decimal::new(10, 0));
        assert_eq!(pool.share_supply, Decimal::new(10, 0));
    }

    #[test]
    fn fully_burned_position_is_pruned() {
        let mut pool = LiquidityPool::new("USDC");
        let alice = Address([1u8; 32]);
        pool.grant_shares(alice, Decimal::new(5, 0));
        pool.burn_shares(alice, Decimal::new(5, 0)).unwrap();
        assert!(!pool.shares.contains_key(&alice));
        assert_eq!(pool.share_supply, Decimal::ZERO);
    }

    #[test]
    fn serde_roundtrip() {
        let mut pool = LiquidityPool::new("WETH");
        pool.reserve = Decimal::new(12345, 4);
        pool.grant_shares(Address([2u8; 32]), Decimal::new(12345, 4));
        let json = serde_json::to_string(&pool).unwrap();
        let back: LiquidityPool = serde_json::from_str(&json).unwrap();
        assert_eq!(pool.reserve, back.reserve);
        assert_eq!(pool.share_supply, back.share_supply);
    }
}
