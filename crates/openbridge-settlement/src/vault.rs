//! Asset custody for the settlement core.
//!
//! The vault tracks per-(account, asset) balances. Principal entering
//! the bridge lands in the [`RESERVE_ACCOUNT`]; protocol fees accumulate
//! in the [`FEE_SINK_ACCOUNT`]; deposited reward funds sit in the
//! [`REWARDS_ACCOUNT`] until harvested. All mutations are atomic: either
//! the full operation succeeds or the balances are unchanged.
//!
//! The vault also keeps a conservation ledger (total external inflows
//! and outflows per asset) so the invariant
//!
//! ```text
//! ∀ asset: Σ balances == Σ inflows − Σ outflows
//! ```
//!
//! can be audited after every settlement flow.

use std::collections::HashMap;

use rust_decimal::Decimal;

use openbridge_types::{Address, Asset, BridgeError, Result};

/// Account holding escrowed principal and pooled liquidity.
pub const RESERVE_ACCOUNT: Address = Address([0xFE; 32]);

/// Account accumulating protocol fees.
pub const FEE_SINK_ACCOUNT: Address = Address([0xFD; 32]);

/// Account holding deposited (not yet harvested) reward funds.
pub const REWARDS_ACCOUNT: Address = Address([0xFC; 32]);

/// Per-(account, asset) balance store with a conservation ledger.
pub struct Vault {
    balances: HashMap<(Address, Asset), Decimal>,
    /// Total external inflows per asset since genesis.
    inflows: HashMap<Asset, Decimal>,
    /// Total external outflows per asset since genesis.
    outflows: HashMap<Asset, Decimal>,
}

impl Vault {
    /// Create an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            inflows: HashMap::new(),
            outflows: HashMap::new(),
        }
    }

    /// External inflow: credit `account` with funds entering the bridge.
    pub fn deposit(&mut self, account: Address, asset: &str, amount: Decimal) {
        *self
            .balances
            .entry((account, asset.to_string()))
            .or_insert(Decimal::ZERO) += amount;
        *self
            .inflows
            .entry(asset.to_string())
            .or_insert(Decimal::ZERO) += amount;
    }

    /// External outflow: debit `account` for funds leaving the bridge.
    ///
    /// # Errors
    /// Returns [`BridgeError::InsufficientBalance`] if the account holds
    /// less than `amount`. The vault is unchanged on failure.
    pub fn withdraw(&mut self, account: Address, asset: &str, amount: Decimal) -> Result<()> {
        self.debit(account, asset, amount)?;
        *self
            .outflows
            .entry(asset.to_string())
            .or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    /// Internal move between accounts. Conservation-neutral.
    ///
    /// # Errors
    /// Returns [`BridgeError::InsufficientBalance`] if `from` holds less
    /// than `amount`. The vault is unchanged on failure.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        asset: &str,
        amount: Decimal,
    ) -> Result<()> {
        self.debit(from, asset, amount)?;
        *self
            .balances
            .entry((to, asset.to_string()))
            .or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    fn debit(&mut self, account: Address, asset: &str, amount: Decimal) -> Result<()> {
        let balance = self
            .balances
            .get_mut(&(account, asset.to_string()))
            .ok_or(BridgeError::InsufficientBalance {
                needed: amount,
                available: Decimal::ZERO,
            })?;
        if *balance < amount {
            return Err(BridgeError::InsufficientBalance {
                needed: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        Ok(())
    }

    /// Balance of an (account, asset) pair.
    #[must_use]
    pub fn balance(&self, account: Address, asset: &str) -> Decimal {
        self.balances
            .get(&(account, asset.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of all account balances for an asset.
    #[must_use]
    pub fn total_supply(&self, asset: &str) -> Decimal {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }

    /// Expected supply for an asset: inflows minus outflows.
    #[must_use]
    pub fn expected_supply(&self, asset: &str) -> Decimal {
        let inflow = self.inflows.get(asset).copied().unwrap_or(Decimal::ZERO);
        let outflow = self.outflows.get(asset).copied().unwrap_or(Decimal::ZERO);
        inflow - outflow
    }

    /// Verify the conservation invariant for an asset.
    ///
    /// # Errors
    /// Returns [`BridgeError::SupplyInvariantViolation`] if the actual
    /// supply differs from the expected supply.
    pub fn verify_supply(&self, asset: &str) -> Result<()> {
        let actual = self.total_supply(asset);
        let expected = self.expected_supply(asset);
        if actual != expected {
            return Err(BridgeError::SupplyInvariantViolation {
                reason: format!(
                    "asset {asset}: actual supply {actual} != expected {expected}"
                ),
            });
        }
        Ok(())
    }
}

impl Default for Vault {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_credits_and_records_inflow() {
        let mut vault = Vault::new();
        vault.deposit(RESERVE_ACCOUNT, "USDC", Decimal::new(1000, 0));
        assert_eq!(
            vault.balance(RESERVE_ACCOUNT, "USDC"),
            Decimal::new(1000, 0)
        );
        assert_eq!(vault.expected_supply("USDC"), Decimal::new(1000, 0));
        vault.verify_supply("USDC").unwrap();
    }

    #[test]
    fn withdraw_debits_and_records_outflow() {
        let mut vault = Vault::new();
        vault.deposit(RESERVE_ACCOUNT, "USDC", Decimal::new(1000, 0));
        vault
            .withdraw(RESERVE_ACCOUNT, "USDC", Decimal::new(400, 0))
            .unwrap();
        assert_eq!(vault.balance(RESERVE_ACCOUNT, "USDC"), Decimal::new(600, 0));
        assert_eq!(vault.expected_supply("USDC"), Decimal::new(600, 0));
        vault.verify_supply("USDC").unwrap();
    }

    #[test]
    fn withdraw_insufficient_fails_cleanly() {
        let mut vault = Vault::new();
        vault.deposit(RESERVE_ACCOUNT, "USDC", Decimal::new(100, 0));
        let err = vault
            .withdraw(RESERVE_ACCOUNT, "USDC", Decimal::new(200, 0))
            .unwrap_err();
        assert!(matches!(err, BridgeError::InsufficientBalance { .. }));
        // Unchanged, including the conservation ledger.
        assert_eq!(vault.balance(RESERVE_ACCOUNT, "USDC"), Decimal::new(100, 0));
        vault.verify_supply("USDC").unwrap();
    }

    #[test]
    fn transfer_is_conservation_neutral() {
        let mut vault = Vault::new();
        vault.deposit(RESERVE_ACCOUNT, "USDC", Decimal::new(1000, 0));
        vault
            .transfer(
                RESERVE_ACCOUNT,
                FEE_SINK_ACCOUNT,
                "USDC",
                Decimal::new(3, 0),
            )
            .unwrap();
        assert_eq!(vault.balance(FEE_SINK_ACCOUNT, "USDC"), Decimal::new(3, 0));
        assert_eq!(vault.total_supply("USDC"), Decimal::new(1000, 0));
        vault.verify_supply("USDC").unwrap();
    }

    #[test]
    fn transfer_from_empty_account_fails() {
        let mut vault = Vault::new();
        let err = vault
            .transfer(RESERVE_ACCOUNT, FEE_SINK_ACCOUNT, "USDC", Decimal::ONE)
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::InsufficientBalance { available, .. } if available == Decimal::ZERO
        ));
    }

    #[test]
    fn assets_tracked_independently() {
        let mut vault = Vault::new();
        vault.deposit(RESERVE_ACCOUNT, "USDC", Decimal::new(10, 0));
        vault.deposit(REWARDS_ACCOUNT, "OBR", Decimal::new(5, 0));
        assert_eq!(vault.total_supply("USDC"), Decimal::new(10, 0));
        assert_eq!(vault.total_supply("OBR"), Decimal::new(5, 0));
        vault.verify_supply("USDC").unwrap();
        vault.verify_supply("OBR").unwrap();
    }
}
