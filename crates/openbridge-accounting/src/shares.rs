//! Proportional LP share arithmetic.
//!
//! The first provider into an empty pool mints shares 1:1 with the
//! deposited amount. Later providers mint `amount × supply / reserve`,
//! and redemption pays `shares × reserve / supply`. Both directions
//! round down, so the pool can only ever keep dust, never leak it.

use rust_decimal::{Decimal, RoundingStrategy};

use openbridge_types::{constants::AMOUNT_PRECISION, BridgeError, Result};

fn floor_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_PRECISION, RoundingStrategy::ToZero)
}

fn require_positive(value: Decimal, what: &str) -> Result<()> {
    if value.is_zero() || value.is_sign_negative() {
        return Err(BridgeError::InvalidAmount {
            reason: format!("{what} must be positive, got {value}"),
        });
    }
    Ok(())
}

/// Shares minted for depositing `amount` into a pool holding `reserve`
/// against `supply` outstanding shares.
///
/// # Errors
/// - [`BridgeError::InvalidAmount`] if `amount` is not positive
/// - [`BridgeError::Internal`] if the pool has shares but no reserve
///   (a state the mutation paths cannot produce)
pub fn shares_for_deposit(reserve: Decimal, supply: Decimal, amount: Decimal) -> Result<Decimal> {
    require_positive(amount, "liquidity amount")?;
    if supply.is_zero() {
        return Ok(amount);
    }
    if reserve.is_zero() {
        return Err(BridgeError::Internal(format!(
            "pool has share supply {supply} but empty reserve"
        )));
    }
    Ok(floor_amount(amount * supply / reserve))
}

/// Principal redeemed for burning `shares` against the current rate.
///
/// # Errors
/// - [`BridgeError::InvalidAmount`] if `shares` is not positive
/// - [`BridgeError::InsufficientLiquidity`] if the pool has no shares
///   outstanding or fewer than requested
pub fn amount_for_shares(reserve: Decimal, supply: Decimal, shares: Decimal) -> Result<Decimal> {
    require_positive(shares, "share amount")?;
    if shares > supply {
        return Err(BridgeError::InsufficientLiquidity {
            needed: shares,
            available: supply,
        });
    }
    Ok(floor_amount(shares * reserve / supply))
}
