//! Bridge and withdrawal fee computation.
//!
//! Fees are a deterministic function of the amount and a parts-per-million
//! rate from the [`FeeSchedule`]. The fee is always denominated in the same
//! asset as the principal, is monotonic in the amount, and never exceeds it
//! (rates are capped at 100% and the result rounds down).

use rust_decimal::{Decimal, RoundingStrategy};

use openbridge_types::{
    constants::{AMOUNT_PRECISION, PPM_DENOMINATOR},
    BridgeError, FeeSchedule, Result,
};

/// `floor(amount × ppm / 1_000_000)` at [`AMOUNT_PRECISION`] decimals.
///
/// # Errors
/// Returns [`BridgeError::InvalidAmount`] if `amount` is negative or the
/// multiplication overflows the decimal range.
fn ppm_of(amount: Decimal, ppm: u64) -> Result<Decimal> {
    if amount.is_sign_negative() {
        return Err(BridgeError::InvalidAmount {
            reason: format!("fee base {amount} is negative"),
        });
    }
    let scaled = amount
        .checked_mul(Decimal::from(ppm))
        .ok_or_else(|| BridgeError::InvalidAmount {
            reason: format!("fee computation overflow for amount {amount}"),
        })?;
    Ok((scaled / Decimal::from(PPM_DENOMINATOR))
        .round_dp_with_strategy(AMOUNT_PRECISION, RoundingStrategy::ToZero))
}

/// Bridge fee for releasing `amount` of `asset`, per the schedule.
pub fn bridge_fee(schedule: &FeeSchedule, asset: &str, amount: Decimal) -> Result<Decimal> {
    ppm_of(amount, schedule.bridge_fee_ppm(asset))
}

/// Withdrawal fee for redeeming `amount` of `asset`, per the schedule.
pub fn withdrawal_fee(schedule: &FeeSchedule, asset: &str, amount: Decimal) -> Result<Decimal> {
    ppm_of(amount, schedule.withdrawal_fee_ppm(asset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> FeeSchedule {
        FeeSchedule::new(3_000, 1_000)
    }

    #[test]
    fn bridge_fee_is_ppm_of_amount() {
        // 3,000 ppm of 1,000.00 = 3.00
        let fee = bridge_fee(&schedule(), "USDC", Decimal::new(100_000, 2)).unwrap();
        assert_eq!(fee, Decimal::new(3, 0));
    }

    #[test]
    fn withdrawal_fee_uses_its_own_rate() {
        let fee = withdrawal_fee(&schedule(), "USDC", Decimal::new(100_000, 2)).unwrap();
        assert_eq!(fee, Decimal::new(1, 0));
    }

    #[test]
    fn per_asset_override_applies() {
        let mut sched = schedule();
        sched.set_bridge_override("WETH", 10_000); // 1%
        let fee = bridge_fee(&sched, "WETH", Decimal::new(200, 0)).unwrap();
        assert_eq!(fee, Decimal::new(2, 0));
        // Other assets still use the default.
        let fee = bridge_fee(&sched, "USDC", Decimal::new(200, 0)).unwrap();
        assert_eq!(fee, Decimal::new(6, 1));
    }

    #[test]
    fn fee_rounds_down() {
        // 3,000 ppm of 0.00000001 = 0.00000000003, floors to zero.
        let fee = bridge_fee(&schedule(), "USDC", Decimal::new(1, 8)).unwrap();
        assert_eq!(fee, Decimal::ZERO);

        // 1 ppm of 1.99999999 floors at 8 decimals.
        let sched = FeeSchedule::new(1, 1);
        let fee = bridge_fee(&sched, "USDC", Decimal::new(199_999_999, 8)).unwrap();
        assert_eq!(fee, Decimal::new(199, 8)); // 0.00000199, not 0.00000199999999
    }

    #[test]
    fn fee_is_monotonic_in_amount() {
        let sched = schedule();
        let mut last = Decimal::ZERO;
        for units in [1u64, 10, 1_000, 1_000_000, 1_000_000_000] {
            let fee = bridge_fee(&sched, "USDC", Decimal::from(units)).unwrap();
            assert!(fee >= last, "fee must not decrease as amount grows");
            last = fee;
        }
    }

    #[test]
    fn fee_never_exceeds_amount() {
        let sched = FeeSchedule::new(PPM_DENOMINATOR, PPM_DENOMINATOR);
        let amount = Decimal::new(123_456_789, 8);
        assert_eq!(bridge_fee(&sched, "USDC", amount).unwrap(), amount);
        assert_eq!(withdrawal_fee(&sched, "USDC", amount).unwrap(), amount);
    }

    #[test]
    fn zero_amount_zero_fee() {
        assert_eq!(
            bridge_fee(&schedule(), "USDC", Decimal::ZERO).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn negative_amount_rejected() {
        let err = bridge_fee(&schedule(), "USDC", Decimal::new(-1, 0)).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAmount { .. }));
    }

    #[test]
    fn overflow_rejected() {
        let err = bridge_fee(&schedule(), "USDC", Decimal::MAX).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidAmount { .. }));
    }
}
