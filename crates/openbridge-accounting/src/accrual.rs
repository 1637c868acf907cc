//! The reward accrual engine.
//!
//! One engine serves every accrual pool kind; the funding source is the
//! only difference between a mining pool, a farm, and a reward pool.
//! All mutations follow the same discipline as the rest of the
//! settlement core: validate first, settle outstanding rewards second,
//! move stake last. `reward_debt` is resynchronized on every mutation,
//! so a position's pending reward is always
//! `staked_amount × acc_reward_per_share − reward_debt`, never more,
//! never less.
//!
//! All operations take an explicit `now` (unix seconds) supplied by the
//! execution environment; the engine never reads a clock.

use rust_decimal::Decimal;

use openbridge_types::{AccrualPool, Address, BridgeError, Result, StakePosition};

/// Bring the pool's accumulator up to `now`.
///
/// Reward accrued since `last_update` is distributed over the stake as
/// it stood before this instant. With zero stake the clock still
/// advances but nothing accrues; the undistributed reward stays with
/// the funding source.
pub fn update_pool(pool: &mut AccrualPool, now: u64) {
    let elapsed = now.saturating_sub(pool.last_update);
    pool.last_update = pool.last_update.max(now);
    let reward = pool.funding.accrue(elapsed, pool.total_staked);
    if !reward.is_zero() {
        pool.acc_reward_per_share += reward / pool.total_staked;
        tracing::trace!(
            asset = %pool.asset,
            elapsed,
            reward = %reward,
            acc = %pool.acc_reward_per_share,
            "Accrual updated"
        );
    }
}

/// Projected accumulator value as of `now`, without mutating the pool.
fn projected_acc(pool: &AccrualPool, now: u64) -> Decimal {
    let elapsed = now.saturating_sub(pool.last_update);
    let reward = pool.funding.preview(elapsed, pool.total_staked);
    if reward.is_zero() {
        pool.acc_reward_per_share
    } else {
        pool.acc_reward_per_share + reward / pool.total_staked
    }
}

/// Read-only pending-reward projection as of `now`.
#[must_use]
pub fn pending_reward(pool: &AccrualPool, staker: Address, now: u64) -> Decimal {
    let acc = projected_acc(pool, now);
    pool.positions
        .get(&staker)
        .map_or(Decimal::ZERO, |p| p.pending_at(acc))
}

/// Stake `amount` for `staker`. Returns the pending reward settled in
/// the process (the caller transfers it out).
///
/// # Errors
/// Returns [`BridgeError::InvalidAmount`] if `amount` is not positive.
pub fn stake(pool: &mut AccrualPool, staker: Address, amount: Decimal, now: u64) -> Result<Decimal> {
    require_positive(amount)?;
    update_pool(pool, now);

    let acc = pool.acc_reward_per_share;
    let position = pool
        .positions
        .entry(staker)
        .or_insert_with(|| StakePosition::new(staker));
    let reward = position.pending_at(acc);
    position.staked_amount += amount;
    position.sync_debt(acc);
    pool.total_staked += amount;
    Ok(reward)
}

/// Unstake `amount` for `staker`. Settles the pending reward first and
/// returns it. A fully drained position is pruned.
///
/// # Errors
/// - [`BridgeError::InvalidAmount`] if `amount` is not positive
/// - [`BridgeError::InsufficientStake`] if `amount` exceeds the position
pub fn unstake(
    pool: &mut AccrualPool,
    staker: Address,
    amount: Decimal,
    now: u64,
) -> Result<Decimal> {
    require_positive(amount)?;
    let staked = pool.staked_amount(staker);
    if amount > staked {
        return Err(BridgeError::InsufficientStake {
            needed: amount,
            available: staked,
        });
    }
    update_pool(pool, now);

    let acc = pool.acc_reward_per_share;
    let position = pool
        .positions
        .get_mut(&staker)
        .ok_or_else(|| BridgeError::Internal(format!("missing position for {staker}")))?;
    let reward = position.pending_at(acc);
    position.staked_amount -= amount;
    position.sync_debt(acc);
    if position.staked_amount.is_zero() {
        pool.positions.remove(&staker);
    }
    pool.total_staked -= amount;
    Ok(reward)
}

/// Settle and return the pending reward without touching the stake.
/// Harvesting with no position settles nothing.
pub fn harvest(pool: &mut AccrualPool, staker: Address, now: u64) -> Decimal {
    update_pool(pool, now);
    let acc = pool.acc_reward_per_share;
    match pool.positions.get_mut(&staker) {
        Some(position) => {
            let reward = position.pending_at(acc);
            position.sync_debt(acc);
            reward
        }
        None => Decimal::ZERO,
    }
}

fn require_positive(amount: Decimal) -> Result<()> {
    if amount.is_zero() || amount.is_sign_negative() {
        return Err(BridgeError::InvalidAmount {
            reason: format!("stake amount must be positive, got {amount}"),
        });
    }
    Ok(())
}
