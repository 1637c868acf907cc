//! # openbridge-types
//!
//! Shared types, errors, and configuration for the **OpenBridge** settlement core.
//!
//! This crate is the leaf dependency of the workspace. Every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ChainId`], [`DepositNumber`], [`DepositKey`], [`Address`], [`SignerId`], [`EventId`], [`Asset`]
//! - **Deposit model**: [`Deposit`], [`DepositStatus`]
//! - **Liquidity model**: [`LiquidityPool`]
//! - **Accrual model**: [`AccrualPool`], [`StakePosition`], [`FundingSource`], [`PoolKind`], [`StakePoolKind`], [`PoolSelection`]
//! - **Fee model**: [`FeeSchedule`]
//! - **Events**: [`BridgeEvent`], [`EventRecord`]
//! - **Configuration**: [`BridgeConfig`], [`FeeConfig`]
//! - **Errors**: [`BridgeError`] with `OB_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod deposit;
pub mod error;
pub mod event;
pub mod fee;
pub mod ids;
pub mod liquidity;
pub mod stake;

// Re-export all primary types at crate root for ergonomic imports:
//   use openbridge_types::{Deposit, LiquidityPool, BridgeError, ...};

pub use config::*;
pub use deposit::*;
pub use error::*;
pub use event::*;
pub use fee::*;
pub use ids::*;
pub use liquidity::*;
pub use stake::*;

// Constants are accessed via `openbridge_types::constants::FOO`
// (not re-exported to avoid name collisions).
