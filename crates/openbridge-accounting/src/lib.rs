//! # openbridge-accounting
//!
//! **Pure deterministic accounting core** for the OpenBridge settlement
//! engine. Zero side effects: every function here is a pure computation
//! over state owned by the settlement crate.
//!
//! - [`fees`]: parts-per-million bridge and withdrawal fees
//! - [`shares`]: proportional LP share mint/redeem arithmetic
//! - [`accrual`]: the reward-per-share engine shared by mining pools,
//!   farms, and reward pools
//!
//! ## Rounding policy
//!
//! All share and fee arithmetic rounds **down** (truncation toward zero)
//! at [`AMOUNT_PRECISION`](openbridge_types::constants::AMOUNT_PRECISION)
//! decimal places. Rounding down on fees keeps
//! `released + fee == amount` exact for every deposit/release pair.

pub mod accrual;
pub mod fees;
pub mod shares;

pub use accrual::{harvest, pending_reward, stake, unstake, update_pool};
pub use fees::{bridge_fee, withdrawal_fee};
pub use shares::{amount_for_shares, shares_for_deposit};
