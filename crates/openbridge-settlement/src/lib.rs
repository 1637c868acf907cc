//! # openbridge-settlement
//!
//! **Settlement plane**: deposit recording, replay defense, asset custody,
//! and the orchestrator that ties the quorum and accounting planes together.
//!
//! ## Architecture
//!
//! Every externally invoked operation runs to completion as a single atomic
//! step against the shared settlement state (the execution model is a
//! globally serialized state machine). The [`BridgeHub`] owns all mutable
//! state and is the only mutation path:
//!
//! 1. Validate inputs (amounts, quorum, replay key, pool existence)
//! 2. Mutate the deposit ledger / pools / vault
//! 3. Append a domain event to the journal for the off-ledger relay
//!
//! Any failure before the mutation step leaves all state unchanged. The
//! one concurrency hazard, re-entry through an asset-transfer callback,
//! is excluded by a [`ReentrancyGuard`] around every transferring
//! operation.

pub mod deposit_ledger;
pub mod hub;
pub mod reentrancy;
pub mod replay;
pub mod token_map;
pub mod vault;

pub use deposit_ledger::DepositLedger;
pub use hub::BridgeHub;
pub use reentrancy::ReentrancyGuard;
pub use replay::ReleasedKeys;
pub use token_map::TokenMap;
pub use vault::{Vault, FEE_SINK_ACCOUNT, RESERVE_ACCOUNT, REWARDS_ACCOUNT};
