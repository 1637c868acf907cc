//! Error types for the OpenBridge settlement core.
//!
//! All errors use the `OB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Amount / asset errors
//! - 2xx: Quorum errors
//! - 3xx: Deposit / replay errors
//! - 4xx: Liquidity / balance errors
//! - 5xx: Staking errors
//! - 6xx: Pool / admin errors
//! - 8xx: Safety errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Asset, DepositKey, PoolKind, SignerId};

/// Central error enum for all OpenBridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    // =================================================================
    // Amount / Asset Errors (1xx)
    // =================================================================
    /// The amount is zero, negative, or overflows the accounting range.
    #[error("OB_ERR_100: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// No pool or mapping exists where one is required.
    #[error("OB_ERR_101: Unknown asset: {0}")]
    UnknownAsset(Asset),

    // =================================================================
    // Quorum Errors (2xx)
    // =================================================================
    /// Fewer valid signatures than the registry threshold.
    #[error("OB_ERR_200: Quorum not met: {got} of {need} required signatures")]
    QuorumNotMet { got: usize, need: usize },

    /// A signature failed to parse or verify over the release digest.
    #[error("OB_ERR_201: Malformed signature from {signer}")]
    MalformedSignature { signer: SignerId },

    /// A recovered signer identity is not in the registry.
    #[error("OB_ERR_202: Unauthorized signer: {0}")]
    UnauthorizedSigner(SignerId),

    /// The same signer identity appears more than once.
    #[error("OB_ERR_203: Duplicate signer: {0}")]
    DuplicateSigner(SignerId),

    // =================================================================
    // Deposit / Replay Errors (3xx)
    // =================================================================
    /// The deposit key is already in the used-key set (replay attempt).
    #[error("OB_ERR_300: Replayed deposit: {0}")]
    ReplayedDeposit(DepositKey),

    /// The mirrored deposit record is already RELEASED.
    #[error("OB_ERR_301: Deposit already released: {0}")]
    AlreadyReleased(DepositKey),

    /// No Pending deposit record exists for the key.
    #[error("OB_ERR_302: Deposit not found: {0}")]
    DepositNotFound(DepositKey),

    // =================================================================
    // Liquidity / Balance Errors (4xx)
    // =================================================================
    /// Share burn exceeds the provider's position.
    #[error("OB_ERR_400: Insufficient liquidity: need {needed}, have {available}")]
    InsufficientLiquidity { needed: Decimal, available: Decimal },

    /// A vault debit exceeds the account's balance.
    #[error("OB_ERR_401: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    // =================================================================
    // Staking Errors (5xx)
    // =================================================================
    /// Unstake exceeds the position's staked amount.
    #[error("OB_ERR_500: Insufficient stake: need {needed}, have {available}")]
    InsufficientStake { needed: Decimal, available: Decimal },

    // =================================================================
    // Pool / Admin Errors (6xx)
    // =================================================================
    /// The requested pool already exists for the asset.
    #[error("OB_ERR_600: Pool already exists: {kind} pool for {asset}")]
    PoolAlreadyExists { asset: Asset, kind: PoolKind },

    /// The caller failed the ownership capability check.
    #[error("OB_ERR_601: Unauthorized")]
    Unauthorized,

    // =================================================================
    // Safety Errors (8xx)
    // =================================================================
    /// A settlement operation was re-entered before completing.
    #[error("OB_ERR_800: Reentrant call into settlement core")]
    ReentrantCall,

    /// Reserve conservation invariant violated. Critical safety alert.
    #[error("OB_ERR_801: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OB_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BridgeError>;
