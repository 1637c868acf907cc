//! Threshold signature verification.
//!
//! ## Design Principles
//!
//! - **Fail-closed**: one bad approval invalidates the whole set
//! - **No side effects**: verification is a pure function of registry
//!   state and inputs
//! - **Strict verification**: `verify_strict` rejects the malleable and
//!   small-order edge cases ordinary verification accepts

use ed25519_dalek::{Signature, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use openbridge_types::{BridgeError, Result, SignerId};

use crate::registry::SignerRegistry;

/// One signer's approval of a release digest.
///
/// The signer identity is the ed25519 public key the signature must
/// verify against; a successful strict verification is what "recovers"
/// the identity from the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerApproval {
    /// The claimed signer identity (ed25519 public key).
    pub signer: SignerId,
    /// Raw 64-byte ed25519 signature over the release digest.
    pub signature: Vec<u8>,
}

impl SignerApproval {
    #[must_use]
    pub fn new(signer: SignerId, signature: Vec<u8>) -> Self {
        Self { signer, signature }
    }
}

/// Verify that `approvals` constitutes a quorum over `digest`.
///
/// Every supplied approval must be valid: parseable, verifying over the
/// digest, from a distinct identity, and from an authorized signer. The
/// count of approvals must meet the registry threshold.
///
/// # Errors
/// - [`BridgeError::QuorumNotMet`] if fewer approvals than the threshold
/// - [`BridgeError::DuplicateSigner`] if an identity appears twice
/// - [`BridgeError::UnauthorizedSigner`] if an identity is outside the registry
/// - [`BridgeError::MalformedSignature`] if a key or signature fails to
///   parse or the signature does not verify over the digest
pub fn verify_quorum(
    registry: &SignerRegistry,
    digest: &[u8; 32],
    approvals: &[SignerApproval],
) -> Result<()> {
    if approvals.len() < registry.threshold() {
        return Err(BridgeError::QuorumNotMet {
            got: approvals.len(),
            need: registry.threshold(),
        });
    }

    let mut seen: HashSet<SignerId> = HashSet::with_capacity(approvals.len());
    for approval in approvals {
        if !seen.insert(approval.signer) {
            return Err(BridgeError::DuplicateSigner(approval.signer));
        }
        if !registry.contains(&approval.signer) {
            return Err(BridgeError::UnauthorizedSigner(approval.signer));
        }

        let key = VerifyingKey::from_bytes(approval.signer.as_bytes()).map_err(|_| {
            BridgeError::MalformedSignature {
                signer: approval.signer,
            }
        })?;
        let signature = Signature::from_slice(&approval.signature).map_err(|_| {
            BridgeError::MalformedSignature {
                signer: approval.signer,
            }
        })?;
        key.verify_strict(digest, &signature)
            .map_err(|_| BridgeError::MalformedSignature {
                signer: approval.signer,
            })?;
    }

    tracing::debug!(
        approvals = approvals.len(),
        threshold = registry.threshold(),
        "Quorum verified"
    );
    Ok(())
}
