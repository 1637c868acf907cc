//! Authorized-signer registry.
//!
//! Owned by an external governance collaborator; read-only to the
//! verifier. Holds the set of authorized signer identities and the
//! threshold count of distinct approvals a release requires.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use openbridge_types::{BridgeError, Result, SignerId};

/// The set of authorized signers plus the required approval threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerRegistry {
    signers: HashSet<SignerId>,
    threshold: usize,
}

impl SignerRegistry {
    /// Create a registry.
    ///
    /// # Errors
    /// Returns `Internal` if the threshold is zero or exceeds the signer
    /// count (such a registry could never authorize anything).
    pub fn new(signers: impl IntoIterator<Item = SignerId>, threshold: usize) -> Result<Self> {
        let signers: HashSet<SignerId> = signers.into_iter().collect();
        if threshold == 0 {
            return Err(BridgeError::Internal(
                "signer threshold must be positive".to_string(),
            ));
        }
        if threshold > signers.len() {
            return Err(BridgeError::Internal(format!(
                "signer threshold {threshold} exceeds registry size {}",
                signers.len()
            )));
        }
        Ok(Self { signers, threshold })
    }

    /// Whether an identity is authorized.
    #[must_use]
    pub fn contains(&self, signer: &SignerId) -> bool {
        self.signers.contains(signer)
    }

    /// Required number of distinct valid approvals.
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Number of authorized signers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}
