//! Canonical release digest.
//!
//! The digest binds every field that defines the deposit being released,
//! including the verifying ledger's own chain id. A signature over this
//! digest therefore authorizes exactly one release on exactly one ledger
//! and cannot be replayed across ledgers or against a different payload.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use openbridge_types::{Address, Asset, ChainId, DepositKey, DepositNumber};

/// Domain separation tag for release digests.
const RELEASE_DOMAIN: &[u8] = b"openbridge:release:v1:";

/// The full description of a release, as signed by the quorum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseIntent {
    /// Who receives the bridged value.
    pub receiver: Address,
    /// The asset as identified on the source ledger (resolved through
    /// the token mapping at release time).
    pub source_asset: Asset,
    /// Gross bridged amount (the bridge fee is taken out of this).
    pub amount: Decimal,
    /// The ledger the deposit was recorded on.
    pub source_chain: ChainId,
    /// The deposit sequence number assigned on the source ledger.
    pub number: DepositNumber,
    /// The ledger verifying this release (its own chain id).
    pub local_chain: ChainId,
}

impl ReleaseIntent {
    /// The replay key this release consumes.
    #[must_use]
    pub fn deposit_key(&self) -> DepositKey {
        DepositKey::new(self.source_chain, self.number)
    }

    /// Canonical signing payload.
    ///
    /// Format: domain tag, then each field length-delimited where variable
    /// (the asset string) and fixed-width little-endian where scalar, so no
    /// two distinct intents can encode to the same bytes.
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(128);
        payload.extend_from_slice(RELEASE_DOMAIN);
        payload.extend_from_slice(self.receiver.as_bytes());
        payload.extend_from_slice(&(self.source_asset.len() as u64).to_le_bytes());
        payload.extend_from_slice(self.source_asset.as_bytes());
        payload.extend_from_slice(self.amount.to_string().as_bytes());
        payload.extend_from_slice(&self.source_chain.0.to_le_bytes());
        payload.extend_from_slice(&self.number.0.to_le_bytes());
        payload.extend_from_slice(&self.local_chain.0.to_le_bytes());
        payload
    }

    /// SHA-256 digest of the canonical payload. This is what signers sign.
    #[must_use]
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.signing_payload());
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_intent() -> ReleaseIntent {
        ReleaseIntent {
            receiver: Address([1u8; 32]),
            source_asset: "0xusdc".to_string(),
            amount: Decimal::new(100_000, 2),
            source_chain: ChainId(1),
            number: DepositNumber(7),
            local_chain: ChainId(2),
        }
    }

    #[test]
    fn digest_is_deterministic() {
        let intent = make_intent();
        assert_eq!(intent.digest(), intent.digest());
    }

    #[test]
    fn digest_differs_by_every_field() {
        let base = make_intent();

        let mut changed = base.clone();
        changed.receiver = Address([9u8; 32]);
        assert_ne!(base.digest(), changed.digest());

        let mut changed = base.clone();
        changed.source_asset = "0xweth".to_string();
        assert_ne!(base.digest(), changed.digest());

        let mut changed = base.clone();
        changed.amount = Decimal::new(100_001, 2);
        assert_ne!(base.digest(), changed.digest());

        let mut changed = base.clone();
        changed.source_chain = ChainId(3);
        assert_ne!(base.digest(), changed.digest());

        let mut changed = base.clone();
        changed.number = DepositNumber(8);
        assert_ne!(base.digest(), changed.digest());

        // Same deposit, different verifying ledger: a signature for one
        // ledger must not authorize a release on another.
        let mut changed = base.clone();
        changed.local_chain = ChainId(3);
        assert_ne!(base.digest(), changed.digest());
    }

    #[test]
    fn asset_encoding_is_length_delimited() {
        let mut a = make_intent();
        a.source_asset = "ab".to_string();
        let mut b = make_intent();
        b.source_asset = "a".to_string();
        // "ab" + rest must not collide with "a" + "b"-prefixed rest.
        assert_ne!(a.signing_payload(), b.signing_payload());
    }

    #[test]
    fn deposit_key_matches_fields() {
        let intent = make_intent();
        assert_eq!(
            intent.deposit_key(),
            DepositKey::new(ChainId(1), DepositNumber(7))
        );
    }

    #[test]
    fn serde_roundtrip() {
        let intent = make_intent();
        let json = serde_json::to_string(&intent).unwrap();
        let back: ReleaseIntent = serde_json::from_str(&json).unwrap();
        assert_eq!(intent, back);
        assert_eq!(intent.digest(), back.digest());
    }
}
