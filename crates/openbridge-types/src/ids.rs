//! Identifiers used throughout OpenBridge.
//!
//! Ledger-facing identities (`Address`, `SignerId`) are raw 32-byte keys,
//! like account keys on the ledgers the bridge spans. `EventId` uses UUIDv7
//! for time-ordered lexicographic sorting.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

fn serialize_key_hex<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

fn deserialize_key_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
    let s = String::deserialize(deserializer)?;
    let bytes = hex::decode(&s).map_err(de::Error::custom)?;
    bytes
        .try_into()
        .map_err(|_| de::Error::custom("expected 32 bytes of hex"))
}

/// Type alias for asset identifiers (e.g., "USDC", "WETH", or a
/// source-ledger contract address rendered as a string).
pub type Asset = String;

// ---------------------------------------------------------------------------
// ChainId
// ---------------------------------------------------------------------------

/// Identifier of an independent ledger (chain/network).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DepositNumber
// ---------------------------------------------------------------------------

/// Per-direction deposit sequence number, strictly increasing.
///
/// The off-ledger relay embeds this number in the release digest on the
/// target ledger, so it must be unique for the lifetime of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DepositNumber(pub u64);

impl DepositNumber {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for DepositNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deposit:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DepositKey
// ---------------------------------------------------------------------------

/// The globally unique key of a deposit: (source ledger, sequence number).
///
/// This pair is the sole replay key of the protocol. A release referencing
/// a key already present in the used-key set must fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DepositKey {
    /// The ledger the deposit was recorded on.
    pub source_chain: ChainId,
    /// The sequence number assigned by that ledger.
    pub number: DepositNumber,
}

impl DepositKey {
    #[must_use]
    pub fn new(source_chain: ChainId, number: DepositNumber) -> Self {
        Self {
            source_chain,
            number,
        }
    }
}

impl fmt::Display for DepositKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source_chain, self.number)
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A ledger account address (32 raw bytes).
///
/// Serialized as a hex string so addresses can key serialized maps
/// (share balances, stake positions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Address(pub [u8; 32]);

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_key_hex(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_key_hex(deserializer).map(Self)
    }
}

impl Address {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "addr:{}", hex::encode(&self.0[..8]))
    }
}

/// Random address for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }
}

// ---------------------------------------------------------------------------
// SignerId
// ---------------------------------------------------------------------------

/// Identity of an authorized release signer.
/// This is the raw ed25519 public key (32 bytes), serialized as hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct SignerId(pub [u8; 32]);

impl Serialize for SignerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_key_hex(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for SignerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_key_hex(deserializer).map(Self)
    }
}

impl SignerId {
    #[must_use]
    pub fn from_pubkey(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "signer:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// EventId
// ---------------------------------------------------------------------------

/// Globally unique event identifier. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_number_next() {
        let n = DepositNumber(41);
        assert_eq!(n.next(), DepositNumber(42));
    }

    #[test]
    fn deposit_key_equality_is_by_value() {
        let a = DepositKey::new(ChainId(1), DepositNumber(7));
        let b = DepositKey::new(ChainId(1), DepositNumber(7));
        let c = DepositKey::new(ChainId(2), DepositNumber(7));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn address_display_uses_hex_prefix() {
        let addr = Address([0xab; 32]);
        assert_eq!(format!("{addr}"), "addr:abababababababab");
        assert_eq!(addr.short(), "abababab");
    }

    #[test]
    fn event_id_uniqueness() {
        let a = EventId::new();
        let b = EventId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn event_id_ordering() {
        let a = EventId::new();
        let b = EventId::new();
        assert!(a < b);
    }

    #[test]
    fn serde_roundtrips() {
        let key = DepositKey::new(ChainId(5), DepositNumber(99));
        let json = serde_json::to_string(&key).unwrap();
        let back: DepositKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);

        let signer = SignerId([7u8; 32]);
        let json = serde_json::to_string(&signer).unwrap();
        assert_eq!(json, format!("\"{}\"", "07".repeat(32)));
        let back: SignerId = serde_json::from_str(&json).unwrap();
        assert_eq!(signer, back);
    }

    #[test]
    fn address_keyed_maps_serialize() {
        use std::collections::HashMap;
        let mut shares: HashMap<Address, u64> = HashMap::new();
        shares.insert(Address([1u8; 32]), 100);
        // Hex-string keys keep address-keyed maps JSON-representable.
        let json = serde_json::to_string(&shares).unwrap();
        let back: HashMap<Address, u64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&Address([1u8; 32])), Some(&100));
    }
}
