//! Source-ledger asset mapping.
//!
//! Maps an asset as identified on a source ledger to the local asset it
//! is released as. Read-only to the release path; mutated only through
//! the owner-gated admin operations on the orchestrator.

use std::collections::HashMap;

use openbridge_types::{Asset, BridgeError, Result};

/// Keyed source-asset to local-asset mapping.
#[derive(Debug, Default)]
pub struct TokenMap {
    mappings: HashMap<Asset, Asset>,
}

impl TokenMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a source-ledger asset to a local asset. Replaces any
    /// existing mapping for the source asset.
    pub fn add(&mut self, source_asset: impl Into<Asset>, local_asset: impl Into<Asset>) {
        self.mappings.insert(source_asset.into(), local_asset.into());
    }

    /// Remove a mapping.
    ///
    /// # Errors
    /// Returns [`BridgeError::UnknownAsset`] if no mapping exists.
    pub fn remove(&mut self, source_asset: &str) -> Result<()> {
        self.mappings
            .remove(source_asset)
            .map(|_| ())
            .ok_or_else(|| BridgeError::UnknownAsset(source_asset.to_string()))
    }

    /// Resolve a source-ledger asset to its local form. An unmapped
    /// asset is treated as already local and returned unchanged.
    #[must_use]
    pub fn resolve(&self, source_asset: &str) -> Asset {
        self.mappings
            .get(source_asset)
            .cloned()
            .unwrap_or_else(|| source_asset.to_string())
    }

    /// Whether a mapping exists for the source asset.
    #[must_use]
    pub fn contains(&self, source_asset: &str) -> bool {
        self.mappings.contains_key(source_asset)
    }

    /// Number of mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
