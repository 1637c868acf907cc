//! Fee schedule: per-asset or default rates in parts-per-million.
//!
//! Bridge fees and withdrawal fees are configured independently. A rate
//! lookup falls back to the default when no per-asset override exists.
//! Rates are capped at `PPM_DENOMINATOR` on insertion so a computed fee
//! can never exceed the principal. The fee arithmetic itself lives in
//! `openbridge-accounting`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{constants::PPM_DENOMINATOR, Asset};

/// Parts-per-million fee rates with per-asset overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Default bridge fee rate (applied at release).
    pub default_bridge_ppm: u64,
    /// Default withdrawal fee rate (applied on liquidity redemption).
    pub default_withdrawal_ppm: u64,
    /// Per-asset bridge fee overrides.
    bridge_overrides: HashMap<Asset, u64>,
    /// Per-asset withdrawal fee overrides.
    withdrawal_overrides: HashMap<Asset, u64>,
}

impl FeeSchedule {
    /// Create a schedule with the given default rates (capped at 100%).
    #[must_use]
    pub fn new(default_bridge_ppm: u64, default_withdrawal_ppm: u64) -> Self {
        Self {
            default_bridge_ppm: default_bridge_ppm.min(PPM_DENOMINATOR),
            default_withdrawal_ppm: default_withdrawal_ppm.min(PPM_DENOMINATOR),
            bridge_overrides: HashMap::new(),
            withdrawal_overrides: HashMap::new(),
        }
    }

    /// Set a per-asset bridge fee rate (capped at 100%).
    pub fn set_bridge_override(&mut self, asset: impl Into<Asset>, ppm: u64) {
        self.bridge_overrides
            .insert(asset.into(), ppm.min(PPM_DENOMINATOR));
    }

    /// Set a per-asset withdrawal fee rate (capped at 100%).
    pub fn set_withdrawal_override(&mut self, asset: impl Into<Asset>, ppm: u64) {
        self.withdrawal_overrides
            .insert(asset.into(), ppm.min(PPM_DENOMINATOR));
    }

    /// Remove a per-asset bridge override, restoring the default.
    pub fn clear_bridge_override(&mut self, asset: &str) {
        self.bridge_overrides.remove(asset);
    }

    /// Remove a per-asset withdrawal override, restoring the default.
    pub fn clear_withdrawal_override(&mut self, asset: &str) {
        self.withdrawal_overrides.remove(asset);
    }

    /// Effective bridge fee rate for an asset.
    #[must_use]
    pub fn bridge_fee_ppm(&self, asset: &str) -> u64 {
        self.bridge_overrides
            .get(asset)
            .copied()
            .unwrap_or(self.default_bridge_ppm)
    }

    /// Effective withdrawal fee rate for an asset.
    #[must_use]
    pub fn withdrawal_fee_ppm(&self, asset: &str) -> u64 {
        self.withdrawal_overrides
            .get(asset)
            .copied()
            .unwrap_or(self.default_withdrawal_ppm)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new(
            crate::constants::DEFAULT_BRIDGE_FEE_PPM,
            crate::constants::DEFAULT_WITHDRAWAL_FEE_PPM,
        )
    }
}
