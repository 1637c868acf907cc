//! System-wide constants for the OpenBridge settlement core.

/// Fee-rate denominator: 1,000,000 ppm = 100%.
pub const PPM_DENOMINATOR: u64 = 1_000_000;

/// Maximum decimal precision for amounts (8 decimal places).
pub const AMOUNT_PRECISION: u32 = 8;

/// Default bridge fee rate in ppm (0.3%), applied at release.
pub const DEFAULT_BRIDGE_FEE_PPM: u64 = 3_000;

/// Default withdrawal fee rate in ppm (0.1%), applied on redemption.
pub const DEFAULT_WITHDRAWAL_FEE_PPM: u64 = 1_000;

/// Reserved asset code for the ledger's native coin.
pub const NATIVE_ASSET: &str = "NATIVE";

/// Initial capacity hint for the used-deposit-key set.
pub const RELEASED_KEYS_INITIAL_CAPACITY: usize = 100_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenBridge";
