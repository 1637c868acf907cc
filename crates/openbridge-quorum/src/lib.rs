//! # openbridge-quorum
//!
//! **Authorization plane**: canonical release digests, the authorized-signer
//! registry, and threshold signature verification.
//!
//! ## Architecture
//!
//! The signer quorum lives off-ledger. This crate only consumes its output:
//! a set of ed25519 signatures over a [`ReleaseIntent`] digest. Verification
//! is a pure function of registry state and inputs:
//!
//! 1. Build the canonical digest from every field that defines the release
//! 2. Check each signature strictly against its claimed signer key
//! 3. Reject duplicates and identities outside the registry
//! 4. Require at least `threshold` approvals
//!
//! A single invalid approval invalidates the whole set (fail-closed).

pub mod digest;
pub mod registry;
pub mod verifier;

pub use digest::ReleaseIntent;
pub use registry::SignerRegistry;
pub use verifier::{verify_quorum, SignerApproval};
