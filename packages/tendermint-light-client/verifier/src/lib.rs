//! Verification engine for tendermint headers: vote signature checks,
//! power tallies against a trust threshold, and the adjacent and skipping
//! update rules.
#![deny(clippy::nursery, clippy::pedantic, warnings, missing_docs)]

pub mod commit;
pub mod error;
pub mod options;
pub mod verify;

pub use error::VerifierError;
pub use options::{Options, TrustThreshold};
pub use verify::{verify, verify_new_header_and_vals, TrustedBlockState, UntrustedBlockState};
