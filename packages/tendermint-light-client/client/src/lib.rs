//! The top of the stack: an IBC-style tendermint light client binding
//! stored consensus states to header verification and ICS-23 proof
//! checking, behind a pluggable store.
#![deny(clippy::nursery, clippy::pedantic, warnings, missing_docs)]

pub mod client;
pub mod error;
pub mod store;

pub use client::{LightClient, UpdateOutcome};
pub use error::ClientError;
pub use store::{ClientStore, InMemoryStore};
