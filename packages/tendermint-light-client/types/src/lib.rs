//! The wire model of the tendermint light client: headers, commits,
//! validator sets, client and consensus state, and the canonical hashing
//! rules that tie them together.
#![deny(clippy::nursery, clippy::pedantic, warnings, missing_docs)]

pub mod error;
pub mod hash;
pub mod merkle;
pub mod proto;
pub mod validator_set;

pub use error::TypesError;
