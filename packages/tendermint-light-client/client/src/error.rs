//! This module defines [`ClientError`].

use ics23_commitment::ProofError;
use tm_light_client_types::proto::Height;
use tm_light_client_types::TypesError;
use tm_light_client_verifier::VerifierError;

/// Error type for the light-client facade. Every failure aborts the call
/// before any store write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// An input blob failed to decode
    #[error("malformed input: {0}")]
    MalformedInput(#[from] prost::DecodeError),

    /// A required message field was absent
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A client id is already in use
    #[error("client `{0}` already exists")]
    ClientAlreadyExists(String),

    /// No client under the given id
    #[error("client `{0}` not found")]
    ClientNotFound(String),

    /// No consensus state at the given height
    #[error("no consensus state for client `{client_id}` at height {height}")]
    ConsensusStateNotFound {
        /// The client id
        client_id: String,
        /// The missing height
        height: Height,
    },

    /// No processed-at entry at the given height
    #[error("no processed entry for client `{client_id}` at height {height}")]
    ProcessedEntryNotFound {
        /// The client id
        client_id: String,
        /// The missing height
        height: Height,
    },

    /// The exact consensus state at this height is already stored
    #[error("update at height {0} was already submitted")]
    AlreadySubmitted(Height),

    /// The client froze at a misbehaviour height
    #[error("client is frozen at height {0}")]
    ClientFrozen(Height),

    /// The queried height is above the latest verified height
    #[error("height {requested} exceeds latest verified height {latest}")]
    InsufficientHeight {
        /// The latest verified height
        latest: Height,
        /// The queried height
        requested: Height,
    },

    /// A header height that does not fit the wire type
    #[error("non-positive header height ({0})")]
    NonPositiveHeight(i64),

    /// The commitment prefix is empty
    #[error("empty commitment prefix")]
    EmptyPrefix,

    /// The commitment path is empty
    #[error("empty commitment path")]
    EmptyPath,

    /// The proof blob is empty
    #[error("empty proof")]
    EmptyProof,

    /// The delay period has not elapsed yet
    #[error(
        "delay not elapsed (processed at height {processed_height}, time \
         {processed_time}; current height {current_height}, time {current_time})"
    )]
    DelayNotElapsed {
        /// Host height the consensus state was stored at
        processed_height: u64,
        /// Host time the consensus state was stored at, unix nanoseconds
        processed_time: u128,
        /// Current host height
        current_height: u64,
        /// Current host time, unix nanoseconds
        current_time: u128,
    },

    /// Header verification failed
    #[error("header verification failed: {0}")]
    Verification(#[from] VerifierError),

    /// Commitment proof verification failed
    #[error("proof verification failed: {0}")]
    Proof(#[from] ProofError),

    /// A wire-model conversion failed
    #[error("types error: {0}")]
    Types(#[from] TypesError),
}
