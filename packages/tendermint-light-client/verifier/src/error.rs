//! This module defines [`VerifierError`].

use tm_light_client_types::TypesError;

/// Error type for header and commit verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifierError {
    /// A wire-model conversion failed
    #[error("types error: {0}")]
    Types(#[from] TypesError),

    /// A required message field was absent
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A trust threshold with a zero denominator
    #[error("trust threshold denominator is zero")]
    ZeroTrustDenominator,

    /// A trust threshold above one
    #[error("trust threshold {numerator}/{denominator} is greater than one")]
    TrustThresholdTooLarge {
        /// Threshold numerator
        numerator: u64,
        /// Threshold denominator
        denominator: u64,
    },

    /// The header is for a different chain
    #[error("chain id mismatch (expected {expected}, found {found})")]
    ChainIdMismatch {
        /// Chain id of the trusted state
        expected: String,
        /// Chain id carried by the header
        found: String,
    },

    /// The untrusted height is not above the trusted height
    #[error("untrusted height {untrusted} is not greater than trusted height {trusted}")]
    NonIncreasingHeight {
        /// The trusted height
        trusted: u64,
        /// The untrusted height
        untrusted: u64,
    },

    /// The header carries a non-positive height
    #[error("non-positive header height ({0})")]
    NonPositiveHeight(i64),

    /// The untrusted time is not after the trusted time
    #[error("untrusted header time {untrusted} is not after trusted time {trusted}")]
    NonIncreasingTime {
        /// Trusted time in unix nanoseconds
        trusted: u128,
        /// Untrusted header time in unix nanoseconds
        untrusted: u128,
    },

    /// The trusted state fell out of the trusting period
    #[error("trusted state from {trusted_time} is outside the trusting period at {now}")]
    TrustedStateExpired {
        /// Trusted header time in unix nanoseconds
        trusted_time: u128,
        /// Host time in unix nanoseconds
        now: u128,
    },

    /// The header time is ahead of the host clock plus drift
    #[error("header time {header_time} is from the future (max accepted {max_time})")]
    HeaderFromFuture {
        /// Header time in unix nanoseconds
        header_time: u128,
        /// Latest accepted time in unix nanoseconds
        max_time: u128,
    },

    /// The commit is for a different height than the header
    #[error("commit height {commit} does not match header height {header}")]
    CommitHeightMismatch {
        /// Height carried by the commit
        commit: i64,
        /// Height carried by the header
        header: i64,
    },

    /// The commit is for a different block than the header
    #[error("commit block hash {commit} does not match header hash {header}")]
    CommitBlockIdMismatch {
        /// Block hash carried by the commit (hex)
        commit: String,
        /// Recomputed header hash (hex)
        header: String,
    },

    /// The supplied validator set does not hash to the header's commitment
    #[error("validator set hash {computed} does not match header commitment {expected}")]
    ValidatorSetHashMismatch {
        /// Hash carried by the header (hex)
        expected: String,
        /// Hash of the supplied set (hex)
        computed: String,
    },

    /// An adjacent update's validator set does not match the stored
    /// next-validators hash
    #[error("validator set hash {computed} does not match trusted next-validators hash {expected}")]
    NextValidatorsMismatch {
        /// Stored next-validators hash (hex)
        expected: String,
        /// Hash of the supplied set (hex)
        computed: String,
    },

    /// The commit does not carry one slot per validator
    #[error("commit carries {found} signature slots for {expected} validators")]
    SignatureCountMismatch {
        /// Number of validators
        expected: usize,
        /// Number of commit slots
        found: usize,
    },

    /// A commit slot carries an unknown vote flag
    #[error("invalid block id flag ({0})")]
    InvalidBlockIdFlag(i32),

    /// A vote signature failed to verify
    #[error("invalid signature from validator {0}")]
    InvalidSignature(String),

    /// A validator key variant the verifier does not support
    #[error("unsupported public key for validator {0}")]
    UnsupportedPublicKey(String),

    /// The same validator voted twice
    #[error("duplicate vote from validator {0}")]
    DuplicateVote(String),

    /// Tallied power did not reach the required fraction of the total
    #[error(
        "insufficient voting power (tallied {tallied}, needed more than \
         {numerator}/{denominator} of {total})"
    )]
    InsufficientVotingPower {
        /// Power of the verified votes
        tallied: u64,
        /// Total power of the set being tallied against
        total: u64,
        /// Required fraction numerator
        numerator: u64,
        /// Required fraction denominator
        denominator: u64,
    },
}
