//! This module defines [`TypesError`].

/// Error type for wire-model conversions and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    /// A required message field was absent
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A timestamp carried a negative component
    #[error("timestamp out of range (seconds: {seconds}, nanos: {nanos})")]
    TimestampOutOfRange {
        /// Seconds component
        seconds: i64,
        /// Nanoseconds component
        nanos: i32,
    },

    /// A validator carried a negative voting power
    #[error("negative voting power ({0})")]
    NegativeVotingPower(i64),

    /// The validator set is empty
    #[error("validator set is empty")]
    EmptyValidatorSet,

    /// The summed voting power does not fit `u64`
    #[error("total voting power ({0}) overflows u64")]
    TotalPowerOverflow(u128),

    /// The cached total voting power disagrees with the recomputed sum
    #[error("cached total voting power ({cached}) does not match the sum ({computed})")]
    TotalPowerMismatch {
        /// Total carried on the wire
        cached: i64,
        /// Total recomputed from the members
        computed: u64,
    },
}
