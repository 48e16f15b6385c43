//! This module defines [`ProofError`].

/// Error type for ICS-23 proof verification and compression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProofError {
    /// The proven key is empty
    #[error("existence proof has an empty key")]
    EmptyKey,

    /// The proven value is empty
    #[error("existence proof has an empty value")]
    EmptyValue,

    /// An inner op was applied to an empty child hash
    #[error("inner op applied to an empty child")]
    EmptyChild,

    /// The proof carries no leaf op
    #[error("existence proof has no leaf op")]
    MissingLeafOp,

    /// The spec carries no leaf spec or inner spec
    #[error("proof spec is missing its {0} spec")]
    IncompleteSpec(&'static str),

    /// A hash op outside the supported set was requested
    #[error("unsupported hash op ({0})")]
    UnsupportedHashOp(i32),

    /// The VAR_PROTO length op is not implemented
    #[error("length op VAR_PROTO is unimplemented")]
    UnimplementedLengthOp,

    /// A length op outside the supported set was requested
    #[error("unsupported length op ({0})")]
    UnsupportedLengthOp(i32),

    /// A REQUIRE_*_BYTES length op saw input of the wrong size
    #[error("length op requires exactly {expected} bytes, found {found}")]
    RequiredLengthMismatch {
        /// Required input size
        expected: usize,
        /// Actual input size
        found: usize,
    },

    /// A leaf op field does not match the proof spec
    #[error("leaf op field `{0}` does not match the proof spec")]
    LeafSpecMismatch(&'static str),

    /// An inner op uses a different hash than the inner spec
    #[error("inner op hash ({found}) does not match the spec ({expected})")]
    InnerHashMismatch {
        /// Hash op required by the spec
        expected: i32,
        /// Hash op found in the proof
        found: i32,
    },

    /// An inner op prefix is outside the spec's allowed length range
    #[error("inner op prefix length {found} outside [{min}, {max}]")]
    InnerPrefixLength {
        /// Shortest allowed prefix
        min: usize,
        /// Longest allowed prefix
        max: usize,
        /// Actual prefix length
        found: usize,
    },

    /// An inner op suffix is not a whole number of child hashes
    #[error("inner op suffix length {found} is not a multiple of the child size {child_size}")]
    InnerSuffixLength {
        /// Child hash size from the spec
        child_size: usize,
        /// Actual suffix length
        found: usize,
    },

    /// An inner op prefix begins with the leaf prefix, so a leaf could be
    /// replayed as an inner node
    #[error("inner op prefix starts with the leaf prefix")]
    InnerPrefixIsLeafPrefix,

    /// The path length is outside the spec's depth bounds
    #[error("proof path depth {found} outside [{min}, {max}]")]
    PathDepthOutOfRange {
        /// Minimum depth (0 = unbounded)
        min: i32,
        /// Maximum depth (0 = unbounded)
        max: i32,
        /// Actual number of inner ops
        found: usize,
    },

    /// The queried key does not match the proof body
    #[error("provided key ({}) does not match the proof key ({})", hex::encode(.provided), hex::encode(.in_proof))]
    KeyMismatch {
        /// Key supplied by the caller
        provided: Vec<u8>,
        /// Key carried in the proof
        in_proof: Vec<u8>,
    },

    /// The queried value does not match the proof body
    #[error("provided value ({}) does not match the proof value ({})", hex::encode(.provided), hex::encode(.in_proof))]
    ValueMismatch {
        /// Value supplied by the caller
        provided: Vec<u8>,
        /// Value carried in the proof
        in_proof: Vec<u8>,
    },

    /// The folded path does not reproduce the trusted root
    #[error("calculated root ({}) does not match the trusted root ({})", hex::encode(.calculated), hex::encode(.trusted))]
    RootMismatch {
        /// Root computed from the proof
        calculated: Vec<u8>,
        /// Root the caller trusts
        trusted: Vec<u8>,
    },

    /// A non-existence proof carries neither bounding proof
    #[error("non-existence proof has neither a left nor a right bound")]
    NoBoundingProof,

    /// The left bound does not sort strictly below the queried key
    #[error("left bound ({}) is not strictly below the key ({})", hex::encode(.bound), hex::encode(.key))]
    LeftBoundNotBelow {
        /// Key of the left bounding proof
        bound: Vec<u8>,
        /// Queried key
        key: Vec<u8>,
    },

    /// The right bound does not sort strictly above the queried key
    #[error("right bound ({}) is not strictly above the key ({})", hex::encode(.bound), hex::encode(.key))]
    RightBoundNotAbove {
        /// Key of the right bounding proof
        bound: Vec<u8>,
        /// Queried key
        key: Vec<u8>,
    },

    /// A missing left bound requires the right path to be left-most
    #[error("right bound is not the left-most path in the tree")]
    RightBoundNotLeftMost,

    /// A missing right bound requires the left path to be right-most
    #[error("left bound is not the right-most path in the tree")]
    LeftBoundNotRightMost,

    /// The two bounding paths are not adjacent in the tree
    #[error("left and right bounds are not neighboring leaves")]
    BoundsNotAdjacent,

    /// No declared branch produces the observed inner-op padding
    #[error("no branch in the child order matches the inner op padding")]
    BranchNotInferable,

    /// A compressed path index points outside the lookup table
    #[error("lookup index {index} outside the inner-op table of length {len}")]
    LookupIndexOutOfRange {
        /// The offending index
        index: i32,
        /// Size of the lookup table
        len: usize,
    },

    /// The commitment proof has no populated variant
    #[error("commitment proof has no populated variant")]
    EmptyProof,

    /// The proof does not carry the variant the operation needs
    #[error("no {0} proof found for the queried key")]
    MissingProofVariant(&'static str),
}
