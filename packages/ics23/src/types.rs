//! This module defines the ICS-23 proof messages and their canonical wire
//! encoding. Field tags follow the upstream `cosmos.ics23.v1` protobuf
//! definitions, so proofs produced by any conforming chain decode directly.

/// `ExistenceProof` takes a key and a value and a set of steps to perform on
/// it. The result of performing all these steps will provide a root hash,
/// which can be compared to the value in a header.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ExistenceProof {
    /// The key of the proven entry.
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
    /// The value of the proven entry.
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
    /// How the leaf node holding the entry is hashed.
    #[prost(message, optional, tag = "3")]
    pub leaf: Option<LeafOp>,
    /// The steps from the leaf up to the root, in order.
    #[prost(message, repeated, tag = "4")]
    pub path: Vec<InnerOp>,
}

/// `NonExistenceProof` takes proofs of two neighbors, one left of the desired
/// key, one right of it. If both proofs are valid and the entries are
/// neighbors, there is no valid entry for the given key.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct NonExistenceProof {
    /// The absent key.
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
    /// Proof of the entry immediately left of `key`, if any.
    #[prost(message, optional, tag = "2")]
    pub left: Option<ExistenceProof>,
    /// Proof of the entry immediately right of `key`, if any.
    #[prost(message, optional, tag = "3")]
    pub right: Option<ExistenceProof>,
}

/// `CommitmentProof` is either an existence or non-existence proof, or a
/// batch of such proofs (possibly compressed).
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct CommitmentProof {
    /// The populated proof variant.
    #[prost(oneof = "commitment_proof::Proof", tags = "1, 2, 3, 4")]
    pub proof: Option<commitment_proof::Proof>,
}

/// Nested message and enum types in `CommitmentProof`.
pub mod commitment_proof {
    /// The proof variants a [`super::CommitmentProof`] can carry.
    #[derive(Clone, PartialEq, Eq, ::prost::Oneof)]
    pub enum Proof {
        /// A single existence proof.
        #[prost(message, tag = "1")]
        Exist(super::ExistenceProof),
        /// A single non-existence proof.
        #[prost(message, tag = "2")]
        Nonexist(super::NonExistenceProof),
        /// A batch of proofs.
        #[prost(message, tag = "3")]
        Batch(super::BatchProof),
        /// A batch of proofs sharing a deduplicated inner-op table.
        #[prost(message, tag = "4")]
        Compressed(super::CompressedBatchProof),
    }
}

/// `LeafOp` represents the transformation from the original key-value pair
/// into the leaf hash: `hash(prefix ‖ length(prehash(key)) ‖ prehash(key) ‖
/// length(prehash(value)) ‖ prehash(value))`.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct LeafOp {
    /// The outer hash applied to the assembled leaf bytes.
    #[prost(enumeration = "HashOp", tag = "1")]
    pub hash: i32,
    /// Hash applied to the key before length-prefixing.
    #[prost(enumeration = "HashOp", tag = "2")]
    pub prehash_key: i32,
    /// Hash applied to the value before length-prefixing.
    #[prost(enumeration = "HashOp", tag = "3")]
    pub prehash_value: i32,
    /// How the key and value lengths are encoded into the leaf bytes.
    #[prost(enumeration = "LengthOp", tag = "4")]
    pub length: i32,
    /// Fixed bytes prepended to differentiate a leaf from an inner node.
    #[prost(bytes = "vec", tag = "5")]
    pub prefix: Vec<u8>,
}

/// `InnerOp` represents one non-leaf merkle step:
/// `hash(prefix ‖ child ‖ suffix)`, where `child` is the result of the step
/// below and prefix/suffix carry the sibling hashes and any node framing.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct InnerOp {
    /// The hash applied to the assembled node bytes.
    #[prost(enumeration = "HashOp", tag = "1")]
    pub hash: i32,
    /// Bytes placed before the child hash.
    #[prost(bytes = "vec", tag = "2")]
    pub prefix: Vec<u8>,
    /// Bytes placed after the child hash.
    #[prost(bytes = "vec", tag = "3")]
    pub suffix: Vec<u8>,
}

/// `ProofSpec` pins down the expected parameters of every proof for a given
/// tree type. It is stored in the client and validated against any incoming
/// proof; without it, many key-value pairs could be forged into a matching
/// root by reinterpreting the preimage.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ProofSpec {
    /// Required leaf parameters; the proof's leaf prefix must start with the
    /// spec's prefix (the spec prefix may be shorter).
    #[prost(message, optional, tag = "1")]
    pub leaf_spec: Option<LeafOp>,
    /// Required inner-node structure.
    #[prost(message, optional, tag = "2")]
    pub inner_spec: Option<InnerSpec>,
    /// Maximum number of inner ops allowed (0 = unbounded).
    #[prost(int32, tag = "3")]
    pub max_depth: i32,
    /// Minimum number of inner ops required (0 = unbounded).
    #[prost(int32, tag = "4")]
    pub min_depth: i32,
}

/// `InnerSpec` contains the store-specific structure info needed to decide
/// whether two proofs from a given store are neighbors.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct InnerSpec {
    /// Ordering of the children, counted from 0. An IAVL tree is `[0, 1]`.
    #[prost(int32, repeated, tag = "1")]
    pub child_order: Vec<i32>,
    /// Byte size of each child hash inside an inner node.
    #[prost(int32, tag = "2")]
    pub child_size: i32,
    /// Minimum length of an inner-op prefix before any child padding.
    #[prost(int32, tag = "3")]
    pub min_prefix_length: i32,
    /// Maximum length of an inner-op prefix before any child padding.
    #[prost(int32, tag = "4")]
    pub max_prefix_length: i32,
    /// The prehash image used where a child is nil (e.g. 32 zero bytes).
    #[prost(bytes = "vec", tag = "5")]
    pub empty_child: Vec<u8>,
    /// The hash algorithm required for every inner op.
    #[prost(enumeration = "HashOp", tag = "6")]
    pub hash: i32,
}

/// `BatchProof` is a group of proofs that can be compressed.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct BatchProof {
    /// The batched proofs.
    #[prost(message, repeated, tag = "1")]
    pub entries: Vec<BatchEntry>,
}

/// One entry of a [`BatchProof`]; a restricted `CommitmentProof` to avoid
/// recursion.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct BatchEntry {
    /// The populated entry variant.
    #[prost(oneof = "batch_entry::Proof", tags = "1, 2")]
    pub proof: Option<batch_entry::Proof>,
}

/// Nested message and enum types in `BatchEntry`.
pub mod batch_entry {
    /// The proof variants a [`super::BatchEntry`] can carry.
    #[derive(Clone, PartialEq, Eq, ::prost::Oneof)]
    pub enum Proof {
        /// An existence proof.
        #[prost(message, tag = "1")]
        Exist(super::ExistenceProof),
        /// A non-existence proof.
        #[prost(message, tag = "2")]
        Nonexist(super::NonExistenceProof),
    }
}

/// A batch of proofs whose inner ops are deduplicated into `lookup_inners`.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct CompressedBatchProof {
    /// The compressed entries.
    #[prost(message, repeated, tag = "1")]
    pub entries: Vec<CompressedBatchEntry>,
    /// The shared inner-op table the entries index into.
    #[prost(message, repeated, tag = "2")]
    pub lookup_inners: Vec<InnerOp>,
}

/// One entry of a [`CompressedBatchProof`].
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct CompressedBatchEntry {
    /// The populated entry variant.
    #[prost(oneof = "compressed_batch_entry::Proof", tags = "1, 2")]
    pub proof: Option<compressed_batch_entry::Proof>,
}

/// Nested message and enum types in `CompressedBatchEntry`.
pub mod compressed_batch_entry {
    /// The proof variants a [`super::CompressedBatchEntry`] can carry.
    #[derive(Clone, PartialEq, Eq, ::prost::Oneof)]
    pub enum Proof {
        /// A compressed existence proof.
        #[prost(message, tag = "1")]
        Exist(super::CompressedExistenceProof),
        /// A compressed non-existence proof.
        #[prost(message, tag = "2")]
        Nonexist(super::CompressedNonExistenceProof),
    }
}

/// An [`ExistenceProof`] whose path is indices into the lookup table.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct CompressedExistenceProof {
    /// The key of the proven entry.
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
    /// The value of the proven entry.
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
    /// How the leaf node holding the entry is hashed.
    #[prost(message, optional, tag = "3")]
    pub leaf: Option<LeafOp>,
    /// Indices into `CompressedBatchProof::lookup_inners`, leaf to root.
    #[prost(int32, repeated, tag = "4")]
    pub path: Vec<i32>,
}

/// A [`NonExistenceProof`] over compressed bounding proofs.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct CompressedNonExistenceProof {
    /// The absent key.
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
    /// Compressed proof of the entry immediately left of `key`, if any.
    #[prost(message, optional, tag = "2")]
    pub left: Option<CompressedExistenceProof>,
    /// Compressed proof of the entry immediately right of `key`, if any.
    #[prost(message, optional, tag = "3")]
    pub right: Option<CompressedExistenceProof>,
}

/// The hash algorithms a proof step may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum HashOp {
    /// No hash; passes data through unchanged where legal.
    NoHash = 0,
    /// SHA-256.
    Sha256 = 1,
    /// SHA-512.
    Sha512 = 2,
    /// Keccak-256.
    Keccak = 3,
    /// RIPEMD-160.
    Ripemd160 = 4,
    /// `ripemd160(sha256(x))`.
    Bitcoin = 5,
}

/// How key and value lengths are encoded into the leaf bytes. After encoding
/// with the given algorithm, each length is prepended to its own data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum LengthOp {
    /// No length information included.
    NoPrefix = 0,
    /// Protobuf varint encoding of the length.
    VarProto = 1,
    /// RLP integer encoding of the length.
    VarRlp = 2,
    /// Big-endian 32-bit length prefix.
    Fixed32Big = 3,
    /// Little-endian 32-bit length prefix.
    Fixed32Little = 4,
    /// Big-endian 64-bit length prefix.
    Fixed64Big = 5,
    /// Little-endian 64-bit length prefix.
    Fixed64Little = 6,
    /// No prefix, but the input must be exactly 32 bytes.
    Require32Bytes = 7,
    /// No prefix, but the input must be exactly 64 bytes.
    Require64Bytes = 8,
}

impl ProofSpec {
    /// Proof parameters for a cosmos-sdk IAVL store.
    #[must_use]
    pub fn iavl() -> Self {
        Self {
            leaf_spec: Some(LeafOp {
                hash: HashOp::Sha256.into(),
                prehash_key: HashOp::NoHash.into(),
                prehash_value: HashOp::Sha256.into(),
                length: LengthOp::VarProto.into(),
                prefix: vec![0],
            }),
            inner_spec: Some(InnerSpec {
                child_order: vec![0, 1],
                child_size: 33,
                min_prefix_length: 4,
                max_prefix_length: 12,
                empty_child: vec![],
                hash: HashOp::Sha256.into(),
            }),
            max_depth: 0,
            min_depth: 0,
        }
    }

    /// Proof parameters for a tendermint simple-merkle store.
    #[must_use]
    pub fn tendermint() -> Self {
        Self {
            leaf_spec: Some(LeafOp {
                hash: HashOp::Sha256.into(),
                prehash_key: HashOp::NoHash.into(),
                prehash_value: HashOp::Sha256.into(),
                length: LengthOp::VarProto.into(),
                prefix: vec![0],
            }),
            inner_spec: Some(InnerSpec {
                child_order: vec![0, 1],
                child_size: 32,
                min_prefix_length: 1,
                max_prefix_length: 1,
                empty_child: vec![],
                hash: HashOp::Sha256.into(),
            }),
            max_depth: 0,
            min_depth: 0,
        }
    }

    /// Proof parameters for a sparse merkle tree store.
    #[must_use]
    pub fn smt() -> Self {
        Self {
            leaf_spec: Some(LeafOp {
                hash: HashOp::Sha256.into(),
                prehash_key: HashOp::Sha256.into(),
                prehash_value: HashOp::Sha256.into(),
                length: LengthOp::NoPrefix.into(),
                prefix: vec![0],
            }),
            inner_spec: Some(InnerSpec {
                child_order: vec![0, 1],
                child_size: 32,
                min_prefix_length: 1,
                max_prefix_length: 1,
                empty_child: vec![0; 32],
                hash: HashOp::Sha256.into(),
            }),
            max_depth: 256,
            min_depth: 0,
        }
    }
}
