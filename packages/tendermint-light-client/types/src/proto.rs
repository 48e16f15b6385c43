//! Prost messages for everything the light client receives on the wire.
//! Field tags follow the canonical `tendermint.types` and
//! `ibc.lightclients.tendermint.v1` protobuf definitions where a
//! counterpart exists, so headers and commits produced by a real chain
//! decode directly.

use crate::error::TypesError;

/// Nanoseconds per second.
const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// A protobuf well-known timestamp.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct Timestamp {
    /// Seconds since the unix epoch.
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    /// Sub-second nanoseconds, `0..=999_999_999`.
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

impl Timestamp {
    /// Converts to nanoseconds since the unix epoch.
    ///
    /// # Errors
    /// Returns an error for negative or out-of-range components.
    pub fn unix_nanos(&self) -> Result<u128, TypesError> {
        let out_of_range = TypesError::TimestampOutOfRange {
            seconds: self.seconds,
            nanos: self.nanos,
        };
        let seconds = u128::try_from(self.seconds).map_err(|_| out_of_range.clone())?;
        let nanos = u128::try_from(self.nanos).map_err(|_| out_of_range.clone())?;
        if nanos >= NANOS_PER_SECOND {
            return Err(out_of_range);
        }
        Ok(seconds * NANOS_PER_SECOND + nanos)
    }

    /// Builds a timestamp from nanoseconds since the unix epoch.
    #[must_use]
    pub fn from_unix_nanos(nanos: u128) -> Self {
        Self {
            seconds: i64::try_from(nanos / NANOS_PER_SECOND).unwrap_or(i64::MAX),
            nanos: i32::try_from(nanos % NANOS_PER_SECOND).unwrap_or(0),
        }
    }
}

/// An IBC height: a revision (chain fork number) and a height within it.
/// Derived ordering is lexicographic over (revision, height), which is the
/// IBC comparison rule.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ::prost::Message)]
pub struct Height {
    /// The revision the chain is currently on.
    #[prost(uint64, tag = "1")]
    pub revision_number: u64,
    /// The height within the revision.
    #[prost(uint64, tag = "2")]
    pub revision_height: u64,
}

impl Height {
    /// Builds a height.
    #[must_use]
    pub const fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    /// True for the zero height, used to encode "unset" (e.g. not frozen).
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }
}

impl core::fmt::Display for Height {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

/// A trust-level fraction, e.g. 1/3.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct Fraction {
    /// The numerator.
    #[prost(uint64, tag = "1")]
    pub numerator: u64,
    /// The denominator; zero is rejected at client creation.
    #[prost(uint64, tag = "2")]
    pub denominator: u64,
}

/// The stored light-client state for one counterparty chain.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ClientState {
    /// The counterparty chain id.
    #[prost(string, tag = "1")]
    pub chain_id: String,
    /// Fraction of the trusted validator power a skipping update must carry.
    #[prost(message, optional, tag = "2")]
    pub trust_level: Option<Fraction>,
    /// How long a stored consensus state stays trustworthy, in seconds.
    #[prost(uint64, tag = "3")]
    pub trusting_period_secs: u64,
    /// Tolerated clock skew between chains, in seconds.
    #[prost(uint64, tag = "4")]
    pub max_clock_drift_secs: u64,
    /// The height misbehaviour was detected at; zero while unfrozen.
    #[prost(message, optional, tag = "5")]
    pub frozen_height: Option<Height>,
    /// The highest verified height.
    #[prost(message, optional, tag = "6")]
    pub latest_height: Option<Height>,
    /// Governance flag: allow updating an expired client.
    #[prost(bool, tag = "7")]
    pub allow_update_after_expiry: bool,
    /// Governance flag: allow updating a frozen client.
    #[prost(bool, tag = "8")]
    pub allow_update_after_misbehaviour: bool,
    /// The proof spec of the counterparty state tree, used for
    /// membership verification.
    #[prost(message, optional, tag = "9")]
    pub proof_spec: Option<ics23_commitment::types::ProofSpec>,
}

impl ClientState {
    /// True once misbehaviour has frozen the client.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen_height.is_some_and(|h| !h.is_zero())
    }
}

/// The trusted view of the counterparty chain at one height. Never deleted:
/// non-adjacent verification and replay detection both need history.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ConsensusState {
    /// The header time at this height.
    #[prost(message, optional, tag = "1")]
    pub timestamp: Option<Timestamp>,
    /// The app hash (state merkle root) proofs are verified against.
    #[prost(bytes = "vec", tag = "2")]
    pub root: Vec<u8>,
    /// Hash of the validator set that signs the next block.
    #[prost(bytes = "vec", tag = "3")]
    pub next_validators_hash: Vec<u8>,
}

/// The consensus version of a block.
#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct Consensus {
    /// Block protocol version.
    #[prost(uint64, tag = "1")]
    pub block: u64,
    /// App version.
    #[prost(uint64, tag = "2")]
    pub app: u64,
}

/// Metadata about the block parts a block id refers to.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct PartSetHeader {
    /// Number of parts.
    #[prost(uint32, tag = "1")]
    pub total: u32,
    /// Merkle root of the parts.
    #[prost(bytes = "vec", tag = "2")]
    pub hash: Vec<u8>,
}

/// A block identifier: the header hash plus the part-set header.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct BlockId {
    /// Hash of the block header.
    #[prost(bytes = "vec", tag = "1")]
    pub hash: Vec<u8>,
    /// The part-set header.
    #[prost(message, optional, tag = "2")]
    pub part_set_header: Option<PartSetHeader>,
}

/// The fourteen-field tendermint block header.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct LightHeader {
    /// Consensus version.
    #[prost(message, optional, tag = "1")]
    pub version: Option<Consensus>,
    /// Chain id.
    #[prost(string, tag = "2")]
    pub chain_id: String,
    /// Block height.
    #[prost(int64, tag = "3")]
    pub height: i64,
    /// Block time.
    #[prost(message, optional, tag = "4")]
    pub time: Option<Timestamp>,
    /// Id of the previous block.
    #[prost(message, optional, tag = "5")]
    pub last_block_id: Option<BlockId>,
    /// Hash of the previous block's commit.
    #[prost(bytes = "vec", tag = "6")]
    pub last_commit_hash: Vec<u8>,
    /// Merkle root of the transactions.
    #[prost(bytes = "vec", tag = "7")]
    pub data_hash: Vec<u8>,
    /// Hash of the validator set signing this block.
    #[prost(bytes = "vec", tag = "8")]
    pub validators_hash: Vec<u8>,
    /// Hash of the validator set signing the next block.
    #[prost(bytes = "vec", tag = "9")]
    pub next_validators_hash: Vec<u8>,
    /// Hash of the consensus parameters.
    #[prost(bytes = "vec", tag = "10")]
    pub consensus_hash: Vec<u8>,
    /// The application state root after the previous block.
    #[prost(bytes = "vec", tag = "11")]
    pub app_hash: Vec<u8>,
    /// Root of the previous block's results.
    #[prost(bytes = "vec", tag = "12")]
    pub last_results_hash: Vec<u8>,
    /// Hash of the evidence included in this block.
    #[prost(bytes = "vec", tag = "13")]
    pub evidence_hash: Vec<u8>,
    /// Address of the block proposer.
    #[prost(bytes = "vec", tag = "14")]
    pub proposer_address: Vec<u8>,
}

/// How one validator slot voted in a commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum BlockIdFlag {
    /// Unknown; never valid in a commit.
    Unknown = 0,
    /// The validator did not vote.
    Absent = 1,
    /// The validator voted for the committed block.
    Commit = 2,
    /// The validator voted nil.
    Nil = 3,
}

/// One validator slot of a commit, aligned with the validator-set order.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct CommitSig {
    /// How this slot voted.
    #[prost(enumeration = "BlockIdFlag", tag = "1")]
    pub block_id_flag: i32,
    /// Address of the validator in this slot.
    #[prost(bytes = "vec", tag = "2")]
    pub validator_address: Vec<u8>,
    /// The vote time, part of the signed payload.
    #[prost(message, optional, tag = "3")]
    pub timestamp: Option<Timestamp>,
    /// The vote signature; empty for absent slots.
    #[prost(bytes = "vec", tag = "4")]
    pub signature: Vec<u8>,
}

/// The aggregated precommits that finalize one block.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Commit {
    /// The committed height.
    #[prost(int64, tag = "1")]
    pub height: i64,
    /// The consensus round the commit was formed in.
    #[prost(int32, tag = "2")]
    pub round: i32,
    /// The committed block id.
    #[prost(message, optional, tag = "3")]
    pub block_id: Option<BlockId>,
    /// One signature slot per validator, in validator-set order.
    #[prost(message, repeated, tag = "4")]
    pub signatures: Vec<CommitSig>,
}

/// A header together with the commit that finalizes it.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct SignedHeader {
    /// The block header.
    #[prost(message, optional, tag = "1")]
    pub header: Option<LightHeader>,
    /// The commit over that header.
    #[prost(message, optional, tag = "2")]
    pub commit: Option<Commit>,
}

/// A validator public key.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct PublicKey {
    /// The populated key variant.
    #[prost(oneof = "public_key::Sum", tags = "1, 2")]
    pub sum: Option<public_key::Sum>,
}

/// Nested message and enum types in `PublicKey`.
pub mod public_key {
    /// The key variants a [`super::PublicKey`] can carry.
    #[derive(Clone, PartialEq, Eq, ::prost::Oneof)]
    pub enum Sum {
        /// A 32-byte Ed25519 public key.
        #[prost(bytes, tag = "1")]
        Ed25519(Vec<u8>),
        /// A 33-byte compressed secp256k1 public key.
        #[prost(bytes, tag = "2")]
        Secp256k1(Vec<u8>),
    }
}

/// One member of a validator set.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Validator {
    /// The validator address (first 20 bytes of the pubkey hash).
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    /// The validator public key.
    #[prost(message, optional, tag = "2")]
    pub pub_key: Option<PublicKey>,
    /// Stake-weighted vote weight.
    #[prost(int64, tag = "3")]
    pub voting_power: i64,
    /// Proposer rotation priority; not part of the set hash.
    #[prost(int64, tag = "4")]
    pub proposer_priority: i64,
}

/// The hashed form of a validator: only the fields committed to by the
/// validator-set hash.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct SimpleValidator {
    /// The validator public key.
    #[prost(message, optional, tag = "1")]
    pub pub_key: Option<PublicKey>,
    /// Stake-weighted vote weight.
    #[prost(int64, tag = "2")]
    pub voting_power: i64,
}

/// An ordered validator set.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ValidatorSet {
    /// The members, in canonical order.
    #[prost(message, repeated, tag = "1")]
    pub validators: Vec<Validator>,
    /// The current proposer.
    #[prost(message, optional, tag = "2")]
    pub proposer: Option<Validator>,
    /// Cached sum of all voting powers; cross-checked, never trusted alone.
    #[prost(int64, tag = "3")]
    pub total_voting_power: i64,
}

/// The update-client payload: an untrusted signed header and validator set,
/// plus the relayer's reference to the trusted state it builds on.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct TmHeader {
    /// The untrusted header and its commit.
    #[prost(message, optional, tag = "1")]
    pub signed_header: Option<SignedHeader>,
    /// The validator set the commit claims to come from.
    #[prost(message, optional, tag = "2")]
    pub validator_set: Option<ValidatorSet>,
    /// The stored height verification starts from.
    #[prost(message, optional, tag = "3")]
    pub trusted_height: Option<Height>,
    /// The validator set at `trusted_height + 1`, supplied by the relayer
    /// and checked against the stored next-validators hash.
    #[prost(message, optional, tag = "4")]
    pub trusted_validators: Option<ValidatorSet>,
}

/// The vote type carried in a canonical vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SignedMsgType {
    /// Unknown; never signed.
    Unknown = 0,
    /// A prevote.
    Prevote = 1,
    /// A precommit; the only type a commit carries.
    Precommit = 2,
    /// A block proposal.
    Proposal = 32,
}

/// Canonical form of a part-set header, for signing.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct CanonicalPartSetHeader {
    /// Number of parts.
    #[prost(uint32, tag = "1")]
    pub total: u32,
    /// Merkle root of the parts.
    #[prost(bytes = "vec", tag = "2")]
    pub hash: Vec<u8>,
}

/// Canonical form of a block id, for signing.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct CanonicalBlockId {
    /// Hash of the block header.
    #[prost(bytes = "vec", tag = "1")]
    pub hash: Vec<u8>,
    /// The part-set header.
    #[prost(message, optional, tag = "2")]
    pub part_set_header: Option<CanonicalPartSetHeader>,
}

/// The canonical vote: the exact message a validator signs. Height and
/// round are fixed-width so the encoding length never depends on the value.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct CanonicalVote {
    /// The vote type; always `PRECOMMIT` in a commit.
    #[prost(enumeration = "SignedMsgType", tag = "1")]
    pub r#type: i32,
    /// The voted height.
    #[prost(sfixed64, tag = "2")]
    pub height: i64,
    /// The consensus round.
    #[prost(sfixed64, tag = "3")]
    pub round: i64,
    /// The voted block id.
    #[prost(message, optional, tag = "4")]
    pub block_id: Option<CanonicalBlockId>,
    /// The vote time.
    #[prost(message, optional, tag = "5")]
    pub timestamp: Option<Timestamp>,
    /// The chain id, domain-separating votes across chains.
    #[prost(string, tag = "6")]
    pub chain_id: String,
}

impl From<&BlockId> for CanonicalBlockId {
    fn from(block_id: &BlockId) -> Self {
        Self {
            hash: block_id.hash.clone(),
            part_set_header: block_id.part_set_header.as_ref().map(|p| {
                CanonicalPartSetHeader {
                    total: p.total,
                    hash: p.hash.clone(),
                }
            }),
        }
    }
}
