//! The light-client facade: client lifecycle, header updates, and
//! commitment-proof verification against stored consensus states.
//!
//! Nothing here polls a clock or a chain. Host height and host time come
//! in as arguments, and all state lives behind the [`ClientStore`] seam,
//! so every call is a pure function of its inputs plus the store.

use ibc_trust_utils::ensure;
use prost::Message;

use ics23_commitment::types::{CommitmentProof, ProofSpec};
use tm_light_client_types::proto::{ClientState, ConsensusState, Height, TmHeader};
use tm_light_client_verifier::{
    verify, Options, TrustThreshold, TrustedBlockState, UntrustedBlockState,
};

use crate::error::ClientError;
use crate::store::ClientStore;

/// Nanoseconds per second.
const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// What an accepted update did to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The header verified and the consensus state at this height was
    /// stored.
    Updated(Height),
    /// The header verified but conflicts with a previously stored state
    /// at the same height. The client is now frozen at this height.
    Misbehaviour(Height),
}

/// A tendermint light client running against a pluggable store.
#[derive(Debug, Clone)]
pub struct LightClient<S: ClientStore> {
    store: S,
}

impl<S: ClientStore> LightClient<S> {
    /// Wraps a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Read access to the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the client, returning its store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn load_client_state(&self, client_id: &str) -> Result<ClientState, ClientError> {
        let bytes = self
            .store
            .client_state(client_id)
            .ok_or_else(|| ClientError::ClientNotFound(client_id.to_owned()))?;
        Ok(ClientState::decode(bytes.as_slice())?)
    }

    fn load_consensus_state(
        &self,
        client_id: &str,
        height: Height,
    ) -> Result<ConsensusState, ClientError> {
        let bytes = self.store.consensus_state(client_id, height).ok_or_else(|| {
            ClientError::ConsensusStateNotFound {
                client_id: client_id.to_owned(),
                height,
            }
        })?;
        Ok(ConsensusState::decode(bytes.as_slice())?)
    }

    fn verification_options(client_state: &ClientState) -> Result<Options, ClientError> {
        let trust_level = client_state
            .trust_level
            .as_ref()
            .ok_or(ClientError::MissingField("client_state.trust_level"))?;
        Ok(Options {
            trust_threshold: TrustThreshold::try_from(trust_level)?,
            trusting_period_secs: client_state.trusting_period_secs,
            clock_drift_secs: client_state.max_clock_drift_secs,
        })
    }

    /// Initializes a client from encoded client and consensus states.
    /// Returns the initial latest height.
    ///
    /// # Errors
    /// Returns an error when the id is taken, a blob fails to decode, or
    /// the client state is unusable (zero trust-level denominator, missing
    /// latest height or proof spec).
    pub fn create_client(
        &mut self,
        client_id: &str,
        client_state_bz: &[u8],
        consensus_state_bz: &[u8],
    ) -> Result<Height, ClientError> {
        ensure!(
            self.store.client_state(client_id).is_none(),
            ClientError::ClientAlreadyExists(client_id.to_owned())
        );

        let client_state = ClientState::decode(client_state_bz)?;
        let consensus_state = ConsensusState::decode(consensus_state_bz)?;

        // surfaces an unusable trust level now instead of on first update
        Self::verification_options(&client_state)?;
        ensure!(
            client_state.proof_spec.is_some(),
            ClientError::MissingField("client_state.proof_spec")
        );
        ensure!(
            consensus_state.timestamp.is_some(),
            ClientError::MissingField("consensus_state.timestamp")
        );
        let latest = client_state
            .latest_height
            .ok_or(ClientError::MissingField("client_state.latest_height"))?;

        self.store
            .set_client_state(client_id, client_state.encode_to_vec());
        self.store
            .set_consensus_state(client_id, latest, consensus_state.encode_to_vec());
        Ok(latest)
    }

    /// Verifies an encoded [`TmHeader`] against the trusted state it names
    /// and stores the resulting consensus state.
    ///
    /// A valid header that conflicts with an already stored consensus
    /// state at the same height is misbehaviour evidence: the client
    /// freezes at that height permanently and the conflicting state is
    /// kept for forensics.
    ///
    /// # Errors
    /// Returns an error when decoding, lookup, or verification fails; no
    /// store write happens in that case.
    pub fn update_client(
        &mut self,
        client_id: &str,
        header_bz: &[u8],
        host_height: u64,
        now_nanos: u128,
    ) -> Result<UpdateOutcome, ClientError> {
        let mut client_state = self.load_client_state(client_id)?;
        let header = TmHeader::decode(header_bz)?;

        let signed_header = header
            .signed_header
            .as_ref()
            .ok_or(ClientError::MissingField("header.signed_header"))?;
        let validator_set = header
            .validator_set
            .as_ref()
            .ok_or(ClientError::MissingField("header.validator_set"))?;
        let trusted_height = header
            .trusted_height
            .ok_or(ClientError::MissingField("header.trusted_height"))?;
        let trusted_validators = header
            .trusted_validators
            .as_ref()
            .ok_or(ClientError::MissingField("header.trusted_validators"))?;
        let light_header = signed_header
            .header
            .as_ref()
            .ok_or(ClientError::MissingField("signed_header.header"))?;

        let untrusted_height = Height::new(
            trusted_height.revision_number,
            u64::try_from(light_header.height)
                .map_err(|_| ClientError::NonPositiveHeight(light_header.height))?,
        );

        if let Some(frozen) = client_state.frozen_height.filter(|h| !h.is_zero()) {
            ensure!(untrusted_height < frozen, ClientError::ClientFrozen(frozen));
        }

        let new_consensus = ConsensusState {
            timestamp: light_header.time,
            root: light_header.app_hash.clone(),
            next_validators_hash: light_header.next_validators_hash.clone(),
        };
        let new_consensus_bz = new_consensus.encode_to_vec();
        let conflicting = match self.store.consensus_state(client_id, untrusted_height) {
            Some(existing) if existing == new_consensus_bz => {
                return Err(ClientError::AlreadySubmitted(untrusted_height));
            }
            Some(_) => true,
            None => false,
        };

        let trusted_consensus = self.load_consensus_state(client_id, trusted_height)?;
        let trusted_time = trusted_consensus
            .timestamp
            .ok_or(ClientError::MissingField("consensus_state.timestamp"))?
            .unix_nanos()?;

        let options = Self::verification_options(&client_state)?;
        verify(
            UntrustedBlockState {
                signed_header,
                validators: validator_set,
            },
            &TrustedBlockState {
                chain_id: &client_state.chain_id,
                height: trusted_height.revision_height,
                timestamp_nanos: trusted_time,
                next_validators: trusted_validators,
                next_validators_hash: &trusted_consensus.next_validators_hash,
            },
            &options,
            now_nanos,
        )?;

        if conflicting {
            client_state.frozen_height = Some(untrusted_height);
            self.store
                .set_client_state(client_id, client_state.encode_to_vec());
            self.store
                .set_consensus_state(client_id, untrusted_height, new_consensus_bz);
            self.store
                .set_processed(client_id, untrusted_height, host_height, now_nanos);
            return Ok(UpdateOutcome::Misbehaviour(untrusted_height));
        }

        if client_state.latest_height.is_none_or(|h| untrusted_height > h) {
            client_state.latest_height = Some(untrusted_height);
        }
        self.store
            .set_client_state(client_id, client_state.encode_to_vec());
        self.store
            .set_consensus_state(client_id, untrusted_height, new_consensus_bz);
        self.store
            .set_processed(client_id, untrusted_height, host_height, now_nanos);
        Ok(UpdateOutcome::Updated(untrusted_height))
    }

    /// Common gating for both proof directions. Returns the proof spec and
    /// the commitment root at `height` once every precondition holds.
    #[allow(clippy::too_many_arguments)]
    fn proof_context(
        &self,
        client_id: &str,
        height: Height,
        delay_time_secs: u64,
        delay_blocks: u64,
        proof_bz: &[u8],
        prefix: &[u8],
        path: &[u8],
        host_height: u64,
        now_nanos: u128,
    ) -> Result<(ProofSpec, Vec<u8>), ClientError> {
        let client_state = self.load_client_state(client_id)?;
        let latest = client_state
            .latest_height
            .ok_or(ClientError::MissingField("client_state.latest_height"))?;
        ensure!(
            latest >= height,
            ClientError::InsufficientHeight {
                latest,
                requested: height,
            }
        );
        if let Some(frozen) = client_state.frozen_height.filter(|h| !h.is_zero()) {
            ensure!(height < frozen, ClientError::ClientFrozen(frozen));
        }
        ensure!(!prefix.is_empty(), ClientError::EmptyPrefix);
        ensure!(!path.is_empty(), ClientError::EmptyPath);
        ensure!(!proof_bz.is_empty(), ClientError::EmptyProof);

        if delay_time_secs > 0 || delay_blocks > 0 {
            let (processed_height, processed_time) =
                self.store.processed(client_id, height).ok_or_else(|| {
                    ClientError::ProcessedEntryNotFound {
                        client_id: client_id.to_owned(),
                        height,
                    }
                })?;
            let earliest_time =
                processed_time + u128::from(delay_time_secs) * NANOS_PER_SECOND;
            let earliest_height = processed_height + delay_blocks;
            ensure!(
                now_nanos >= earliest_time && host_height >= earliest_height,
                ClientError::DelayNotElapsed {
                    processed_height,
                    processed_time,
                    current_height: host_height,
                    current_time: now_nanos,
                }
            );
        }

        let consensus_state = self.load_consensus_state(client_id, height)?;
        let proof_spec = client_state
            .proof_spec
            .ok_or(ClientError::MissingField("client_state.proof_spec"))?;
        Ok((proof_spec, consensus_state.root))
    }

    /// Verifies that `value` is committed under `path` in the counterparty
    /// state at `height`.
    ///
    /// # Errors
    /// Returns an error when gating fails (height, freeze, delay, empty
    /// inputs) or the proof does not verify.
    #[allow(clippy::too_many_arguments)]
    pub fn verify_membership(
        &self,
        client_id: &str,
        height: Height,
        delay_time_secs: u64,
        delay_blocks: u64,
        proof_bz: &[u8],
        prefix: &[u8],
        path: &[u8],
        value: &[u8],
        host_height: u64,
        now_nanos: u128,
    ) -> Result<(), ClientError> {
        let (proof_spec, root) = self.proof_context(
            client_id,
            height,
            delay_time_secs,
            delay_blocks,
            proof_bz,
            prefix,
            path,
            host_height,
            now_nanos,
        )?;
        let proof = CommitmentProof::decode(proof_bz)?;
        ics23_commitment::verify_membership(&proof_spec, &root, &proof, path, value)?;
        Ok(())
    }

    /// Verifies that nothing is committed under `path` in the counterparty
    /// state at `height`.
    ///
    /// # Errors
    /// Returns an error when gating fails or the proof does not verify.
    #[allow(clippy::too_many_arguments)]
    pub fn verify_non_membership(
        &self,
        client_id: &str,
        height: Height,
        delay_time_secs: u64,
        delay_blocks: u64,
        proof_bz: &[u8],
        prefix: &[u8],
        path: &[u8],
        host_height: u64,
        now_nanos: u128,
    ) -> Result<(), ClientError> {
        let (proof_spec, root) = self.proof_context(
            client_id,
            height,
            delay_time_secs,
            delay_blocks,
            proof_bz,
            prefix,
            path,
            host_height,
            now_nanos,
        )?;
        let proof = CommitmentProof::decode(proof_bz)?;
        ics23_commitment::verify_non_membership(&proof_spec, &root, &proof, path)?;
        Ok(())
    }

    /// The highest verified height.
    ///
    /// # Errors
    /// Returns an error for an unknown client.
    pub fn latest_height(&self, client_id: &str) -> Result<Height, ClientError> {
        let client_state = self.load_client_state(client_id)?;
        client_state
            .latest_height
            .ok_or(ClientError::MissingField("client_state.latest_height"))
    }

    /// The header time at a verified height, in unix seconds.
    ///
    /// # Errors
    /// Returns an error for an unknown client or a height with no stored
    /// consensus state.
    pub fn timestamp_at_height(
        &self,
        client_id: &str,
        height: Height,
    ) -> Result<u64, ClientError> {
        let consensus_state = self.load_consensus_state(client_id, height)?;
        let timestamp = consensus_state
            .timestamp
            .ok_or(ClientError::MissingField("consensus_state.timestamp"))?;
        u64::try_from(timestamp.seconds).map_err(|_| {
            ClientError::Types(tm_light_client_types::TypesError::TimestampOutOfRange {
                seconds: timestamp.seconds,
                nanos: timestamp.nanos,
            })
        })
    }
}
