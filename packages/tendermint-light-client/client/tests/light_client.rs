//! End-to-end tests for the light-client facade: lifecycle, updates,
//! misbehaviour, and proof verification against a small fixed state tree.

use ed25519_dalek::Signer;
use prost::Message;
use sha2::{Digest, Sha256};

use ics23_commitment::types::{
    commitment_proof, CommitmentProof, ExistenceProof, HashOp, InnerOp, InnerSpec, LeafOp,
    LengthOp, NonExistenceProof, ProofSpec,
};
use ics23_commitment::ProofError;
use tm_light_client::{ClientError, ClientStore, InMemoryStore, LightClient, UpdateOutcome};
use tm_light_client_types::proto::{
    public_key, BlockId, BlockIdFlag, ClientState, Commit, CommitSig, Consensus, ConsensusState,
    Fraction, Height, LightHeader, PartSetHeader, PublicKey, SignedHeader, Timestamp, TmHeader,
    Validator, ValidatorSet,
};
use tm_light_client_verifier::VerifierError;

const CHAIN_ID: &str = "test-chain-1";
const CLIENT_ID: &str = "07-tendermint-0";
const REVISION: u64 = 1;
const T0: i64 = 1_700_000_000;
const HOST_HEIGHT: u64 = 1_000;

fn nanos(secs: i64) -> u128 {
    u128::try_from(secs).unwrap() * 1_000_000_000
}

// ---- counterparty state tree: ((apple, banana), cherry) ----

fn proof_spec() -> ProofSpec {
    ProofSpec {
        leaf_spec: Some(LeafOp {
            hash: HashOp::Sha256.into(),
            prehash_key: HashOp::NoHash.into(),
            prehash_value: HashOp::Sha256.into(),
            length: LengthOp::NoPrefix.into(),
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

fn leaf_hash(key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8];
    data.extend_from_slice(key);
    data.extend_from_slice(&Sha256::digest(value));
    Sha256::digest(&data).to_vec()
}

fn node_hash(left: &[u8], right: &[u8]) -> Vec<u8> {
    let mut data = vec![1u8];
    data.extend_from_slice(left);
    data.extend_from_slice(right);
    Sha256::digest(&data).to_vec()
}

struct Tree {
    root: Vec<u8>,
    proofs: [ExistenceProof; 3],
}

fn build_tree() -> Tree {
    const ENTRIES: [(&[u8], &[u8]); 3] = [
        (b"apple", b"red"),
        (b"banana", b"yellow"),
        (b"cherry", b"dark red"),
    ];
    let [a, b, c] = ENTRIES.map(|(k, v)| leaf_hash(k, v));
    let ab = node_hash(&a, &b);
    let root = node_hash(&ab, &c);

    let left_step = |sibling: &[u8]| InnerOp {
        hash: HashOp::Sha256.into(),
        prefix: vec![1],
        suffix: sibling.to_vec(),
    };
    let right_step = |sibling: &[u8]| InnerOp {
        hash: HashOp::Sha256.into(),
        prefix: [&[1u8][..], sibling].concat(),
        suffix: vec![],
    };
    let proof = |idx: usize, path: Vec<InnerOp>| ExistenceProof {
        key: ENTRIES[idx].0.to_vec(),
        value: ENTRIES[idx].1.to_vec(),
        leaf: proof_spec().leaf_spec,
        path,
    };

    Tree {
        root,
        proofs: [
            proof(0, vec![left_step(&b), left_step(&c)]),
            proof(1, vec![right_step(&a), left_step(&c)]),
            proof(2, vec![right_step(&ab)]),
        ],
    }
}

fn exist_proof_bytes(exist: ExistenceProof) -> Vec<u8> {
    CommitmentProof {
        proof: Some(commitment_proof::Proof::Exist(exist)),
    }
    .encode_to_vec()
}

// ---- a three-validator chain signing headers with deterministic keys ----

fn signing_key(seed: u8) -> ed25519_dalek::SigningKey {
    ed25519_dalek::SigningKey::from_bytes(&[seed; 32])
}

fn validator(seed: u8) -> Validator {
    let pub_key = signing_key(seed).verifying_key().to_bytes().to_vec();
    Validator {
        address: Sha256::digest(&pub_key)[..20].to_vec(),
        pub_key: Some(PublicKey {
            sum: Some(public_key::Sum::Ed25519(pub_key)),
        }),
        voting_power: 10,
        proposer_priority: 0,
    }
}

fn validator_set() -> ValidatorSet {
    ValidatorSet {
        validators: vec![validator(1), validator(2), validator(3)],
        proposer: None,
        total_voting_power: 0,
    }
}

fn header_at(height: u64, app_hash: Vec<u8>) -> LightHeader {
    let vals = validator_set();
    LightHeader {
        version: Some(Consensus { block: 11, app: 0 }),
        chain_id: CHAIN_ID.to_owned(),
        height: i64::try_from(height).unwrap(),
        time: Some(Timestamp {
            seconds: T0 + i64::try_from(height).unwrap(),
            nanos: 0,
        }),
        last_block_id: None,
        last_commit_hash: vec![1; 32],
        data_hash: vec![2; 32],
        validators_hash: vals.hash().to_vec(),
        next_validators_hash: vals.hash().to_vec(),
        consensus_hash: vec![3; 32],
        app_hash,
        last_results_hash: vec![5; 32],
        evidence_hash: vec![6; 32],
        proposer_address: vals.validators[0].address.clone(),
    }
}

fn sign_header(header: &LightHeader, signer_seeds: &[u8]) -> SignedHeader {
    let vals = validator_set();
    let mut commit = Commit {
        height: header.height,
        round: 0,
        block_id: Some(BlockId {
            hash: header.hash().to_vec(),
            part_set_header: Some(PartSetHeader {
                total: 1,
                hash: vec![7; 32],
            }),
        }),
        signatures: Vec::new(),
    };
    for (slot, validator) in vals.validators.iter().enumerate() {
        let seed = u8::try_from(slot + 1).unwrap();
        let sig = if signer_seeds.contains(&seed) {
            let timestamp = header.time;
            let sign_bytes =
                tm_light_client_verifier::commit::vote_sign_bytes(&commit, CHAIN_ID, timestamp);
            CommitSig {
                block_id_flag: BlockIdFlag::Commit.into(),
                validator_address: validator.address.clone(),
                timestamp,
                signature: signing_key(seed).sign(&sign_bytes).to_bytes().to_vec(),
            }
        } else {
            CommitSig {
                block_id_flag: BlockIdFlag::Absent.into(),
                validator_address: Vec::new(),
                timestamp: None,
                signature: Vec::new(),
            }
        };
        commit.signatures.push(sig);
    }
    SignedHeader {
        header: Some(header.clone()),
        commit: Some(commit),
    }
}

fn update_bytes(height: u64, app_hash: Vec<u8>, trusted: u64, signer_seeds: &[u8]) -> Vec<u8> {
    let header = header_at(height, app_hash);
    TmHeader {
        signed_header: Some(sign_header(&header, signer_seeds)),
        validator_set: Some(validator_set()),
        trusted_height: Some(Height::new(REVISION, trusted)),
        trusted_validators: Some(validator_set()),
    }
    .encode_to_vec()
}

fn client_state_bytes() -> Vec<u8> {
    ClientState {
        chain_id: CHAIN_ID.to_owned(),
        trust_level: Some(Fraction {
            numerator: 1,
            denominator: 3,
        }),
        trusting_period_secs: 3600,
        max_clock_drift_secs: 5,
        frozen_height: None,
        latest_height: Some(Height::new(REVISION, 10)),
        allow_update_after_expiry: false,
        allow_update_after_misbehaviour: false,
        proof_spec: Some(proof_spec()),
    }
    .encode_to_vec()
}

fn consensus_state_bytes() -> Vec<u8> {
    ConsensusState {
        timestamp: Some(Timestamp {
            seconds: T0 + 10,
            nanos: 0,
        }),
        root: vec![0; 32],
        next_validators_hash: validator_set().hash().to_vec(),
    }
    .encode_to_vec()
}

/// A fresh client trusting height 10.
fn bootstrap() -> LightClient<InMemoryStore> {
    let mut client = LightClient::new(InMemoryStore::new());
    client
        .create_client(CLIENT_ID, &client_state_bytes(), &consensus_state_bytes())
        .unwrap();
    client
}

fn now(height: u64) -> u128 {
    nanos(T0 + i64::try_from(height).unwrap() + 60)
}

#[test]
fn create_client_initializes_state() {
    let client = bootstrap();
    assert_eq!(
        client.latest_height(CLIENT_ID).unwrap(),
        Height::new(REVISION, 10)
    );
    assert_eq!(
        client
            .timestamp_at_height(CLIENT_ID, Height::new(REVISION, 10))
            .unwrap(),
        u64::try_from(T0 + 10).unwrap()
    );
}

#[test]
fn create_client_rejects_reuse_and_garbage() {
    let mut client = bootstrap();
    assert_eq!(
        client.create_client(CLIENT_ID, &client_state_bytes(), &consensus_state_bytes()),
        Err(ClientError::ClientAlreadyExists(CLIENT_ID.to_owned()))
    );
    assert!(matches!(
        client.create_client("other", &[0xff, 0xff, 0xff], &consensus_state_bytes()),
        Err(ClientError::MalformedInput(_))
    ));
}

#[test]
fn create_client_rejects_zero_trust_denominator() {
    let mut state = ClientState::decode(client_state_bytes().as_slice()).unwrap();
    state.trust_level = Some(Fraction {
        numerator: 1,
        denominator: 0,
    });
    let mut client = LightClient::new(InMemoryStore::new());
    assert_eq!(
        client.create_client(CLIENT_ID, &state.encode_to_vec(), &consensus_state_bytes()),
        Err(ClientError::Verification(
            VerifierError::ZeroTrustDenominator
        ))
    );
}

#[test]
fn adjacent_update_advances_the_client() {
    let mut client = bootstrap();
    let outcome = client
        .update_client(
            CLIENT_ID,
            &update_bytes(11, vec![9; 32], 10, &[1, 2, 3]),
            HOST_HEIGHT,
            now(11),
        )
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Updated(Height::new(REVISION, 11)));
    assert_eq!(
        client.latest_height(CLIENT_ID).unwrap(),
        Height::new(REVISION, 11)
    );
    assert_eq!(
        client
            .timestamp_at_height(CLIENT_ID, Height::new(REVISION, 11))
            .unwrap(),
        u64::try_from(T0 + 11).unwrap()
    );
}

#[test]
fn skipping_update_uses_the_trusted_set() {
    let mut client = bootstrap();
    let outcome = client
        .update_client(
            CLIENT_ID,
            &update_bytes(50, vec![9; 32], 10, &[1, 2, 3]),
            HOST_HEIGHT,
            now(50),
        )
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Updated(Height::new(REVISION, 50)));
}

#[test]
fn quorum_boundary_two_of_three_fails() {
    let mut client = bootstrap();
    assert!(matches!(
        client.update_client(
            CLIENT_ID,
            &update_bytes(11, vec![9; 32], 10, &[1, 2]),
            HOST_HEIGHT,
            now(11),
        ),
        Err(ClientError::Verification(
            VerifierError::InsufficientVotingPower {
                tallied: 20,
                total: 30,
                ..
            }
        ))
    ));
    client
        .update_client(
            CLIENT_ID,
            &update_bytes(11, vec![9; 32], 10, &[1, 2, 3]),
            HOST_HEIGHT,
            now(11),
        )
        .unwrap();
}

#[test]
fn non_monotonic_height_is_rejected() {
    let mut client = bootstrap();
    assert!(matches!(
        client.update_client(
            CLIENT_ID,
            &update_bytes(10, vec![9; 32], 10, &[1, 2, 3]),
            HOST_HEIGHT,
            now(10),
        ),
        Err(ClientError::Verification(
            VerifierError::NonIncreasingHeight {
                trusted: 10,
                untrusted: 10,
            }
        ))
    ));
}

#[test]
fn failed_update_leaves_no_trace() {
    let mut client = bootstrap();
    client
        .update_client(
            CLIENT_ID,
            &update_bytes(11, vec![9; 32], 10, &[1, 2]),
            HOST_HEIGHT,
            now(11),
        )
        .unwrap_err();
    assert_eq!(
        client.latest_height(CLIENT_ID).unwrap(),
        Height::new(REVISION, 10)
    );
    assert!(client
        .store()
        .consensus_state(CLIENT_ID, Height::new(REVISION, 11))
        .is_none());
}

#[test]
fn duplicate_update_is_flagged() {
    let mut client = bootstrap();
    let update = update_bytes(11, vec![9; 32], 10, &[1, 2, 3]);
    client
        .update_client(CLIENT_ID, &update, HOST_HEIGHT, now(11))
        .unwrap();
    assert_eq!(
        client.update_client(CLIENT_ID, &update, HOST_HEIGHT, now(11)),
        Err(ClientError::AlreadySubmitted(Height::new(REVISION, 11)))
    );
}

#[test]
fn conflicting_header_freezes_the_client() {
    let mut client = bootstrap();
    client
        .update_client(
            CLIENT_ID,
            &update_bytes(11, vec![9; 32], 10, &[1, 2, 3]),
            HOST_HEIGHT,
            now(11),
        )
        .unwrap();

    // a second valid header at 11 committing to a different app hash
    let outcome = client
        .update_client(
            CLIENT_ID,
            &update_bytes(11, vec![8; 32], 10, &[1, 2, 3]),
            HOST_HEIGHT,
            now(11),
        )
        .unwrap();
    assert_eq!(
        outcome,
        UpdateOutcome::Misbehaviour(Height::new(REVISION, 11))
    );

    // frozen: no further updates at or above the freeze height
    assert_eq!(
        client.update_client(
            CLIENT_ID,
            &update_bytes(12, vec![9; 32], 10, &[1, 2, 3]),
            HOST_HEIGHT,
            now(12),
        ),
        Err(ClientError::ClientFrozen(Height::new(REVISION, 11)))
    );

    // and no proofs at or above it either
    let tree = build_tree();
    assert_eq!(
        client.verify_membership(
            CLIENT_ID,
            Height::new(REVISION, 11),
            0,
            0,
            &exist_proof_bytes(tree.proofs[0].clone()),
            b"ibc",
            b"apple",
            b"red",
            HOST_HEIGHT,
            now(11),
        ),
        Err(ClientError::ClientFrozen(Height::new(REVISION, 11)))
    );
}

#[test]
fn membership_verifies_against_the_stored_root() {
    let tree = build_tree();
    let mut client = bootstrap();
    client
        .update_client(
            CLIENT_ID,
            &update_bytes(11, tree.root.clone(), 10, &[1, 2, 3]),
            HOST_HEIGHT,
            now(11),
        )
        .unwrap();

    let height = Height::new(REVISION, 11);
    client
        .verify_membership(
            CLIENT_ID,
            height,
            0,
            0,
            &exist_proof_bytes(tree.proofs[0].clone()),
            b"ibc",
            b"apple",
            b"red",
            HOST_HEIGHT,
            now(11),
        )
        .unwrap();

    // value not committed under the key
    assert!(matches!(
        client.verify_membership(
            CLIENT_ID,
            height,
            0,
            0,
            &exist_proof_bytes(tree.proofs[0].clone()),
            b"ibc",
            b"apple",
            b"green",
            HOST_HEIGHT,
            now(11),
        ),
        Err(ClientError::Proof(ProofError::ValueMismatch { .. }))
    ));

    let nonexist = CommitmentProof {
        proof: Some(commitment_proof::Proof::Nonexist(NonExistenceProof {
            key: b"blueberry".to_vec(),
            left: Some(tree.proofs[1].clone()),
            right: Some(tree.proofs[2].clone()),
        })),
    }
    .encode_to_vec();
    client
        .verify_non_membership(
            CLIENT_ID,
            height,
            0,
            0,
            &nonexist,
            b"ibc",
            b"blueberry",
            HOST_HEIGHT,
            now(11),
        )
        .unwrap();
}

#[test]
fn membership_gating_rejects_bad_queries() {
    let tree = build_tree();
    let mut client = bootstrap();
    client
        .update_client(
            CLIENT_ID,
            &update_bytes(50, tree.root.clone(), 10, &[1, 2, 3]),
            HOST_HEIGHT,
            now(50),
        )
        .unwrap();
    let proof = exist_proof_bytes(tree.proofs[0].clone());

    // above the latest verified height
    assert_eq!(
        client.verify_membership(
            CLIENT_ID,
            Height::new(REVISION, 60),
            0,
            0,
            &proof,
            b"ibc",
            b"apple",
            b"red",
            HOST_HEIGHT,
            now(50),
        ),
        Err(ClientError::InsufficientHeight {
            latest: Height::new(REVISION, 50),
            requested: Height::new(REVISION, 60),
        })
    );

    // no consensus state between the trusted heights
    assert_eq!(
        client.verify_membership(
            CLIENT_ID,
            Height::new(REVISION, 20),
            0,
            0,
            &proof,
            b"ibc",
            b"apple",
            b"red",
            HOST_HEIGHT,
            now(50),
        ),
        Err(ClientError::ConsensusStateNotFound {
            client_id: CLIENT_ID.to_owned(),
            height: Height::new(REVISION, 20),
        })
    );

    // empty prefix and empty proof
    assert_eq!(
        client.verify_membership(
            CLIENT_ID,
            Height::new(REVISION, 50),
            0,
            0,
            &proof,
            b"",
            b"apple",
            b"red",
            HOST_HEIGHT,
            now(50),
        ),
        Err(ClientError::EmptyPrefix)
    );
    assert_eq!(
        client.verify_membership(
            CLIENT_ID,
            Height::new(REVISION, 50),
            0,
            0,
            &[],
            b"ibc",
            b"apple",
            b"red",
            HOST_HEIGHT,
            now(50),
        ),
        Err(ClientError::EmptyProof)
    );
}

#[test]
fn delay_periods_gate_proof_verification() {
    let tree = build_tree();
    let mut client = bootstrap();
    let submitted_at = now(11);
    client
        .update_client(
            CLIENT_ID,
            &update_bytes(11, tree.root.clone(), 10, &[1, 2, 3]),
            HOST_HEIGHT,
            submitted_at,
        )
        .unwrap();

    let height = Height::new(REVISION, 11);
    let proof = exist_proof_bytes(tree.proofs[0].clone());
    let check = |client: &LightClient<InMemoryStore>,
                 delay_secs: u64,
                 delay_blocks: u64,
                 host_height: u64,
                 at: u128| {
        client.verify_membership(
            CLIENT_ID,
            height,
            delay_secs,
            delay_blocks,
            &proof,
            b"ibc",
            b"apple",
            b"red",
            host_height,
            at,
        )
    };

    // ten second delay, queried five seconds in
    assert!(matches!(
        check(&client, 10, 0, HOST_HEIGHT, submitted_at + nanos(5)),
        Err(ClientError::DelayNotElapsed { .. })
    ));
    check(&client, 10, 0, HOST_HEIGHT, submitted_at + nanos(10)).unwrap();

    // five block delay, queried three blocks in
    assert!(matches!(
        check(&client, 0, 5, HOST_HEIGHT + 3, submitted_at + nanos(60)),
        Err(ClientError::DelayNotElapsed { .. })
    ));
    check(&client, 0, 5, HOST_HEIGHT + 5, submitted_at + nanos(60)).unwrap();
}

#[test]
fn unknown_client_is_rejected_everywhere() {
    let client = LightClient::new(InMemoryStore::new());
    assert_eq!(
        client.latest_height("nope"),
        Err(ClientError::ClientNotFound("nope".to_owned()))
    );
    let mut client = client;
    assert_eq!(
        client.update_client("nope", &[], HOST_HEIGHT, now(11)),
        Err(ClientError::ClientNotFound("nope".to_owned()))
    );
}
