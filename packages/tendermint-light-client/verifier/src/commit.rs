//! Commit verification: reconstructing the signed payload of each vote,
//! checking the signatures, and tallying voting power.

use std::collections::HashSet;

use ibc_trust_utils::ensure;
use prost::Message;

use tm_light_client_types::proto::{
    public_key, BlockIdFlag, CanonicalBlockId, CanonicalVote, Commit, CommitSig, PublicKey,
    SignedMsgType, Timestamp, ValidatorSet,
};

use crate::error::VerifierError;
use crate::options::TrustThreshold;

/// Reconstructs the exact bytes a validator signed for one commit slot:
/// the length-delimited canonical vote. The timestamp comes from the slot,
/// everything else from the commit.
#[must_use]
pub fn vote_sign_bytes(commit: &Commit, chain_id: &str, timestamp: Option<Timestamp>) -> Vec<u8> {
    let vote = CanonicalVote {
        r#type: SignedMsgType::Precommit.into(),
        height: commit.height,
        round: i64::from(commit.round),
        block_id: commit.block_id.as_ref().map(CanonicalBlockId::from),
        timestamp,
        chain_id: chain_id.to_owned(),
    };
    vote.encode_length_delimited_to_vec()
}

/// Verifies one vote signature against a validator key.
///
/// # Errors
/// Returns an error for unsupported key variants, malformed keys or
/// signatures, and signatures that do not verify.
pub fn verify_signature(
    pub_key: &PublicKey,
    sign_bytes: &[u8],
    signature: &[u8],
    address: &[u8],
) -> Result<(), VerifierError> {
    let invalid = || VerifierError::InvalidSignature(hex::encode(address));
    match &pub_key.sum {
        Some(public_key::Sum::Ed25519(key_bytes)) => {
            use ed25519_dalek::Verifier;
            let key_bytes: &[u8; 32] = key_bytes.as_slice().try_into().map_err(|_| invalid())?;
            let key = ed25519_dalek::VerifyingKey::from_bytes(key_bytes).map_err(|_| invalid())?;
            let signature: &[u8; 64] = signature.try_into().map_err(|_| invalid())?;
            let signature = ed25519_dalek::Signature::from_bytes(signature);
            key.verify(sign_bytes, &signature).map_err(|_| invalid())
        }
        Some(public_key::Sum::Secp256k1(key_bytes)) => {
            use k256::ecdsa::signature::Verifier;
            let key =
                k256::ecdsa::VerifyingKey::from_sec1_bytes(key_bytes).map_err(|_| invalid())?;
            let signature =
                k256::ecdsa::Signature::from_slice(signature).map_err(|_| invalid())?;
            key.verify(sign_bytes, &signature).map_err(|_| invalid())
        }
        None => Err(VerifierError::UnsupportedPublicKey(hex::encode(address))),
    }
}

fn slot_flag(sig: &CommitSig) -> Result<BlockIdFlag, VerifierError> {
    BlockIdFlag::try_from(sig.block_id_flag)
        .ok()
        .filter(|flag| *flag != BlockIdFlag::Unknown)
        .ok_or(VerifierError::InvalidBlockIdFlag(sig.block_id_flag))
}

/// Verifies that more than 2/3 of `validators` signed `commit`, checking
/// each slot against the validator at the same index. Returns as soon as
/// the tally exceeds 2/3; slots past that point are not examined.
///
/// # Errors
/// Returns an error for misaligned slots, invalid signatures, or a tally
/// at or below 2/3 of the set's power.
pub fn verify_commit_light(
    validators: &ValidatorSet,
    chain_id: &str,
    commit: &Commit,
) -> Result<(), VerifierError> {
    ensure!(
        commit.signatures.len() == validators.validators.len(),
        VerifierError::SignatureCountMismatch {
            expected: validators.validators.len(),
            found: commit.signatures.len(),
        }
    );

    let total = validators.total_power()?;
    let threshold = TrustThreshold::TWO_THIRDS;
    let mut tallied: u64 = 0;
    for (validator, sig) in validators.validators.iter().zip(&commit.signatures) {
        if slot_flag(sig)? != BlockIdFlag::Commit {
            continue;
        }
        let pub_key = validator
            .pub_key
            .as_ref()
            .ok_or(VerifierError::MissingField("validator.pub_key"))?;
        let sign_bytes = vote_sign_bytes(commit, chain_id, sig.timestamp);
        verify_signature(pub_key, &sign_bytes, &sig.signature, &validator.address)?;
        let power = u64::try_from(validator.voting_power)
            .map_err(|_| tm_light_client_types::TypesError::NegativeVotingPower(validator.voting_power))?;
        tallied = tallied.saturating_add(power);
        if threshold.is_met(tallied, total) {
            return Ok(());
        }
    }

    if threshold.is_met(tallied, total) {
        Ok(())
    } else {
        Err(VerifierError::InsufficientVotingPower {
            tallied,
            total,
            numerator: threshold.numerator(),
            denominator: threshold.denominator(),
        })
    }
}

/// Verifies that signers from the trusted set carrying more than
/// `threshold` of its power signed `commit`. Slots whose address is not in
/// the trusted set are skipped; the same trusted validator may only be
/// counted once.
///
/// # Errors
/// Returns an error for duplicate votes, invalid signatures, or a tally
/// at or below the threshold.
pub fn verify_commit_light_trusting(
    trusted: &ValidatorSet,
    chain_id: &str,
    commit: &Commit,
    threshold: TrustThreshold,
) -> Result<(), VerifierError> {
    let total = trusted.total_power()?;
    let mut seen: HashSet<&[u8]> = HashSet::new();
    let mut tallied: u64 = 0;

    for sig in &commit.signatures {
        if slot_flag(sig)? != BlockIdFlag::Commit {
            continue;
        }
        let Some(validator) = trusted.validator_by_address(&sig.validator_address) else {
            continue;
        };
        ensure!(
            seen.insert(&validator.address),
            VerifierError::DuplicateVote(hex::encode(&validator.address))
        );
        let pub_key = validator
            .pub_key
            .as_ref()
            .ok_or(VerifierError::MissingField("validator.pub_key"))?;
        let sign_bytes = vote_sign_bytes(commit, chain_id, sig.timestamp);
        verify_signature(pub_key, &sign_bytes, &sig.signature, &validator.address)?;
        let power = u64::try_from(validator.voting_power)
            .map_err(|_| tm_light_client_types::TypesError::NegativeVotingPower(validator.voting_power))?;
        tallied = tallied.saturating_add(power);
        if threshold.is_met(tallied, total) {
            return Ok(());
        }
    }

    if threshold.is_met(tallied, total) {
        Ok(())
    } else {
        Err(VerifierError::InsufficientVotingPower {
            tallied,
            total,
            numerator: threshold.numerator(),
            denominator: threshold.denominator(),
        })
    }
}
