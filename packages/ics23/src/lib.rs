//! ICS-23 merkle proof verification: proves that a key-value pair is, or is
//! not, present under a remote chain's committed state root, against a
//! per-chain [`ProofSpec`](types::ProofSpec).
#![deny(clippy::nursery, clippy::pedantic, warnings, missing_docs)]

pub mod compress;
pub mod error;
pub mod ops;
pub mod types;
pub mod verify;

pub use compress::{compress, decompress};
pub use error::ProofError;

use types::{batch_entry, commitment_proof, BatchEntry, BatchProof, CommitmentProof, ProofSpec};

/// Verifies that `proof` commits `key` to `value` under `root`.
///
/// Compressed batches are expanded first; batches are scanned linearly for
/// the existence proof carrying `key`.
///
/// # Errors
/// Returns [`ProofError::MissingProofVariant`] when no existence proof for
/// the key is present, or the underlying verification error.
pub fn verify_membership(
    spec: &ProofSpec,
    root: &[u8],
    proof: &CommitmentProof,
    key: &[u8],
    value: &[u8],
) -> Result<(), ProofError> {
    let proof = decompress(proof)?;

    let exist = match &proof.proof {
        Some(commitment_proof::Proof::Exist(exist)) => Some(exist),
        Some(commitment_proof::Proof::Batch(batch)) => {
            batch.entries.iter().find_map(|entry| match &entry.proof {
                Some(batch_entry::Proof::Exist(exist)) if exist.key == key => Some(exist),
                _ => None,
            })
        }
        _ => None,
    };

    let exist = exist.ok_or(ProofError::MissingProofVariant("existence"))?;
    verify::verify_existence(exist, spec, root, key, value)
}

/// Verifies that no entry for `key` exists under `root`.
///
/// Compressed batches are expanded first; batches are scanned linearly for
/// a non-existence proof whose bounds admit `key`.
///
/// # Errors
/// Returns [`ProofError::MissingProofVariant`] when no such proof is
/// present, or the underlying verification error.
pub fn verify_non_membership(
    spec: &ProofSpec,
    root: &[u8],
    proof: &CommitmentProof,
    key: &[u8],
) -> Result<(), ProofError> {
    let proof = decompress(proof)?;

    let nonexist = match &proof.proof {
        Some(commitment_proof::Proof::Nonexist(nonexist)) => Some(nonexist),
        Some(commitment_proof::Proof::Batch(batch)) => {
            batch.entries.iter().find_map(|entry| match &entry.proof {
                Some(batch_entry::Proof::Nonexist(nonexist)) if bounds_admit(nonexist, key) => {
                    Some(nonexist)
                }
                _ => None,
            })
        }
        _ => None,
    };

    let nonexist = nonexist.ok_or(ProofError::MissingProofVariant("non-existence"))?;
    verify::verify_non_existence(nonexist, spec, root, key)
}

/// True when the proof's bounding keys leave room for `key` between them.
fn bounds_admit(nonexist: &types::NonExistenceProof, key: &[u8]) -> bool {
    let left_ok = nonexist
        .left
        .as_ref()
        .is_none_or(|left| left.key.as_slice() < key);
    let right_ok = nonexist
        .right
        .as_ref()
        .is_none_or(|right| key < right.key.as_slice());
    left_ok && right_ok
}

/// Flattens any mix of single, batch, and compressed proofs into one batch
/// and compresses the result.
///
/// # Errors
/// Returns [`ProofError::EmptyProof`] for an empty input or any proof with
/// no populated variant.
pub fn combine_proofs(proofs: &[CommitmentProof]) -> Result<CommitmentProof, ProofError> {
    let mut entries = Vec::new();
    for proof in proofs {
        match decompress(proof)?.proof {
            Some(commitment_proof::Proof::Exist(exist)) => entries.push(BatchEntry {
                proof: Some(batch_entry::Proof::Exist(exist)),
            }),
            Some(commitment_proof::Proof::Nonexist(nonexist)) => entries.push(BatchEntry {
                proof: Some(batch_entry::Proof::Nonexist(nonexist)),
            }),
            Some(commitment_proof::Proof::Batch(batch)) => entries.extend(batch.entries),
            // decompress flattened this variant already
            Some(commitment_proof::Proof::Compressed(_)) | None => {
                return Err(ProofError::EmptyProof)
            }
        }
    }
    ensure_non_empty(&entries)?;

    compress(&CommitmentProof {
        proof: Some(commitment_proof::Proof::Batch(BatchProof { entries })),
    })
}

fn ensure_non_empty(entries: &[BatchEntry]) -> Result<(), ProofError> {
    if entries.is_empty() {
        return Err(ProofError::EmptyProof);
    }
    Ok(())
}
