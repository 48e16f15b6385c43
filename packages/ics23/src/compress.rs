//! Batch proof compression: inner ops shared between entries collapse into
//! one content-addressed lookup table, keyed by their exact wire encoding.

use std::collections::HashMap;

use prost::Message;

use crate::error::ProofError;
use crate::types::{
    batch_entry, commitment_proof, compressed_batch_entry, BatchEntry, BatchProof,
    CommitmentProof, CompressedBatchEntry, CompressedBatchProof, CompressedExistenceProof,
    CompressedNonExistenceProof, ExistenceProof, InnerOp, NonExistenceProof,
};

/// Deduplicating arena of inner ops. No pointer identity: two ops are the
/// same entry exactly when their encodings are byte-identical.
#[derive(Default)]
struct InnerOpTable {
    lookup: Vec<InnerOp>,
    registry: HashMap<Vec<u8>, i32>,
}

impl InnerOpTable {
    fn index_of(&mut self, op: &InnerOp) -> i32 {
        let encoded = op.encode_to_vec();
        if let Some(&idx) = self.registry.get(&encoded) {
            return idx;
        }
        let idx = i32::try_from(self.lookup.len()).unwrap_or(i32::MAX);
        self.lookup.push(op.clone());
        self.registry.insert(encoded, idx);
        idx
    }
}

/// Rewrites a batch proof into its compressed form; all other variants pass
/// through unchanged.
///
/// # Errors
/// Returns [`ProofError::EmptyProof`] when the proof or one of its batch
/// entries has no populated variant.
pub fn compress(proof: &CommitmentProof) -> Result<CommitmentProof, ProofError> {
    let Some(commitment_proof::Proof::Batch(batch)) = &proof.proof else {
        return Ok(proof.clone());
    };

    let mut table = InnerOpTable::default();
    let entries = batch
        .entries
        .iter()
        .map(|entry| compress_entry(entry, &mut table))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CommitmentProof {
        proof: Some(commitment_proof::Proof::Compressed(CompressedBatchProof {
            entries,
            lookup_inners: table.lookup,
        })),
    })
}

fn compress_entry(
    entry: &BatchEntry,
    table: &mut InnerOpTable,
) -> Result<CompressedBatchEntry, ProofError> {
    let proof = match entry.proof.as_ref().ok_or(ProofError::EmptyProof)? {
        batch_entry::Proof::Exist(exist) => {
            compressed_batch_entry::Proof::Exist(compress_exist(exist, table))
        }
        batch_entry::Proof::Nonexist(nonexist) => {
            compressed_batch_entry::Proof::Nonexist(CompressedNonExistenceProof {
                key: nonexist.key.clone(),
                left: nonexist.left.as_ref().map(|p| compress_exist(p, table)),
                right: nonexist.right.as_ref().map(|p| compress_exist(p, table)),
            })
        }
    };
    Ok(CompressedBatchEntry { proof: Some(proof) })
}

fn compress_exist(exist: &ExistenceProof, table: &mut InnerOpTable) -> CompressedExistenceProof {
    CompressedExistenceProof {
        key: exist.key.clone(),
        value: exist.value.clone(),
        leaf: exist.leaf.clone(),
        path: exist.path.iter().map(|op| table.index_of(op)).collect(),
    }
}

/// Expands a compressed batch proof back into a plain batch; all other
/// variants pass through unchanged.
///
/// # Errors
/// Returns [`ProofError::LookupIndexOutOfRange`] for any path index outside
/// the lookup table, and [`ProofError::EmptyProof`] for unpopulated entries.
pub fn decompress(proof: &CommitmentProof) -> Result<CommitmentProof, ProofError> {
    let Some(commitment_proof::Proof::Compressed(compressed)) = &proof.proof else {
        return Ok(proof.clone());
    };

    let entries = compressed
        .entries
        .iter()
        .map(|entry| decompress_entry(entry, &compressed.lookup_inners))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CommitmentProof {
        proof: Some(commitment_proof::Proof::Batch(BatchProof { entries })),
    })
}

fn decompress_entry(
    entry: &CompressedBatchEntry,
    lookup: &[InnerOp],
) -> Result<BatchEntry, ProofError> {
    let proof = match entry.proof.as_ref().ok_or(ProofError::EmptyProof)? {
        compressed_batch_entry::Proof::Exist(exist) => {
            batch_entry::Proof::Exist(decompress_exist(exist, lookup)?)
        }
        compressed_batch_entry::Proof::Nonexist(nonexist) => {
            batch_entry::Proof::Nonexist(NonExistenceProof {
                key: nonexist.key.clone(),
                left: nonexist
                    .left
                    .as_ref()
                    .map(|p| decompress_exist(p, lookup))
                    .transpose()?,
                right: nonexist
                    .right
                    .as_ref()
                    .map(|p| decompress_exist(p, lookup))
                    .transpose()?,
            })
        }
    };
    Ok(BatchEntry { proof: Some(proof) })
}

fn decompress_exist(
    exist: &CompressedExistenceProof,
    lookup: &[InnerOp],
) -> Result<ExistenceProof, ProofError> {
    let path = exist
        .path
        .iter()
        .map(|&idx| {
            usize::try_from(idx)
                .ok()
                .and_then(|i| lookup.get(i))
                .cloned()
                .ok_or(ProofError::LookupIndexOutOfRange {
                    index: idx,
                    len: lookup.len(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ExistenceProof {
        key: exist.key.clone(),
        value: exist.value.clone(),
        leaf: exist.leaf.clone(),
        path,
    })
}
