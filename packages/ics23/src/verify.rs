//! Existence and non-existence proof verification.
//!
//! Non-existence rests on neighbor analysis: proofs never carry an explicit
//! branch index, so the branch a step took is inferred purely from the
//! byte-length padding of its prefix and suffix, brute-forced over the
//! spec's declared child order.

use ibc_trust_utils::ensure;

use crate::error::ProofError;
use crate::ops::{
    apply_inner_op, apply_leaf_op, check_inner_against_spec, check_leaf_against_spec,
};
use crate::types::{ExistenceProof, InnerOp, InnerSpec, NonExistenceProof, ProofSpec};

/// Folds the proof from the leaf up and returns the root it commits to.
///
/// # Errors
/// Returns an error if the leaf op is missing or any step fails to evaluate.
pub fn calculate_existence_root(proof: &ExistenceProof) -> Result<Vec<u8>, ProofError> {
    let leaf = proof.leaf.as_ref().ok_or(ProofError::MissingLeafOp)?;

    let mut hash = apply_leaf_op(leaf, &proof.key, &proof.value)?;
    for inner in &proof.path {
        hash = apply_inner_op(inner, &hash)?;
    }
    Ok(hash)
}

fn check_existence_against_spec(
    proof: &ExistenceProof,
    spec: &ProofSpec,
) -> Result<(), ProofError> {
    let leaf = proof.leaf.as_ref().ok_or(ProofError::MissingLeafOp)?;
    check_leaf_against_spec(leaf, spec)?;

    let depth = proof.path.len();
    let below_min = spec.min_depth > 0 && depth < usize::try_from(spec.min_depth).unwrap_or(0);
    let above_max = spec.max_depth > 0 && depth > usize::try_from(spec.max_depth).unwrap_or(0);
    ensure!(
        !below_min && !above_max,
        ProofError::PathDepthOutOfRange {
            min: spec.min_depth,
            max: spec.max_depth,
            found: depth,
        }
    );

    for inner in &proof.path {
        check_inner_against_spec(inner, spec)?;
    }
    Ok(())
}

/// Verifies that `proof` commits `key` to `value` under `root`.
///
/// # Errors
/// Returns an error on any key/value mismatch, spec violation along the
/// path, or a folded root that differs from the trusted one.
pub fn verify_existence(
    proof: &ExistenceProof,
    spec: &ProofSpec,
    root: &[u8],
    key: &[u8],
    value: &[u8],
) -> Result<(), ProofError> {
    ensure!(
        proof.key == key,
        ProofError::KeyMismatch {
            provided: key.to_vec(),
            in_proof: proof.key.clone(),
        }
    );
    ensure!(
        proof.value == value,
        ProofError::ValueMismatch {
            provided: value.to_vec(),
            in_proof: proof.value.clone(),
        }
    );

    check_existence_against_spec(proof, spec)?;

    let calculated = calculate_existence_root(proof)?;
    ensure!(
        calculated == root,
        ProofError::RootMismatch {
            calculated,
            trusted: root.to_vec(),
        }
    );
    Ok(())
}

/// Verifies that no entry for `key` exists under `root`.
///
/// Every present bounding proof is independently verified against the same
/// root; the bounds must straddle `key` strictly; and the bounding paths
/// must leave no room between them: a missing left bound forces the right
/// path to be the left-most in the tree, a missing right bound forces the
/// left path to be the right-most, and two present bounds must be adjacent
/// leaves.
///
/// # Errors
/// Returns an error if any of the above fails.
pub fn verify_non_existence(
    proof: &NonExistenceProof,
    spec: &ProofSpec,
    root: &[u8],
    key: &[u8],
) -> Result<(), ProofError> {
    let inner_spec = spec
        .inner_spec
        .as_ref()
        .ok_or(ProofError::IncompleteSpec("inner"))?;

    if let Some(left) = &proof.left {
        verify_existence(left, spec, root, &left.key, &left.value)?;
        ensure!(
            left.key.as_slice() < key,
            ProofError::LeftBoundNotBelow {
                bound: left.key.clone(),
                key: key.to_vec(),
            }
        );
    }
    if let Some(right) = &proof.right {
        verify_existence(right, spec, root, &right.key, &right.value)?;
        ensure!(
            key < right.key.as_slice(),
            ProofError::RightBoundNotAbove {
                bound: right.key.clone(),
                key: key.to_vec(),
            }
        );
    }

    match (&proof.left, &proof.right) {
        (None, None) => Err(ProofError::NoBoundingProof),
        (None, Some(right)) => {
            ensure!(
                is_left_most(inner_spec, &right.path)?,
                ProofError::RightBoundNotLeftMost
            );
            Ok(())
        }
        (Some(left), None) => {
            ensure!(
                is_right_most(inner_spec, &left.path)?,
                ProofError::LeftBoundNotRightMost
            );
            Ok(())
        }
        (Some(left), Some(right)) => {
            ensure!(
                is_left_neighbor(inner_spec, &left.path, &right.path)?,
                ProofError::BoundsNotAdjacent
            );
            Ok(())
        }
    }
}

/// Returns the (prefix, suffix) padding byte lengths an inner op carries
/// when its child sits on the given branch. The prefix padding comes on top
/// of the spec's min/max prefix window.
fn get_padding(spec: &InnerSpec, branch: i32) -> Result<(usize, usize), ProofError> {
    let position = spec
        .child_order
        .iter()
        .position(|&b| b == branch)
        .ok_or(ProofError::BranchNotInferable)?;

    let child_size = usize::try_from(spec.child_size).unwrap_or(0);
    ensure!(child_size > 0, ProofError::IncompleteSpec("inner"));

    let prefix = position * child_size;
    let suffix = (spec.child_order.len() - 1 - position) * child_size;
    Ok((prefix, suffix))
}

fn has_padding(spec: &InnerSpec, inner: &InnerOp, branch: i32) -> Result<bool, ProofError> {
    let (prefix_pad, suffix_pad) = get_padding(spec, branch)?;
    let min = usize::try_from(spec.min_prefix_length).unwrap_or(0) + prefix_pad;
    let max = usize::try_from(spec.max_prefix_length).unwrap_or(0) + prefix_pad;

    Ok(inner.prefix.len() >= min && inner.prefix.len() <= max && inner.suffix.len() == suffix_pad)
}

/// Infers which branch an inner op descends into by brute-force matching
/// its padding against every declared branch. Malformed specs with
/// overlapping padding windows resolve to the first declared match.
fn order_from_padding(spec: &InnerSpec, inner: &InnerOp) -> Result<i32, ProofError> {
    let branches = i32::try_from(spec.child_order.len()).unwrap_or(0);
    for branch in 0..branches {
        if has_padding(spec, inner, branch)? {
            return Ok(branch);
        }
    }
    Err(ProofError::BranchNotInferable)
}

/// True when every step of the path descends through branch 0.
fn is_left_most(spec: &InnerSpec, path: &[InnerOp]) -> Result<bool, ProofError> {
    for inner in path {
        if !has_padding(spec, inner, 0)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// True when every step of the path descends through the last branch.
fn is_right_most(spec: &InnerSpec, path: &[InnerOp]) -> Result<bool, ProofError> {
    let last = i32::try_from(spec.child_order.len()).unwrap_or(0) - 1;
    for inner in path {
        if !has_padding(spec, inner, last)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// True when the two paths lead to adjacent leaves: identical from the root
/// down to one divergence node whose inferred branches differ by exactly
/// one, with the left remainder right-most and the right remainder
/// left-most below it.
fn is_left_neighbor(
    spec: &InnerSpec,
    left_path: &[InnerOp],
    right_path: &[InnerOp],
) -> Result<bool, ProofError> {
    let mut left = left_path;
    let mut right = right_path;

    // strip the shared steps from the root end
    while let (Some(l), Some(r)) = (left.last(), right.last()) {
        if l.prefix == r.prefix && l.suffix == r.suffix {
            left = &left[..left.len() - 1];
            right = &right[..right.len() - 1];
        } else {
            break;
        }
    }

    let (Some(l), Some(r)) = (left.last(), right.last()) else {
        // one path is a strict prefix of the other: no divergence node
        return Ok(false);
    };
    if order_from_padding(spec, l)? + 1 != order_from_padding(spec, r)? {
        return Ok(false);
    }

    Ok(is_right_most(spec, &left[..left.len() - 1])?
        && is_left_most(spec, &right[..right.len() - 1])?)
}
