//! Leaf and inner op evaluation: the primitives every proof step is built
//! from, plus the checks that pin each step to a [`ProofSpec`].

use ibc_trust_utils::ensure;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::error::ProofError;
use crate::types::{HashOp, InnerOp, LeafOp, LengthOp, ProofSpec};

/// Hashes `data` with the requested algorithm. Only SHA-256 and Keccak-256
/// are supported; everything else (including `NO_HASH` at a hashing
/// position) is rejected.
///
/// # Errors
/// Returns [`ProofError::UnsupportedHashOp`] for any other op.
pub fn do_hash(op: HashOp, data: &[u8]) -> Result<Vec<u8>, ProofError> {
    match op {
        HashOp::Sha256 => Ok(Sha256::digest(data).to_vec()),
        HashOp::Keccak => Ok(Keccak256::digest(data).to_vec()),
        _ => Err(ProofError::UnsupportedHashOp(i32::from(op))),
    }
}

/// Hashes `data` unless the op is `NO_HASH`, which passes it through.
fn prehash(op: HashOp, data: &[u8]) -> Result<Vec<u8>, ProofError> {
    match op {
        HashOp::NoHash => Ok(data.to_vec()),
        _ => do_hash(op, data),
    }
}

/// Applies the length op to `data`, prepending the encoded length where the
/// mode calls for one.
///
/// # Errors
/// `VAR_PROTO` is deliberately unimplemented and hard-fails; the remaining
/// variable modes are unsupported; the `REQUIRE_*` modes fail on any input
/// that is not exactly the required size.
fn do_length(op: LengthOp, data: &[u8]) -> Result<Vec<u8>, ProofError> {
    match op {
        LengthOp::NoPrefix => Ok(data.to_vec()),
        LengthOp::Require32Bytes => {
            ensure!(
                data.len() == 32,
                ProofError::RequiredLengthMismatch {
                    expected: 32,
                    found: data.len()
                }
            );
            Ok(data.to_vec())
        }
        LengthOp::Require64Bytes => {
            ensure!(
                data.len() == 64,
                ProofError::RequiredLengthMismatch {
                    expected: 64,
                    found: data.len()
                }
            );
            Ok(data.to_vec())
        }
        LengthOp::Fixed32Little => {
            let len = u32::try_from(data.len()).unwrap_or(u32::MAX);
            let mut out = len.to_le_bytes().to_vec();
            out.extend_from_slice(data);
            Ok(out)
        }
        LengthOp::VarProto => Err(ProofError::UnimplementedLengthOp),
        _ => Err(ProofError::UnsupportedLengthOp(i32::from(op))),
    }
}

fn hash_op(raw: i32) -> Result<HashOp, ProofError> {
    HashOp::try_from(raw).map_err(|_| ProofError::UnsupportedHashOp(raw))
}

fn length_op(raw: i32) -> Result<LengthOp, ProofError> {
    LengthOp::try_from(raw).map_err(|_| ProofError::UnsupportedLengthOp(raw))
}

/// Evaluates a leaf op over a key-value pair:
/// `hash(prefix ‖ length(prehash(key)) ‖ length(prehash(value)))`.
///
/// # Errors
/// Rejects empty keys and values, and any unsupported hash or length op.
pub fn apply_leaf_op(leaf: &LeafOp, key: &[u8], value: &[u8]) -> Result<Vec<u8>, ProofError> {
    ensure!(!key.is_empty(), ProofError::EmptyKey);
    ensure!(!value.is_empty(), ProofError::EmptyValue);

    let hashed_key = prehash(hash_op(leaf.prehash_key)?, key)?;
    let hashed_value = prehash(hash_op(leaf.prehash_value)?, value)?;

    let length = length_op(leaf.length)?;
    let mut data = leaf.prefix.clone();
    data.extend(do_length(length, &hashed_key)?);
    data.extend(do_length(length, &hashed_value)?);

    do_hash(hash_op(leaf.hash)?, &data)
}

/// Evaluates an inner op over a child hash: `hash(prefix ‖ child ‖ suffix)`.
///
/// # Errors
/// Rejects an empty child and any unsupported hash op.
pub fn apply_inner_op(inner: &InnerOp, child: &[u8]) -> Result<Vec<u8>, ProofError> {
    ensure!(!child.is_empty(), ProofError::EmptyChild);

    let mut data = inner.prefix.clone();
    data.extend_from_slice(child);
    data.extend_from_slice(&inner.suffix);

    do_hash(hash_op(inner.hash)?, &data)
}

/// Checks that a proof's leaf op matches the spec's leaf spec exactly,
/// except the prefix, of which the spec pins only the leading bytes.
///
/// # Errors
/// Returns [`ProofError::LeafSpecMismatch`] naming the offending field.
pub fn check_leaf_against_spec(leaf: &LeafOp, spec: &ProofSpec) -> Result<(), ProofError> {
    let leaf_spec = spec
        .leaf_spec
        .as_ref()
        .ok_or(ProofError::IncompleteSpec("leaf"))?;

    ensure!(
        leaf.hash == leaf_spec.hash,
        ProofError::LeafSpecMismatch("hash")
    );
    ensure!(
        leaf.prehash_key == leaf_spec.prehash_key,
        ProofError::LeafSpecMismatch("prehash_key")
    );
    ensure!(
        leaf.prehash_value == leaf_spec.prehash_value,
        ProofError::LeafSpecMismatch("prehash_value")
    );
    ensure!(
        leaf.length == leaf_spec.length,
        ProofError::LeafSpecMismatch("length")
    );
    ensure!(
        leaf.prefix.starts_with(&leaf_spec.prefix),
        ProofError::LeafSpecMismatch("prefix")
    );

    Ok(())
}

/// Checks that an inner op matches the spec: required hash, prefix length
/// inside the window the child layout allows, suffix a whole number of child
/// hashes, and a prefix that cannot be confused with a leaf node. The last
/// check is what stops a crafted leaf from being replayed as an inner node.
///
/// # Errors
/// Returns the specific mismatch as a [`ProofError`].
pub fn check_inner_against_spec(inner: &InnerOp, spec: &ProofSpec) -> Result<(), ProofError> {
    let inner_spec = spec
        .inner_spec
        .as_ref()
        .ok_or(ProofError::IncompleteSpec("inner"))?;
    let leaf_spec = spec
        .leaf_spec
        .as_ref()
        .ok_or(ProofError::IncompleteSpec("leaf"))?;

    ensure!(
        inner.hash == inner_spec.hash,
        ProofError::InnerHashMismatch {
            expected: inner_spec.hash,
            found: inner.hash,
        }
    );
    ensure!(
        leaf_spec.prefix.is_empty() || !inner.prefix.starts_with(&leaf_spec.prefix),
        ProofError::InnerPrefixIsLeafPrefix
    );

    let child_size = usize::try_from(inner_spec.child_size).unwrap_or(0);
    ensure!(child_size > 0, ProofError::IncompleteSpec("inner"));

    let min = usize::try_from(inner_spec.min_prefix_length).unwrap_or(0);
    let max = usize::try_from(inner_spec.max_prefix_length).unwrap_or(0)
        + (inner_spec.child_order.len().saturating_sub(1)) * child_size;
    ensure!(
        inner.prefix.len() >= min && inner.prefix.len() <= max,
        ProofError::InnerPrefixLength {
            min,
            max,
            found: inner.prefix.len(),
        }
    );
    ensure!(
        inner.suffix.len() % child_size == 0,
        ProofError::InnerSuffixLength {
            child_size,
            found: inner.suffix.len(),
        }
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    // sha256("") and keccak256("")
    const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const KECCAK_EMPTY: &str = "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470";

    #[test]
    fn hashes_sha256_and_keccak() {
        assert_eq!(hex::encode(do_hash(HashOp::Sha256, b"").unwrap()), SHA256_EMPTY);
        assert_eq!(hex::encode(do_hash(HashOp::Keccak, b"").unwrap()), KECCAK_EMPTY);
    }

    #[rstest]
    #[case(HashOp::NoHash)]
    #[case(HashOp::Sha512)]
    #[case(HashOp::Ripemd160)]
    #[case(HashOp::Bitcoin)]
    fn rejects_unsupported_hash_ops(#[case] op: HashOp) {
        assert_eq!(
            do_hash(op, b"data"),
            Err(ProofError::UnsupportedHashOp(i32::from(op)))
        );
    }

    #[test]
    fn length_no_prefix_passes_through() {
        assert_eq!(do_length(LengthOp::NoPrefix, b"abc").unwrap(), b"abc");
    }

    #[test]
    fn length_fixed32_little_prepends_le_length() {
        assert_eq!(
            do_length(LengthOp::Fixed32Little, b"abc").unwrap(),
            [&[3, 0, 0, 0][..], b"abc"].concat()
        );
    }

    #[rstest]
    #[case(LengthOp::Require32Bytes, 32)]
    #[case(LengthOp::Require64Bytes, 64)]
    fn length_require_checks_exact_size(#[case] op: LengthOp, #[case] expected: usize) {
        assert_eq!(do_length(op, &vec![7u8; expected]).unwrap(), vec![7u8; expected]);
        assert_eq!(
            do_length(op, b"short"),
            Err(ProofError::RequiredLengthMismatch { expected, found: 5 })
        );
    }

    #[test]
    fn var_proto_length_hard_fails() {
        assert_eq!(
            do_length(LengthOp::VarProto, b"abc"),
            Err(ProofError::UnimplementedLengthOp)
        );
    }

    fn plain_leaf() -> LeafOp {
        LeafOp {
            hash: HashOp::Sha256.into(),
            prehash_key: HashOp::NoHash.into(),
            prehash_value: HashOp::Sha256.into(),
            length: LengthOp::NoPrefix.into(),
            prefix: vec![0],
        }
    }

    #[test]
    fn leaf_op_rejects_empty_inputs() {
        let leaf = plain_leaf();
        assert_eq!(apply_leaf_op(&leaf, b"", b"value"), Err(ProofError::EmptyKey));
        assert_eq!(apply_leaf_op(&leaf, b"key", b""), Err(ProofError::EmptyValue));
    }

    #[test]
    fn leaf_op_hashes_prefix_key_and_prehashed_value() {
        let leaf = plain_leaf();
        let got = apply_leaf_op(&leaf, b"key", b"value").unwrap();

        let mut expected = vec![0u8];
        expected.extend_from_slice(b"key");
        expected.extend_from_slice(&Sha256::digest(b"value"));
        assert_eq!(got, Sha256::digest(&expected).to_vec());
    }

    #[test]
    fn inner_op_rejects_empty_child() {
        let inner = InnerOp {
            hash: HashOp::Sha256.into(),
            prefix: vec![1],
            suffix: vec![],
        };
        assert_eq!(apply_inner_op(&inner, b""), Err(ProofError::EmptyChild));
    }

    #[test]
    fn inner_prefix_must_not_shadow_leaf_prefix() {
        let spec = ProofSpec::smt();
        let inner = InnerOp {
            hash: HashOp::Sha256.into(),
            // starts with the leaf prefix [0]: forgeable, must be rejected
            prefix: vec![0],
            suffix: vec![0; 32],
        };
        assert_eq!(
            check_inner_against_spec(&inner, &spec),
            Err(ProofError::InnerPrefixIsLeafPrefix)
        );
    }

    #[test]
    fn inner_prefix_length_window_enforced() {
        let spec = ProofSpec::smt();
        // window for smt: [1, 1 + 1*32] = [1, 33]
        let too_long = InnerOp {
            hash: HashOp::Sha256.into(),
            prefix: vec![1; 34],
            suffix: vec![],
        };
        assert_eq!(
            check_inner_against_spec(&too_long, &spec),
            Err(ProofError::InnerPrefixLength {
                min: 1,
                max: 33,
                found: 34
            })
        );
    }

    #[test]
    fn leaf_spec_mismatch_names_field() {
        let spec = ProofSpec::smt();
        let mut leaf = spec.leaf_spec.clone().unwrap();
        leaf.prehash_value = HashOp::NoHash.into();
        assert_eq!(
            check_leaf_against_spec(&leaf, &spec),
            Err(ProofError::LeafSpecMismatch("prehash_value"))
        );
    }
}
