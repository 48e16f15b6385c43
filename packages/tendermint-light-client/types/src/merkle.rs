//! The simple merkle tree tendermint commits to lists with: leaves are
//! prefixed with `0x00`, inner nodes with `0x01`, and the left subtree of
//! an inner node holds the largest power of two strictly smaller than the
//! item count.

use sha2::{Digest, Sha256};

const LEAF_PREFIX: u8 = 0x00;
const INNER_PREFIX: u8 = 0x01;

/// Hashes one leaf.
fn leaf_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(data);
    hasher.finalize().into()
}

/// Hashes two children into their parent.
fn inner_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([INNER_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// The largest power of two strictly smaller than `n`. Requires `n > 1`.
fn split_point(n: usize) -> usize {
    let next = n.next_power_of_two();
    if next == n {
        n / 2
    } else {
        next / 2
    }
}

/// Computes the simple merkle root of a list of byte strings.
///
/// The empty list hashes to `SHA-256("")`.
#[must_use]
pub fn simple_hash_from_byte_vectors(items: &[Vec<u8>]) -> [u8; 32] {
    match items.len() {
        0 => Sha256::digest([]).into(),
        1 => leaf_hash(&items[0]),
        n => {
            let split = split_point(n);
            let left = simple_hash_from_byte_vectors(&items[..split]);
            let right = simple_hash_from_byte_vectors(&items[split..]);
            inner_hash(&left, &right)
        }
    }
}
