//! Canonical hashing of headers and validator sets.
//!
//! A header hash is the simple merkle root of its fourteen fields, each
//! encoded on its own. Scalar fields use the protobuf wrapper encoding
//! (the value as field 1, omitted entirely when it is the default), which
//! is what [`prost::Message`] produces for `String`, `i64`, and `Vec<u8>`.

use prost::Message;

use crate::merkle::simple_hash_from_byte_vectors;
use crate::proto::{LightHeader, SimpleValidator, Validator, ValidatorSet};

impl LightHeader {
    /// Computes the block hash committed to by this header.
    #[must_use]
    pub fn hash(&self) -> [u8; 32] {
        let fields: Vec<Vec<u8>> = vec![
            self.version.map(|v| v.encode_to_vec()).unwrap_or_default(),
            self.chain_id.encode_to_vec(),
            self.height.encode_to_vec(),
            self.time.map(|t| t.encode_to_vec()).unwrap_or_default(),
            self.last_block_id
                .as_ref()
                .map(Message::encode_to_vec)
                .unwrap_or_default(),
            self.last_commit_hash.encode_to_vec(),
            self.data_hash.encode_to_vec(),
            self.validators_hash.encode_to_vec(),
            self.next_validators_hash.encode_to_vec(),
            self.consensus_hash.encode_to_vec(),
            self.app_hash.encode_to_vec(),
            self.last_results_hash.encode_to_vec(),
            self.evidence_hash.encode_to_vec(),
            self.proposer_address.encode_to_vec(),
        ];
        simple_hash_from_byte_vectors(&fields)
    }
}

impl From<&Validator> for SimpleValidator {
    fn from(validator: &Validator) -> Self {
        Self {
            pub_key: validator.pub_key.clone(),
            voting_power: validator.voting_power,
        }
    }
}

impl ValidatorSet {
    /// Computes the hash headers commit to via `validators_hash` and
    /// `next_validators_hash`: the simple merkle root over each member's
    /// key and power. Order matters.
    #[must_use]
    pub fn hash(&self) -> [u8; 32] {
        let leaves: Vec<Vec<u8>> = self
            .validators
            .iter()
            .map(|v| SimpleValidator::from(v).encode_to_vec())
            .collect();
        simple_hash_from_byte_vectors(&leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{public_key, Consensus, PublicKey, Timestamp};

    fn validator(key_byte: u8, power: i64) -> Validator {
        Validator {
            address: vec![key_byte; 20],
            pub_key: Some(PublicKey {
                sum: Some(public_key::Sum::Ed25519(vec![key_byte; 32])),
            }),
            voting_power: power,
            proposer_priority: 0,
        }
    }

    #[test]
    fn validator_set_hash_covers_key_and_power_only() {
        let mut set = ValidatorSet {
            validators: vec![validator(1, 10), validator(2, 20)],
            proposer: None,
            total_voting_power: 30,
        };
        let baseline = set.hash();

        // address and priority are not committed to
        set.validators[0].address = vec![9; 20];
        set.validators[1].proposer_priority = 7;
        assert_eq!(set.hash(), baseline);

        // power is
        set.validators[0].voting_power = 11;
        assert_ne!(set.hash(), baseline);
    }

    #[test]
    fn validator_set_hash_is_order_sensitive() {
        let forward = ValidatorSet {
            validators: vec![validator(1, 10), validator(2, 20)],
            proposer: None,
            total_voting_power: 30,
        };
        let mut reversed = forward.clone();
        reversed.validators.reverse();
        assert_ne!(forward.hash(), reversed.hash());
    }

    #[test]
    fn header_hash_changes_with_any_field() {
        let header = LightHeader {
            version: Some(Consensus { block: 11, app: 1 }),
            chain_id: "test-chain".to_owned(),
            height: 42,
            time: Some(Timestamp {
                seconds: 1_700_000_000,
                nanos: 0,
            }),
            last_block_id: None,
            last_commit_hash: vec![1; 32],
            data_hash: vec![2; 32],
            validators_hash: vec![3; 32],
            next_validators_hash: vec![4; 32],
            consensus_hash: vec![5; 32],
            app_hash: vec![6; 32],
            last_results_hash: vec![7; 32],
            evidence_hash: vec![8; 32],
            proposer_address: vec![9; 20],
        };
        let baseline = header.hash();

        let mut tweaked = header.clone();
        tweaked.height = 43;
        assert_ne!(tweaked.hash(), baseline);

        let mut tweaked = header.clone();
        tweaked.app_hash = vec![0xaa; 32];
        assert_ne!(tweaked.hash(), baseline);

        let mut tweaked = header.clone();
        tweaked.chain_id = "other-chain".to_owned();
        assert_ne!(tweaked.hash(), baseline);

        assert_eq!(header.hash(), baseline);
    }
}
