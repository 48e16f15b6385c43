//! The top-level update check: header sanity, then commit verification
//! against the right validator sets for the adjacent and skipping cases.

use ibc_trust_utils::ensure;
use tm_light_client_types::proto::{Commit, LightHeader, SignedHeader, ValidatorSet};

use crate::commit::{verify_commit_light, verify_commit_light_trusting};
use crate::error::VerifierError;
use crate::options::Options;

/// The untrusted material one update carries.
#[derive(Debug, Clone, Copy)]
pub struct UntrustedBlockState<'a> {
    /// The header and the commit over it.
    pub signed_header: &'a SignedHeader,
    /// The set the commit claims to come from.
    pub validators: &'a ValidatorSet,
}

/// The stored material an update is verified against.
#[derive(Debug, Clone, Copy)]
pub struct TrustedBlockState<'a> {
    /// The chain id the client tracks.
    pub chain_id: &'a str,
    /// The trusted height within its revision.
    pub height: u64,
    /// The trusted header time in unix nanoseconds.
    pub timestamp_nanos: u128,
    /// The validator set at the trusted height plus one. Relayer supplied;
    /// authenticated against `next_validators_hash` before use.
    pub next_validators: &'a ValidatorSet,
    /// The stored commitment to `next_validators`.
    pub next_validators_hash: &'a [u8],
}

fn header_and_commit(
    signed_header: &SignedHeader,
) -> Result<(&LightHeader, &Commit), VerifierError> {
    let header = signed_header
        .header
        .as_ref()
        .ok_or(VerifierError::MissingField("signed_header.header"))?;
    let commit = signed_header
        .commit
        .as_ref()
        .ok_or(VerifierError::MissingField("signed_header.commit"))?;
    Ok((header, commit))
}

/// Structural and timing checks every update must pass, regardless of
/// whether it is adjacent to the trusted state.
///
/// # Errors
/// Returns the first violated condition.
pub fn verify_new_header_and_vals(
    untrusted: UntrustedBlockState<'_>,
    trusted: &TrustedBlockState<'_>,
    options: &Options,
    now_nanos: u128,
) -> Result<(), VerifierError> {
    let (header, commit) = header_and_commit(untrusted.signed_header)?;

    ensure!(
        header.chain_id == trusted.chain_id,
        VerifierError::ChainIdMismatch {
            expected: trusted.chain_id.to_owned(),
            found: header.chain_id.clone(),
        }
    );

    let untrusted_height =
        u64::try_from(header.height).map_err(|_| VerifierError::NonPositiveHeight(header.height))?;
    ensure!(
        untrusted_height > trusted.height,
        VerifierError::NonIncreasingHeight {
            trusted: trusted.height,
            untrusted: untrusted_height,
        }
    );

    let header_time = header
        .time
        .ok_or(VerifierError::MissingField("header.time"))?
        .unix_nanos()?;
    ensure!(
        header_time > trusted.timestamp_nanos,
        VerifierError::NonIncreasingTime {
            trusted: trusted.timestamp_nanos,
            untrusted: header_time,
        }
    );
    let max_time = options.max_header_time(now_nanos);
    ensure!(
        header_time < max_time,
        VerifierError::HeaderFromFuture {
            header_time,
            max_time,
        }
    );

    ensure!(
        commit.height == header.height,
        VerifierError::CommitHeightMismatch {
            commit: commit.height,
            header: header.height,
        }
    );
    let committed_hash = commit
        .block_id
        .as_ref()
        .ok_or(VerifierError::MissingField("commit.block_id"))?
        .hash
        .clone();
    let header_hash = header.hash();
    ensure!(
        committed_hash == header_hash,
        VerifierError::CommitBlockIdMismatch {
            commit: hex::encode(&committed_hash),
            header: hex::encode(header_hash),
        }
    );

    untrusted.validators.validate_basic()?;
    let computed_vals_hash = untrusted.validators.hash();
    ensure!(
        computed_vals_hash == header.validators_hash.as_slice(),
        VerifierError::ValidatorSetHashMismatch {
            expected: hex::encode(&header.validators_hash),
            computed: hex::encode(computed_vals_hash),
        }
    );

    Ok(())
}

/// Verifies one untrusted signed header against the trusted state.
///
/// Adjacent updates (trusted height plus one) require the untrusted
/// validator set to be exactly the stored next set. Skipping updates
/// additionally require signers from the trusted next set carrying more
/// than the configured trust level of its power.
///
/// # Errors
/// Returns the first failed check.
pub fn verify(
    untrusted: UntrustedBlockState<'_>,
    trusted: &TrustedBlockState<'_>,
    options: &Options,
    now_nanos: u128,
) -> Result<(), VerifierError> {
    if options.is_expired(trusted.timestamp_nanos, now_nanos) {
        return Err(VerifierError::TrustedStateExpired {
            trusted_time: trusted.timestamp_nanos,
            now: now_nanos,
        });
    }
    verify_new_header_and_vals(untrusted, trusted, options, now_nanos)?;

    let (header, commit) = header_and_commit(untrusted.signed_header)?;
    let untrusted_height = u64::try_from(header.height)
        .map_err(|_| VerifierError::NonPositiveHeight(header.height))?;

    if untrusted_height == trusted.height + 1 {
        // adjacent: the signing set was committed to by the trusted header
        let computed = untrusted.validators.hash();
        ensure!(
            computed == trusted.next_validators_hash,
            VerifierError::NextValidatorsMismatch {
                expected: hex::encode(trusted.next_validators_hash),
                computed: hex::encode(computed),
            }
        );
    } else {
        // skipping: authenticate the supplied trusted set, then require
        // enough of its power on the new commit
        trusted.next_validators.validate_basic()?;
        let computed = trusted.next_validators.hash();
        ensure!(
            computed == trusted.next_validators_hash,
            VerifierError::NextValidatorsMismatch {
                expected: hex::encode(trusted.next_validators_hash),
                computed: hex::encode(computed),
            }
        );
        verify_commit_light_trusting(
            trusted.next_validators,
            trusted.chain_id,
            commit,
            options.trust_threshold,
        )?;
    }

    verify_commit_light(untrusted.validators, trusted.chain_id, commit)
}
