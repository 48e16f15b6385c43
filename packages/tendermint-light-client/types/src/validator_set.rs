//! Validator-set arithmetic and lookups.

use crate::error::TypesError;
use crate::proto::{Validator, ValidatorSet};

impl ValidatorSet {
    /// Sums the voting power of all members. The sum accumulates in
    /// `u128`, so the intermediate cannot wrap, and the final total must
    /// fit `u64`.
    ///
    /// # Errors
    /// Returns an error if any member carries a negative power or the
    /// total exceeds `u64::MAX`.
    pub fn total_power(&self) -> Result<u64, TypesError> {
        let mut total: u128 = 0;
        for validator in &self.validators {
            let power = u128::try_from(validator.voting_power)
                .map_err(|_| TypesError::NegativeVotingPower(validator.voting_power))?;
            total += power;
        }
        u64::try_from(total).map_err(|_| TypesError::TotalPowerOverflow(total))
    }

    /// Looks a member up by address.
    #[must_use]
    pub fn validator_by_address(&self, address: &[u8]) -> Option<&Validator> {
        self.validators.iter().find(|v| v.address == address)
    }

    /// Checks the set is usable for commit verification: non-empty, all
    /// powers non-negative, and the cached total (when set) consistent
    /// with the members.
    ///
    /// # Errors
    /// Returns an error describing the first violated condition.
    pub fn validate_basic(&self) -> Result<(), TypesError> {
        if self.validators.is_empty() {
            return Err(TypesError::EmptyValidatorSet);
        }
        let computed = self.total_power()?;
        if self.total_voting_power != 0 {
            let cached = u64::try_from(self.total_voting_power)
                .map_err(|_| TypesError::NegativeVotingPower(self.total_voting_power))?;
            if cached != computed {
                return Err(TypesError::TotalPowerMismatch {
                    cached: self.total_voting_power,
                    computed,
                });
            }
        }
        Ok(())
    }
}
