//! Verification parameters: the trust threshold and the timing envelope.

use tm_light_client_types::proto::Fraction;

use crate::error::VerifierError;

/// Nanoseconds per second.
const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// The fraction of trusted validator power a skipping update must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustThreshold {
    numerator: u64,
    denominator: u64,
}

impl TrustThreshold {
    /// The canonical 1/3 threshold.
    pub const ONE_THIRD: Self = Self {
        numerator: 1,
        denominator: 3,
    };

    /// The 2/3 supermajority used for same-set commit verification.
    pub const TWO_THIRDS: Self = Self {
        numerator: 2,
        denominator: 3,
    };

    /// Builds a threshold, rejecting zero denominators and fractions
    /// above one.
    ///
    /// # Errors
    /// Returns an error for an unusable fraction.
    pub const fn new(numerator: u64, denominator: u64) -> Result<Self, VerifierError> {
        if denominator == 0 {
            return Err(VerifierError::ZeroTrustDenominator);
        }
        if numerator > denominator {
            return Err(VerifierError::TrustThresholdTooLarge {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// The threshold numerator.
    #[must_use]
    pub const fn numerator(&self) -> u64 {
        self.numerator
    }

    /// The threshold denominator.
    #[must_use]
    pub const fn denominator(&self) -> u64 {
        self.denominator
    }

    /// True when `tallied` power is strictly more than this fraction of
    /// `total`. The comparison cross-multiplies in `u128` so it cannot
    /// overflow or lose precision.
    #[must_use]
    pub fn is_met(&self, tallied: u64, total: u64) -> bool {
        u128::from(tallied) * u128::from(self.denominator)
            > u128::from(total) * u128::from(self.numerator)
    }
}

impl Default for TrustThreshold {
    fn default() -> Self {
        Self::ONE_THIRD
    }
}

impl TryFrom<&Fraction> for TrustThreshold {
    type Error = VerifierError;

    fn try_from(fraction: &Fraction) -> Result<Self, Self::Error> {
        Self::new(fraction.numerator, fraction.denominator)
    }
}

/// The full verification envelope for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// The trust threshold for skipping verification.
    pub trust_threshold: TrustThreshold,
    /// How long a trusted state stays trustworthy, in seconds.
    pub trusting_period_secs: u64,
    /// Tolerated clock skew between chains, in seconds.
    pub clock_drift_secs: u64,
}

impl Options {
    /// True once `trusted_time` is outside the trusting period at `now`,
    /// both in unix nanoseconds.
    #[must_use]
    pub fn is_expired(&self, trusted_time_nanos: u128, now_nanos: u128) -> bool {
        now_nanos >= trusted_time_nanos + u128::from(self.trusting_period_secs) * NANOS_PER_SECOND
    }

    /// The exclusive upper bound on header time at `now`, in unix
    /// nanoseconds. A header timestamped at or past this bound is from
    /// the future.
    #[must_use]
    pub fn max_header_time(&self, now_nanos: u128) -> u128 {
        now_nanos + u128::from(self.clock_drift_secs) * NANOS_PER_SECOND
    }
}
