//! variables.rs: parameter domains shared by every apportionment call.
//!
//! - `ThresholdPct`: electoral threshold held exactly in basis points.
//! - `TiePolicy`: how equal quotients (and equal plurality totals) are settled.

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

/// Basis points in 100%.
const FULL_BP: u32 = 10_000;

/// Electoral threshold as a share of total valid votes.
///
/// Stored as basis points (1/100 of a percent) so that the qualification test
/// `votes / total >= pct / 100` is exact integer arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThresholdPct(u32);

impl ThresholdPct {
    /// 7% national threshold.
    pub const DEFAULT: ThresholdPct = ThresholdPct(700);
    pub const ZERO: ThresholdPct = ThresholdPct(0);

    /// Build from a percentage in `[0, 100]`, rounded to two decimals.
    pub fn from_percent(pct: f64) -> Result<Self, CoreError> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(CoreError::DomainOutOfRange("threshold_pct"));
        }
        // Non-negative, so truncating after +0.5 is round-half-up.
        Ok(ThresholdPct((pct * 100.0 + 0.5) as u32))
    }

    pub fn from_basis_points(bp: u32) -> Result<Self, CoreError> {
        if bp <= FULL_BP {
            Ok(ThresholdPct(bp))
        } else {
            Err(CoreError::DomainOutOfRange("threshold_bp"))
        }
    }

    #[inline]
    pub fn basis_points(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_percent(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// `votes >= total * pct / 100`, cross-multiplied in u128.
    #[inline]
    pub fn admits(self, votes: u64, total: u64) -> bool {
        u128::from(votes) * u128::from(FULL_BP) >= u128::from(total) * u128::from(self.0)
    }

    /// Smallest vote count that clears the threshold for `total`.
    pub fn min_votes(self, total: u64) -> u64 {
        let num = u128::from(total) * u128::from(self.0);
        let den = u128::from(FULL_BP);
        // ceil(num / den); never exceeds `total` because bp <= 10_000.
        ((num + den - 1) / den) as u64
    }
}

impl Default for ThresholdPct {
    fn default() -> Self {
        ThresholdPct::DEFAULT
    }
}

#[cfg(feature = "serde")]
impl Serialize for ThresholdPct {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(self.as_percent())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ThresholdPct {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        use serde::de::{Error as DeError, Unexpected};
        let v = f64::deserialize(d)?;
        ThresholdPct::from_percent(v)
            .map_err(|_| D::Error::invalid_value(Unexpected::Float(v), &"percentage in 0..=100"))
    }
}

/// Tie resolution for equal quotients straddling the last seat, and for
/// equal top totals when picking a quota-seat winner.
///
/// - `DeterministicOrder`: higher raw votes first, then name ascending.
/// - `Lots`: draw among the tied contestants with a ChaCha20 stream from `seed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TiePolicy {
    #[default]
    DeterministicOrder,
    Lots { seed: u64 },
}

impl TiePolicy {
    #[inline]
    pub fn seed(self) -> Option<u64> {
        match self {
            TiePolicy::DeterministicOrder => None,
            TiePolicy::Lots { seed } => Some(seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_to_basis_points() {
        assert_eq!(ThresholdPct::from_percent(7.0).unwrap().basis_points(), 700);
        assert_eq!(ThresholdPct::from_percent(0.5).unwrap().basis_points(), 50);
        assert_eq!(ThresholdPct::from_percent(3.25).unwrap().basis_points(), 325);
        assert_eq!(ThresholdPct::from_percent(100.0).unwrap().basis_points(), 10_000);
        assert!(ThresholdPct::from_percent(-0.1).is_err());
        assert!(ThresholdPct::from_percent(100.01).is_err());
        assert!(ThresholdPct::from_percent(f64::NAN).is_err());
        assert!(ThresholdPct::from_basis_points(10_001).is_err());
        assert_eq!(ThresholdPct::default(), ThresholdPct::DEFAULT);
    }

    #[test]
    fn admits_is_inclusive_and_exact() {
        let t = ThresholdPct::DEFAULT;
        // 7% of 1000 is exactly 70.
        assert!(t.admits(70, 1000));
        assert!(!t.admits(69, 1000));
        assert_eq!(t.min_votes(1000), 70);
        // 7% of 1001 = 70.07 → 71 needed.
        assert!(!t.admits(70, 1001));
        assert!(t.admits(71, 1001));
        assert_eq!(t.min_votes(1001), 71);
        // Zero threshold admits zero votes.
        assert!(ThresholdPct::ZERO.admits(0, 1000));
        assert_eq!(ThresholdPct::ZERO.min_votes(1000), 0);
    }

    #[test]
    fn extremes_do_not_overflow() {
        let t = ThresholdPct::from_percent(100.0).unwrap();
        assert!(t.admits(u64::MAX, u64::MAX));
        assert_eq!(t.min_votes(u64::MAX), u64::MAX);
    }
}
