//! Determinism utilities: exact quotient comparison and the canonical award order.
//!
//! This module is **I/O-free** and float-free. D'Hondt quotients `v / d` are
//! compared by cross-multiplying in `u128`, so two quotients are equal only when
//! they are mathematically equal.

use core::cmp::Ordering;

/// Compare `v_a / d_a` against `v_b / d_b` exactly.
/// Returns `Greater` if a's quotient is larger. Divisors are ≥ 1.
#[inline]
pub fn cmp_quotients(v_a: u64, d_a: u32, v_b: u64, d_b: u32) -> Ordering {
    let lhs = u128::from(v_a) * u128::from(d_b);
    let rhs = u128::from(v_b) * u128::from(d_a);
    lhs.cmp(&rhs)
}

/// One D'Hondt quotient, borrowed from the caller's tally.
#[derive(Debug, PartialEq, Eq)]
pub struct QuotientRef<'a, K> {
    pub key: &'a K,
    pub votes: u64,
    pub divisor: u32,
}

// Manual impls: a borrowed key is always copyable, whatever `K` is.
impl<K> Clone for QuotientRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K> Copy for QuotientRef<'_, K> {}

impl<K> QuotientRef<'_, K> {
    /// Exact equality of quotient values (not of contestants).
    #[inline]
    pub fn same_value(&self, other: &Self) -> bool {
        cmp_quotients(self.votes, self.divisor, other.votes, other.divisor) == Ordering::Equal
    }
}

/// Canonical award order: quotient ↓, raw votes ↓, key ↑.
///
/// Sorting with this comparator yields the seat ranking used by
/// `TiePolicy::DeterministicOrder`; the first `seats` entries win.
pub fn cmp_award_order<K: Ord>(a: &QuotientRef<'_, K>, b: &QuotientRef<'_, K>) -> Ordering {
    cmp_quotients(b.votes, b.divisor, a.votes, a.divisor)
        .then_with(|| b.votes.cmp(&a.votes))
        .then_with(|| a.key.cmp(b.key))
        .then_with(|| a.divisor.cmp(&b.divisor))
}

/// Plurality order for picking a single top contestant: votes ↓, key ↑.
#[inline]
pub fn cmp_plurality<K: Ord>(a: (&K, u64), b: (&K, u64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

/* ---------------------------------- Tests --------------------------------- */
