//! D'Hondt (highest averages) apportionment.
//!
//! Contract:
//! - Contestants with zero votes are dropped; they are not an error.
//! - `seats == 0` or no contestant with votes → empty map ("nothing to allocate").
//! - Every remaining contestant contributes quotients `v / d` for `d = 1..=seats`.
//!   All quotients are pooled, ranked, and the top `seats` each win one seat.
//! - The result lists every contestant with votes, including those on zero seats,
//!   and its seats always sum to `seats` when the input is non-degenerate.
//!
//! Ranking (exact integers, cross-multiplied in u128):
//! - quotient ↓, raw votes ↓, key ↑ (`TiePolicy::DeterministicOrder`);
//! - with a lot RNG, quotients equal to the last winning one that straddle the
//!   cut are drawn by lot instead, in key order.

use std::collections::BTreeMap;

use seat_core::{
    determinism::{cmp_award_order, QuotientRef},
    rng::{tie_rng_from_seed, TieRng},
    PartyName, SeatMap, TiePolicy, VoteTally,
};
use tracing::{debug, trace};

/// Seats per contestant plus whether the last seat was settled by the tie rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Apportionment<K: Ord> {
    pub seats: SeatMap<K>,
    pub last_seat_tie: bool,
}

impl<K: Ord> Apportionment<K> {
    pub fn empty() -> Self {
        Apportionment { seats: BTreeMap::new(), last_seat_tie: false }
    }

    /// Sum of awarded seats.
    pub fn total(&self) -> u32 {
        self.seats.values().sum()
    }
}

/// Apportion `total_seats` over `votes` with the default deterministic tie order.
pub fn apportion(votes: &VoteTally, total_seats: u32) -> SeatMap<PartyName> {
    apportion_keys(votes.as_map(), total_seats, None).seats
}

/// Apportion under an explicit tie policy.
pub fn apportion_with_policy(
    votes: &VoteTally,
    total_seats: u32,
    tie: TiePolicy,
) -> Apportionment<PartyName> {
    let mut rng = tie.seed().map(tie_rng_from_seed);
    apportion_keys(votes.as_map(), total_seats, rng.as_mut())
}

/// Generic engine over any ordered contestant key (party names, first-stage blocs).
///
/// `rng = Some(..)` draws lots for a tie straddling the last seat; `None`
/// keeps the canonical award order.
pub fn apportion_keys<K: Ord + Clone>(
    votes: &BTreeMap<K, u64>,
    total_seats: u32,
    rng: Option<&mut TieRng>,
) -> Apportionment<K> {
    let ranking = rank_quotients(votes, total_seats, rng);
    if ranking.winners.is_empty() {
        return Apportionment::empty();
    }

    let mut seats: SeatMap<K> = votes
        .iter()
        .filter(|(_, v)| **v > 0)
        .map(|(k, _)| (k.clone(), 0))
        .collect();
    for w in &ranking.winners {
        *seats.entry(w.key.clone()).or_insert(0) += 1;
    }

    debug_assert_eq!(seats.values().sum::<u32>(), total_seats);
    Apportionment { seats, last_seat_tie: ranking.last_seat_tie }
}

/// Winning quotients in award order (length == seats) for a non-degenerate call.
pub(crate) struct Ranking<'a, K> {
    pub winners: Vec<QuotientRef<'a, K>>,
    pub last_seat_tie: bool,
}

pub(crate) fn rank_quotients<'a, K: Ord>(
    votes: &'a BTreeMap<K, u64>,
    total_seats: u32,
    rng: Option<&mut TieRng>,
) -> Ranking<'a, K> {
    let empty = Ranking { winners: Vec::new(), last_seat_tie: false };
    if total_seats == 0 {
        debug!("dhondt: zero seats, nothing to allocate");
        return empty;
    }

    let mut pool: Vec<QuotientRef<'a, K>> = votes
        .iter()
        .filter(|(_, v)| **v > 0)
        .flat_map(|(key, &votes)| {
            (1..=total_seats).map(move |divisor| QuotientRef { key, votes, divisor })
        })
        .collect();
    if pool.is_empty() {
        debug!("dhondt: no contestant with votes, nothing to allocate");
        return empty;
    }
    pool.sort_by(cmp_award_order);

    // At least one contestant contributes `total_seats` quotients.
    let cut = total_seats as usize;
    let boundary = pool[cut - 1];

    let mut start = cut - 1;
    while start > 0 && pool[start - 1].same_value(&boundary) {
        start -= 1;
    }
    let mut end = cut;
    while end < pool.len() && pool[end].same_value(&boundary) {
        end += 1;
    }
    let last_seat_tie = end > cut;

    match rng {
        Some(rng) if last_seat_tie => {
            let open = cut - start;
            let mut group: Vec<QuotientRef<'a, K>> = pool[start..end].to_vec();
            group.sort_by(|a, b| a.key.cmp(b.key));
            let drawn = rng.draw(&group, open);
            trace!(
                tied = group.len(),
                open,
                words = rng.words_consumed(),
                "dhondt: last seats drawn by lot"
            );
            pool.truncate(start);
            pool.extend(drawn);
        }
        _ => {
            if last_seat_tie {
                trace!(tied = end - start, open = cut - start, "dhondt: last seats by canonical order");
            }
            pool.truncate(cut);
        }
    }

    debug!(seats = total_seats, quotients = end.max(cut), last_seat_tie, "dhondt: ranked");
    Ranking { winners: pool, last_seat_tie }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(pairs: &[(&str, u64)]) -> VoteTally {
        pairs.iter().map(|(n, v)| (n.parse().unwrap(), *v)).collect()
    }

    fn seats_of(m: &SeatMap<PartyName>, name: &str) -> u32 {
        m.get(name).copied().unwrap_or(0)
    }

    #[test]
    fn classic_example() {
        // 100k / 80k / 30k over 10 seats → 5 / 4 / 1.
        let t = tally(&[("A", 100_000), ("B", 80_000), ("C", 30_000)]);
        let r = apportion(&t, 10);
        assert_eq!(seats_of(&r, "A"), 5);
        assert_eq!(seats_of(&r, "B"), 4);
        assert_eq!(seats_of(&r, "C"), 1);
        assert_eq!(r.values().sum::<u32>(), 10);
    }

    #[test]
    fn zero_seats_or_no_votes_is_empty() {
        let t = tally(&[("A", 600_000), ("B", 400_000)]);
        assert!(apportion(&t, 0).is_empty());
        assert!(apportion(&tally(&[("A", 0), ("B", 0)]), 5).is_empty());
        assert!(apportion(&VoteTally::new(), 5).is_empty());
    }

    #[test]
    fn zero_vote_contestants_are_dropped() {
        let t = tally(&[("A", 10), ("Z", 0)]);
        let r = apportion(&t, 3);
        assert_eq!(r.len(), 1);
        assert_eq!(seats_of(&r, "A"), 3);
    }

    #[test]
    fn losers_listed_with_zero() {
        let t = tally(&[("A", 1_000), ("B", 1)]);
        let r = apportion(&t, 2);
        assert_eq!(r.get("B"), Some(&0));
        assert_eq!(seats_of(&r, "A"), 2);
    }

    #[test]
    fn tie_goes_to_more_votes_then_name() {
        // A: 200/2 = 100 ties B: 100/1 for the 2nd seat → A (more raw votes).
        let t = tally(&[("A", 200), ("B", 100)]);
        let r = apportion_with_policy(&t, 2, TiePolicy::DeterministicOrder);
        assert_eq!(seats_of(&r.seats, "A"), 2);
        assert!(r.last_seat_tie);

        // Exact equal totals, one seat → name ascending.
        let t = tally(&[("B", 50), ("A", 50)]);
        let r = apportion_with_policy(&t, 1, TiePolicy::DeterministicOrder);
        assert_eq!(seats_of(&r.seats, "A"), 1);
        assert_eq!(seats_of(&r.seats, "B"), 0);
        assert!(r.last_seat_tie);
    }

    #[test]
    fn tie_inside_the_winners_is_not_flagged() {
        // Two equal contestants, two seats: both win; no straddling tie.
        let t = tally(&[("A", 50), ("B", 50)]);
        let r = apportion_with_policy(&t, 2, TiePolicy::DeterministicOrder);
        assert_eq!(r.seats.values().copied().collect::<Vec<_>>(), vec![1, 1]);
        assert!(!r.last_seat_tie);
    }

    #[test]
    fn lots_are_reproducible_and_sum_holds() {
        let t = tally(&[("A", 30), ("B", 30), ("C", 30), ("D", 5)]);
        let p = TiePolicy::Lots { seed: 2024 };
        let r1 = apportion_with_policy(&t, 2, p);
        let r2 = apportion_with_policy(&t, 2, p);
        assert_eq!(r1, r2);
        assert_eq!(r1.total(), 2);
        assert!(r1.last_seat_tie);
        assert_eq!(seats_of(&r1.seats, "D"), 0);
        // Exactly two of the three tied contestants win one seat each.
        let winners = ["A", "B", "C"].iter().filter(|n| seats_of(&r1.seats, n) == 1).count();
        assert_eq!(winners, 2);
    }

    #[test]
    fn generic_over_keys() {
        let mut m: BTreeMap<u8, u64> = BTreeMap::new();
        m.insert(1, 9);
        m.insert(2, 3);
        let r = apportion_keys(&m, 4, None);
        assert_eq!(r.seats.get(&1), Some(&3));
        assert_eq!(r.seats.get(&2), Some(&1));
    }
}
