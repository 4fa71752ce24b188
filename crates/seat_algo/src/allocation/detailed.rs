//! Detailed D'Hondt report: the full divisor/quotient table plus chart rows.
//!
//! No allocation logic of its own; it reads the same ranking the basic engine
//! uses, so the `won` flags always agree with the distribution.

use std::collections::{BTreeMap, BTreeSet};

use seat_core::{rng::tie_rng_from_seed, PartyName, SeatMap, TiePolicy, VoteTally};

use super::dhondt::rank_quotients;
use crate::chart::{chart_rows, ChartRow};

/// One cell of the quotient table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QuotientCell {
    pub divisor: u32,
    /// `votes / divisor`, for display; ranking used exact integers.
    pub quotient: f64,
    pub won: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DetailedApportionment {
    pub distribution: SeatMap<PartyName>,
    /// Contestant → cells for divisors `1..=seats`.
    pub quotient_table: BTreeMap<PartyName, Vec<QuotientCell>>,
    pub chart_data: Vec<ChartRow>,
    pub last_seat_tie: bool,
}

pub fn apportion_detailed(
    votes: &VoteTally,
    total_seats: u32,
    tie: TiePolicy,
) -> DetailedApportionment {
    let mut rng = tie.seed().map(tie_rng_from_seed);
    let ranking = rank_quotients(votes.as_map(), total_seats, rng.as_mut());

    if ranking.winners.is_empty() {
        return DetailedApportionment {
            distribution: SeatMap::new(),
            quotient_table: BTreeMap::new(),
            chart_data: Vec::new(),
            last_seat_tie: false,
        };
    }

    let won: BTreeSet<(&PartyName, u32)> =
        ranking.winners.iter().map(|q| (q.key, q.divisor)).collect();

    let mut distribution = SeatMap::new();
    let mut quotient_table = BTreeMap::new();
    for (party, &v) in votes.iter().filter(|(_, v)| **v > 0) {
        let cells: Vec<QuotientCell> = (1..=total_seats)
            .map(|d| QuotientCell {
                divisor: d,
                quotient: v as f64 / f64::from(d),
                won: won.contains(&(party, d)),
            })
            .collect();
        let seats = cells.iter().filter(|c| c.won).count() as u32;
        distribution.insert(party.clone(), seats);
        quotient_table.insert(party.clone(), cells);
    }

    let chart_data = chart_rows(votes, &distribution);
    DetailedApportionment {
        distribution,
        quotient_table,
        chart_data,
        last_seat_tie: ranking.last_seat_tie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::dhondt::apportion;

    fn tally(pairs: &[(&str, u64)]) -> VoteTally {
        pairs.iter().map(|(n, v)| (n.parse().unwrap(), *v)).collect()
    }

    #[test]
    fn table_matches_basic_engine() {
        let t = tally(&[("A", 100_000), ("B", 80_000), ("C", 30_000), ("D", 0)]);
        let d = apportion_detailed(&t, 10, TiePolicy::DeterministicOrder);
        assert_eq!(d.distribution, apportion(&t, 10));
        assert!(!d.quotient_table.contains_key("D"));

        let a = &d.quotient_table["A"];
        assert_eq!(a.len(), 10);
        assert_eq!(a[0].quotient, 100_000.0);
        assert_eq!(a[3].quotient, 25_000.0);
        let won: Vec<u32> = a.iter().filter(|c| c.won).map(|c| c.divisor).collect();
        assert_eq!(won, vec![1, 2, 3, 4, 5]);

        let total_won: usize =
            d.quotient_table.values().map(|cells| cells.iter().filter(|c| c.won).count()).sum();
        assert_eq!(total_won, 10);
    }

    #[test]
    fn chart_rows_sorted_by_seats() {
        let t = tally(&[("C", 30_000), ("A", 100_000), ("B", 80_000)]);
        let d = apportion_detailed(&t, 10, TiePolicy::DeterministicOrder);
        let rows: Vec<(&str, u32, u64)> =
            d.chart_data.iter().map(|r| (r.name.as_str(), r.seats, r.votes)).collect();
        assert_eq!(rows, vec![("A", 5, 100_000), ("B", 4, 80_000), ("C", 1, 30_000)]);
    }

    #[test]
    fn degenerate_is_empty() {
        let d = apportion_detailed(&tally(&[("A", 5)]), 0, TiePolicy::DeterministicOrder);
        assert!(d.distribution.is_empty());
        assert!(d.quotient_table.is_empty());
        assert!(d.chart_data.is_empty());
    }
}
