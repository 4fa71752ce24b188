//! Chart-ready rows shared by every apportionment variant.

use std::cmp::Ordering;

use seat_core::{PartyName, SeatMap, VoteTally};

/// One bar in a seats chart.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChartRow {
    pub name: PartyName,
    pub votes: u64,
    pub seats: u32,
}

/// Rows for every contestant in `distribution`, sorted seats ↓, votes ↓, name ↑.
pub fn chart_rows(votes: &VoteTally, distribution: &SeatMap<PartyName>) -> Vec<ChartRow> {
    let mut rows: Vec<ChartRow> = distribution
        .iter()
        .map(|(name, &seats)| ChartRow { name: name.clone(), votes: votes.get(name.as_str()), seats })
        .collect();
    rows.sort_by(cmp_rows);
    rows
}

/// Chart order for two rows: seats ↓, votes ↓, name ↑.
pub fn cmp_rows(a: &ChartRow, b: &ChartRow) -> Ordering {
    seat_order((a.seats, a.votes, &a.name), (b.seats, b.votes, &b.name))
}

/// The same order over bare `(seats, votes, name)` triples, for rows that
/// are not `ChartRow`s (first-stage blocs, report lines).
pub fn seat_order<N: Ord + ?Sized>(a: (u32, u64, &N), b: (u32, u64, &N)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)).then_with(|| a.2.cmp(b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_sorted_by_seats_then_votes_then_name() {
        let t: VoteTally = [("A", 10u64), ("B", 30), ("C", 30), ("D", 5)]
            .iter()
            .map(|(n, v)| (n.parse().unwrap(), *v))
            .collect();
        let mut d = SeatMap::new();
        d.insert("A".parse().unwrap(), 1);
        d.insert("B".parse().unwrap(), 1);
        d.insert("C".parse().unwrap(), 1);
        d.insert("D".parse().unwrap(), 0);
        let names: Vec<String> = chart_rows(&t, &d).into_iter().map(|r| r.name.to_string()).collect();
        assert_eq!(names, ["B", "C", "A", "D"]);
    }

    #[test]
    fn seat_order_matches_row_order_on_bare_triples() {
        let mut blocs = [(0u32, 90u64, "Z"), (2, 50, "B"), (2, 50, "A"), (3, 10, "C")];
        blocs.sort_by(|x, y| seat_order((x.0, x.1, x.2), (y.0, y.1, y.2)));
        let names: Vec<&str> = blocs.iter().map(|b| b.2).collect();
        assert_eq!(names, ["C", "A", "B", "Z"]);
    }
}
