//! Municipal council apportionment with population-gated quota seats.
//!
//! 1. Quota seats come from the population bracket, capped at the seat count:
//!    `< 10_000 → 1`, `10_000..=99_999 → 2`, `≥ 100_000 → 3`.
//! 2. The plurality winner takes the quota seats outright.
//! 3. The remaining seats are apportioned by D'Hondt over the **full, unmodified**
//!    tally (the quota winner competes for them too).
//!
//! Degenerate input (no seats, or no contestant with votes) allocates nothing:
//! empty distribution, no quota winner, zero quota and D'Hondt seats.

use seat_core::{
    determinism::cmp_plurality,
    rng::{tie_rng_from_seed, TieRng},
    PartyName, SeatMap, TiePolicy, VoteTally,
};
use tracing::{debug, trace};

use crate::allocation::dhondt::apportion_keys;
use crate::chart::{chart_rows, ChartRow};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MunicipalApportionment {
    pub distribution: SeatMap<PartyName>,
    pub quota_seats: u32,
    pub dhondt_seats: u32,
    pub quota_party: Option<PartyName>,
    pub quota_party_votes: u64,
    pub chart_data: Vec<ChartRow>,
    /// Quota winner chosen among contestants with equal top totals.
    pub quota_tie: bool,
    pub last_seat_tie: bool,
}

/// Bracket table (uncapped).
pub fn quota_seats_for_population(population: u64) -> u32 {
    match population {
        0..=9_999 => 1,
        10_000..=99_999 => 2,
        _ => 3,
    }
}

pub fn apportion_municipal(
    votes: &VoteTally,
    total_seats: u32,
    population: u64,
    tie: TiePolicy,
) -> MunicipalApportionment {
    let mut rng = tie.seed().map(tie_rng_from_seed);

    let (quota_party, quota_party_votes, quota_tie) = match pick_plurality(votes, rng.as_mut()) {
        Some(top) if total_seats > 0 => top,
        _ => {
            debug!(seats = total_seats, "municipal: nothing to allocate");
            return MunicipalApportionment {
                distribution: SeatMap::new(),
                quota_seats: 0,
                dhondt_seats: 0,
                quota_party: None,
                quota_party_votes: 0,
                chart_data: Vec::new(),
                quota_tie: false,
                last_seat_tie: false,
            };
        }
    };

    let quota_seats = quota_seats_for_population(population).min(total_seats);
    let dhondt_seats = total_seats - quota_seats;
    debug!(population, quota_seats, dhondt_seats, quota_party = %quota_party, "municipal: quota");

    let remainder = apportion_keys(votes.as_map(), dhondt_seats, rng.as_mut());

    // Every contestant with votes appears, even when no D'Hondt seats remain.
    let mut distribution: SeatMap<PartyName> =
        votes.positive().into_keys().map(|p| (p, 0)).collect();
    for (party, seats) in remainder.seats {
        distribution.insert(party, seats);
    }
    *distribution.entry(quota_party.clone()).or_insert(0) += quota_seats;

    let chart_data = chart_rows(votes, &distribution);
    MunicipalApportionment {
        distribution,
        quota_seats,
        dhondt_seats,
        quota_party: Some(quota_party),
        quota_party_votes,
        chart_data,
        quota_tie,
        last_seat_tie: remainder.last_seat_tie,
    }
}

/// Contestant with the highest total; `None` when nobody has votes.
/// Equal top totals go to the first name, or are drawn by lot.
fn pick_plurality(votes: &VoteTally, rng: Option<&mut TieRng>) -> Option<(PartyName, u64, bool)> {
    let mut ranked: Vec<(&PartyName, u64)> =
        votes.iter().filter(|(_, v)| **v > 0).map(|(k, v)| (k, *v)).collect();
    ranked.sort_by(|a, b| cmp_plurality(*a, *b));

    let &(first, top) = ranked.first()?;
    let tied: Vec<&PartyName> = ranked.iter().take_while(|(_, v)| *v == top).map(|(k, _)| *k).collect();
    let is_tie = tied.len() > 1;

    let winner = match rng {
        Some(rng) if is_tie => {
            let drawn = rng.draw(&tied, 1);
            trace!(tied = tied.len(), "municipal: quota winner drawn by lot");
            drawn.first().copied().unwrap_or(first)
        }
        _ => first,
    };
    Some((winner.clone(), top, is_tie))
}
