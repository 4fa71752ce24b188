//! Per-district apportionment summed into a province-wide total.
//!
//! Records are grouped by district and their tallies merged; each district is
//! then solved on its own with its assigned seat count. Apportionment never
//! crosses a district boundary: votes are summed only within a district, and
//! only seats are summed across districts.

use std::collections::{BTreeMap, BTreeSet};

use seat_core::{
    rng::tie_rng_from_seed, DistrictName, DistrictRecord, PartyName, SeatMap, TiePolicy, VoteTally,
};
use tracing::debug;

use crate::allocation::dhondt::apportion_keys;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DistrictResult {
    pub district: DistrictName,
    pub seats: u32,
    /// Merged tally of every record attributed to the district.
    pub votes: VoteTally,
    pub distribution: SeatMap<PartyName>,
    pub last_seat_tie: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DistrictApportionment {
    pub per_district: BTreeMap<DistrictName, DistrictResult>,
    pub total_distribution: SeatMap<PartyName>,
    /// Sum of every district's assigned seats.
    pub total_seats: u32,
    /// Districts left out: no assigned seats, or nobody with votes.
    pub skipped: Vec<DistrictName>,
}

pub fn apportion_by_district(
    records: &[DistrictRecord],
    district_seats: &BTreeMap<DistrictName, u32>,
    tie: TiePolicy,
) -> DistrictApportionment {
    let mut tallies: BTreeMap<&DistrictName, VoteTally> = BTreeMap::new();
    for r in records {
        tallies.entry(&r.district).or_default().merge(&r.votes);
    }

    let names: BTreeSet<&DistrictName> = tallies.keys().copied().chain(district_seats.keys()).collect();
    let total_seats = district_seats.values().fold(0u32, |acc, &s| acc.saturating_add(s));
    debug!(districts = names.len(), records = records.len(), total_seats, "district: start");

    let mut rng = tie.seed().map(tie_rng_from_seed);
    let mut per_district = BTreeMap::new();
    let mut total_distribution = SeatMap::new();
    let mut skipped = Vec::new();

    for name in names {
        let seats = district_seats.get(name).copied().unwrap_or(0);
        let votes = tallies.remove(name).unwrap_or_default();
        if seats == 0 || votes.total() == 0 {
            debug!(district = %name, seats, "district: skipped");
            skipped.push(name.clone());
            continue;
        }

        let result = apportion_keys(votes.as_map(), seats, rng.as_mut());
        for (party, &s) in &result.seats {
            let slot = total_distribution.entry(party.clone()).or_insert(0u32);
            *slot = slot.saturating_add(s);
        }
        per_district.insert(
            name.clone(),
            DistrictResult {
                district: name.clone(),
                seats,
                votes,
                distribution: result.seats,
                last_seat_tie: result.last_seat_tie,
            },
        );
    }

    DistrictApportionment { per_district, total_distribution, total_seats, skipped }
}
