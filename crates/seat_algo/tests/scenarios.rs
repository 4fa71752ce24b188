//! Worked scenarios for every apportionment entry point.
//!
//! Each case pins a small, hand-checkable contest: the expected seats are
//! derived in the comments from the quotient ranking.

use std::collections::BTreeMap;

use seat_algo::{
    apportion, apportion_by_district, apportion_detailed, apportion_municipal,
    apportion_with_alliances, Alliance, AllianceSet, DistrictName, DistrictRecord, PartyName,
    SeatMap, ThresholdPct, TiePolicy, VoteTally,
};

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn tally(pairs: &[(&str, u64)]) -> VoteTally {
    pairs.iter().map(|(n, v)| (n.parse::<PartyName>().unwrap(), *v)).collect()
}

fn seats(m: &SeatMap<PartyName>, name: &str) -> u32 {
    m.get(name).copied().unwrap_or(0)
}

fn district(name: &str) -> DistrictName {
    name.parse().unwrap()
}

// -----------------------------------------------------------------------------
// Scenario A: classic D'Hondt
// -----------------------------------------------------------------------------

#[test]
fn scenario_a_classic_dhondt() {
    let votes = tally(&[("A", 100_000), ("B", 80_000), ("C", 30_000)]);
    let r = apportion(&votes, 10);
    assert_eq!(seats(&r, "A"), 5);
    assert_eq!(seats(&r, "B"), 4);
    assert_eq!(seats(&r, "C"), 1);
    assert_eq!(r.values().sum::<u32>(), 10);

    // The detailed reporter agrees and marks exactly ten winning cells.
    let d = apportion_detailed(&votes, 10, TiePolicy::default());
    assert_eq!(d.distribution, r);
    let won: usize = d.quotient_table.values().flatten().filter(|c| c.won).count();
    assert_eq!(won, 10);
}

// -----------------------------------------------------------------------------
// Scenario B: zero seats
// -----------------------------------------------------------------------------

#[test]
fn scenario_b_zero_seats_is_empty() {
    let votes = tally(&[("A", 600_000), ("B", 400_000)]);
    assert!(apportion(&votes, 0).is_empty());
}

// -----------------------------------------------------------------------------
// Scenario C: municipal quota brackets
// -----------------------------------------------------------------------------

#[test]
fn scenario_c_quota_brackets_capped_by_seats() {
    let votes = tally(&[("Lead", 900), ("Other", 400)]);
    for (population, expected) in [(5_000u64, 1u32), (50_000, 2), (200_000, 3)] {
        let r = apportion_municipal(&votes, 9, population, TiePolicy::default());
        assert_eq!(r.quota_seats, expected, "population {population}");
        assert_eq!(r.dhondt_seats, 9 - expected);
        assert_eq!(r.distribution.values().sum::<u32>(), 9);
        assert!(seats(&r.distribution, "Lead") >= r.quota_seats);
    }

    // Capped at the contest's seat count.
    let r = apportion_municipal(&votes, 2, 200_000, TiePolicy::default());
    assert_eq!(r.quota_seats, 2);
    assert_eq!(r.dhondt_seats, 0);
}

// -----------------------------------------------------------------------------
// Scenario D: districts summed
// -----------------------------------------------------------------------------

#[test]
fn scenario_d_districts_summed_to_province() {
    let records = vec![
        DistrictRecord { district: district("North"), votes: tally(&[("A", 5_000), ("B", 2_000)]) },
        DistrictRecord { district: district("South"), votes: tally(&[("B", 4_000), ("C", 3_500)]) },
    ];
    let district_seats: BTreeMap<DistrictName, u32> =
        [(district("North"), 3), (district("South"), 2)].into_iter().collect();

    let r = apportion_by_district(&records, &district_seats, TiePolicy::default());
    assert_eq!(r.total_seats, 5);
    assert_eq!(r.total_distribution.values().sum::<u32>(), 5);

    // North: 5000, 2500 (A), 2000 (B) → A 2, B 1. South: 4000, 3500 → B 1, C 1.
    assert_eq!(seats(&r.total_distribution, "A"), 2);
    assert_eq!(seats(&r.total_distribution, "B"), 2);
    assert_eq!(seats(&r.total_distribution, "C"), 1);
    for result in r.per_district.values() {
        assert_eq!(result.distribution.values().sum::<u32>(), result.seats);
    }
}

// -----------------------------------------------------------------------------
// Scenario E: alliance split in Stage 2
// -----------------------------------------------------------------------------

#[test]
fn scenario_e_alliance_seats_split_among_members() {
    // Stage 1 over 4 seats: AL 600 → 600, 300, 200; S 300 → 300. AL wins 3.
    // Stage 2: P1 400 → 400, 200; P2 200 → 200. P1 2, P2 1.
    let votes = tally(&[("P1", 400), ("P2", 200), ("S", 300)]);
    let alliances = AllianceSet::new(vec![Alliance::new(
        "AL".parse().unwrap(),
        "Alliance",
        ["P1", "P2"].iter().map(|m| m.parse().unwrap()),
    )])
    .unwrap();

    let r = apportion_with_alliances(
        &votes,
        4,
        &alliances,
        ThresholdPct::DEFAULT,
        TiePolicy::default(),
    );
    assert_eq!(r.alliance_seats.get("AL"), Some(&3));
    assert_eq!(seats(&r.distribution, "P1"), 2);
    assert_eq!(seats(&r.distribution, "P2"), 1);
    assert_eq!(seats(&r.distribution, "S"), 1);
    assert_eq!(r.distribution.values().sum::<u32>(), 4);
}
