//! Property tests for the apportionment invariants.

use proptest::prelude::*;

use seat_algo::{
    apportion, apportion_municipal, apportion_with_alliances, apportion_with_policy,
    clears_threshold, Alliance, AllianceSet, PartyName, SeatMap, ThresholdPct, TiePolicy,
    VoteTally,
};

const NAMES: [&str; 6] = ["P0", "P1", "P2", "P3", "P4", "P5"];

fn party(i: usize) -> PartyName {
    NAMES[i].parse().unwrap()
}

fn seats_of(m: &SeatMap<PartyName>, name: &str) -> u32 {
    m.get(name).copied().unwrap_or(0)
}

prop_compose! {
    fn arb_tally()(votes in proptest::collection::vec(0u64..200_000, 1..=NAMES.len())) -> VoteTally {
        votes.into_iter().enumerate().map(|(i, v)| (party(i), v)).collect()
    }
}

prop_compose! {
    /// Tally over all six names with at least one vote somewhere.
    fn arb_full_tally()(votes in proptest::array::uniform6(0u64..50_000), bump in 0usize..6) -> VoteTally {
        let mut votes = votes;
        votes[bump] += 1;
        votes.into_iter().enumerate().map(|(i, v)| (party(i), v)).collect()
    }
}

fn arb_policy() -> impl Strategy<Value = TiePolicy> {
    prop_oneof![
        Just(TiePolicy::DeterministicOrder),
        any::<u64>().prop_map(|seed| TiePolicy::Lots { seed }),
    ]
}

/// P0+P1 and P2+P3 in alliances; P4 and P5 stand alone.
fn two_alliances() -> AllianceSet {
    AllianceSet::new(vec![
        Alliance::new("AL".parse().unwrap(), "Left", [party(0), party(1)]),
        Alliance::new("BL".parse().unwrap(), "Right", [party(2), party(3)]),
    ])
    .unwrap()
}

proptest! {
    #[test]
    fn seats_sum_to_total(votes in arb_tally(), seats in 1u32..60, tie in arb_policy()) {
        let r = apportion_with_policy(&votes, seats, tie);
        if votes.total() > 0 {
            prop_assert_eq!(r.total(), seats);
        } else {
            prop_assert!(r.seats.is_empty());
        }
    }

    #[test]
    fn raising_votes_never_costs_seats(
        votes in arb_tally(),
        seats in 1u32..40,
        pick in 0usize..6,
        extra in 1u64..100_000,
    ) {
        let idx = pick % votes.len();
        let name = party(idx);
        let before = apportion(&votes, seats);

        let mut raised = votes.clone();
        raised.add(name.clone(), extra);
        let after = apportion(&raised, seats);

        prop_assert!(seats_of(&after, name.as_str()) >= seats_of(&before, name.as_str()));
    }

    #[test]
    fn identical_inputs_identical_outputs(votes in arb_tally(), seats in 0u32..40, tie in arb_policy()) {
        let a = apportion_with_policy(&votes, seats, tie);
        let b = apportion_with_policy(&votes, seats, tie);
        prop_assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn municipal_bounds(
        votes in arb_full_tally(),
        seats in 0u32..30,
        population in 0u64..300_000,
        tie in arb_policy(),
    ) {
        let r = apportion_municipal(&votes, seats, population, tie);
        prop_assert!(r.quota_seats <= 3);
        prop_assert!(r.quota_seats <= seats);
        prop_assert_eq!(r.quota_seats + r.dhondt_seats, if seats == 0 { 0 } else { seats });
        prop_assert_eq!(r.distribution.values().sum::<u32>(), r.quota_seats + r.dhondt_seats);
        if let Some(winner) = &r.quota_party {
            prop_assert!(seats_of(&r.distribution, winner.as_str()) >= r.quota_seats);
            prop_assert_eq!(r.quota_party_votes, votes.iter().map(|(_, v)| *v).max().unwrap_or(0));
        }
    }

    #[test]
    fn alliance_members_share_exactly_their_stage_one_seats(
        votes in arb_full_tally(),
        seats in 1u32..40,
        bp in 0u32..=2_000,
        tie in arb_policy(),
    ) {
        let alliances = two_alliances();
        let threshold = ThresholdPct::from_basis_points(bp).unwrap();
        let r = apportion_with_alliances(&votes, seats, &alliances, threshold, tie);

        for alliance in &alliances {
            let Some(&won) = r.alliance_seats.get(&alliance.id) else { continue };
            let members: u32 = alliance.members.iter().map(|m| seats_of(&r.distribution, m.as_str())).sum();
            prop_assert_eq!(members, won);
        }
        if !r.distribution.is_empty() {
            prop_assert_eq!(r.distribution.values().sum::<u32>(), seats);
        }
    }

    #[test]
    fn solo_party_below_threshold_never_seated(
        votes in arb_full_tally(),
        seats in 1u32..40,
        bp in 0u32..=2_500,
    ) {
        let alliances = two_alliances();
        let threshold = ThresholdPct::from_basis_points(bp).unwrap();
        let r = apportion_with_alliances(&votes, seats, &alliances, threshold, TiePolicy::default());

        let total = votes.total();
        for solo in [party(4), party(5)] {
            if !clears_threshold(votes.get(solo.as_str()), total, threshold) {
                prop_assert_eq!(seats_of(&r.distribution, solo.as_str()), 0);
                prop_assert!(!r.distribution.contains_key(solo.as_str()));
            }
        }
    }
}
