//! Threshold and alliance helpers: small pure predicates/aggregators over an
//! explicit alliance collection (no lookup caches).

use seat_core::{Affiliation, Alliance, AllianceSet, ThresholdPct, VoteTally};

/// Does `votes` reach `threshold` percent of `total`? Inclusive, exact.
#[inline]
pub fn clears_threshold(votes: u64, total: u64, threshold: ThresholdPct) -> bool {
    threshold.admits(votes, total)
}

/// Sum of the alliance members' tallied votes (absent members count zero).
pub fn alliance_votes(alliance: &Alliance, votes: &VoteTally) -> u64 {
    alliance
        .members
        .iter()
        .fold(0u64, |acc, m| acc.saturating_add(votes.get(m.as_str())))
}

/// The alliance that declares `party` as a member, if any.
pub fn alliance_of<'a>(party: &str, alliances: &'a AllianceSet) -> Option<&'a Alliance> {
    alliances.iter().find(|a| a.contains(party))
}

pub fn affiliation(party: &str, alliances: &AllianceSet) -> Affiliation {
    match alliance_of(party, alliances) {
        Some(a) => Affiliation::Member(a.id.clone()),
        None => Affiliation::Independent,
    }
}
