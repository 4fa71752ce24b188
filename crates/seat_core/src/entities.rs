//! crates/seat_core/src/entities.rs
//! Input entities: vote tallies, alliances, districts.
//!
//! Everything here is built fresh from caller data for a single call; nothing
//! is cached. Maps are `BTreeMap` so iteration is always in name order.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::{AllianceId, DistrictName, PartyName};

/// Seats per contestant key.
pub type SeatMap<K> = BTreeMap<K, u32>;

// ----------------------------- VoteTally -----------------------------

/// Contestant name → vote count.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct VoteTally(BTreeMap<PartyName, u64>);

impl VoteTally {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Accumulate votes for `party` (saturating).
    pub fn add(&mut self, party: PartyName, votes: u64) {
        let slot = self.0.entry(party).or_insert(0);
        *slot = slot.saturating_add(votes);
    }

    /// Sum another tally into this one.
    pub fn merge(&mut self, other: &VoteTally) {
        for (party, &votes) in other.iter() {
            self.add(party.clone(), votes);
        }
    }

    /// Votes for `party`; absent contestants have zero.
    #[inline]
    pub fn get(&self, party: &str) -> u64 {
        self.0.get(party).copied().unwrap_or(0)
    }

    #[inline]
    pub fn contains(&self, party: &str) -> bool {
        self.0.contains_key(party)
    }

    /// Total of all tallied votes (saturating).
    pub fn total(&self) -> u64 {
        self.0.values().fold(0u64, |acc, &v| acc.saturating_add(v))
    }

    /// Contestants with at least one vote, in name order.
    pub fn positive(&self) -> BTreeMap<PartyName, u64> {
        self.0
            .iter()
            .filter(|(_, v)| **v > 0)
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&PartyName, &u64)> {
        self.0.iter()
    }

    #[inline]
    pub fn as_map(&self) -> &BTreeMap<PartyName, u64> {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PartyName, u64)> for VoteTally {
    /// Repeated names accumulate.
    fn from_iter<I: IntoIterator<Item = (PartyName, u64)>>(iter: I) -> Self {
        let mut t = VoteTally::new();
        for (party, votes) in iter {
            t.add(party, votes);
        }
        t
    }
}

impl From<BTreeMap<PartyName, u64>> for VoteTally {
    fn from(m: BTreeMap<PartyName, u64>) -> Self {
        Self(m)
    }
}

impl<'a> IntoIterator for &'a VoteTally {
    type Item = (&'a PartyName, &'a u64);
    type IntoIter = alloc::collections::btree_map::Iter<'a, PartyName, u64>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ----------------------------- Alliances -----------------------------

/// A declared coalition of parties.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Alliance {
    pub id: AllianceId,
    pub name: String,
    pub members: BTreeSet<PartyName>,
}

impl Alliance {
    pub fn new(
        id: AllianceId,
        name: impl Into<String>,
        members: impl IntoIterator<Item = PartyName>,
    ) -> Self {
        Self { id, name: name.into(), members: members.into_iter().collect() }
    }

    #[inline]
    pub fn contains(&self, party: &str) -> bool {
        self.members.contains(party)
    }
}

/// Validated alliance collection: unique ids, non-empty and pairwise
/// disjoint member sets. Kept sorted by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Alliance>", into = "Vec<Alliance>"))]
pub struct AllianceSet(Vec<Alliance>);

impl AllianceSet {
    pub fn new(mut alliances: Vec<Alliance>) -> Result<Self, CoreError> {
        alliances.sort_by(|a, b| a.id.cmp(&b.id));

        let mut owner: BTreeMap<&PartyName, &AllianceId> = BTreeMap::new();
        for (i, a) in alliances.iter().enumerate() {
            if i > 0 && alliances[i - 1].id == a.id {
                return Err(CoreError::DuplicateAllianceId(a.id.to_string()));
            }
            if a.members.is_empty() {
                return Err(CoreError::EmptyAlliance(a.id.to_string()));
            }
            for m in &a.members {
                if let Some(prev) = owner.insert(m, &a.id) {
                    return Err(CoreError::OverlappingAlliances {
                        party: m.to_string(),
                        first: prev.to_string(),
                        second: a.id.to_string(),
                    });
                }
            }
        }
        Ok(Self(alliances))
    }

    /// No alliances: every party stands alone.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Alliance> {
        self.0.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Alliance] {
        &self.0
    }

    pub fn get(&self, id: &str) -> Option<&Alliance> {
        self.0.iter().find(|a| a.id.as_str() == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Alliance>> for AllianceSet {
    type Error = CoreError;
    fn try_from(v: Vec<Alliance>) -> Result<Self, Self::Error> {
        AllianceSet::new(v)
    }
}

impl From<AllianceSet> for Vec<Alliance> {
    fn from(s: AllianceSet) -> Self {
        s.0
    }
}

impl<'a> IntoIterator for &'a AllianceSet {
    type Item = &'a Alliance;
    type IntoIter = core::slice::Iter<'a, Alliance>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Where a party stands with respect to the declared alliances.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Affiliation {
    Independent,
    Member(AllianceId),
}

impl Affiliation {
    pub fn alliance(&self) -> Option<&AllianceId> {
        match self {
            Affiliation::Independent => None,
            Affiliation::Member(id) => Some(id),
        }
    }
}

/// First-stage contestant: a whole alliance or a party standing alone.
/// Alliances order before parties.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Bloc {
    Alliance(AllianceId),
    Party(PartyName),
}

// ----------------------------- Districts -----------------------------

/// One tally record attributed to a district (e.g. one precinct).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistrictRecord {
    pub district: DistrictName,
    pub votes: VoteTally,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn p(s: &str) -> PartyName {
        s.parse().unwrap()
    }
    fn a(id: &str, members: &[&str]) -> Alliance {
        Alliance::new(id.parse().unwrap(), id, members.iter().map(|m| p(m)))
    }

    #[test]
    fn tally_accumulates_and_totals() {
        let t: VoteTally = vec![(p("A"), 10), (p("B"), 0), (p("A"), 5)].into_iter().collect();
        assert_eq!(t.get("A"), 15);
        assert_eq!(t.get("Z"), 0);
        assert_eq!(t.total(), 15);
        assert_eq!(t.positive().len(), 1);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn tally_total_saturates() {
        let t: VoteTally = vec![(p("A"), u64::MAX), (p("B"), 7)].into_iter().collect();
        assert_eq!(t.total(), u64::MAX);
    }

    #[test]
    fn alliance_set_sorted_and_validated() {
        let s = AllianceSet::new(vec![a("Z", &["P3"]), a("M", &["P1", "P2"])]).unwrap();
        let ids: Vec<&str> = s.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, ["M", "Z"]);
        assert!(s.get("M").unwrap().contains("P2"));
    }

    #[test]
    fn alliance_set_rejects_overlap_duplicates_and_empty() {
        assert!(matches!(
            AllianceSet::new(vec![a("X", &["P1"]), a("Y", &["P1", "P2"])]),
            Err(CoreError::OverlappingAlliances { .. })
        ));
        assert_eq!(
            AllianceSet::new(vec![a("X", &["P1"]), a("X", &["P2"])]),
            Err(CoreError::DuplicateAllianceId("X".into()))
        );
        assert_eq!(
            AllianceSet::new(vec![a("X", &[])]),
            Err(CoreError::EmptyAlliance("X".into()))
        );
    }

    #[test]
    fn blocs_order_alliances_first() {
        let mut v = vec![Bloc::Party(p("A")), Bloc::Alliance("Z".parse().unwrap())];
        v.sort();
        assert!(matches!(v[0], Bloc::Alliance(_)));
    }
}
