//! Two-stage apportionment with an electoral threshold and alliances.
//!
//! 1. Each alliance's member votes are pooled. An alliance qualifies when its
//!    pooled total reaches the threshold share of all valid votes; a party outside
//!    every alliance qualifies under the same rule on its own votes. Members of a
//!    disqualified alliance are out with it.
//! 2. Stage 1 apportions all seats over `{qualified alliances, qualified solo parties}`.
//! 3. Stage 2 apportions each alliance's Stage-1 seats among its own members by
//!    their raw votes.
//!
//! The result lists every party that stayed in the contest, including members
//! of an alliance that won nothing. Excluded parties are not in the distribution;
//! the audit log names them.

use std::collections::BTreeMap;

use seat_core::{
    rng::tie_rng_from_seed, Affiliation, AllianceId, AllianceSet, Bloc, PartyName, SeatMap,
    ThresholdPct, TiePolicy, VoteTally,
};
use tracing::{debug, trace};

use crate::allocation::dhondt::apportion_keys;
use crate::chart::{chart_rows, cmp_rows, ChartRow};
use crate::threshold::{affiliation, alliance_votes, clears_threshold};

/// One Stage-1 contestant with its pooled votes and seats won.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StageOneEntry {
    pub bloc: Bloc,
    pub votes: u64,
    pub seats: u32,
}

/// Diagnostic trail of one call. Built once, never mutated by callers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AuditLog {
    pub total_votes: u64,
    pub threshold: ThresholdPct,
    /// Smallest vote count that clears the threshold.
    pub threshold_votes: u64,
    pub alliance_votes: BTreeMap<AllianceId, u64>,
    pub qualified_alliances: Vec<AllianceId>,
    /// Solo parties that cleared the threshold on their own.
    pub qualified_parties: Vec<PartyName>,
    pub excluded_alliances: Vec<AllianceId>,
    /// Sub-threshold solo parties and members of disqualified alliances.
    pub excluded_parties: Vec<PartyName>,
    pub first_stage: Vec<StageOneEntry>,
    pub final_distribution: SeatMap<PartyName>,
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AllianceApportionment {
    pub distribution: SeatMap<PartyName>,
    /// Stage-1 seats of every qualified alliance (zero included).
    pub alliance_seats: BTreeMap<AllianceId, u32>,
    pub audit_log: AuditLog,
    pub chart_data: Vec<ChartRow>,
    /// Set when any stage settled its last seat by the tie rule.
    pub last_seat_tie: bool,
}

/// Per-party row of the detailed variant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PartyDetail {
    pub party: PartyName,
    pub votes: u64,
    pub seats: u32,
    pub alliance: Option<AllianceId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AllianceApportionmentDetailed {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub summary: AllianceApportionment,
    /// Every party with votes, excluded ones on zero seats; chart order.
    pub parties: Vec<PartyDetail>,
}

pub fn apportion_with_alliances(
    votes: &VoteTally,
    total_seats: u32,
    alliances: &AllianceSet,
    threshold: ThresholdPct,
    tie: TiePolicy,
) -> AllianceApportionment {
    let total_votes = votes.total();
    let mut audit = AuditLog {
        total_votes,
        threshold,
        threshold_votes: threshold.min_votes(total_votes),
        ..AuditLog::default()
    };
    if total_votes == 0 {
        debug!("alliances: no valid votes");
        audit.note = Some("no valid votes; nothing to allocate".to_string());
        return AllianceApportionment {
            distribution: SeatMap::new(),
            alliance_seats: BTreeMap::new(),
            audit_log: audit,
            chart_data: Vec::new(),
            last_seat_tie: false,
        };
    }

    // Threshold filter into the Stage-1 tally.
    let mut stage_one: BTreeMap<Bloc, u64> = BTreeMap::new();
    for alliance in alliances {
        let pooled = alliance_votes(alliance, votes);
        audit.alliance_votes.insert(alliance.id.clone(), pooled);
        if pooled > 0 && clears_threshold(pooled, total_votes, threshold) {
            audit.qualified_alliances.push(alliance.id.clone());
            stage_one.insert(Bloc::Alliance(alliance.id.clone()), pooled);
        } else {
            debug!(alliance = %alliance.id, votes = pooled, "alliances: alliance below threshold");
            audit.excluded_alliances.push(alliance.id.clone());
            audit.excluded_parties.extend(
                alliance.members.iter().filter(|m| votes.get(m.as_str()) > 0).cloned(),
            );
        }
    }
    for (party, &v) in votes.iter().filter(|(_, v)| **v > 0) {
        if affiliation(party.as_str(), alliances) != Affiliation::Independent {
            continue;
        }
        if clears_threshold(v, total_votes, threshold) {
            audit.qualified_parties.push(party.clone());
            stage_one.insert(Bloc::Party(party.clone()), v);
        } else {
            debug!(party = %party, votes = v, "alliances: party below threshold");
            audit.excluded_parties.push(party.clone());
        }
    }
    audit.excluded_parties.sort();

    debug!(
        seats = total_seats,
        blocs = stage_one.len(),
        total_votes,
        threshold_votes = audit.threshold_votes,
        "alliances: stage one"
    );
    let mut rng = tie.seed().map(tie_rng_from_seed);
    let first = apportion_keys(&stage_one, total_seats, rng.as_mut());
    let mut last_seat_tie = first.last_seat_tie;

    audit.first_stage = stage_one
        .iter()
        .map(|(bloc, &v)| StageOneEntry {
            bloc: bloc.clone(),
            votes: v,
            seats: first.seats.get(bloc).copied().unwrap_or(0),
        })
        .collect();
    if first.seats.is_empty() {
        let note = if total_seats == 0 {
            "no seats to allocate"
        } else {
            "no contestant cleared the threshold"
        };
        debug!(note, "alliances: nothing allocated");
        audit.note = Some(note.to_string());
        return AllianceApportionment {
            distribution: SeatMap::new(),
            alliance_seats: BTreeMap::new(),
            audit_log: audit,
            chart_data: Vec::new(),
            last_seat_tie: false,
        };
    }

    let mut distribution = SeatMap::new();
    let mut alliance_seats = BTreeMap::new();
    for entry in &audit.first_stage {
        match &entry.bloc {
            Bloc::Party(party) => {
                distribution.insert(party.clone(), entry.seats);
            }
            Bloc::Alliance(id) => {
                alliance_seats.insert(id.clone(), entry.seats);
                let Some(alliance) = alliances.get(id.as_str()) else {
                    continue;
                };
                let members: BTreeMap<PartyName, u64> = alliance
                    .members
                    .iter()
                    .map(|m| (m.clone(), votes.get(m.as_str())))
                    .filter(|(_, v)| *v > 0)
                    .collect();

                if entry.seats == 0 {
                    distribution.extend(members.into_keys().map(|m| (m, 0)));
                    continue;
                }
                let second = apportion_keys(&members, entry.seats, rng.as_mut());
                trace!(alliance = %id, seats = entry.seats, members = members.len(), "alliances: stage two");
                debug_assert_eq!(second.total(), entry.seats);
                last_seat_tie |= second.last_seat_tie;
                distribution.extend(second.seats);
            }
        }
    }

    audit.final_distribution = distribution.clone();
    let chart_data = chart_rows(votes, &distribution);
    AllianceApportionment { distribution, alliance_seats, audit_log: audit, chart_data, last_seat_tie }
}

/// As [`apportion_with_alliances`], plus one row per party with its owning alliance.
pub fn apportion_with_alliances_detailed(
    votes: &VoteTally,
    total_seats: u32,
    alliances: &AllianceSet,
    threshold: ThresholdPct,
    tie: TiePolicy,
) -> AllianceApportionmentDetailed {
    let summary = apportion_with_alliances(votes, total_seats, alliances, threshold, tie);

    let mut rows: Vec<(ChartRow, Option<AllianceId>)> = votes
        .iter()
        .filter(|(_, v)| **v > 0)
        .map(|(party, &v)| {
            let row = ChartRow {
                name: party.clone(),
                votes: v,
                seats: summary.distribution.get(party).copied().unwrap_or(0),
            };
            (row, affiliation(party.as_str(), alliances).alliance().cloned())
        })
        .collect();
    rows.sort_by(|a, b| cmp_rows(&a.0, &b.0));

    let parties = rows
        .into_iter()
        .map(|(row, alliance)| PartyDetail {
            party: row.name,
            votes: row.votes,
            seats: row.seats,
            alliance,
        })
        .collect();
    AllianceApportionmentDetailed { summary, parties }
}
