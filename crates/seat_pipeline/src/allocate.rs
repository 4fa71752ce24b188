//! crates/seat_pipeline/src/allocate.rs
//! Dispatch one contest to its apportionment variant.
//! Pure: no I/O here; one tie policy flows into exactly one engine call.

use seat_algo::{
    apportion_by_district, apportion_detailed, apportion_municipal, apportion_with_alliances,
    apportion_with_alliances_detailed, apportion_with_policy, chart_rows, AllianceApportionment,
    AllianceApportionmentDetailed, ChartRow, DetailedApportionment, DistrictApportionment,
    MunicipalApportionment, PartyName, SeatMap, TiePolicy,
};
use seat_io::loader::Contest;
use serde::Serialize;
use tracing::info;

/// Plain D'Hondt outcome with its chart rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DhondtOutcome {
    pub distribution: SeatMap<PartyName>,
    pub chart_data: Vec<ChartRow>,
    pub last_seat_tie: bool,
}

/// Result of one contest, shaped by its method.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Dhondt(DhondtOutcome),
    DhondtDetailed(DetailedApportionment),
    Municipal(MunicipalApportionment),
    District(DistrictApportionment),
    Alliances(AllianceApportionment),
    AlliancesDetailed(AllianceApportionmentDetailed),
}

impl Outcome {
    /// Final seats per contestant (province-wide for districts).
    pub fn distribution(&self) -> &SeatMap<PartyName> {
        match self {
            Outcome::Dhondt(o) => &o.distribution,
            Outcome::DhondtDetailed(o) => &o.distribution,
            Outcome::Municipal(o) => &o.distribution,
            Outcome::District(o) => &o.total_distribution,
            Outcome::Alliances(o) => &o.distribution,
            Outcome::AlliancesDetailed(o) => &o.summary.distribution,
        }
    }

    /// Whether any last seat was settled by the tie rule.
    pub fn last_seat_tie(&self) -> bool {
        match self {
            Outcome::Dhondt(o) => o.last_seat_tie,
            Outcome::DhondtDetailed(o) => o.last_seat_tie,
            Outcome::Municipal(o) => o.last_seat_tie || o.quota_tie,
            Outcome::District(o) => o.per_district.values().any(|d| d.last_seat_tie),
            Outcome::Alliances(o) => o.last_seat_tie,
            Outcome::AlliancesDetailed(o) => o.summary.last_seat_tie,
        }
    }
}

/// Run the contest's method under `tie`.
pub fn allocate(contest: &Contest, tie: TiePolicy) -> Outcome {
    let outcome = match contest {
        Contest::Dhondt { seats, votes, detailed: false } => {
            let r = apportion_with_policy(votes, *seats, tie);
            Outcome::Dhondt(DhondtOutcome {
                chart_data: chart_rows(votes, &r.seats),
                distribution: r.seats,
                last_seat_tie: r.last_seat_tie,
            })
        }
        Contest::Dhondt { seats, votes, detailed: true } => {
            Outcome::DhondtDetailed(apportion_detailed(votes, *seats, tie))
        }
        Contest::Municipal { seats, population, votes } => {
            Outcome::Municipal(apportion_municipal(votes, *seats, *population, tie))
        }
        Contest::District { districts, records } => {
            Outcome::District(apportion_by_district(records, districts, tie))
        }
        Contest::Alliances { seats, votes, alliances, threshold_pct, detailed: false } => {
            Outcome::Alliances(apportion_with_alliances(votes, *seats, alliances, *threshold_pct, tie))
        }
        Contest::Alliances { seats, votes, alliances, threshold_pct, detailed: true } => {
            Outcome::AlliancesDetailed(apportion_with_alliances_detailed(
                votes,
                *seats,
                alliances,
                *threshold_pct,
                tie,
            ))
        }
    };

    info!(
        method = contest.method(),
        seats = outcome.distribution().values().fold(0u32, |acc, &s| acc.saturating_add(s)),
        contestants = outcome.distribution().len(),
        last_seat_tie = outcome.last_seat_tie(),
        "allocated"
    );
    outcome
}
