//! seat_report/src/lib.rs: Pure offline report model + renderers (JSON/HTML).
//!
//! Determinism rules:
//! - No I/O here. Callers pass a result document already in memory.
//! - Percent strings use one-decimal formatting computed in integers, never floats.
//! - Stable section order and field names; rows keep the chart order
//!   (seats ↓, votes ↓, name ↑).

#![deny(unsafe_code)]

use std::collections::BTreeMap;

use seat_algo::{
    cmp_rows, seat_order, AllianceApportionment, Bloc, ChartRow, DistrictApportionment,
    MunicipalApportionment, PartyName, ThresholdPct,
};
use seat_core::{ResultId, TiePolicy};
use seat_pipeline::{Outcome, ResultDoc};
use serde::Serialize;
use thiserror::Error;

pub mod render_html;
pub mod render_json;

pub use render_html::render_html;
pub use render_json::render_json;

// ===== Errors =====

#[derive(Debug, Error)]
pub enum ReportError {
    /// The document disagrees with itself (row seats vs. distribution).
    #[error("inconsistent result: {0}")]
    Inconsistent(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

// ===== Model =====

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportModel {
    pub cover: SectionCover,
    pub totals: SectionTotals,
    pub rows: Vec<ContestantRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<SectionQuota>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<SectionThreshold>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub districts: Option<SectionDistricts>,
    pub warnings: Vec<String>,
    pub integrity: SectionIntegrity,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionCover {
    pub title: String,
    pub method: String,
    pub method_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionTotals {
    pub votes: u64,
    pub seats: u32,
    pub contestants: usize,
    pub last_seat_tie: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContestantRow {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alliance: Option<String>,
    pub votes: u64,
    pub vote_share: String,
    pub seats: u32,
    pub seat_share: String,
}

/// Municipal quota seats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionQuota {
    pub party: Option<String>,
    pub party_votes: u64,
    pub quota_seats: u32,
    pub dhondt_seats: u32,
    pub tie: bool,
}

/// National threshold and first-stage blocs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionThreshold {
    pub threshold: String,
    pub min_votes: u64,
    pub blocs: Vec<BlocRow>,
    pub excluded_parties: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlocRow {
    pub name: String,
    pub kind: &'static str, // "alliance" | "party"
    pub votes: u64,
    pub vote_share: String,
    pub qualified: bool,
    pub seats: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionDistricts {
    pub rows: Vec<DistrictRow>,
    pub skipped: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistrictRow {
    pub name: String,
    pub seats: u32,
    pub votes: u64,
    /// "A 2, B 1" in seat order; contestants with no seat are omitted.
    pub winners: String,
    pub last_seat_tie: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionIntegrity {
    pub result_id: ResultId,
    pub engine_name: String,
    pub engine_version: String,
    pub tie_policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tie_seed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_sha256: Option<String>,
}

// ===== API =====

/// Build the report model from a result document (pure, offline).
pub fn build_model(doc: &ResultDoc) -> Result<ReportModel, ReportError> {
    let outcome = &doc.outcome;

    let (rows, total_votes) = contestant_rows(outcome);
    let seats = outcome.distribution().values().fold(0u32, |acc, &s| acc.saturating_add(s));
    let row_seats = rows.iter().fold(0u32, |acc, (r, _)| acc.saturating_add(r.seats));
    if row_seats != seats {
        return Err(ReportError::Inconsistent(format!(
            "rows carry {row_seats} seats, distribution {seats}"
        )));
    }

    let rows: Vec<ContestantRow> = rows
        .into_iter()
        .map(|(row, alliance)| ContestantRow {
            name: row.name.to_string(),
            alliance,
            votes: row.votes,
            vote_share: pct_one_decimal(row.votes, total_votes),
            seats: row.seats,
            seat_share: pct_one_decimal(u64::from(row.seats), u64::from(seats)),
        })
        .collect();

    let quota = match outcome {
        Outcome::Municipal(m) => Some(quota_section(m)),
        _ => None,
    };
    let threshold = match outcome {
        Outcome::Alliances(a) => Some(threshold_section(a)),
        Outcome::AlliancesDetailed(d) => Some(threshold_section(&d.summary)),
        _ => None,
    };
    let districts = match outcome {
        Outcome::District(d) => Some(district_section(d)),
        _ => None,
    };

    let (tie_policy, tie_seed) = match doc.tie_policy {
        TiePolicy::DeterministicOrder => ("deterministic_order".to_string(), None),
        TiePolicy::Lots { seed } => ("lots".to_string(), Some(format!("{seed:#018x}"))),
    };

    Ok(ReportModel {
        cover: SectionCover {
            title: doc.title.clone().unwrap_or_else(|| "Seat apportionment".to_string()),
            method: doc.method.clone(),
            method_label: method_label(outcome).to_string(),
        },
        totals: SectionTotals {
            votes: total_votes,
            seats,
            contestants: rows.len(),
            last_seat_tie: outcome.last_seat_tie(),
        },
        rows,
        quota,
        threshold,
        districts,
        warnings: doc
            .warnings
            .iter()
            .map(|w| format!("{} at {}: {}", w.code, w.at, w.message))
            .collect(),
        integrity: SectionIntegrity {
            result_id: doc.id.clone(),
            engine_name: doc.engine.name.clone(),
            engine_version: doc.engine.version.clone(),
            tie_policy,
            tie_seed,
            input_sha256: doc.input_sha256.clone(),
        },
    })
}

/// `num / den` as a one-decimal percent, rounded half up, integers only.
/// A zero denominator yields `"0.0%"`.
pub fn pct_one_decimal(num: u64, den: u64) -> String {
    if den == 0 {
        return "0.0%".to_string();
    }
    let den = u128::from(den);
    let tenths = (u128::from(num) * 1000 + den / 2) / den;
    format!("{}.{}%", tenths / 10, tenths % 10)
}

/// Basis points as a two-decimal percent ("7.00%").
fn threshold_label(t: ThresholdPct) -> String {
    let bp = t.basis_points();
    format!("{}.{:02}%", bp / 100, bp % 100)
}

// ===== Sections =====

fn method_label(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Dhondt(_) => "D'Hondt",
        Outcome::DhondtDetailed(_) => "D'Hondt (quotient table)",
        Outcome::Municipal(_) => "Municipal quota + D'Hondt",
        Outcome::District(_) => "D'Hondt by district",
        Outcome::Alliances(_) | Outcome::AlliancesDetailed(_) => "Two-stage D'Hondt with alliances",
    }
}

type RawRow = (ChartRow, Option<String>);

/// Rows with their alliance label, plus the vote denominator.
fn contestant_rows(outcome: &Outcome) -> (Vec<RawRow>, u64) {
    match outcome {
        Outcome::Dhondt(o) => (plain(&o.chart_data), sum_votes(&o.chart_data)),
        Outcome::DhondtDetailed(o) => (plain(&o.chart_data), sum_votes(&o.chart_data)),
        Outcome::Municipal(o) => (plain(&o.chart_data), sum_votes(&o.chart_data)),
        Outcome::Alliances(o) => (plain(&o.chart_data), o.audit_log.total_votes),
        Outcome::AlliancesDetailed(o) => {
            let rows = o
                .parties
                .iter()
                .map(|p| {
                    let row = ChartRow { name: p.party.clone(), votes: p.votes, seats: p.seats };
                    (row, p.alliance.as_ref().map(|a| a.to_string()))
                })
                .collect();
            (rows, o.summary.audit_log.total_votes)
        }
        Outcome::District(d) => {
            let mut votes: BTreeMap<&PartyName, u64> = BTreeMap::new();
            for r in d.per_district.values() {
                for (party, &v) in r.votes.iter() {
                    let slot = votes.entry(party).or_insert(0);
                    *slot = slot.saturating_add(v);
                }
            }
            let mut rows: Vec<ChartRow> = d
                .total_distribution
                .iter()
                .map(|(name, &seats)| ChartRow {
                    name: name.clone(),
                    votes: votes.get(name).copied().unwrap_or(0),
                    seats,
                })
                .collect();
            rows.sort_by(cmp_rows);
            let total = votes.values().fold(0u64, |acc, &v| acc.saturating_add(v));
            (plain(&rows), total)
        }
    }
}

fn plain(chart: &[ChartRow]) -> Vec<RawRow> {
    chart.iter().map(|r| (r.clone(), None)).collect()
}

/// Saturating, like `VoteTally::total`.
fn sum_votes(rows: &[ChartRow]) -> u64 {
    rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.votes))
}

fn quota_section(m: &MunicipalApportionment) -> SectionQuota {
    SectionQuota {
        party: m.quota_party.as_ref().map(|p| p.to_string()),
        party_votes: m.quota_party_votes,
        quota_seats: m.quota_seats,
        dhondt_seats: m.dhondt_seats,
        tie: m.quota_tie,
    }
}

fn threshold_section(a: &AllianceApportionment) -> SectionThreshold {
    let log = &a.audit_log;
    let mut blocs: Vec<BlocRow> = log
        .first_stage
        .iter()
        .map(|e| {
            let (name, kind) = match &e.bloc {
                Bloc::Alliance(id) => (id.to_string(), "alliance"),
                Bloc::Party(p) => (p.to_string(), "party"),
            };
            BlocRow {
                name,
                kind,
                votes: e.votes,
                vote_share: pct_one_decimal(e.votes, log.total_votes),
                qualified: true,
                seats: e.seats,
            }
        })
        .collect();
    for id in &log.excluded_alliances {
        let votes = log.alliance_votes.get(id).copied().unwrap_or(0);
        blocs.push(BlocRow {
            name: id.to_string(),
            kind: "alliance",
            votes,
            vote_share: pct_one_decimal(votes, log.total_votes),
            qualified: false,
            seats: 0,
        });
    }
    blocs.sort_by(|x, y| {
        seat_order((x.seats, x.votes, x.name.as_str()), (y.seats, y.votes, y.name.as_str()))
    });

    SectionThreshold {
        threshold: threshold_label(log.threshold),
        min_votes: log.threshold_votes,
        blocs,
        excluded_parties: log.excluded_parties.iter().map(|p| p.to_string()).collect(),
        note: log.note.clone(),
    }
}

fn district_section(d: &DistrictApportionment) -> SectionDistricts {
    let rows = d
        .per_district
        .values()
        .map(|r| {
            let mut won: Vec<(&PartyName, u32)> =
                r.distribution.iter().filter(|(_, &s)| s > 0).map(|(p, &s)| (p, s)).collect();
            won.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            let winners = won
                .iter()
                .map(|(p, s)| format!("{p} {s}"))
                .collect::<Vec<_>>()
                .join(", ");
            DistrictRow {
                name: r.district.to_string(),
                seats: r.seats,
                votes: r.votes.total(),
                winners,
                last_seat_tie: r.last_seat_tie,
            }
        })
        .collect();
    SectionDistricts { rows, skipped: d.skipped.iter().map(|s| s.to_string()).collect() }
}
