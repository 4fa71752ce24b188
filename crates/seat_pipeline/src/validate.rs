//! crates/seat_pipeline/src/validate.rs
//! Semantic checks on a parsed contest before any computation.
//!
//! Shape and domain errors (bad names, overlapping alliances, threshold range)
//! are already rejected by the loader. What remains here is either a hard
//! error (work bound exceeded) or a warning about input that is legal but will
//! allocate less than the caller probably expects. Issue order is stable.

use std::collections::BTreeSet;

use seat_algo::VoteTally;
use seat_io::loader::Contest;
use serde::Serialize;

/// Upper bound on `seats × contestants` quotients for a single apportionment.
pub const MAX_QUOTIENTS: u64 = 10_000_000;

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding. `at` is a JSON-pointer-like location in the contest file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub at: String,
}

/// Deterministic report: pass = (no Error).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }
}

/// Top-level entry point.
pub fn validate(contest: &Contest) -> ValidationReport {
    let mut issues = Vec::new();

    match contest {
        Contest::Dhondt { seats, votes, .. } | Contest::Municipal { seats, votes, .. } => {
            check_universe(&mut issues, "/contest", *seats, votes);
        }
        Contest::District { districts, records } => {
            let with_records: BTreeSet<&str> = records.iter().map(|r| r.district.as_str()).collect();
            for (i, r) in records.iter().enumerate() {
                if !districts.contains_key(r.district.as_str()) {
                    issues.push(warning(
                        "district.unassigned",
                        format!("records for district {} but no seat count assigned", r.district),
                        format!("/contest/records/{i}"),
                    ));
                }
            }
            for (name, &seats) in districts {
                let at = format!("/contest/districts/{name}");
                if seats == 0 {
                    issues.push(warning("district.zero_seats", format!("district {name} has no seats"), at));
                } else if !with_records.contains(name.as_str()) {
                    issues.push(warning("district.no_records", format!("district {name} has no records"), at));
                } else {
                    let mut merged = VoteTally::new();
                    for r in records.iter().filter(|r| r.district == *name) {
                        merged.merge(&r.votes);
                    }
                    check_universe(&mut issues, &at, seats, &merged);
                }
            }
        }
        Contest::Alliances { seats, votes, alliances, .. } => {
            check_universe(&mut issues, "/contest", *seats, votes);
            for a in alliances {
                for m in &a.members {
                    if !votes.contains(m.as_str()) {
                        issues.push(warning(
                            "alliance.member_absent",
                            format!("member {m} of alliance {} has no tally entry", a.id),
                            format!("/contest/alliances/{}", a.id),
                        ));
                    }
                }
            }
        }
    }

    issues.sort_by(|a, b| {
        (a.severity, a.code, &a.at, &a.message).cmp(&(b.severity, b.code, &b.at, &b.message))
    });
    ValidationReport { pass: !issues.iter().any(|i| i.severity == Severity::Error), issues }
}

// ------------------------------------------------------------------------------------------------
// Checks
// ------------------------------------------------------------------------------------------------

/// One apportionment universe: seats, votes, and the quotient bound.
fn check_universe(issues: &mut Vec<ValidationIssue>, at: &str, seats: u32, votes: &VoteTally) {
    if seats == 0 {
        issues.push(warning("seats.zero", "no seats to allocate".to_string(), format!("{at}/seats")));
    }
    if votes.total() == 0 {
        issues.push(warning("votes.empty", "no contestant has votes".to_string(), format!("{at}/votes")));
    }
    let quotients = u64::from(seats).saturating_mul(votes.len() as u64);
    if quotients > MAX_QUOTIENTS {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            code: "seats.too_many",
            message: format!("{seats} seats × {} contestants exceeds {MAX_QUOTIENTS} quotients", votes.len()),
            at: format!("{at}/seats"),
        });
    }
}

fn warning(code: &'static str, message: String, at: String) -> ValidationIssue {
    ValidationIssue { severity: Severity::Warning, code, message, at }
}
