// crates/seat_algo/src/lib.rs
//! Seat apportionment algorithms. Every entry point is a pure function of its
//! arguments: no I/O, no globals, nothing retained between calls. Independent
//! calls may run concurrently without coordination.
#![forbid(unsafe_code)]

// Core names and tallies (re-exported for callers that only link this crate)
pub use seat_core::{
    Affiliation, Alliance, AllianceId, AllianceSet, Bloc, DistrictName, DistrictRecord,
    PartyName, SeatMap, ThresholdPct, TiePolicy, VoteTally,
};

// ----------------------------- Allocation (public surface) ---------------------------

pub mod allocation {
    pub mod detailed;
    pub mod dhondt;

    pub use detailed::{apportion_detailed, DetailedApportionment, QuotientCell};
    pub use dhondt::{apportion, apportion_keys, apportion_with_policy, Apportionment};
}

pub use allocation::{
    apportion, apportion_detailed, apportion_keys, apportion_with_policy, Apportionment,
    DetailedApportionment, QuotientCell,
};

// ----------------------------- Variants & helpers ---------------------------------

pub mod alliances;
pub mod chart;
pub mod district;
pub mod municipal;
pub mod threshold;

// Tight, explicit re-exports (avoid wildcard export drift).
pub use alliances::{
    apportion_with_alliances, apportion_with_alliances_detailed, AllianceApportionment,
    AllianceApportionmentDetailed, AuditLog, PartyDetail, StageOneEntry,
};
pub use chart::{chart_rows, cmp_rows, seat_order, ChartRow};
pub use district::{apportion_by_district, DistrictApportionment, DistrictResult};
pub use municipal::{
    apportion_municipal, quota_seats_for_population, MunicipalApportionment,
};
pub use threshold::{affiliation, alliance_of, alliance_votes, clears_threshold};
