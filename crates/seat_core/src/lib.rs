//! seat_core: Core types, domains, ordering helpers, and seeded lot RNG.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`seat_algo`, `seat_io`, `seat_pipeline`, `seat_report`, `seat_cli`).
//!
//! - Names: `PartyName`, `AllianceId`, `DistrictName`; output id `ResultId` (`RES:`)
//! - Entities: `VoteTally`, `Alliance`/`AllianceSet`, `DistrictRecord`
//! - Domains: `ThresholdPct` (exact, basis points), `TiePolicy`
//! - Exact D'Hondt quotient ordering (no floats in comparisons)
//! - Seedable RNG (ChaCha20) for **drawing lots on ties only**
//!
//! Serialization derives are gated behind the `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod errors {
    use alloc::string::String;
    use core::fmt;

    /// Domain errors raised when constructing core values.
    ///
    /// Apportionment itself never fails; these only guard the inputs.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidName,
        InvalidId,
        DomainOutOfRange(&'static str),
        EmptyAlliance(String),
        DuplicateAllianceId(String),
        OverlappingAlliances {
            party: String,
            first: String,
            second: String,
        },
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidName => write!(f, "invalid name"),
                CoreError::InvalidId => write!(f, "invalid id"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
                CoreError::EmptyAlliance(id) => write!(f, "alliance {id} has no members"),
                CoreError::DuplicateAllianceId(id) => write!(f, "duplicate alliance id: {id}"),
                CoreError::OverlappingAlliances { party, first, second } => {
                    write!(f, "party {party} is a member of both {first} and {second}")
                }
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod determinism;
pub mod entities;
pub mod ids;
pub mod rng;
pub mod variables;

pub use errors::CoreError;
pub use entities::{
    Affiliation, Alliance, AllianceSet, Bloc, DistrictRecord, SeatMap, VoteTally,
};
pub use ids::{AllianceId, DistrictName, PartyName, ResultId};
pub use variables::{ThresholdPct, TiePolicy};
