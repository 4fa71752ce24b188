//! Loader: read one local contest file (JSON), check shape and domains, and
//! return a typed `LoadedContest` with the digest of its raw bytes. No network I/O.
//!
//! Wire shape:
//! ```json
//! { "title": "City council 2024",
//!   "tie_policy": { "kind": "lots", "seed": 42 },
//!   "contest": { "method": "municipal", "seats": 11, "population": 48000,
//!                "votes": { "A": 5100, "B": 3050 } } }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use seat_core::{AllianceSet, DistrictName, DistrictRecord, ThresholdPct, TiePolicy, VoteTally};
use serde::{Deserialize, Serialize};

use crate::{hasher, IoError, IoResult};

/// Files above this size are rejected before parsing.
pub const MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

// ----------------------------- Wire-facing types -----------------------------

/// Top-level contest document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContestFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub tie_policy: TiePolicy,
    pub contest: Contest,
}

/// One apportionment problem, tagged by `method`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Contest {
    /// Plain D'Hondt; `detailed` adds the quotient table.
    Dhondt {
        seats: u32,
        votes: VoteTally,
        #[serde(default)]
        detailed: bool,
    },
    /// Quota seats for the plurality winner, D'Hondt for the rest.
    Municipal { seats: u32, population: u64, votes: VoteTally },
    /// Independent D'Hondt per district, summed.
    District {
        districts: BTreeMap<DistrictName, u32>,
        records: Vec<DistrictRecord>,
    },
    /// Threshold + two-stage alliance apportionment.
    Alliances {
        seats: u32,
        votes: VoteTally,
        #[serde(default)]
        alliances: AllianceSet,
        #[serde(default)]
        threshold_pct: ThresholdPct,
        #[serde(default)]
        detailed: bool,
    },
}

impl Contest {
    /// Wire name of the method (matches the `method` tag).
    pub fn method(&self) -> &'static str {
        match self {
            Contest::Dhondt { .. } => "dhondt",
            Contest::Municipal { .. } => "municipal",
            Contest::District { .. } => "district",
            Contest::Alliances { .. } => "alliances",
        }
    }
}

/// Parsed contest plus the SHA-256 of the bytes it came from.
#[derive(Debug, Clone)]
pub struct LoadedContest {
    pub file: ContestFile,
    pub input_sha256: String,
}

// ----------------------------- Loading -----------------------------

/// Read, size-check, parse, and digest a contest file.
pub fn load_contest_file(path: &Path) -> IoResult<LoadedContest> {
    let bytes = read_with_limit(path, MAX_INPUT_BYTES)?;
    let file = parse_contest_bytes(&bytes)?;
    tracing::debug!(path = %path.display(), method = file.contest.method(), "contest loaded");
    Ok(LoadedContest { file, input_sha256: hasher::sha256_hex(&bytes) })
}

/// Parse a contest document from a string.
pub fn parse_contest(text: &str) -> IoResult<ContestFile> {
    parse_contest_bytes(text.as_bytes())
}

fn parse_contest_bytes(bytes: &[u8]) -> IoResult<ContestFile> {
    let text = std::str::from_utf8(bytes).map_err(|e| IoError::Invalid(format!("not UTF-8: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Ok(serde_json::from_str(text)?)
}

fn read_with_limit(path: &Path, limit: u64) -> IoResult<Vec<u8>> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let size = f.metadata()?.len();
    if size > limit {
        return Err(IoError::TooLarge { size, limit });
    }
    let mut buf = Vec::with_capacity(size as usize);
    f.take(limit + 1).read_to_end(&mut buf)?;
    if buf.len() as u64 > limit {
        return Err(IoError::TooLarge { size: buf.len() as u64, limit });
    }
    Ok(buf)
}
