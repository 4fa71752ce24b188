//! crates/seat_io/src/lib.rs
//! I/O for the seat engine: contest files in, canonical JSON and digests out.
//!
//! - One error type (`IoError`) with `From` conversions used across modules.
//! - Everything that touches the filesystem lives here, never in the engine crates.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for seat_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON parse or shape errors, located by line and column when known.
    #[error("json error at {at}: {msg}")]
    Json { at: String, msg: String },

    /// Input larger than the loader accepts.
    #[error("input too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// Generic validation / invariants.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        let at = if e.line() == 0 {
            "/".to_string()
        } else {
            format!("line {} column {}", e.line(), e.column())
        };
        IoError::Json { at, msg: e.to_string() }
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;

/// Lightweight re-exports so downstream crates can `use seat_io::prelude::*;`.
pub mod prelude {
    pub use crate::canonical_json::{to_canonical_bytes, to_canonical_json_bytes, write_canonical_file};
    pub use crate::hasher::{result_id_from_canonical, sha256_canonical, sha256_hex};
    pub use crate::loader::{load_contest_file, parse_contest, Contest, ContestFile, LoadedContest};
    pub use crate::{IoError, IoResult};
}
