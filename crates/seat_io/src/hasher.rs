//! crates/seat_io/src/hasher.rs
//!
//! Deterministic hashing and ID builders.
//! - Canonical JSON hashing: sorted object keys, array order preserved.
//! - `RES:` ids derive from the canonical bytes of a result's outcome.
//! - Hex digests are lowercase.
//!
//! Use `sha256_canonical(..)` for values/structs and `sha256_hex(..)` for raw
//! bytes (the loader hashes the bytes it already read).

use seat_core::ResultId;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::{IoError, IoResult};

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(sha256_hex(&to_canonical_bytes(value)?))
}

/// `RES:<hex>` from the canonical bytes of `value`.
pub fn result_id_from_canonical<T: Serialize>(value: &T) -> IoResult<ResultId> {
    let hex = sha256_canonical(value)?;
    ResultId::from_digest_hex(&hex).map_err(|e| IoError::Invalid(e.to_string()))
}
