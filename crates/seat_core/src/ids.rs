//! crates/seat_core/src/ids.rs
//! Contestant, alliance, and district names plus the content-addressed result id.
//!
//! Names are free text (party names carry spaces and diacritics) but must be
//! non-empty, already trimmed, at most 128 characters, and free of control
//! characters. Ordering is plain lexicographic on the UTF-8 string, which is
//! also the deterministic tie order.

use alloc::string::{String, ToString};
use core::borrow::Borrow;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const NAME_MAX_CHARS: usize = 128;
const HEX64_LEN: usize = 64;
const RES_PREFIX: &str = "RES:";

/// Free-text name rule shared by every name newtype.
#[inline]
pub fn is_valid_name(s: &str) -> bool {
    if s.is_empty() || s.trim() != s {
        return false;
    }
    if s.chars().count() > NAME_MAX_CHARS {
        return false;
    }
    !s.chars().any(char::is_control)
}

/// Lowercase hex (length must be exactly 64).
#[inline]
pub fn is_valid_sha256(s: &str) -> bool {
    s.len() == HEX64_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

macro_rules! name_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if is_valid_name(s) { Ok(Self(s.to_string())) } else { Err(CoreError::InvalidName) }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = CoreError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;
            fn try_from(value: String) -> Result<Self, Self::Error> {
                if is_valid_name(&value) { Ok(Self(value)) } else { Err(CoreError::InvalidName) }
            }
        }

        impl From<$name> for String {
            #[inline]
            fn from(value: $name) -> String { value.0 }
        }

        impl Borrow<str> for $name {
            #[inline]
            fn borrow(&self) -> &str { &self.0 }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str { &self.0 }
        }
    }
}

name_newtype!(
    /// Contestant (party or independent list) name, unique within a tally.
    PartyName
);
name_newtype!(
    /// Stable alliance identifier.
    AllianceId
);
name_newtype!(
    /// Administrative district name (one apportionment universe).
    DistrictName
);

/// "RES:" + 64-hex lowercase digest of a canonical outcome.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ResultId(String);

impl ResultId {
    /// Build from a bare 64-hex digest.
    pub fn from_digest_hex(hex: &str) -> Result<Self, CoreError> {
        if is_valid_sha256(hex) {
            let mut s = String::with_capacity(RES_PREFIX.len() + HEX64_LEN);
            s.push_str(RES_PREFIX);
            s.push_str(hex);
            Ok(ResultId(s))
        } else {
            Err(CoreError::InvalidId)
        }
    }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }
    #[inline] pub fn as_hex(&self) -> &str { &self.0[RES_PREFIX.len()..] }
}

impl fmt::Display for ResultId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for ResultId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix(RES_PREFIX).ok_or(CoreError::InvalidId)?;
        Self::from_digest_hex(rest)
    }
}

impl TryFrom<String> for ResultId {
    type Error = CoreError;
    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<ResultId> for String {
    #[inline]
    fn from(value: ResultId) -> String { value.0 }
}
