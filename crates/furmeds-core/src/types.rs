//! Core types for FurMeds
//!
//! Wire shapes follow the backend JSON: camelCase field names and a
//! `uuid` field carrying each record's identity.

mod food;
mod invite;
mod medicine;
mod pet;
mod todo;
mod vet;

pub use food::{Food, FoodFrequency, FoodUnit};
pub use invite::{EmailAddress, PetShareInvite};
pub use medicine::{Medicine, MedicineFrequency, MedicineUnit};
pub use pet::{Pet, PetShare, Species};
pub use todo::ToDo;
pub use vet::VetAppointment;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ulid::Ulid;

use crate::error::{FurMedsError, ValidationError};

/// Stable identity of a pet or sub-record
///
/// Backed by a ULID so fresh identities are unique and time-ordered.
/// On the wire it is written in hyphenated 8-4-4-4-12 hex form, which
/// the backend accepts as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub Ulid);

impl RecordId {
    /// Generate a new, never-before-seen identity
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    pub fn as_ulid(&self) -> &Ulid {
        &self.0
    }

    /// Hyphenated hex form (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`)
    pub fn to_hyphenated(&self) -> String {
        let hex = format!("{:032x}", u128::from(self.0));
        format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }

    /// Parse either the hyphenated hex form or a 26-char ULID string
    pub fn parse(s: &str) -> Result<Self, FurMedsError> {
        let trimmed = s.trim();
        if trimmed.len() == 26 {
            return Ulid::from_string(trimmed)
                .map(Self)
                .map_err(|e| FurMedsError::InvalidId(format!("'{}': {}", trimmed, e)));
        }

        let hex: String = trimmed.chars().filter(|c| *c != '-').collect();
        if hex.len() != 32 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FurMedsError::InvalidId(format!("'{}'", trimmed)));
        }
        u128::from_str_radix(&hex, 16)
            .map(|value| Self(Ulid::from(value)))
            .map_err(|e| FurMedsError::InvalidId(format!("'{}': {}", trimmed, e)))
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hyphenated())
    }
}

impl FromStr for RecordId {
    type Err = FurMedsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hyphenated())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Wall-clock time of day (24h) at which a dose or meal is due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Parse `HH:MM` (seconds are accepted and dropped)
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map(|t| Self(t.with_second(0).unwrap_or(t)))
            .map_err(|_| ValidationError::InvalidTime(raw.to_string()))
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Deserialize an optional field the backend may send as `""`
pub(crate) mod empty_as_none {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

/// Parse a non-negative count typed by the user
pub fn parse_count(field: &'static str, raw: &str) -> Result<u32, ValidationError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}
