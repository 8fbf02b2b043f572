//! Numeric identifier types for stations and lines.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a raw value is not a valid identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier: {reason}")]
pub struct InvalidId {
    reason: &'static str,
}

fn check_raw(raw: i64) -> Result<u32, InvalidId> {
    if raw <= 0 {
        return Err(InvalidId {
            reason: "must be a positive integer",
        });
    }
    u32::try_from(raw).map_err(|_| InvalidId {
        reason: "out of range",
    })
}

fn parse_digits(s: &str) -> Result<u32, InvalidId> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidId {
            reason: "must contain only ASCII digits",
        });
    }
    let raw: i64 = s.parse().map_err(|_| InvalidId {
        reason: "out of range",
    })?;
    check_raw(raw)
}

/// A station identifier: a positive integer, unique within a network.
///
/// # Examples
///
/// ```
/// use bus_planner::domain::StationId;
///
/// let id = StationId::parse("42").unwrap();
/// assert_eq!(id.get(), 42);
///
/// assert!(StationId::parse("0").is_err());
/// assert!(StationId::parse("4a").is_err());
/// assert!(StationId::new(-3).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct StationId(u32);

impl StationId {
    /// Validate a raw integer as a station identifier.
    pub fn new(raw: i64) -> Result<Self, InvalidId> {
        check_raw(raw).map(StationId)
    }

    /// Parse an all-digits string as a station identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        parse_digits(s).map(StationId)
    }

    /// Returns the raw numeric value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for StationId {
    type Error = InvalidId;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<StationId> for i64 {
    fn from(id: StationId) -> Self {
        i64::from(id.0)
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A line identifier (the line's order number in the source data).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct LineId(u32);

impl LineId {
    /// Validate a raw integer as a line identifier.
    pub fn new(raw: i64) -> Result<Self, InvalidId> {
        check_raw(raw).map(LineId)
    }

    /// Parse an all-digits string as a line identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        parse_digits(s).map(LineId)
    }

    /// Returns the raw numeric value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for LineId {
    type Error = InvalidId;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<LineId> for i64 {
    fn from(id: LineId) -> Self {
        i64::from(id.0)
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
