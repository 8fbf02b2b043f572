//! Raw network records as supplied by the data collaborator.
//!
//! Identifiers are kept as raw integers here; validation happens when the
//! graph cache is built, where bad rows are skipped rather than failing
//! the whole load.

use chrono::{NaiveTime, ParseError};
use serde::{Deserialize, Serialize};

/// A station row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
}

impl StationRecord {
    /// Create a station row without coordinates.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            longitude: None,
            latitude: None,
        }
    }
}

/// A line row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub direction: String,
    /// First departure as `HH:MM` or `HH:MM:SS`, unparsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Last departure as `HH:MM` or `HH:MM:SS`, unparsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default)]
    pub interval_minutes: Option<i32>,
}

impl LineRecord {
    /// Create a line row with the given headway and no timetable bounds.
    pub fn new(id: i64, name: impl Into<String>, interval_minutes: Option<i32>) -> Self {
        Self {
            id,
            name: name.into(),
            direction: String::new(),
            start_time: None,
            end_time: None,
            interval_minutes,
        }
    }
}

/// One station's position on one line.
///
/// Sequence numbers start at 1 and increase along the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub line_id: i64,
    pub station_id: i64,
    pub sequence: i64,
}

/// A full copy of the network records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    #[serde(default)]
    pub stations: Vec<StationRecord>,
    #[serde(default)]
    pub lines: Vec<LineRecord>,
    #[serde(default)]
    pub memberships: Vec<MembershipRecord>,
}

impl NetworkData {
    /// Append a line together with its stops, numbered from 1 in the given order.
    pub fn push_line(&mut self, line: LineRecord, stations: &[i64]) {
        let line_id = line.id;
        self.lines.push(line);
        self.memberships
            .extend(stations.iter().zip(1..).map(|(&station_id, sequence)| {
                MembershipRecord {
                    line_id,
                    station_id,
                    sequence,
                }
            }));
    }
}

/// Parse an `HH:MM:SS` or `HH:MM` time of day.
///
/// Blank input is no time at all rather than an error.
pub fn parse_time_of_day(raw: &str) -> Result<Option<NaiveTime>, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map(Some)
}
