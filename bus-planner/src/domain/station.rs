//! Station and line types.

use chrono::NaiveTime;

use super::{LineId, StationId};

/// A bus station.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Unique identifier
    pub id: StationId,
    /// Display name
    pub name: String,
    /// Longitude, if known
    pub longitude: Option<f64>,
    /// Latitude, if known
    pub latitude: Option<f64>,
}

impl Station {
    /// Create a station without coordinates.
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            longitude: None,
            latitude: None,
        }
    }

    /// Returns true if the station name contains `text`.
    pub fn name_contains(&self, text: &str) -> bool {
        self.name.contains(text)
    }
}

/// A timetabled bus line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Unique identifier
    pub id: LineId,
    /// Display name (e.g. "12")
    pub name: String,
    /// Direction tag
    pub direction: String,
    /// First departure of the day
    pub start_time: Option<NaiveTime>,
    /// Last departure of the day
    pub end_time: Option<NaiveTime>,
    /// Headway in minutes, as given by the source data
    pub interval_mins: Option<i32>,
}

impl Line {
    /// Create a line with no timetable metadata.
    pub fn new(id: LineId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            direction: String::new(),
            start_time: None,
            end_time: None,
            interval_mins: None,
        }
    }

    /// Minutes per stop used for cost estimates.
    ///
    /// Falls back to `default_mins` when the headway is absent or not positive.
    pub fn minutes_per_stop(&self, default_mins: u32) -> u32 {
        match self.interval_mins {
            Some(mins) if mins > 0 => mins.unsigned_abs(),
            _ => default_mins,
        }
    }
}
