//! Immutable graph snapshot.
//!
//! A snapshot holds the stations and lines of one load of the network plus
//! the derived adjacency indices the planner searches over. Snapshots are
//! never patched: a data change produces a whole new snapshot.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveTime;
use tracing::debug;

use crate::domain::{Line, LineId, Station, StationId};
use crate::network::{LineRecord, NetworkData, StationRecord, parse_time_of_day};

/// Counts reported by a snapshot build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Stations accepted
    pub stations: usize,
    /// Lines accepted
    pub lines: usize,
    /// Membership rows accepted
    pub memberships: usize,
    /// Station or line rows dropped (bad or duplicate id)
    pub skipped_records: usize,
    /// Membership rows dropped (dangling or duplicate reference)
    pub skipped_memberships: usize,
}

/// A fully built, read-only view of the network.
#[derive(Debug, Default)]
pub struct GraphSnapshot {
    stations: BTreeMap<StationId, Station>,
    lines: BTreeMap<LineId, Line>,
    line_stops: BTreeMap<LineId, Vec<StationId>>,
    station_lines: BTreeMap<StationId, BTreeSet<LineId>>,
    line_neighbours: BTreeMap<LineId, BTreeSet<LineId>>,
    stats: BuildStats,
}

impl GraphSnapshot {
    /// Create an empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from network records.
    ///
    /// Rows with invalid or duplicate identifiers are skipped, as are
    /// membership rows referring to a missing station or line, repeating a
    /// sequence number, or repeating a station already on that line.
    pub fn build(data: &NetworkData) -> Self {
        let mut snapshot = Self::empty();

        for record in &data.stations {
            match station_from_record(record) {
                Some(station) if !snapshot.stations.contains_key(&station.id) => {
                    snapshot.stations.insert(station.id, station);
                }
                _ => {
                    debug!(id = record.id, "Skipping station record");
                    snapshot.stats.skipped_records += 1;
                }
            }
        }

        for record in &data.lines {
            match line_from_record(record) {
                Some(line) if !snapshot.lines.contains_key(&line.id) => {
                    snapshot.line_stops.insert(line.id, Vec::new());
                    snapshot.lines.insert(line.id, line);
                }
                _ => {
                    debug!(id = record.id, "Skipping line record");
                    snapshot.stats.skipped_records += 1;
                }
            }
        }

        let mut memberships = data.memberships.clone();
        memberships.sort_by_key(|m| (m.line_id, m.sequence));

        let mut seen_positions: HashSet<(i64, i64)> = HashSet::new();
        for m in &memberships {
            let line = LineId::new(m.line_id)
                .ok()
                .filter(|id| snapshot.lines.contains_key(id));
            let station = StationId::new(m.station_id)
                .ok()
                .filter(|id| snapshot.stations.contains_key(id));

            let (Some(line), Some(station)) = (line, station) else {
                debug!(
                    line = m.line_id,
                    station = m.station_id,
                    sequence = m.sequence,
                    "Skipping membership with dangling reference"
                );
                snapshot.stats.skipped_memberships += 1;
                continue;
            };

            let stops = snapshot.line_stops.entry(line).or_default();
            if !seen_positions.insert((m.line_id, m.sequence)) || stops.contains(&station) {
                debug!(
                    line = m.line_id,
                    station = m.station_id,
                    sequence = m.sequence,
                    "Skipping duplicate membership"
                );
                snapshot.stats.skipped_memberships += 1;
                continue;
            }

            stops.push(station);
            snapshot
                .station_lines
                .entry(station)
                .or_default()
                .insert(line);
            snapshot.stats.memberships += 1;
        }

        for (&line, stops) in &snapshot.line_stops {
            let neighbours: BTreeSet<LineId> = stops
                .iter()
                .filter_map(|s| snapshot.station_lines.get(s))
                .flatten()
                .copied()
                .filter(|&other| other != line)
                .collect();
            snapshot.line_neighbours.insert(line, neighbours);
        }

        snapshot.stats.stations = snapshot.stations.len();
        snapshot.stats.lines = snapshot.lines.len();
        snapshot
    }

    /// Records describing exactly the accepted network.
    ///
    /// Skipped rows are absent and sequence numbers restart at 1 on every
    /// line, so building from the result skips nothing.
    pub fn to_network_data(&self) -> NetworkData {
        let mut data = NetworkData {
            stations: self
                .stations
                .values()
                .map(|s| StationRecord {
                    id: s.id.get().into(),
                    name: s.name.clone(),
                    longitude: s.longitude,
                    latitude: s.latitude,
                })
                .collect(),
            ..NetworkData::default()
        };

        for line in self.lines.values() {
            let record = LineRecord {
                id: line.id.get().into(),
                name: line.name.clone(),
                direction: line.direction.clone(),
                start_time: line.start_time.map(|t| t.format("%H:%M:%S").to_string()),
                end_time: line.end_time.map(|t| t.format("%H:%M:%S").to_string()),
                interval_minutes: line.interval_mins,
            };
            let stops: Vec<i64> = self
                .line_stops(line.id)
                .iter()
                .map(|s| s.get().into())
                .collect();
            data.push_line(record, &stops);
        }
        data
    }

    /// Returns the counts recorded while building.
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// All stations, keyed by id.
    pub fn stations(&self) -> &BTreeMap<StationId, Station> {
        &self.stations
    }

    /// All lines, keyed by id.
    pub fn lines(&self) -> &BTreeMap<LineId, Line> {
        &self.lines
    }

    /// Ordered stops of every line.
    pub fn line_stops_map(&self) -> &BTreeMap<LineId, Vec<StationId>> {
        &self.line_stops
    }

    /// Lines through every station.
    pub fn station_lines_map(&self) -> &BTreeMap<StationId, BTreeSet<LineId>> {
        &self.station_lines
    }

    /// Look up a station by id.
    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    /// Look up a line by id.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(&id)
    }

    /// Stops of a line in timetable order (empty for unknown lines).
    pub fn line_stops(&self, line: LineId) -> &[StationId] {
        self.line_stops.get(&line).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Lines passing through a station, ascending by id.
    pub fn station_lines(&self, station: StationId) -> impl Iterator<Item = LineId> + '_ {
        self.station_lines.get(&station).into_iter().flatten().copied()
    }

    /// Returns true if `line` stops at `station`.
    pub fn serves(&self, line: LineId, station: StationId) -> bool {
        self.station_lines
            .get(&station)
            .is_some_and(|lines| lines.contains(&line))
    }

    /// Lines sharing at least one station with `line`, ascending by id.
    pub fn neighbours(&self, line: LineId) -> impl Iterator<Item = LineId> + '_ {
        self.line_neighbours.get(&line).into_iter().flatten().copied()
    }

    /// Position of `station` in the stop order of `line`.
    pub fn position(&self, line: LineId, station: StationId) -> Option<usize> {
        self.line_stops(line).iter().position(|&s| s == station)
    }

    /// Stations served by both lines, in the stop order of `first`.
    pub fn common_stations(&self, first: LineId, second: LineId) -> Vec<StationId> {
        self.line_stops(first)
            .iter()
            .copied()
            .filter(|&s| self.serves(second, s))
            .collect()
    }

    /// First station, by ascending id, whose name contains `text`.
    pub fn station_by_name_substring(&self, text: &str) -> Option<&Station> {
        if text.is_empty() {
            return None;
        }
        self.stations.values().find(|s| s.name_contains(text))
    }

    /// Resolve user input to a station.
    ///
    /// All-digit input naming an existing station resolves to that station;
    /// anything else falls back to the first name containing the input.
    /// Surrounding whitespace is ignored and empty input never resolves.
    pub fn resolve_identifier(&self, text: &str) -> Option<StationId> {
        let text = text.trim();
        if let Ok(id) = StationId::parse(text)
            && self.stations.contains_key(&id)
        {
            return Some(id);
        }
        self.station_by_name_substring(text).map(|s| s.id)
    }

    /// All stations matching a query.
    ///
    /// An exact id match comes first, followed by every station whose name
    /// contains the query, ascending by id and without repeats.
    pub fn search_stations(&self, query: &str) -> Vec<&Station> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let exact = StationId::parse(query)
            .ok()
            .and_then(|id| self.stations.get(&id));

        let mut matches: Vec<&Station> = exact.into_iter().collect();
        matches.extend(
            self.stations
                .values()
                .filter(|s| s.name_contains(query) && Some(s.id) != exact.map(|e| e.id)),
        );
        matches
    }

    /// Lines through the station named by `identifier`, ascending by id.
    pub fn lines_at_station(&self, identifier: &str) -> Vec<&Line> {
        let Some(station) = self.resolve_identifier(identifier) else {
            return Vec::new();
        };
        self.station_lines(station)
            .filter_map(|l| self.lines.get(&l))
            .collect()
    }

    /// Resolve a line by id (all digits) or exact name (first by ascending id).
    pub fn resolve_line(&self, identifier: &str) -> Option<LineId> {
        let identifier = identifier.trim();
        if let Ok(id) = LineId::parse(identifier) {
            return self.lines.contains_key(&id).then_some(id);
        }
        self.lines
            .values()
            .find(|l| l.name == identifier)
            .map(|l| l.id)
    }

    /// Stations of the line named by `identifier`, in timetable order.
    pub fn stations_on_line(&self, identifier: &str) -> Vec<&Station> {
        let Some(line) = self.resolve_line(identifier) else {
            return Vec::new();
        };
        self.line_stops(line)
            .iter()
            .filter_map(|s| self.stations.get(s))
            .collect()
    }
}

fn station_from_record(record: &StationRecord) -> Option<Station> {
    let id = StationId::new(record.id).ok()?;
    Some(Station {
        id,
        name: record.name.clone(),
        longitude: record.longitude,
        latitude: record.latitude,
    })
}

fn line_from_record(record: &LineRecord) -> Option<Line> {
    let id = LineId::new(record.id).ok()?;
    Some(Line {
        id,
        name: record.name.clone(),
        direction: record.direction.clone(),
        start_time: time_field(record, "start_time", record.start_time.as_deref()),
        end_time: time_field(record, "end_time", record.end_time.as_deref()),
        interval_mins: record.interval_minutes,
    })
}

/// Unparseable times are dropped; the line itself is kept.
fn time_field(record: &LineRecord, field: &str, raw: Option<&str>) -> Option<NaiveTime> {
    let raw = raw?;
    match parse_time_of_day(raw) {
        Ok(time) => time,
        Err(e) => {
            debug!(id = record.id, field, value = raw, error = %e, "Ignoring bad line time");
            None
        }
    }
}
