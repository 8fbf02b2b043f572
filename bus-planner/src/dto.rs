//! Serializable views of stations, lines and routes.
//!
//! These are the shapes handed to presentation layers. Route views carry
//! resolved station details so a caller can display a route without
//! further lookups.

use serde::Serialize;

use crate::domain::{Line, Route, RouteSegment, Station};
use crate::graph::GraphSnapshot;

/// Station information for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationView {
    pub id: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
}

/// A line with its stops in timetable order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineView {
    pub id: u32,
    pub name: String,
    pub direction: String,
    /// First departure (HH:MM)
    pub start_time: Option<String>,
    /// Last departure (HH:MM)
    pub end_time: Option<String>,
    pub interval_minutes: Option<i32>,
    pub station_ids: Vec<u32>,
}

/// A segment of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentView {
    pub line_id: u32,
    pub line_name: String,
    pub from_sid: u32,
    pub to_sid: u32,
    /// Boarding and alighting indices in the line's stop list
    pub from_position: usize,
    pub to_position: usize,
    /// Stations traversed, boarding and alighting included
    pub stations: Vec<u32>,
    pub station_details: Vec<StationView>,
    pub stops_count: usize,
    /// Riding time in minutes
    pub segment_duration: u32,
}

/// A route option.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteView {
    pub route_id: String,
    /// Estimated total time in minutes
    pub duration: u32,
    pub transfers: usize,
    pub total_stops: usize,
    pub segments: Vec<SegmentView>,
}

// Conversion implementations

impl StationView {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.get(),
            name: station.name.clone(),
            longitude: station.longitude,
            latitude: station.latitude,
        }
    }
}

impl LineView {
    /// Create from a domain Line and its stops.
    pub fn from_line(line: &Line, snapshot: &GraphSnapshot) -> Self {
        Self {
            id: line.id.get(),
            name: line.name.clone(),
            direction: line.direction.clone(),
            start_time: line.start_time.map(|t| t.format("%H:%M").to_string()),
            end_time: line.end_time.map(|t| t.format("%H:%M").to_string()),
            interval_minutes: line.interval_mins,
            station_ids: snapshot.line_stops(line.id).iter().map(|s| s.get()).collect(),
        }
    }
}

impl SegmentView {
    /// Create from a route segment, resolving station details.
    ///
    /// Stations missing from the snapshot are left out of the details.
    pub fn from_segment(segment: &RouteSegment, snapshot: &GraphSnapshot) -> Self {
        Self {
            line_id: segment.line().get(),
            line_name: segment.line_name().to_string(),
            from_sid: segment.from().get(),
            to_sid: segment.to().get(),
            from_position: segment.from_position(),
            to_position: segment.to_position(),
            stations: segment.stations().iter().map(|s| s.get()).collect(),
            station_details: segment
                .stations()
                .iter()
                .filter_map(|&s| snapshot.station(s))
                .map(StationView::from_station)
                .collect(),
            stops_count: segment.stops_count(),
            segment_duration: segment.duration_mins(),
        }
    }
}

impl RouteView {
    /// Create from a domain Route.
    pub fn from_route(route: &Route, snapshot: &GraphSnapshot) -> Self {
        Self {
            route_id: route.id().to_string(),
            duration: route.duration_mins(),
            transfers: route.transfers(),
            total_stops: route.total_stops(),
            segments: route
                .segments()
                .iter()
                .map(|s| SegmentView::from_segment(s, snapshot))
                .collect(),
        }
    }
}

/// Every station, ascending by id.
pub fn list_stations(snapshot: &GraphSnapshot) -> Vec<StationView> {
    snapshot
        .stations()
        .values()
        .map(StationView::from_station)
        .collect()
}

/// Every line with its stops, ascending by id.
pub fn list_lines(snapshot: &GraphSnapshot) -> Vec<LineView> {
    snapshot
        .lines()
        .values()
        .map(|l| LineView::from_line(l, snapshot))
        .collect()
}
