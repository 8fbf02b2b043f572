//! Route types.
//!
//! A `Route` is one answer to a start/end query: an ordered list of
//! segments, each ridden on a single line.

use std::fmt;

use uuid::Uuid;

use super::{DomainError, LineId, StationId};

/// Generated identifier of a route, unique per search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(Uuid);

impl RouteId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        RouteId(Uuid::new_v4())
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The part of a route ridden on one line.
///
/// # Invariants
///
/// - At least two stations are traversed
/// - `from` is the first traversed station and `to` the last
/// - `stops_count` is the number of hops (`stations.len() - 1`)
/// - `from_position` and `to_position` index the line's stop list and lie
///   `stops_count` apart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSegment {
    line: LineId,
    line_name: String,
    from_position: usize,
    to_position: usize,
    stations: Vec<StationId>,
    duration_mins: u32,
}

impl RouteSegment {
    /// Construct a segment from the stations traversed, in travel order.
    ///
    /// `positions` are the boarding and alighting indices in the line's stop
    /// list; boarding after alighting means the line is ridden backwards.
    /// Duration is `stops_count * minutes_per_stop`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if fewer than two stations are given, or if the
    /// positions do not span exactly the stations given.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_planner::domain::{LineId, RouteSegment, StationId};
    ///
    /// let ids: Vec<StationId> = [1, 2, 3]
    ///     .into_iter()
    ///     .map(|n| StationId::new(n).unwrap())
    ///     .collect();
    /// let seg = RouteSegment::new(LineId::new(7).unwrap(), "7".into(), (4, 2), ids, 5).unwrap();
    /// assert!(seg.is_reversed());
    /// assert_eq!(seg.stops_count(), 2);
    /// assert_eq!(seg.duration_mins(), 10);
    /// ```
    pub fn new(
        line: LineId,
        line_name: String,
        positions: (usize, usize),
        stations: Vec<StationId>,
        minutes_per_stop: u32,
    ) -> Result<Self, DomainError> {
        if stations.len() < 2 {
            return Err(DomainError::ShortSegment);
        }
        let (from_position, to_position) = positions;
        if from_position.abs_diff(to_position) != stations.len() - 1 {
            return Err(DomainError::PositionMismatch {
                from: from_position,
                to: to_position,
                stations: stations.len(),
            });
        }
        let hops = u32::try_from(stations.len() - 1).unwrap_or(u32::MAX);
        Ok(Self {
            line,
            line_name,
            from_position,
            to_position,
            stations,
            duration_mins: hops.saturating_mul(minutes_per_stop),
        })
    }

    /// Returns the line ridden.
    pub fn line(&self) -> LineId {
        self.line
    }

    /// Returns the display name of the line ridden.
    pub fn line_name(&self) -> &str {
        &self.line_name
    }

    /// Returns the boarding station.
    pub fn from(&self) -> StationId {
        // Safe: at least two stations, validated at construction
        self.stations[0]
    }

    /// Returns the alighting station.
    pub fn to(&self) -> StationId {
        self.stations[self.stations.len() - 1]
    }

    /// Returns the boarding index in the line's stop list.
    pub fn from_position(&self) -> usize {
        self.from_position
    }

    /// Returns the alighting index in the line's stop list.
    pub fn to_position(&self) -> usize {
        self.to_position
    }

    /// Returns true if the line is ridden against its stop order.
    pub fn is_reversed(&self) -> bool {
        self.from_position > self.to_position
    }

    /// Returns every station traversed, boarding and alighting included.
    pub fn stations(&self) -> &[StationId] {
        &self.stations
    }

    /// Returns the number of stops travelled.
    pub fn stops_count(&self) -> usize {
        self.stations.len() - 1
    }

    /// Returns the estimated riding time.
    pub fn duration_mins(&self) -> u32 {
        self.duration_mins
    }
}

/// A complete route from a start station to an end station.
///
/// # Invariants
///
/// - At least one segment
/// - Consecutive segments connect (`to` of one = `from` of the next)
/// - `transfers = segments.len() - 1`
#[derive(Debug, Clone)]
pub struct Route {
    id: RouteId,
    segments: Vec<RouteSegment>,
    duration_mins: u32,
}

impl Route {
    /// Construct a route, adding `transfer_penalty_mins` per transfer to the
    /// summed segment durations.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the segment list is empty or not contiguous.
    pub fn new(
        segments: Vec<RouteSegment>,
        transfer_penalty_mins: u32,
    ) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Err(DomainError::EmptyRoute);
        }

        for (index, pair) in segments.windows(2).enumerate() {
            if pair[0].to() != pair[1].from() {
                return Err(DomainError::Discontiguous {
                    index: index + 1,
                    expected: pair[0].to(),
                    found: pair[1].from(),
                });
            }
        }

        let riding: u32 = segments
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.duration_mins()));
        let transfers = u32::try_from(segments.len() - 1).unwrap_or(u32::MAX);
        let duration_mins = riding.saturating_add(transfers.saturating_mul(transfer_penalty_mins));

        Ok(Self {
            id: RouteId::generate(),
            segments,
            duration_mins,
        })
    }

    /// Returns the generated identifier.
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Returns the segments in travel order.
    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    /// Returns the number of line changes.
    pub fn transfers(&self) -> usize {
        self.segments.len() - 1
    }

    /// Returns the total number of stops travelled across all segments.
    pub fn total_stops(&self) -> usize {
        self.segments.iter().map(RouteSegment::stops_count).sum()
    }

    /// Returns the estimated total time, transfer penalties included.
    pub fn duration_mins(&self) -> u32 {
        self.duration_mins
    }

    /// Returns the station the route starts at.
    pub fn origin(&self) -> StationId {
        self.segments[0].from()
    }

    /// Returns the station the route ends at.
    pub fn destination(&self) -> StationId {
        self.segments[self.segments.len() - 1].to()
    }

    /// Returns the lines ridden, in order.
    pub fn lines(&self) -> Vec<LineId> {
        self.segments.iter().map(RouteSegment::line).collect()
    }
}
