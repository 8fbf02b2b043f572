//! Domain error types.
//!
//! These errors represent violated route invariants. They are distinct
//! from data loading errors.

use super::StationId;

/// Domain-level errors for route construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Route has no segments
    #[error("route must have at least one segment")]
    EmptyRoute,

    /// A segment must move between two different stations
    #[error("segment must traverse at least two stations")]
    ShortSegment,

    /// Segment positions don't match the stations traversed
    #[error("positions {from}..{to} do not span {stations} stations")]
    PositionMismatch {
        from: usize,
        to: usize,
        stations: usize,
    },

    /// Consecutive segments don't meet at the same station
    #[error("segment {index} starts at {found} but the previous segment ends at {expected}")]
    Discontiguous {
        index: usize,
        expected: StationId,
        found: StationId,
    },
}
