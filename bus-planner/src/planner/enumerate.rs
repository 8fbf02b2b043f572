//! Line-sequence enumeration.
//!
//! Lines are the nodes of the search graph; two lines are adjacent when
//! they share a station. A breadth-first search over paths of lines finds
//! every sequence that starts on a line through the start station and ends
//! on a line through the end station.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::domain::{LineId, StationId};
use crate::graph::GraphSnapshot;

/// Line sequences found for one query.
#[derive(Debug, Default)]
pub(crate) struct Enumeration {
    /// Candidate sequences, direct lines first.
    pub sequences: Vec<Vec<LineId>>,
    /// Paths taken off the BFS queue.
    pub explored: usize,
    /// True if the exploration budget ran out.
    pub truncated: bool,
}

/// Single lines serving both stations.
pub(crate) fn direct_lines(
    snapshot: &GraphSnapshot,
    start: StationId,
    end: StationId,
) -> Vec<LineId> {
    snapshot
        .station_lines(start)
        .filter(|&line| snapshot.serves(line, end))
        .collect()
}

/// Enumerate line sequences with at most `max_transfers` changes.
///
/// Sequences never repeat a line. A path stops growing as soon as its last
/// line reaches the end station, or once it holds `max_transfers + 1` lines.
/// At most `budget` paths are expanded.
pub(crate) fn line_sequences(
    snapshot: &GraphSnapshot,
    start: StationId,
    end: StationId,
    max_transfers: usize,
    budget: usize,
) -> Enumeration {
    let mut result = Enumeration {
        sequences: direct_lines(snapshot, start, end)
            .into_iter()
            .map(|line| vec![line])
            .collect(),
        ..Enumeration::default()
    };

    if max_transfers == 0 {
        return result;
    }

    let max_lines = max_transfers + 1;
    let mut queue: VecDeque<Vec<LineId>> =
        snapshot.station_lines(start).map(|l| vec![l]).collect();

    while let Some(path) = queue.pop_front() {
        if result.explored >= budget {
            result.truncated = true;
            debug!(budget, "Line search budget exhausted");
            break;
        }
        result.explored += 1;

        if path.len() >= max_lines {
            continue;
        }

        let Some(&last) = path.last() else {
            continue;
        };

        for next in snapshot.neighbours(last) {
            if path.contains(&next) {
                continue;
            }

            let mut extended = path.clone();
            extended.push(next);

            if snapshot.serves(next, end) {
                trace!(lines = ?extended, "Line sequence reaches destination");
                result.sequences.push(extended);
            } else if extended.len() < max_lines {
                queue.push_back(extended);
            }
        }
    }

    debug!(
        sequences = result.sequences.len(),
        explored = result.explored,
        "Line enumeration complete"
    );

    result
}
