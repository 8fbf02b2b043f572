//! Turning line sequences into concrete routes.
//!
//! For each pair of consecutive lines a transfer station is chosen from the
//! stations they share. Each line is then ridden between its boundary
//! stations, and the candidate is checked against the pruning rules:
//!
//! - **premature transfer**: a non-final segment's line would have carried
//!   the rider further towards the destination, so changing is pointless;
//! - **overshoot**: a segment passes through the destination without being
//!   the segment that alights there.

use tracing::trace;

use crate::domain::{DomainError, LineId, Route, RouteSegment, StationId};
use crate::graph::GraphSnapshot;

use super::config::{PlannerConfig, TransferChoice};

/// Why a candidate was discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum Rejection {
    #[error("lines {0} and {1} share no station")]
    NoCommonStation(LineId, LineId),

    #[error("station {station} is not on line {line}")]
    StationNotOnLine { line: LineId, station: StationId },

    #[error("segment {0} changes lines before the destination it could reach")]
    PrematureTransfer(usize),

    #[error("segment {0} rides past the destination")]
    Overshoot(usize),

    #[error("every segment is zero-length")]
    NoSegments,

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// One line ridden between two positions of its stop list.
#[derive(Debug, Clone, Copy)]
struct Hop {
    line: LineId,
    from_idx: usize,
    to_idx: usize,
}

impl Hop {
    fn is_forward(&self) -> bool {
        self.from_idx < self.to_idx
    }

    /// Returns true if `idx` lies beyond the alighting stop in the direction of travel.
    fn is_ahead(&self, idx: usize) -> bool {
        if self.is_forward() {
            idx > self.to_idx
        } else {
            idx < self.to_idx
        }
    }

    fn traversed(&self, stops: &[StationId]) -> Vec<StationId> {
        if self.is_forward() {
            stops[self.from_idx..=self.to_idx].to_vec()
        } else {
            stops[self.to_idx..=self.from_idx].iter().rev().copied().collect()
        }
    }
}

/// Transfer station lists for one line sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransferOptions {
    /// One station per consecutive pair of lines, per option.
    pub options: Vec<Vec<StationId>>,
    /// True if combinations beyond the limit were left out.
    pub truncated: bool,
}

/// Possible transfer station lists for a line sequence, at most `limit`.
///
/// Each list holds one station per consecutive pair of lines. With
/// [`TransferChoice::First`] there is exactly one list. With
/// [`TransferChoice::All`] the lists are the combinations of shared
/// stations in order; the product is capped as it is built.
pub(crate) fn transfer_options(
    snapshot: &GraphSnapshot,
    lines: &[LineId],
    choice: TransferChoice,
    limit: usize,
) -> Result<TransferOptions, Rejection> {
    let mut options: Vec<Vec<StationId>> = vec![Vec::new()];
    let mut truncated = false;

    for pair in lines.windows(2) {
        let common = snapshot.common_stations(pair[0], pair[1]);
        if common.is_empty() {
            return Err(Rejection::NoCommonStation(pair[0], pair[1]));
        }

        let choices = match choice {
            TransferChoice::First => &common[..1],
            TransferChoice::All => &common[..],
        };
        truncated |= options.len().saturating_mul(choices.len()) > limit;

        options = options
            .iter()
            .flat_map(|opt| {
                choices.iter().map(move |&station| {
                    let mut next = opt.clone();
                    next.push(station);
                    next
                })
            })
            .take(limit)
            .collect();
    }

    if options.len() > limit {
        options.truncate(limit);
        truncated = true;
    }

    Ok(TransferOptions { options, truncated })
}

/// Build a route riding `lines` in order, changing at `transfers`.
///
/// `transfers` holds one station per consecutive pair of lines.
/// Zero-length hops are dropped; the remaining segments must pass both
/// pruning rules.
pub(crate) fn build_route(
    snapshot: &GraphSnapshot,
    lines: &[LineId],
    transfers: &[StationId],
    start: StationId,
    end: StationId,
    config: &PlannerConfig,
) -> Result<Route, Rejection> {
    let boundaries: Vec<StationId> = std::iter::once(start)
        .chain(transfers.iter().copied())
        .chain(std::iter::once(end))
        .collect();

    let mut hops = Vec::with_capacity(lines.len());
    for (i, &line) in lines.iter().enumerate() {
        let locate = |station: StationId| {
            snapshot
                .position(line, station)
                .ok_or(Rejection::StationNotOnLine { line, station })
        };
        let from_idx = locate(boundaries[i])?;
        let to_idx = locate(boundaries[i + 1])?;

        if from_idx != to_idx {
            hops.push(Hop {
                line,
                from_idx,
                to_idx,
            });
        }
    }

    if hops.is_empty() {
        return Err(Rejection::NoSegments);
    }

    let last = hops.len() - 1;
    let mut segments = Vec::with_capacity(hops.len());

    for (i, hop) in hops.iter().enumerate() {
        let stops = snapshot.line_stops(hop.line);

        if i != last
            && let Some(dest_idx) = snapshot.position(hop.line, end)
            && hop.is_ahead(dest_idx)
        {
            return Err(Rejection::PrematureTransfer(i));
        }

        let traversed = hop.traversed(stops);
        if traversed.contains(&end) && (i != last || traversed.last() != Some(&end)) {
            return Err(Rejection::Overshoot(i));
        }

        let (name, per_stop) = snapshot
            .line(hop.line)
            .map(|l| (l.name.clone(), l.minutes_per_stop(config.default_interval_mins)))
            .unwrap_or_else(|| (hop.line.to_string(), config.default_interval_mins));

        let positions = (hop.from_idx, hop.to_idx);
        segments.push(RouteSegment::new(hop.line, name, positions, traversed, per_stop)?);
    }

    Route::new(segments, config.transfer_penalty_mins).map_err(Rejection::from)
}

/// Routes built from one line sequence.
#[derive(Debug, Default)]
pub(crate) struct Materialized {
    pub routes: Vec<Route>,
    /// True if the candidate budget cut this sequence short.
    pub truncated: bool,
}

/// Every route that survives materialisation for one line sequence.
///
/// Each transfer option tried is charged against `budget`. Rejections are
/// logged and dropped.
pub(crate) fn materialize(
    snapshot: &GraphSnapshot,
    lines: &[LineId],
    start: StationId,
    end: StationId,
    config: &PlannerConfig,
    budget: &mut usize,
) -> Materialized {
    let options = match transfer_options(snapshot, lines, config.transfer_choice, *budget) {
        Ok(options) => options,
        Err(reason) => {
            trace!(lines = ?lines, %reason, "Line sequence rejected");
            return Materialized::default();
        }
    };
    *budget -= options.options.len();

    let routes = options
        .options
        .iter()
        .filter_map(
            |transfers| match build_route(snapshot, lines, transfers, start, end, config) {
                Ok(route) => Some(route),
                Err(reason) => {
                    trace!(lines = ?lines, transfers = ?transfers, %reason, "Candidate rejected");
                    None
                }
            },
        )
        .collect();

    Materialized {
        routes,
        truncated: options.truncated,
    }
}
