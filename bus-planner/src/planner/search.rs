//! Route search between two stations.
//!
//! Resolves the query endpoints, enumerates line sequences, materialises
//! them into concrete routes and ranks the survivors.

use tracing::{debug, warn};

use crate::domain::{Route, StationId};
use crate::graph::{GraphCache, GraphSnapshot};

use super::config::PlannerConfig;
use super::enumerate::line_sequences;
use super::materialize::materialize;
use super::rank::select_routes;

/// Request for route search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Start station: an id or part of a name.
    pub start: String,

    /// End station: an id or part of a name.
    pub end: String,

    /// Maximum number of line changes.
    pub max_transfers: usize,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(start: impl Into<String>, end: impl Into<String>, max_transfers: usize) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            max_transfers,
        }
    }
}

/// Result of route search.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Found routes, ranked best-first.
    pub routes: Vec<Route>,

    /// Resolved endpoints, if both resolved to different stations.
    pub endpoints: Option<(StationId, StationId)>,

    /// Line sequences considered.
    pub sequences: usize,

    /// Candidate routes that survived materialisation, before deduplication.
    pub candidates: usize,

    /// Line paths expanded during the search.
    pub paths_explored: usize,

    /// True if the search stopped early on its path or candidate budget.
    pub truncated: bool,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Search one snapshot.
///
/// Unresolvable endpoints, or endpoints resolving to the same station,
/// produce an empty result rather than an error.
pub fn search(
    snapshot: &GraphSnapshot,
    request: &SearchRequest,
    config: &PlannerConfig,
) -> SearchResult {
    let (Some(start), Some(end)) = (
        snapshot.resolve_identifier(&request.start),
        snapshot.resolve_identifier(&request.end),
    ) else {
        debug!(start = %request.start, end = %request.end, "Endpoint did not resolve");
        return SearchResult::empty();
    };

    if start == end {
        debug!(station = %start, "Start and end are the same station");
        return SearchResult::empty();
    }

    let max_transfers = config.effective_max_transfers(request.max_transfers);
    if max_transfers < request.max_transfers {
        warn!(
            requested = request.max_transfers,
            limit = max_transfers,
            "Clamping requested transfers"
        );
    }

    let enumeration = line_sequences(
        snapshot,
        start,
        end,
        max_transfers,
        config.max_explored_paths,
    );

    let mut budget = config.max_candidates;
    let mut truncated = enumeration.truncated;
    let mut candidates: Vec<Route> = Vec::new();
    for lines in &enumeration.sequences {
        if budget == 0 {
            truncated = true;
            break;
        }
        let built = materialize(snapshot, lines, start, end, config, &mut budget);
        truncated |= built.truncated;
        candidates.extend(
            built
                .routes
                .into_iter()
                .filter(|route| route.transfers() <= max_transfers),
        );
    }
    if truncated {
        debug!(
            budget = config.max_candidates,
            "Search budget exhausted, results may be incomplete"
        );
    }
    let candidate_count = candidates.len();

    let routes = select_routes(candidates, config.max_results);

    debug!(
        %start,
        %end,
        sequences = enumeration.sequences.len(),
        candidates = candidate_count,
        routes = routes.len(),
        "Route search complete"
    );

    SearchResult {
        routes,
        endpoints: Some((start, end)),
        sequences: enumeration.sequences.len(),
        candidates: candidate_count,
        paths_explored: enumeration.explored,
        truncated,
    }
}

/// Route planner over a shared graph cache.
///
/// Each query takes the cache's current snapshot once and runs entirely
/// against it.
pub struct Planner<'a> {
    cache: &'a GraphCache,
    config: &'a PlannerConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(cache: &'a GraphCache, config: &'a PlannerConfig) -> Self {
        Self { cache, config }
    }

    /// Search for routes, with search statistics.
    pub fn plan(&self, request: &SearchRequest) -> SearchResult {
        let snapshot = self.cache.snapshot();
        search(&snapshot, request, self.config)
    }

    /// Find up to `max_results` routes from `start` to `end`.
    pub fn find_routes(&self, start: &str, end: &str, max_transfers: usize) -> Vec<Route> {
        self.plan(&SearchRequest::new(start, end, max_transfers))
            .routes
    }
}
