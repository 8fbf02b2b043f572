//! Route ranking for search results.
//!
//! Removes duplicate routes and orders the rest so the quickest options
//! come first.

use std::collections::HashSet;

use crate::domain::{Route, StationId};

/// Canonical description of a route: the line name and stations of each segment.
///
/// Two routes with equal signatures ride the same lines through the same
/// stations and are presented as one.
pub type Signature = Vec<(String, Vec<StationId>)>;

/// Compute the signature of a route.
pub fn signature(route: &Route) -> Signature {
    route
        .segments()
        .iter()
        .map(|seg| (seg.line_name().to_string(), seg.stations().to_vec()))
        .collect()
}

/// Remove routes whose signature was already seen, keeping the first.
pub fn deduplicate(routes: Vec<Route>) -> Vec<Route> {
    if routes.len() <= 1 {
        return routes;
    }

    let mut seen: HashSet<Signature> = HashSet::with_capacity(routes.len());
    routes
        .into_iter()
        .filter(|route| seen.insert(signature(route)))
        .collect()
}

/// Rank routes by preference.
///
/// Routes are ranked by:
/// 1. Total duration (shorter is better)
/// 2. Number of transfers (fewer is better)
///
/// The sort is stable, so equal routes keep their discovery order.
pub fn rank_routes(mut routes: Vec<Route>) -> Vec<Route> {
    routes.sort_by_key(|r| (r.duration_mins(), r.transfers()));
    routes
}

/// Deduplicate, rank, and keep the best `max_results` routes.
pub fn select_routes(routes: Vec<Route>, max_results: usize) -> Vec<Route> {
    let mut ranked = rank_routes(deduplicate(routes));
    ranked.truncate(max_results);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineId, RouteSegment};

    fn sids(raw: &[i64]) -> Vec<StationId> {
        raw.iter().map(|&n| StationId::new(n).unwrap()).collect()
    }

    fn segment(line: i64, name: &str, stations: &[i64], per_stop: u32) -> RouteSegment {
        let line = LineId::new(line).unwrap();
        let positions = (0, stations.len() - 1);
        RouteSegment::new(line, name.into(), positions, sids(stations), per_stop).unwrap()
    }

    fn make_route(segments: Vec<RouteSegment>) -> Route {
        Route::new(segments, 10).unwrap()
    }

    #[test]
    fn rank_by_duration() {
        let slow = make_route(vec![segment(1, "1", &[1, 2, 3], 10)]);
        let fast = make_route(vec![segment(2, "2", &[1, 4, 3], 5)]);

        let ranked = rank_routes(vec![slow, fast]);

        assert_eq!(ranked[0].duration_mins(), 10);
        assert_eq!(ranked[1].duration_mins(), 20);
    }

    #[test]
    fn rank_by_transfers_when_same_duration() {
        // 30 minutes either way: 1 stop at 10 + 10 + 1 stop at 10, or 3 stops at 10
        let change = make_route(vec![segment(1, "1", &[1, 2], 10), segment(2, "2", &[2, 3], 10)]);
        let direct = make_route(vec![segment(3, "3", &[1, 5, 6, 3], 10)]);

        let ranked = rank_routes(vec![change, direct]);

        assert_eq!(ranked[0].transfers(), 0);
        assert_eq!(ranked[1].transfers(), 1);
        assert_eq!(ranked[0].duration_mins(), ranked[1].duration_mins());
    }

    #[test]
    fn deduplicate_same_signature() {
        let a = make_route(vec![segment(1, "1", &[1, 2, 3], 5)]);
        let b = make_route(vec![segment(1, "1", &[1, 2, 3], 5)]);
        let first_id = a.id();

        let result = deduplicate(vec![a, b]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id(), first_id);
    }

    #[test]
    fn signature_uses_line_name_not_id() {
        // Two directions of the same named line traversing the same stops
        let a = make_route(vec![segment(1, "5", &[1, 2], 5)]);
        let b = make_route(vec![segment(2, "5", &[1, 2], 5)]);
        let c = make_route(vec![segment(3, "6", &[1, 2], 5)]);

        assert_eq!(signature(&a), signature(&b));
        assert_ne!(signature(&a), signature(&c));
        assert_eq!(deduplicate(vec![a, b, c]).len(), 2);
    }

    #[test]
    fn select_truncates() {
        let routes: Vec<Route> = (1..=15)
            .map(|n| make_route(vec![segment(n, &n.to_string(), &[1, 2], n as u32)]))
            .collect();

        let selected = select_routes(routes, 10);

        assert_eq!(selected.len(), 10);
        assert_eq!(selected[0].duration_mins(), 1);
        assert_eq!(selected[9].duration_mins(), 10);
    }

    #[test]
    fn empty_input() {
        assert!(rank_routes(vec![]).is_empty());
        assert!(deduplicate(vec![]).is_empty());
        assert!(select_routes(vec![], 10).is_empty());
    }
}
