//! End-to-end tests for route search.

use super::*;
use crate::domain::{LineId, Route, StationId};
use crate::graph::{GraphCache, GraphSnapshot};
use crate::network::{
    JsonFileSource, LineRecord, MembershipRecord, NetworkData, NetworkSource, StationRecord,
};
use std::sync::{Arc, Mutex};

fn sid(n: i64) -> StationId {
    StationId::new(n).unwrap()
}

fn sids(raw: &[i64]) -> Vec<StationId> {
    raw.iter().map(|&n| sid(n)).collect()
}

fn lid(n: i64) -> LineId {
    LineId::new(n).unwrap()
}

/// Stations 1..=n named "Stop n", plus the given lines as (id, interval, stops).
fn network(station_count: i64, lines: &[(i64, Option<i32>, &[i64])]) -> NetworkData {
    let mut data = NetworkData {
        stations: (1..=station_count)
            .map(|n| StationRecord::new(n, format!("Stop {n}")))
            .collect(),
        ..NetworkData::default()
    };
    for &(id, interval, stops) in lines {
        data.push_line(LineRecord::new(id, format!("Line {id}"), interval), stops);
    }
    data
}

/// Line 1 (every 5 min): 1-2-3-4-5; Line 2 (every 10 min): 5-6-7.
fn two_line_network() -> NetworkData {
    network(7, &[(1, Some(5), &[1, 2, 3, 4, 5]), (2, Some(10), &[5, 6, 7])])
}

fn find(data: NetworkData, start: &str, end: &str, max_transfers: usize) -> Vec<Route> {
    let cache = GraphCache::from_data(data);
    let config = PlannerConfig::default();
    Planner::new(&cache, &config).find_routes(start, end, max_transfers)
}

#[test]
fn direct_route_on_one_line() {
    let routes = find(two_line_network(), "1", "5", 0);

    assert_eq!(routes.len(), 1);
    let route = &routes[0];
    assert_eq!(route.transfers(), 0);
    assert_eq!(route.duration_mins(), 20);
    assert_eq!(route.segments().len(), 1);

    let seg = &route.segments()[0];
    assert_eq!(seg.line(), lid(1));
    assert_eq!(seg.stations(), sids(&[1, 2, 3, 4, 5]).as_slice());
    assert_eq!(seg.stops_count(), 4);
    assert_eq!(seg.duration_mins(), 20);
}

#[test]
fn one_transfer_route() {
    let routes = find(two_line_network(), "1", "7", 1);

    assert_eq!(routes.len(), 1);
    let route = &routes[0];
    assert_eq!(route.transfers(), 1);
    assert_eq!(route.total_stops(), 6);
    assert_eq!(route.duration_mins(), 50);

    let first = &route.segments()[0];
    assert_eq!(first.line(), lid(1));
    assert_eq!((first.from(), first.to()), (sid(1), sid(5)));
    assert_eq!(first.stations(), sids(&[1, 2, 3, 4, 5]).as_slice());
    assert_eq!(first.stops_count(), 4);
    assert_eq!(first.duration_mins(), 20);

    let second = &route.segments()[1];
    assert_eq!(second.line(), lid(2));
    assert_eq!((second.from(), second.to()), (sid(5), sid(7)));
    assert_eq!(second.stations(), sids(&[5, 6, 7]).as_slice());
    assert_eq!(second.stops_count(), 2);
    assert_eq!(second.duration_mins(), 20);
}

#[test]
fn no_route_without_transfers() {
    assert!(find(two_line_network(), "1", "7", 0).is_empty());
}

#[test]
fn dangling_membership_is_ignored() {
    let mut data = two_line_network();
    data.memberships.push(MembershipRecord {
        line_id: 2,
        station_id: 999,
        sequence: 4,
    });

    let routes = find(data, "1", "7", 1);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].destination(), sid(7));
    assert!(find(two_line_network(), "1", "999", 1).is_empty());
}

#[test]
fn file_with_bad_line_time_still_routes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("network.json");
    std::fs::write(
        &path,
        r#"{
            "stations": [
                {"id": 1, "name": "Harbour"},
                {"id": 2, "name": "Market Street"},
                {"id": 3, "name": "Museum"}
            ],
            "lines": [
                {"id": 1, "name": "1", "start_time": "06:00", "interval_minutes": 5},
                {"id": 2, "name": "2", "start_time": "25:99", "interval_minutes": 5}
            ],
            "memberships": [
                {"line_id": 1, "station_id": 1, "sequence": 1},
                {"line_id": 1, "station_id": 2, "sequence": 2},
                {"line_id": 2, "station_id": 2, "sequence": 1},
                {"line_id": 2, "station_id": 3, "sequence": 2}
            ]
        }"#,
    )
    .unwrap();

    let cache = GraphCache::load(JsonFileSource::new(&path)).unwrap();
    assert_eq!(cache.snapshot().stats().lines, 2);

    let config = PlannerConfig::default();
    let routes = Planner::new(&cache, &config).find_routes("Harbour", "Museum", 1);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].lines(), vec![lid(1), lid(2)]);
}

#[test]
fn same_station_is_empty() {
    for k in 0..4 {
        assert!(find(two_line_network(), "3", "3", k).is_empty());
    }
    // Id and name resolving to the same station
    assert!(find(two_line_network(), "3", "Stop 3", 2).is_empty());
}

#[test]
fn unresolvable_endpoints_are_empty() {
    assert!(find(two_line_network(), "Airport", "7", 2).is_empty());
    assert!(find(two_line_network(), "1", "", 2).is_empty());
    assert!(find(two_line_network(), "   ", "7", 2).is_empty());
}

#[test]
fn endpoints_resolve_by_name() {
    let routes = find(two_line_network(), "Stop 1", "Stop 7", 1);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].origin(), sid(1));
}

#[test]
fn reverse_direction_is_ridden() {
    let routes = find(two_line_network(), "7", "1", 1);

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].segments()[0].stations(), sids(&[7, 6, 5]).as_slice());
    assert_eq!(
        routes[0].segments()[1].stations(),
        sids(&[5, 4, 3, 2, 1]).as_slice()
    );
}

#[test]
fn premature_transfer_is_never_returned() {
    // Line 2 branches off line 1 at 3 and rejoins at 5
    let data = network(6, &[(1, Some(5), &[1, 2, 3, 4, 5]), (2, Some(1), &[3, 6, 5])]);

    for choice in [TransferChoice::First, TransferChoice::All] {
        let cache = GraphCache::from_data(data.clone());
        let config = PlannerConfig::default().with_transfer_choice(choice);
        let routes = Planner::new(&cache, &config).find_routes("1", "5", 1);

        assert_eq!(routes.len(), 1, "{choice:?}");
        assert_eq!(routes[0].lines(), vec![lid(1)]);
    }
}

#[test]
fn faster_transfer_ranks_before_slow_direct() {
    let data = network(
        4,
        &[(1, Some(30), &[1, 2, 3]), (2, Some(5), &[1, 4]), (3, Some(5), &[4, 3])],
    );

    let routes = find(data, "1", "3", 1);

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].transfers(), 1);
    assert_eq!(routes[0].duration_mins(), 20);
    assert_eq!(routes[1].transfers(), 0);
    assert_eq!(routes[1].duration_mins(), 60);
}

#[test]
fn results_are_capped_at_ten() {
    const STOPS: &[i64] = &[1, 2];
    let lines: Vec<(i64, Option<i32>, &[i64])> =
        (1..=12).map(|id| (id, Some(id as i32), STOPS)).collect();
    let routes = find(network(2, &lines), "1", "2", 0);

    assert_eq!(routes.len(), 10);
    let durations: Vec<u32> = routes.iter().map(Route::duration_mins).collect();
    assert_eq!(durations, (1..=10).collect::<Vec<u32>>());
}

#[test]
fn two_transfers_need_two_allowed() {
    let data = network(4, &[(1, None, &[1, 2]), (2, None, &[2, 3]), (3, None, &[3, 4])]);

    assert!(find(data.clone(), "1", "4", 1).is_empty());

    let routes = find(data, "1", "4", 2);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].transfers(), 2);
    assert_eq!(routes[0].duration_mins(), 5 + 5 + 5 + 20);
}

#[test]
fn requested_transfers_are_clamped() {
    let data = network(4, &[(1, None, &[1, 2]), (2, None, &[2, 3]), (3, None, &[3, 4])]);
    let cache = GraphCache::from_data(data);
    let config = PlannerConfig {
        max_transfers_limit: 1,
        ..PlannerConfig::default()
    };

    assert!(Planner::new(&cache, &config).find_routes("1", "4", 5).is_empty());
}

#[test]
fn all_transfer_choices_can_find_quicker_change() {
    // Changing at 2 is forced by `First`; changing at 3 is quicker
    let data = network(
        8,
        &[(1, Some(5), &[1, 2, 3]), (2, Some(5), &[2, 6, 7, 3, 4])],
    );
    let cache = GraphCache::from_data(data);

    let first = PlannerConfig::default();
    let routes = Planner::new(&cache, &first).find_routes("1", "4", 1);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].duration_mins(), 35);

    let all = PlannerConfig::default().with_transfer_choice(TransferChoice::All);
    let routes = Planner::new(&cache, &all).find_routes("1", "4", 1);
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].duration_mins(), 25);
    assert_eq!(routes[0].segments()[0].to(), sid(3));
    assert_eq!(routes[1].duration_mins(), 35);
}

#[test]
fn plan_reports_statistics() {
    let cache = GraphCache::from_data(two_line_network());
    let config = PlannerConfig::default();

    let result = Planner::new(&cache, &config).plan(&SearchRequest::new("1", "7", 2));

    assert_eq!(result.endpoints, Some((sid(1), sid(7))));
    assert_eq!(result.sequences, 1);
    assert_eq!(result.candidates, 1);
    assert_eq!(result.routes.len(), 1);
    assert!(result.paths_explored >= 1);
    assert!(!result.truncated);
}

#[test]
fn candidate_budget_bounds_all_transfer_choices() {
    // Lines 1-3 share ten stations, so every change between them has ten options
    const SHARED: &[i64] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    let data = network(
        11,
        &[(1, None, SHARED), (2, None, SHARED), (3, None, SHARED), (4, None, &[10, 11])],
    );
    let cache = GraphCache::from_data(data);
    let request = SearchRequest::new("1", "11", 2);

    let all = PlannerConfig::default().with_transfer_choice(TransferChoice::All);
    let full = Planner::new(&cache, &all).plan(&request);
    assert!(!full.truncated);

    let bounded = all.clone().with_max_candidates(20);
    let result = Planner::new(&cache, &bounded).plan(&request);
    assert!(result.truncated);
    assert!(result.candidates <= 20);
    assert!(result.candidates < full.candidates);
    assert_eq!(result.routes[0].duration_mins(), full.routes[0].duration_mins());
}

#[test]
fn plan_with_unresolved_endpoint_has_no_endpoints() {
    let cache = GraphCache::from_data(two_line_network());
    let config = PlannerConfig::default();

    let result = Planner::new(&cache, &config).plan(&SearchRequest::new("1", "nowhere", 2));
    assert_eq!(result.endpoints, None);
    assert!(result.routes.is_empty());
}

/// Source the test can change between rebuilds.
struct SharedSource(Arc<Mutex<NetworkData>>);

impl NetworkSource for SharedSource {
    fn load(&self) -> Result<NetworkData, crate::network::NetworkError> {
        Ok(self.0.lock().unwrap().clone())
    }
}

#[test]
fn planner_sees_rebuilt_network() {
    let shared = Arc::new(Mutex::new(two_line_network()));
    let cache = GraphCache::load(SharedSource(Arc::clone(&shared))).unwrap();
    let config = PlannerConfig::default();
    let planner = Planner::new(&cache, &config);

    assert!(planner.find_routes("1", "7", 0).is_empty());

    shared
        .lock()
        .unwrap()
        .push_line(LineRecord::new(3, "Express", Some(3)), &[1, 7]);
    cache.rebuild().unwrap();

    let routes = planner.find_routes("1", "7", 0);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].segments()[0].line_name(), "Express");
}

#[test]
fn search_works_on_a_bare_snapshot() {
    let snapshot = GraphSnapshot::build(&two_line_network());
    let result = search(
        &snapshot,
        &SearchRequest::new("2", "6", 1),
        &PlannerConfig::default(),
    );

    assert_eq!(result.routes.len(), 1);
    assert_eq!(result.routes[0].lines(), vec![lid(1), lid(2)]);
    assert_eq!(result.routes[0].segments()[0].stations(), sids(&[2, 3, 4, 5]).as_slice());
}

mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const STATIONS: i64 = 8;

    /// A random network: up to five lines, each visiting 2-5 distinct stations.
    fn network_strategy() -> impl Strategy<Value = NetworkData> {
        let line = (
            prop::sample::subsequence((1..=STATIONS).collect::<Vec<i64>>(), 2..=5).prop_shuffle(),
            prop::option::of(-2i32..12),
        );
        prop::collection::vec(line, 1..=5).prop_map(|lines| {
            let mut data = NetworkData {
                stations: (1..=STATIONS)
                    .map(|n| StationRecord::new(n, format!("Stop {n}")))
                    .collect(),
                ..NetworkData::default()
            };
            for (i, (stops, interval)) in lines.into_iter().enumerate() {
                let id = i as i64 + 1;
                data.push_line(LineRecord::new(id, format!("Line {id}"), interval), &stops);
            }
            data
        })
    }

    fn choice_strategy() -> impl Strategy<Value = TransferChoice> {
        prop_oneof![Just(TransferChoice::First), Just(TransferChoice::All)]
    }

    fn run(
        data: &NetworkData,
        start: i64,
        end: i64,
        k: usize,
        choice: TransferChoice,
    ) -> (GraphSnapshot, Vec<Route>) {
        let snapshot = GraphSnapshot::build(data);
        let config = PlannerConfig::default().with_transfer_choice(choice);
        let request = SearchRequest::new(start.to_string(), end.to_string(), k);
        let routes = search(&snapshot, &request, &config).routes;
        (snapshot, routes)
    }

    proptest! {
        #[test]
        fn routes_respect_transfer_bound(
            data in network_strategy(),
            start in 1..=STATIONS,
            end in 1..=STATIONS,
            k in 0usize..3,
            choice in choice_strategy(),
        ) {
            let (_, routes) = run(&data, start, end, k, choice);

            prop_assert!(routes.len() <= 10);
            for route in &routes {
                prop_assert!(route.transfers() <= k);
                prop_assert_eq!(route.transfers(), route.segments().len() - 1);
                prop_assert_eq!(
                    route.total_stops(),
                    route.segments().iter().map(|s| s.stops_count()).sum::<usize>()
                );
            }
        }

        #[test]
        fn routes_are_sorted_and_unique(
            data in network_strategy(),
            start in 1..=STATIONS,
            end in 1..=STATIONS,
            k in 0usize..3,
            choice in choice_strategy(),
        ) {
            let (_, routes) = run(&data, start, end, k, choice);

            for window in routes.windows(2) {
                let a = (window[0].duration_mins(), window[0].transfers());
                let b = (window[1].duration_mins(), window[1].transfers());
                prop_assert!(a <= b, "Not sorted: {:?} before {:?}", a, b);
            }

            let signatures: HashSet<Signature> = routes.iter().map(signature).collect();
            prop_assert_eq!(signatures.len(), routes.len());
        }

        #[test]
        fn routes_are_contiguous(
            data in network_strategy(),
            start in 1..=STATIONS,
            end in 1..=STATIONS,
            k in 0usize..3,
            choice in choice_strategy(),
        ) {
            let (snapshot, routes) = run(&data, start, end, k, choice);

            if start == end {
                prop_assert!(routes.is_empty());
            }
            for route in &routes {
                prop_assert_eq!(route.origin(), sid(start));
                prop_assert_eq!(route.destination(), sid(end));
                for pair in route.segments().windows(2) {
                    prop_assert_eq!(pair[0].to(), pair[1].from());
                }
                for seg in route.segments() {
                    // Every traversed run is a contiguous slice of the line, in either direction
                    let stops = snapshot.line_stops(seg.line());
                    let from = snapshot.position(seg.line(), seg.from()).unwrap();
                    let to = snapshot.position(seg.line(), seg.to()).unwrap();
                    let expected: Vec<StationId> = if from < to {
                        stops[from..=to].to_vec()
                    } else {
                        stops[to..=from].iter().rev().copied().collect()
                    };
                    prop_assert_eq!(seg.stations(), expected.as_slice());
                }
            }
        }

        #[test]
        fn pruning_rules_hold(
            data in network_strategy(),
            start in 1..=STATIONS,
            end in 1..=STATIONS,
            k in 0usize..3,
            choice in choice_strategy(),
        ) {
            let (snapshot, routes) = run(&data, start, end, k, choice);
            let end = sid(end);

            for route in &routes {
                let (last, earlier) = route.segments().split_last().unwrap();
                prop_assert_eq!(last.stations().last(), Some(&end));
                prop_assert_eq!(last.stations().iter().filter(|&&s| s == end).count(), 1);

                for seg in earlier {
                    // Overshoot: no earlier segment passes the destination
                    prop_assert!(!seg.stations().contains(&end));

                    // Premature transfer: the destination is not further along this line
                    if let Some(dest) = snapshot.position(seg.line(), end) {
                        let from = snapshot.position(seg.line(), seg.from()).unwrap();
                        let to = snapshot.position(seg.line(), seg.to()).unwrap();
                        let ahead = if from < to { dest > to } else { dest < to };
                        prop_assert!(!ahead);
                    }
                }
            }
        }

        #[test]
        fn direct_search_has_no_transfers(
            data in network_strategy(),
            start in 1..=STATIONS,
            end in 1..=STATIONS,
        ) {
            let (snapshot, routes) = run(&data, start, end, 0, TransferChoice::First);

            let direct_lines = snapshot
                .station_lines(sid(start))
                .filter(|&l| snapshot.serves(l, sid(end)))
                .count();
            if start != end {
                prop_assert_eq!(routes.len(), direct_lines.min(10));
            }
            prop_assert!(routes.iter().all(|r| r.transfers() == 0));
        }

        #[test]
        fn resolve_identifier_returns_exact_id(data in network_strategy(), n in 1..=STATIONS) {
            let snapshot = GraphSnapshot::build(&data);
            prop_assert_eq!(snapshot.resolve_identifier(&n.to_string()), Some(sid(n)));
        }
    }
}
