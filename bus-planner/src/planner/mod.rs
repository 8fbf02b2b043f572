//! Route planner using a bounded BFS over lines.
//!
//! This module implements the core planning algorithm that answers:
//! "which buses get me from this station to that one, changing at most
//! N times?"
//!
//! Lines are treated as graph nodes, adjacent when they share a station.
//! Line sequences found by breadth-first search are expanded into
//! concrete routes, pruned, deduplicated and ranked.

mod config;
mod enumerate;
mod materialize;
mod rank;
mod search;

#[cfg(test)]
mod search_tests;

pub use config::{PlannerConfig, TransferChoice};
pub use rank::{Signature, deduplicate, rank_routes, select_routes, signature};
pub use search::{Planner, SearchRequest, SearchResult, search};
