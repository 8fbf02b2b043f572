//! In-memory graph of stations and lines.
//!
//! The graph is rebuilt wholesale from source records whenever the data
//! collaborator reports a change. Queries work against an immutable
//! snapshot, so a rebuild never disturbs a query in flight.

mod cache;
mod snapshot;

pub use cache::GraphCache;
pub use snapshot::{BuildStats, GraphSnapshot};
