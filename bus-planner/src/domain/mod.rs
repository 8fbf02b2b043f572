//! Domain types for the bus route planner.
//!
//! This module contains the validated value types shared by the graph
//! cache and the planner. Types enforce their invariants at construction
//! time, so code that receives them can trust their validity.

mod error;
mod id;
mod route;
mod station;

pub use error::DomainError;
pub use id::{InvalidId, LineId, StationId};
pub use route::{Route, RouteId, RouteSegment};
pub use station::{Line, Station};
