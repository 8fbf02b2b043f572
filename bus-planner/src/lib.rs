//! Bus route planner.
//!
//! Finds bus routes between two stations, with transfers, over an
//! in-memory graph of stations and lines that is rebuilt whenever the
//! underlying network data changes.

pub mod domain;
pub mod dto;
pub mod graph;
pub mod network;
pub mod planner;
