//! Source data for the route planner.
//!
//! Station, line and membership records are owned by an external data
//! collaborator. This module defines the record shapes the graph cache is
//! built from and the `NetworkSource` trait the cache reloads them through.

mod error;
mod file;
mod records;

pub use error::NetworkError;
pub use file::JsonFileSource;
pub use records::{LineRecord, MembershipRecord, NetworkData, StationRecord, parse_time_of_day};

/// Trait for loading the current network records.
///
/// The graph cache calls `load` on every rebuild. Implementations must
/// return memberships for each line; ordering is not required.
pub trait NetworkSource: Send + Sync {
    /// Load a full copy of the current records.
    fn load(&self) -> Result<NetworkData, NetworkError>;
}

impl NetworkSource for NetworkData {
    fn load(&self) -> Result<NetworkData, NetworkError> {
        Ok(self.clone())
    }
}
