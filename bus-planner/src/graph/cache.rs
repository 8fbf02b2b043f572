//! Shared graph cache with atomic snapshot publication.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{info, warn};

use crate::domain::StationId;
use crate::network::{NetworkData, NetworkError, NetworkSource};

use super::snapshot::{BuildStats, GraphSnapshot};

/// Thread-safe holder of the current graph snapshot.
///
/// `rebuild` loads fresh records from the source, builds a complete new
/// snapshot off to the side and then swaps it in. Readers take an
/// `Arc<GraphSnapshot>` and keep using it for as long as they need; they
/// see either the old or the new snapshot, never a partially built one.
pub struct GraphCache {
    source: Box<dyn NetworkSource>,
    current: RwLock<Arc<GraphSnapshot>>,
    rebuild_lock: Mutex<()>,
}

impl GraphCache {
    /// Create a cache over `source`, starting from an empty snapshot.
    ///
    /// Call [`GraphCache::rebuild`] to load the network.
    pub fn new(source: impl NetworkSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            current: RwLock::new(Arc::new(GraphSnapshot::empty())),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Create a cache over in-memory records, already built.
    pub fn from_data(data: NetworkData) -> Self {
        let snapshot = GraphSnapshot::build(&data);
        Self {
            source: Box::new(data),
            current: RwLock::new(Arc::new(snapshot)),
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Create a cache over `source` and load it immediately.
    pub fn load(source: impl NetworkSource + 'static) -> Result<Self, NetworkError> {
        let cache = Self::new(source);
        cache.rebuild()?;
        Ok(cache)
    }

    /// Reload the network and publish a new snapshot.
    ///
    /// Rebuilds are serialised. On failure the existing snapshot is
    /// preserved and the error is returned.
    pub fn rebuild(&self) -> Result<BuildStats, NetworkError> {
        let _guard = self
            .rebuild_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let data = match self.source.load() {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Network reload failed, keeping previous snapshot");
                return Err(e);
            }
        };

        let snapshot = GraphSnapshot::build(&data);
        let stats = snapshot.stats();

        {
            let mut current = self
                .current
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *current = Arc::new(snapshot);
        }

        info!(
            stations = stats.stations,
            lines = stats.lines,
            memberships = stats.memberships,
            skipped_records = stats.skipped_records,
            skipped_memberships = stats.skipped_memberships,
            "Graph cache rebuilt"
        );

        Ok(stats)
    }

    /// Get the currently published snapshot.
    pub fn snapshot(&self) -> Arc<GraphSnapshot> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    /// Resolve user input to a station in the current snapshot.
    pub fn resolve_identifier(&self, text: &str) -> Option<StationId> {
        self.snapshot().resolve_identifier(text)
    }
}

impl std::fmt::Debug for GraphCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.snapshot().stats();
        f.debug_struct("GraphCache")
            .field("stations", &stats.stations)
            .field("lines", &stats.lines)
            .finish_non_exhaustive()
    }
}
