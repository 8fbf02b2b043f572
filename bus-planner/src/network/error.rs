//! Network source error types.

use std::path::PathBuf;

/// Errors that can occur when loading network records.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Reading or writing the backing file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not valid network JSON
    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The source could not provide data
    #[error("network source unavailable: {0}")]
    Unavailable(String),
}
