//! JSON file-backed network source.

use std::path::{Path, PathBuf};

use super::error::NetworkError;
use super::records::NetworkData;
use super::NetworkSource;

/// Network records stored as a single JSON document on disk.
///
/// Each `load` re-reads the file, so a rebuild picks up whatever the data
/// collaborator last wrote.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write records to the backing file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, data: &NetworkData) -> Result<(), NetworkError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let json = serde_json::to_string_pretty(data).map_err(|source| NetworkError::Json {
            path: self.path.clone(),
            source,
        })?;

        std::fs::write(&self.path, json).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> NetworkError {
        NetworkError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl NetworkSource for JsonFileSource {
    fn load(&self) -> Result<NetworkData, NetworkError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        serde_json::from_str(&contents).map_err(|source| NetworkError::Json {
            path: self.path.clone(),
            source,
        })
    }
}
