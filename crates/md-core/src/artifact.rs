//! Artifact references and the storage contract
//!
//! The history model never touches bytes directly. It holds [`ArtifactRef`]
//! handles and asks an [`ArtifactStore`] to resolve, read, write, allocate
//! and release them.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque handle to a file-like artifact (the target or a temporary snapshot)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactRef(PathBuf);

impl ArtifactRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Lower-cased extension without the dot
    pub fn extension(&self) -> Option<String> {
        self.0
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    /// File name for display
    pub fn file_name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for ArtifactRef {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&Path> for ArtifactRef {
    fn from(path: &Path) -> Self {
        Self(path.to_path_buf())
    }
}

impl From<&str> for ArtifactRef {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}

/// Storage provider errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Artifact not found: {0}")]
    NotFound(ArtifactRef),

    #[error("IO error on {artifact}: {source}")]
    Io {
        artifact: ArtifactRef,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn io(artifact: &ArtifactRef, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(artifact.clone())
        } else {
            Self::Io {
                artifact: artifact.clone(),
                source,
            }
        }
    }
}

/// External storage for targets and temporary snapshots
///
/// Implementations own the bytes; callers only pass handles around.
pub trait ArtifactStore {
    /// Check that the artifact exists and is accessible
    fn resolve(&self, artifact: &ArtifactRef) -> Result<(), StoreError>;

    /// Read the full content
    fn read(&self, artifact: &ArtifactRef) -> Result<Vec<u8>, StoreError>;

    /// Replace the full content. Either the whole write lands or nothing changes.
    fn write(&self, artifact: &ArtifactRef, content: &[u8]) -> Result<(), StoreError>;

    /// Create a new temporary artifact holding a copy of `derived_from`
    fn allocate(&self, derived_from: &ArtifactRef) -> Result<ArtifactRef, StoreError>;

    /// Dispose of a temporary artifact. Best effort.
    fn release(&self, artifact: &ArtifactRef) -> Result<(), StoreError>;
}
