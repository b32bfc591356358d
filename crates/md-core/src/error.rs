//! Error types for MediaDeck

use thiserror::Error;

use crate::{ArtifactRef, StoreError};

/// Core error type
#[derive(Error, Debug)]
pub enum MdError {
    #[error("Invalid target: {0}")]
    InvalidTarget(ArtifactRef),

    #[error("Commit to {target} failed: {source}")]
    CommitFailed {
        target: ArtifactRef,
        #[source]
        source: StoreError,
    },

    #[error("Could not create snapshot: {0}")]
    SnapshotFailed(#[source] StoreError),

    #[error("No target loaded")]
    NoTarget,

    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type MdResult<T> = Result<T, MdError>;
