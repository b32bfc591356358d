//! File I/O error types

use md_core::MdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("WAV error: {0}")]
    WavError(String),
}

pub type FileResult<T> = Result<T, FileError>;

impl From<hound::Error> for FileError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => FileError::Io(e),
            other => FileError::WavError(other.to_string()),
        }
    }
}

impl From<FileError> for MdError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::Io(e) => MdError::Io(e),
            FileError::UnsupportedFormat(f) => MdError::UnsupportedMedia(f),
            other => MdError::Media(other.to_string()),
        }
    }
}
