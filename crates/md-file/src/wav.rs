//! WAV header probing

use std::path::Path;

use md_core::{ArtifactRef, MdResult, MediaInfo, MediaProbe};

use crate::{FileError, FileResult};

/// Read length and format from a WAV header without decoding samples
pub fn probe_wav<P: AsRef<Path>>(path: P) -> FileResult<MediaInfo> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FileError::NotFound(path.display().to_string()));
    }

    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(FileError::WavError("zero sample rate".into()));
    }

    Ok(MediaInfo {
        length_secs: reader.duration() as f64 / spec.sample_rate as f64,
        sample_rate: Some(spec.sample_rate),
        channels: Some(spec.channels),
    })
}

/// [`MediaProbe`] for WAV files
#[derive(Debug, Clone, Copy, Default)]
pub struct WavProbe;

impl MediaProbe for WavProbe {
    fn probe(&self, artifact: &ArtifactRef) -> MdResult<MediaInfo> {
        match artifact.extension().as_deref() {
            Some("wav") | Some("wave") => Ok(probe_wav(artifact.path())?),
            other => Err(FileError::UnsupportedFormat(other.unwrap_or("none").to_string()).into()),
        }
    }
}
