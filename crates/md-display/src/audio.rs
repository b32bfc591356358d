//! Audio media kind

use md_core::{
    ArtifactRef, MainAreaPainter, MdError, MdResult, MediaInfo, MediaKind, MediaProbe, TimeRange,
    Transport,
};
use md_file::WavProbe;

const WAV_EXTENSIONS: &[&str] = &["wav", "wave"];

/// Waveform display kind
pub struct AudioMedia {
    probe: Box<dyn MediaProbe>,
    extensions: Vec<&'static str>,
    info: Option<MediaInfo>,
    transport: Transport,
}

impl AudioMedia {
    /// WAV-only audio kind
    pub fn new() -> Self {
        Self::with_probe(Box::new(WavProbe), WAV_EXTENSIONS)
    }

    /// Audio kind backed by another probe (e.g. a compressed-format reader)
    pub fn with_probe(probe: Box<dyn MediaProbe>, extensions: &[&'static str]) -> Self {
        Self {
            probe,
            extensions: extensions.to_vec(),
            info: None,
            transport: Transport::default(),
        }
    }

    pub fn info(&self) -> Option<&MediaInfo> {
        self.info.as_ref()
    }
}

impl Default for AudioMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaKind for AudioMedia {
    fn name(&self) -> &str {
        "Audio"
    }

    fn instance_extensions(&self) -> &[&'static str] {
        &self.extensions
    }

    fn handler_instructions(&self) -> &str {
        "Drop an audio file here, or click and drag to move the playhead."
    }

    fn load_media_file(&mut self, artifact: &ArtifactRef) -> MdResult<()> {
        if !self.accepts(artifact) {
            return Err(MdError::UnsupportedMedia(artifact.to_string()));
        }

        let info = self.probe.probe(artifact)?;
        log::debug!("Audio loaded: {} ({:.3}s)", artifact, info.length_secs);

        self.transport.set_length(info.length_secs);
        self.info = Some(info);
        Ok(())
    }

    fn reset(&mut self) {
        self.info = None;
        self.transport = Transport::default();
    }

    fn total_length_secs(&self) -> f64 {
        self.info.map_or(0.0, |i| i.length_secs)
    }

    fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    fn start_playing(&mut self) {
        if self.info.is_some() {
            self.transport.start();
        }
    }

    fn stop_playing(&mut self) {
        self.transport.stop();
    }

    fn playback_position(&self) -> f64 {
        self.transport.position()
    }

    fn set_playback_position(&mut self, secs: f64) {
        self.transport.set_position(secs);
    }

    fn draw_main_area(&self, painter: &mut dyn MainAreaPainter, visible: TimeRange) {
        let Some(info) = self.info else {
            return;
        };
        let start = visible.start.max(0.0);
        let end = visible.end.min(info.length_secs);
        if end > start {
            painter.media_span(TimeRange::new(start, end));
        }
    }
}
