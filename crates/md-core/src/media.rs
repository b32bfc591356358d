//! Media kinds and their collaborators
//!
//! A [`MediaKind`] supplies the format-specific part of a display: loading,
//! length, transport and main-area drawing. History and overlays stay
//! kind-agnostic and live next to it.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{ArtifactRef, Color, MdResult, TimeRange};

/// Basic facts about a loaded media file
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub length_secs: f64,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
}

/// Reads [`MediaInfo`] from an artifact without decoding it for playback
pub trait MediaProbe {
    fn probe(&self, artifact: &ArtifactRef) -> MdResult<MediaInfo>;
}

/// A single note, timed in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub pitch: u8,
    pub velocity: u8,
    pub start: f64,
    pub length: f64,
}

impl NoteEvent {
    pub fn new(pitch: u8, velocity: u8, start: f64, length: f64) -> Self {
        Self {
            pitch: pitch.min(127),
            velocity: velocity.min(127),
            start: start.max(0.0),
            length: length.max(0.0),
        }
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.length
    }

    #[inline]
    pub fn span(&self) -> TimeRange {
        TimeRange::with_length(self.start, self.length)
    }
}

/// Supplies decoded note events for a note-sequence artifact
pub trait NoteSource {
    fn notes(&self, artifact: &ArtifactRef) -> MdResult<Vec<NoteEvent>>;
}

/// Narrow drawing interface the renderer implements for the main area
///
/// Only time values cross this boundary.
pub trait MainAreaPainter {
    /// A stretch of continuous media (e.g. a waveform) to draw
    fn media_span(&mut self, range: TimeRange);

    /// A note block
    fn note(&mut self, _span: TimeRange, _pitch: u8, _velocity: u8) {}

    /// A label inside the main area; `vertical` is in `[0, 1]`, bottom to top
    fn inline_overlay(
        &mut self,
        _span: TimeRange,
        _vertical: Option<f32>,
        _text: &str,
        _color: Color,
    ) {
    }

    /// A label in the strip above the main area
    fn overhead_label(&mut self, _span: TimeRange, _text: &str, _color: Color) {}

    /// The playhead
    fn playback_cursor(&mut self, time: f64, color: Color);
}

/// Format-specific behaviour of a media display
pub trait MediaKind {
    /// Display name of the kind ("Audio", "MIDI", ...)
    fn name(&self) -> &str;

    /// Lower-case file extensions this kind can load, without the dot
    fn instance_extensions(&self) -> &[&'static str];

    /// Hint shown to the user about what this display accepts
    fn handler_instructions(&self) -> &str {
        ""
    }

    /// Whether a dropped or opened file is loadable by this kind
    fn accepts(&self, artifact: &ArtifactRef) -> bool {
        artifact
            .extension()
            .is_some_and(|ext| self.instance_extensions().iter().any(|e| *e == ext))
    }

    /// Load (or reload) the media behind `artifact`
    ///
    /// On error the previously loaded media must stay in place.
    fn load_media_file(&mut self, artifact: &ArtifactRef) -> MdResult<()>;

    /// Forget loaded media and stop playback
    fn reset(&mut self);

    fn total_length_secs(&self) -> f64;

    fn is_playing(&self) -> bool;
    fn start_playing(&mut self);
    fn stop_playing(&mut self);

    fn playback_position(&self) -> f64;
    fn set_playback_position(&mut self, secs: f64);

    /// Emit the main area content for the visible range
    fn draw_main_area(&self, painter: &mut dyn MainAreaPainter, visible: TimeRange);
}

/// Wall-clock transport used when no playback engine drives the position
#[derive(Debug, Clone, Default)]
pub struct Transport {
    length: f64,
    anchor: f64,
    started: Option<Instant>,
}

impl Transport {
    pub fn new(length: f64) -> Self {
        Self {
            length: length.max(0.0),
            anchor: 0.0,
            started: None,
        }
    }

    pub fn set_length(&mut self, length: f64) {
        self.length = length.max(0.0);
        self.anchor = self.anchor.min(self.length);
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn start(&mut self) {
        if self.started.is_none() {
            if self.anchor >= self.length {
                self.anchor = 0.0;
            }
            self.started = Some(Instant::now());
        }
    }

    pub fn stop(&mut self) {
        self.anchor = self.position();
        self.started = None;
    }

    /// Playing and not yet past the end
    pub fn is_playing(&self) -> bool {
        self.started.is_some() && self.position() < self.length
    }

    pub fn position(&self) -> f64 {
        let elapsed = self
            .started
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        (self.anchor + elapsed).min(self.length)
    }

    pub fn set_position(&mut self, secs: f64) {
        self.anchor = if secs.is_finite() {
            secs.clamp(0.0, self.length)
        } else {
            0.0
        };
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_event_clamps() {
        let n = NoteEvent::new(200, 90, -1.0, 0.5);
        assert_eq!(n.pitch, 127);
        assert_eq!(n.start, 0.0);
        assert_eq!(n.end(), 0.5);
    }

    #[test]
    fn test_transport_position() {
        let mut t = Transport::new(10.0);
        assert!(!t.is_playing());

        t.set_position(4.0);
        assert_eq!(t.position(), 4.0);

        t.set_position(42.0);
        assert_eq!(t.position(), 10.0);

        // Starting at the end rewinds
        t.start();
        assert!(t.position() < 1.0);
        t.stop();
        assert!(!t.is_playing());
    }

    #[test]
    fn test_transport_length_shrink() {
        let mut t = Transport::new(10.0);
        t.set_position(8.0);
        t.set_length(5.0);
        assert_eq!(t.position(), 5.0);
    }
}
