//! Note-sequence (piano roll) media kind

use md_core::{
    ArtifactRef, MainAreaPainter, MdError, MdResult, MediaKind, NoteEvent, NoteSource, TimeRange,
    Transport,
};

const MIDI_EXTENSIONS: &[&str] = &["mid", "midi"];

/// Piano-roll display kind; events come from an injected [`NoteSource`]
pub struct NoteSequenceMedia {
    source: Box<dyn NoteSource>,
    notes: Vec<NoteEvent>,
    loaded: bool,
    transport: Transport,
}

impl NoteSequenceMedia {
    pub fn new(source: Box<dyn NoteSource>) -> Self {
        Self {
            source,
            notes: Vec::new(),
            loaded: false,
            transport: Transport::default(),
        }
    }

    /// Notes sorted by start time
    pub fn notes(&self) -> &[NoteEvent] {
        &self.notes
    }
}

impl MediaKind for NoteSequenceMedia {
    fn name(&self) -> &str {
        "MIDI"
    }

    fn instance_extensions(&self) -> &[&'static str] {
        MIDI_EXTENSIONS
    }

    fn handler_instructions(&self) -> &str {
        "Drop a MIDI file here, or click and drag to move the playhead."
    }

    fn load_media_file(&mut self, artifact: &ArtifactRef) -> MdResult<()> {
        if !self.accepts(artifact) {
            return Err(MdError::UnsupportedMedia(artifact.to_string()));
        }

        let mut notes = self.source.notes(artifact)?;
        notes.sort_by(|a, b| a.start.total_cmp(&b.start));
        log::debug!("Loaded {} notes from {}", notes.len(), artifact);

        self.notes = notes;
        self.loaded = true;
        self.transport.set_length(self.total_length_secs());
        Ok(())
    }

    fn reset(&mut self) {
        self.notes.clear();
        self.loaded = false;
        self.transport = Transport::default();
    }

    fn total_length_secs(&self) -> f64 {
        self.notes.iter().map(NoteEvent::end).fold(0.0, f64::max)
    }

    fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    fn start_playing(&mut self) {
        if self.loaded {
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
        for note in self.notes.iter().filter(|n| n.span().intersects(&visible)) {
            painter.note(note.span(), note.pitch, note.velocity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<NoteEvent>);

    impl NoteSource for Fixed {
        fn notes(&self, _artifact: &ArtifactRef) -> MdResult<Vec<NoteEvent>> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct Pitches(Vec<u8>);

    impl MainAreaPainter for Pitches {
        fn media_span(&mut self, _range: TimeRange) {}

        fn note(&mut self, _span: TimeRange, pitch: u8, _velocity: u8) {
            self.0.push(pitch);
        }

        fn playback_cursor(&mut self, _time: f64, _color: md_core::Color) {}
    }

    #[test]
    fn test_length_and_order() {
        let mut roll = NoteSequenceMedia::new(Box::new(Fixed(vec![
            NoteEvent::new(64, 100, 2.0, 1.5),
            NoteEvent::new(60, 100, 0.0, 0.5),
        ])));
        roll.load_media_file(&ArtifactRef::new("/song.mid")).unwrap();

        assert_eq!(roll.total_length_secs(), 3.5);
        assert_eq!(roll.notes()[0].pitch, 60);

        let mut pitches = Pitches::default();
        roll.draw_main_area(&mut pitches, TimeRange::new(1.0, 2.5));
        assert_eq!(pitches.0, vec![64]);
    }

    #[test]
    fn test_empty_sequence() {
        let mut roll = NoteSequenceMedia::new(Box::new(Fixed(Vec::new())));
        roll.load_media_file(&ArtifactRef::new("/empty.midi")).unwrap();
        assert_eq!(roll.total_length_secs(), 0.0);
        assert!(matches!(
            roll.load_media_file(&ArtifactRef::new("/a.wav")),
            Err(MdError::UnsupportedMedia(_))
        ));
    }
}
