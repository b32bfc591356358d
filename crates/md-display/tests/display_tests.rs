//! End-to-end display tests over the filesystem store

use std::path::{Path, PathBuf};

use crossbeam_channel::unbounded;
use md_core::{ArtifactRef, MdError, MdResult, MediaKind, NoteEvent, NoteSource, TimeRange};
use md_display::{AudioMedia, MediaDisplay, NoteSequenceMedia, OutputLabel};
use md_file::{FsArtifactStore, probe_wav};
use md_state::{DisplayPreferences, HistoryEvent};

const RATE: u32 = 8000;

fn write_wav(path: &Path, secs: f64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (secs * RATE as f64) as u32;
    for i in 0..frames {
        let s = ((i as f32 * 0.05).sin() * 8000.0) as i16;
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

fn audio_display(dir: &Path) -> MediaDisplay<AudioMedia> {
    let store = FsArtifactStore::new(&dir.join("snapshots")).unwrap();
    MediaDisplay::new(
        AudioMedia::new(),
        Box::new(store),
        &DisplayPreferences::default(),
    )
}

#[test]
fn test_edit_session_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("take.wav");
    write_wav(&target, 2.0);

    let mut display = audio_display(dir.path());
    display.setup_display(ArtifactRef::from(target.as_path())).unwrap();
    assert!((display.kind().total_length_secs() - 2.0).abs() < 1e-6);

    // Trim to one second
    let s1 = display.add_new_temp_file().unwrap();
    assert_ne!(s1.path(), target.as_path());
    write_wav(s1.path(), 1.0);
    display.update_display().unwrap();
    assert!((display.kind().total_length_secs() - 1.0).abs() < 1e-6);

    // Trim again, then change our mind
    let s2 = display.add_new_temp_file().unwrap();
    write_wav(s2.path(), 0.5);
    display.update_display().unwrap();
    assert!(display.iterate_previous_temp_file().unwrap());
    assert_eq!(display.temp_file_path(), Some(&s1));

    // Editing from the middle drops the redo branch
    let s3 = display.add_new_temp_file().unwrap();
    assert!(!s2.path().exists());
    assert_eq!(display.history().len(), 2);
    assert!(!display.iterate_next_temp_file().unwrap());

    display.overwrite_target().unwrap();
    let info = probe_wav(&target).unwrap();
    assert!((info.length_secs - 1.0).abs() < 1e-6);
    assert!(s3.path().exists());
}

#[test]
fn test_reload_discards_session() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.wav");
    let second = dir.path().join("second.wav");
    write_wav(&first, 1.0);
    write_wav(&second, 3.0);

    let mut display = audio_display(dir.path());
    let (tx, rx) = unbounded();
    display.add_listener(Box::new(tx));

    display.setup_display(ArtifactRef::from(first.as_path())).unwrap();
    let s1 = display.add_new_temp_file().unwrap();
    display.add_labels(&[OutputLabel::new(0.2, "click")]);
    display.files_dropped(&[second.clone()]);

    display.setup_display(ArtifactRef::from(second.as_path())).unwrap();
    assert!(!s1.path().exists());
    assert!(!display.is_file_loaded());
    assert!(display.overlays().is_empty());
    assert!(!display.is_file_dropped());
    assert!((display.kind().total_length_secs() - 3.0).abs() < 1e-6);

    let events: Vec<HistoryEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            HistoryEvent::Reset,
            HistoryEvent::VisibleArtifactChanged(s1),
            HistoryEvent::Reset,
        ]
    );
}

#[test]
fn test_commit_to_read_only_target_fails() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("locked.wav");
    write_wav(&target, 1.0);

    let mut display = audio_display(dir.path());
    display.setup_display(ArtifactRef::from(target.as_path())).unwrap();
    let s1 = display.add_new_temp_file().unwrap();
    write_wav(s1.path(), 0.25);

    let mut perms = std::fs::metadata(&target).unwrap().permissions();
    perms.set_readonly(true);
    std::fs::set_permissions(&target, perms).unwrap();

    assert!(matches!(
        display.overwrite_target(),
        Err(MdError::CommitFailed { .. })
    ));
    assert_eq!(display.temp_file_path(), Some(&s1));
    assert!((probe_wav(&target).unwrap().length_secs - 1.0).abs() < 1e-6);
}

#[test]
fn test_missing_target_keeps_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("take.wav");
    write_wav(&target, 1.0);

    let mut display = audio_display(dir.path());
    display.setup_display(ArtifactRef::from(target.as_path())).unwrap();
    let s1 = display.add_new_temp_file().unwrap();

    let missing = dir.path().join("gone.wav");
    assert!(matches!(
        display.setup_display(ArtifactRef::from(missing.as_path())),
        Err(MdError::InvalidTarget(_))
    ));
    assert_eq!(display.temp_file_path(), Some(&s1));
    assert!(s1.path().exists());
}

struct FakeMidi;

impl NoteSource for FakeMidi {
    fn notes(&self, artifact: &ArtifactRef) -> MdResult<Vec<NoteEvent>> {
        let bytes = std::fs::read(artifact.path())?;
        Ok(bytes
            .iter()
            .enumerate()
            .map(|(i, p)| NoteEvent::new(*p, 100, i as f64 * 0.5, 0.5))
            .collect())
    }
}

#[test]
fn test_note_sequence_display() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("riff.mid");
    std::fs::write(&target, [60u8, 62, 64, 65]).unwrap();

    let store = FsArtifactStore::new(&dir.path().join("snapshots")).unwrap();
    let mut display = MediaDisplay::new(
        NoteSequenceMedia::new(Box::new(FakeMidi)),
        Box::new(store),
        &DisplayPreferences::default(),
    );

    assert!(!display.files_dropped(&[PathBuf::from("x.wav")]));
    assert!(display.files_dropped(&[target.clone()]));
    let dropped = display.dropped_file_path().cloned().unwrap();

    display.setup_display(dropped).unwrap();
    assert_eq!(display.kind().total_length_secs(), 2.0);
    assert_eq!(display.visible_range(), TimeRange::new(0.0, 2.0));

    let s1 = display.add_new_temp_file().unwrap();
    std::fs::write(s1.path(), [60u8, 67]).unwrap();
    display.update_display().unwrap();
    assert_eq!(display.kind().total_length_secs(), 1.0);
    assert_eq!(display.kind().notes().len(), 2);
}

#[test]
fn test_corrupt_file_leaves_session_alone() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("take.wav");
    write_wav(&target, 2.0);
    let corrupt = dir.path().join("corrupt.wav");
    std::fs::write(&corrupt, b"RIFF....WAVEnot really a wave file").unwrap();

    let mut display = audio_display(dir.path());
    display.setup_display(ArtifactRef::from(target.as_path())).unwrap();
    let s1 = display.add_new_temp_file().unwrap();
    write_wav(s1.path(), 1.0);
    display.update_display().unwrap();

    assert!(display.setup_display(ArtifactRef::from(corrupt.as_path())).is_err());

    assert_eq!(
        display.target_file_path(),
        Some(&ArtifactRef::from(target.as_path()))
    );
    assert_eq!(display.history().len(), 1);
    assert_eq!(display.temp_file_path(), Some(&s1));
    assert!(s1.path().exists());
    assert!((display.kind().total_length_secs() - 1.0).abs() < 1e-6);
}

#[test]
fn test_navigating_to_deleted_snapshot_stays_put() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("take.wav");
    write_wav(&target, 2.0);

    let mut display = audio_display(dir.path());
    let (tx, rx) = unbounded();
    display.add_listener(Box::new(tx));
    display.setup_display(ArtifactRef::from(target.as_path())).unwrap();

    let s1 = display.add_new_temp_file().unwrap();
    write_wav(s1.path(), 1.0);
    let s2 = display.add_new_temp_file().unwrap();
    write_wav(s2.path(), 0.5);
    display.update_display().unwrap();
    let _ = rx.try_iter().count();

    std::fs::remove_file(s1.path()).unwrap();
    assert!(display.iterate_previous_temp_file().is_err());

    assert_eq!(display.temp_file_path(), Some(&s2));
    assert_eq!(display.history().cursor(), Some(1));
    assert!((display.kind().total_length_secs() - 0.5).abs() < 1e-6);
    // Listeners end on the snapshot actually shown
    let events: Vec<HistoryEvent> = rx.try_iter().collect();
    assert_eq!(events.last(), Some(&HistoryEvent::VisibleArtifactChanged(s2)));
}
