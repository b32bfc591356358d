//! Change notification contract
//!
//! Listeners are called synchronously, before the triggering call returns,
//! and always observe the history in its final state for that call.

use md_core::ArtifactRef;

/// Observer for history changes
pub trait HistoryListener {
    /// A new target was loaded and everything else was cleared
    fn on_reset(&mut self);

    /// The visible artifact moved (navigation or a recorded edit)
    fn on_visible_artifact_changed(&mut self, current: &ArtifactRef);
}

/// History change as a message, for hosts that drain an event queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    Reset,
    VisibleArtifactChanged(ArtifactRef),
}

/// Pushes events onto a channel the host drains on its event loop
impl HistoryListener for crossbeam_channel::Sender<HistoryEvent> {
    fn on_reset(&mut self) {
        if self.send(HistoryEvent::Reset).is_err() {
            log::debug!("History event receiver dropped");
        }
    }

    fn on_visible_artifact_changed(&mut self, current: &ArtifactRef) {
        if self
            .send(HistoryEvent::VisibleArtifactChanged(current.clone()))
            .is_err()
        {
            log::debug!("History event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_listener() {
        let (mut tx, rx) = crossbeam_channel::unbounded();
        tx.on_reset();
        tx.on_visible_artifact_changed(&ArtifactRef::new("/tmp/x-1.wav"));

        assert_eq!(rx.try_recv(), Ok(HistoryEvent::Reset));
        assert_eq!(
            rx.try_recv(),
            Ok(HistoryEvent::VisibleArtifactChanged(ArtifactRef::new(
                "/tmp/x-1.wav"
            )))
        );
    }

    #[test]
    fn test_channel_listener_survives_dropped_receiver() {
        let (mut tx, rx) = crossbeam_channel::unbounded::<HistoryEvent>();
        drop(rx);
        tx.on_reset();
    }
}
