//! Drag-and-drop slot

use md_core::ArtifactRef;

/// Holds the most recently dropped file until the host consumes it
///
/// Each drop replaces the previous one whether or not it was consumed.
#[derive(Debug, Clone, Default)]
pub struct DroppedSlot {
    dropped: Option<ArtifactRef>,
}

impl DroppedSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, artifact: ArtifactRef) {
        log::debug!("Dropped file: {}", artifact);
        self.dropped = Some(artifact);
    }

    pub fn get(&self) -> Option<&ArtifactRef> {
        self.dropped.as_ref()
    }

    /// Consume the dropped file
    pub fn take(&mut self) -> Option<ArtifactRef> {
        self.dropped.take()
    }

    pub fn clear(&mut self) {
        self.dropped = None;
    }

    pub fn has_dropped(&self) -> bool {
        self.dropped.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_drop_wins() {
        let mut slot = DroppedSlot::new();
        assert!(!slot.has_dropped());

        slot.set(ArtifactRef::new("/a.wav"));
        slot.set(ArtifactRef::new("/b.wav"));
        assert_eq!(slot.get(), Some(&ArtifactRef::new("/b.wav")));

        assert_eq!(slot.take(), Some(ArtifactRef::new("/b.wav")));
        assert!(!slot.has_dropped());

        slot.set(ArtifactRef::new("/c.wav"));
        slot.clear();
        assert!(slot.get().is_none());
    }
}
