//! Artifact History
//!
//! Linear edit history for one target file:
//! - The target is the file the user opened and eventually overwrites
//! - Each edit produces a temporary snapshot appended to the sequence
//! - A cursor selects the visible snapshot; stepping moves it
//! - Recording an edit away from the tail discards the snapshots after the cursor
//! - Commit copies the visible snapshot over the target
//!
//! There is no branching: a discarded future is gone for good.

use md_core::{ArtifactRef, ArtifactStore, MdError, MdResult};

use crate::{DroppedSlot, HistoryListener, HistoryPreferences, OverlayRegistry};

/// Snapshot history anchored to a target artifact
pub struct ArtifactHistory {
    /// Storage for target and snapshots
    store: Box<dyn ArtifactStore>,
    /// File being edited (None until the first load)
    target: Option<ArtifactRef>,
    /// Snapshots in creation order
    snapshots: Vec<ArtifactRef>,
    /// Visible snapshot index (None while `snapshots` is empty)
    cursor: Option<usize>,
    /// Overlays cleared on every load
    overlays: OverlayRegistry,
    /// Drag-and-drop slot cleared on every load
    dropped: DroppedSlot,
    /// Change listeners
    listeners: Vec<Box<dyn HistoryListener>>,
    /// Snapshot cap (0 = unbounded)
    max_snapshots: usize,
    /// Hand discarded snapshots back to the store
    release_discarded: bool,
}

impl ArtifactHistory {
    pub fn new(store: Box<dyn ArtifactStore>) -> Self {
        Self::with_preferences(store, &HistoryPreferences::default())
    }

    pub fn with_preferences(store: Box<dyn ArtifactStore>, prefs: &HistoryPreferences) -> Self {
        Self {
            store,
            target: None,
            snapshots: Vec::new(),
            cursor: None,
            overlays: OverlayRegistry::new(),
            dropped: DroppedSlot::new(),
            listeners: Vec::new(),
            max_snapshots: prefs.max_snapshots,
            release_discarded: prefs.release_discarded,
        }
    }

    /// Register a change listener
    pub fn add_listener(&mut self, listener: Box<dyn HistoryListener>) {
        self.listeners.push(listener);
    }

    /// Set max snapshots (0 = unbounded). Trims immediately if needed.
    pub fn set_max_snapshots(&mut self, max: usize) {
        self.max_snapshots = max;
        if self.trim_to_cap() {
            self.notify_visible_changed();
        }
    }

    // ============ Operations ============

    /// Anchor the history to a new target
    ///
    /// Validates before touching anything: on `InvalidTarget` the previous
    /// session is left as it was.
    pub fn load(&mut self, target: ArtifactRef) -> MdResult<()> {
        if let Err(e) = self.store.resolve(&target) {
            log::warn!("Cannot load {}: {}", target, e);
            return Err(MdError::InvalidTarget(target));
        }

        let old = std::mem::take(&mut self.snapshots);
        self.release_all(old);

        log::info!("Loaded target {}", target);
        self.target = Some(target);
        self.cursor = None;
        self.overlays.clear_all();
        self.dropped.clear();

        for listener in &mut self.listeners {
            listener.on_reset();
        }
        Ok(())
    }

    /// Record a duplicate of the visible artifact as the new tail snapshot
    ///
    /// For edits the caller applies in place to the returned snapshot. A
    /// result that an external process has already produced goes through
    /// [`record_snapshot`](Self::record_snapshot) once it exists.
    pub fn record_edit(&mut self) -> MdResult<&ArtifactRef> {
        let source = self
            .current_snapshot_ref()
            .cloned()
            .ok_or(MdError::NoTarget)?;
        let snapshot = self
            .store
            .allocate(&source)
            .map_err(MdError::SnapshotFailed)?;

        log::debug!("Recorded edit {} (from {})", snapshot, source);
        Ok(self.push_snapshot(snapshot))
    }

    /// Record a finished snapshot produced by an external edit
    pub fn record_snapshot(&mut self, snapshot: ArtifactRef) -> MdResult<&ArtifactRef> {
        if self.target.is_none() {
            return Err(MdError::NoTarget);
        }
        if self.store.resolve(&snapshot).is_err() {
            return Err(MdError::InvalidTarget(snapshot));
        }

        log::debug!("Recorded external snapshot {}", snapshot);
        Ok(self.push_snapshot(snapshot))
    }

    /// Move the cursor one snapshot back. False at the head.
    pub fn step_back(&mut self) -> bool {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                log::debug!("History step back to {}", c - 1);
                self.notify_visible_changed();
                true
            }
            _ => false,
        }
    }

    /// Move the cursor one snapshot forward. False at the tail.
    pub fn step_forward(&mut self) -> bool {
        match self.cursor {
            Some(c) if c + 1 < self.snapshots.len() => {
                self.cursor = Some(c + 1);
                log::debug!("History step forward to {}", c + 1);
                self.notify_visible_changed();
                true
            }
            _ => false,
        }
    }

    /// Visible snapshot, or the target while there are no snapshots
    ///
    /// None only before the first successful load.
    pub fn current_snapshot_ref(&self) -> Option<&ArtifactRef> {
        self.cursor
            .and_then(|c| self.snapshots.get(c))
            .or(self.target.as_ref())
    }

    /// Write the visible artifact over the target
    ///
    /// History and cursor are untouched whether or not the write succeeds.
    pub fn commit(&self) -> MdResult<()> {
        let target = self.target.as_ref().ok_or(MdError::NoTarget)?;
        let source = self.current_snapshot_ref().ok_or(MdError::NoTarget)?;

        let content = self
            .store
            .read(source)
            .map_err(|source| MdError::CommitFailed {
                target: target.clone(),
                source,
            })?;
        self.store
            .write(target, &content)
            .map_err(|source| MdError::CommitFailed {
                target: target.clone(),
                source,
            })?;

        log::info!("Committed {} to {}", source, target);
        Ok(())
    }

    /// True once at least one snapshot exists
    pub fn has_content(&self) -> bool {
        !self.snapshots.is_empty()
    }

    // ============ Queries ============

    pub fn target(&self) -> Option<&ArtifactRef> {
        self.target.as_ref()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[ArtifactRef] {
        &self.snapshots
    }

    pub fn can_step_back(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_step_forward(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.snapshots.len())
    }

    pub fn max_snapshots(&self) -> usize {
        self.max_snapshots
    }

    pub fn store(&self) -> &dyn ArtifactStore {
        self.store.as_ref()
    }

    pub fn overlays(&self) -> &OverlayRegistry {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut OverlayRegistry {
        &mut self.overlays
    }

    pub fn dropped(&self) -> &DroppedSlot {
        &self.dropped
    }

    pub fn dropped_mut(&mut self) -> &mut DroppedSlot {
        &mut self.dropped
    }

    /// Get summary for UI display
    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            target: self.target.clone(),
            total_snapshots: self.snapshots.len(),
            cursor: self.cursor,
            can_step_back: self.can_step_back(),
            can_step_forward: self.can_step_forward(),
            current: self.current_snapshot_ref().cloned(),
        }
    }

    // ============ Internals ============

    fn push_snapshot(&mut self, snapshot: ArtifactRef) -> &ArtifactRef {
        // Discard the future beyond the cursor
        let keep = self.cursor.map_or(0, |c| c + 1);
        if keep < self.snapshots.len() {
            let future = self.snapshots.split_off(keep);
            log::debug!("Discarding {} future snapshot(s)", future.len());
            self.release_all(future);
        }

        self.snapshots.push(snapshot);
        self.cursor = Some(self.snapshots.len() - 1);
        self.trim_to_cap();

        self.notify_visible_changed();
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// Drop the oldest snapshots beyond the cap. Returns whether anything went.
    fn trim_to_cap(&mut self) -> bool {
        if self.max_snapshots == 0 || self.snapshots.len() <= self.max_snapshots {
            return false;
        }

        let excess = self.snapshots.len() - self.max_snapshots;
        let oldest: Vec<_> = self.snapshots.drain(..excess).collect();
        self.cursor = self.cursor.map(|c| c.saturating_sub(excess));
        log::debug!("History cap {} reached, dropped {} snapshot(s)", self.max_snapshots, excess);
        self.release_all(oldest);
        true
    }

    fn release_all(&self, snapshots: Vec<ArtifactRef>) {
        if !self.release_discarded {
            return;
        }
        for snapshot in snapshots {
            if let Err(e) = self.store.release(&snapshot) {
                log::warn!("Failed to release snapshot {}: {}", snapshot, e);
            }
        }
    }

    fn notify_visible_changed(&mut self) {
        let Some(current) = self
            .cursor
            .and_then(|c| self.snapshots.get(c))
            .or(self.target.as_ref())
        else {
            return;
        };
        for listener in &mut self.listeners {
            listener.on_visible_artifact_changed(current);
        }
    }
}

/// History summary for UI
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySummary {
    pub target: Option<ArtifactRef>,
    pub total_snapshots: usize,
    pub cursor: Option<usize>,
    pub can_step_back: bool,
    pub can_step_forward: bool,
    pub current: Option<ArtifactRef>,
}

// ============ Tests ============
