//! Media Display
//!
//! Kind-agnostic coordinator behind a timeline view:
//! - Loading a target and navigating its edit history
//! - Reloading the media kind whenever the visible artifact changes
//! - Drag-and-drop intake
//! - Zoom/scroll state and playhead following
//! - Output labels and overlays

use std::path::PathBuf;

use md_core::{
    ArtifactRef, ArtifactStore, ColorRole, MainAreaPainter, MdError, MdResult, MediaKind,
    StaticTheme, ThemeProvider, TimeRange, Viewport,
};
use md_state::{
    ArtifactHistory, DisplayPreferences, HistoryListener, LabelOverlay, OverheadLabel, OverlayId,
    OverlayRegistry, ViewportPreferences,
};

use crate::{OutputLabel, PlacedLabel};

/// Timeline display for one media kind
pub struct MediaDisplay<K: MediaKind> {
    kind: K,
    history: ArtifactHistory,
    viewport: Viewport,
    viewport_prefs: ViewportPreferences,
    theme: StaticTheme,
}

impl<K: MediaKind> MediaDisplay<K> {
    pub fn new(kind: K, store: Box<dyn ArtifactStore>, prefs: &DisplayPreferences) -> Self {
        Self {
            kind,
            history: ArtifactHistory::with_preferences(store, &prefs.history),
            viewport: Viewport::new(prefs.viewport.min_visible_secs),
            viewport_prefs: prefs.viewport.clone(),
            theme: StaticTheme::for_variant(prefs.theme),
        }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut K {
        &mut self.kind
    }

    pub fn history(&self) -> &ArtifactHistory {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_preferences(&self) -> &ViewportPreferences {
        &self.viewport_prefs
    }

    /// Palette chosen in the preferences
    pub fn theme(&self) -> &StaticTheme {
        &self.theme
    }

    pub fn add_listener(&mut self, listener: Box<dyn HistoryListener>) {
        self.history.add_listener(listener);
    }

    pub fn handler_instructions(&self) -> &str {
        self.kind.handler_instructions()
    }

    // ============ Target & history ============

    /// Open a new target, discarding the previous session
    ///
    /// The file is checked and parsed before anything changes: a missing,
    /// unsupported or unreadable file leaves the current session as it was.
    pub fn setup_display(&mut self, target: ArtifactRef) -> MdResult<()> {
        if !self.kind.accepts(&target) {
            return Err(MdError::UnsupportedMedia(target.to_string()));
        }
        if let Err(e) = self.history.store().resolve(&target) {
            log::warn!("Cannot open {}: {}", target, e);
            return Err(MdError::InvalidTarget(target));
        }
        if let Err(e) = self.kind.load_media_file(&target) {
            log::error!("Failed to load {}: {}", target, e);
            return Err(e);
        }
        if let Err(e) = self.history.load(target) {
            self.restore_media();
            return Err(e);
        }

        self.kind.stop_playing();
        self.kind.set_playback_position(0.0);
        self.viewport.set_total_length(self.kind.total_length_secs());
        Ok(())
    }

    /// Reload the media from the visible artifact, keeping zoom and playhead
    pub fn update_display(&mut self) -> MdResult<()> {
        let current = self
            .history
            .current_snapshot_ref()
            .cloned()
            .ok_or(MdError::NoTarget)?;
        self.show(&current)
    }

    /// Record an in-place edit step: the visible artifact is copied to a new
    /// tail snapshot, which the caller then modifies and shows with
    /// [`update_display`](Self::update_display)
    pub fn add_new_temp_file(&mut self) -> MdResult<ArtifactRef> {
        self.history.record_edit().cloned()
    }

    /// Register a snapshot produced by an external process and show it
    ///
    /// The snapshot must parse before it enters the history, so a bad result
    /// never prunes the redo branch.
    pub fn add_external_result(&mut self, snapshot: ArtifactRef) -> MdResult<()> {
        if self.history.target().is_none() {
            return Err(MdError::NoTarget);
        }
        if self.history.store().resolve(&snapshot).is_err() {
            return Err(MdError::InvalidTarget(snapshot));
        }
        self.show(&snapshot)?;
        if let Err(e) = self.history.record_snapshot(snapshot) {
            self.restore_media();
            return Err(e);
        }
        Ok(())
    }

    /// Show the previous snapshot. Ok(false) at the head.
    ///
    /// If the snapshot cannot be loaded the cursor is put back.
    pub fn iterate_previous_temp_file(&mut self) -> MdResult<bool> {
        if !self.history.step_back() {
            return Ok(false);
        }
        if let Err(e) = self.update_display() {
            log::warn!("Cannot show previous snapshot: {}", e);
            self.history.step_forward();
            return Err(e);
        }
        Ok(true)
    }

    /// Show the next snapshot. Ok(false) at the tail.
    ///
    /// If the snapshot cannot be loaded the cursor is put back.
    pub fn iterate_next_temp_file(&mut self) -> MdResult<bool> {
        if !self.history.step_forward() {
            return Ok(false);
        }
        if let Err(e) = self.update_display() {
            log::warn!("Cannot show next snapshot: {}", e);
            self.history.step_back();
            return Err(e);
        }
        Ok(true)
    }

    /// Write the visible artifact over the target
    pub fn overwrite_target(&self) -> MdResult<()> {
        self.history.commit()
    }

    pub fn target_file_path(&self) -> Option<&ArtifactRef> {
        self.history.target()
    }

    pub fn temp_file_path(&self) -> Option<&ArtifactRef> {
        self.history.current_snapshot_ref()
    }

    pub fn is_file_loaded(&self) -> bool {
        self.history.has_content()
    }

    // ============ Drag and drop ============

    /// Whether a drag over the display carries anything loadable
    pub fn is_interested_in_file_drag(&self, paths: &[PathBuf]) -> bool {
        paths
            .iter()
            .any(|p| self.kind.accepts(&ArtifactRef::from(p.as_path())))
    }

    /// Keep the first acceptable path of a drop. Returns whether one was taken.
    pub fn files_dropped(&mut self, paths: &[PathBuf]) -> bool {
        let Some(path) = paths
            .iter()
            .map(|p| ArtifactRef::from(p.as_path()))
            .find(|r| self.kind.accepts(r))
        else {
            log::debug!("Ignoring drop of {} unsupported file(s)", paths.len());
            return false;
        };
        self.history.dropped_mut().set(path);
        true
    }

    pub fn dropped_file_path(&self) -> Option<&ArtifactRef> {
        self.history.dropped().get()
    }

    pub fn is_file_dropped(&self) -> bool {
        self.history.dropped().has_dropped()
    }

    pub fn clear_dropped_file(&mut self) {
        self.history.dropped_mut().clear();
    }

    // ============ Transport ============

    pub fn start(&mut self) {
        self.kind.start_playing();
    }

    pub fn stop(&mut self) {
        self.kind.stop_playing();
    }

    pub fn is_playing(&self) -> bool {
        self.kind.is_playing()
    }

    pub fn playback_position(&self) -> f64 {
        self.kind.playback_position()
    }

    pub fn set_playback_position(&mut self, secs: f64) {
        self.kind.set_playback_position(secs);
    }

    /// Periodic update: page the view along with the playhead.
    /// Returns whether the visible range moved.
    pub fn tick(&mut self) -> bool {
        if !self.kind.is_playing() {
            return false;
        }
        self.viewport.follow(self.kind.playback_position())
    }

    // ============ Viewport ============

    pub fn visible_range(&self) -> TimeRange {
        self.viewport.visible()
    }

    pub fn update_visible_range(&mut self, range: TimeRange) {
        self.viewport.set_visible(range);
    }

    pub fn zoom(&mut self, factor: f64, anchor_secs: f64) {
        self.viewport.zoom(factor, anchor_secs);
    }

    /// Zoom by wheel notches (positive zooms in) around `anchor_secs`
    pub fn wheel_zoom(&mut self, notches: f64, anchor_secs: f64) {
        let factor = self.viewport_prefs.wheel_zoom_step.powf(notches);
        self.viewport.zoom(factor, anchor_secs);
    }

    pub fn scroll_to(&mut self, start_secs: f64) {
        self.viewport.scroll_to(start_secs);
    }

    // ============ Labels ============

    pub fn overlays(&self) -> &OverlayRegistry {
        self.history.overlays()
    }

    /// Place processing output on the display
    pub fn add_labels(&mut self, labels: &[OutputLabel]) -> Vec<OverlayId> {
        labels
            .iter()
            .map(|label| match PlacedLabel::from(label) {
                PlacedLabel::Inline(o) => self.history.overlays_mut().add_inline(o),
                PlacedLabel::Overhead(o) => self.history.overlays_mut().add_overhead(o),
            })
            .collect()
    }

    pub fn add_label_overlay(&mut self, overlay: LabelOverlay) -> OverlayId {
        self.history.overlays_mut().add_inline(overlay)
    }

    pub fn add_overhead_label(&mut self, label: OverheadLabel) -> OverlayId {
        self.history.overlays_mut().add_overhead(label)
    }

    pub fn remove_output_label(&mut self, id: OverlayId) -> bool {
        self.history.overlays_mut().remove(id)
    }

    pub fn clear_labels(&mut self) {
        self.history.overlays_mut().clear_all();
    }

    // ============ Drawing ============

    /// Emit the main area, the labels and the playhead for the visible range
    pub fn draw(&self, painter: &mut dyn MainAreaPainter, theme: &dyn ThemeProvider) {
        let visible = self.viewport.visible();
        self.kind.draw_main_area(painter, visible);

        let overlays = self.history.overlays();
        let inline_color = theme.resolve(ColorRole::InlineOverlay);
        for overlay in overlays.inline_in_range(visible) {
            painter.inline_overlay(
                overlay.span,
                overlay.vertical,
                &overlay.content.text,
                overlay.content.color.unwrap_or(inline_color),
            );
        }
        let overhead_color = theme.resolve(ColorRole::OverheadLabel);
        for label in overlays.overhead_in_range(visible) {
            painter.overhead_label(
                label.span,
                &label.content.text,
                label.content.color.unwrap_or(overhead_color),
            );
        }

        painter.playback_cursor(
            self.kind.playback_position(),
            theme.resolve(ColorRole::PlaybackCursor),
        );
    }

    // ============ Internals ============

    /// Load `artifact` into the kind, keeping zoom and playhead where possible
    fn show(&mut self, artifact: &ArtifactRef) -> MdResult<()> {
        let position = self.kind.playback_position();
        let visible = self.viewport.visible();

        self.kind.load_media_file(artifact)?;

        self.viewport.set_total_length(self.kind.total_length_secs());
        if !visible.is_empty() {
            self.viewport.set_visible(visible);
        }
        self.kind.set_playback_position(position);
        Ok(())
    }

    /// Put the kind back on whatever the history shows
    fn restore_media(&mut self) {
        let Some(current) = self.history.current_snapshot_ref().cloned() else {
            self.kind.reset();
            self.viewport.set_total_length(0.0);
            return;
        };
        if let Err(e) = self.show(&current) {
            log::warn!("Failed to restore {}: {}", current, e);
        }
    }
}
