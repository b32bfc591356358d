//! Timeline Overlays
//!
//! Labels attached to positions on the timeline:
//! - Inline overlays, painted inside the timeline body
//! - Overhead labels, painted in the fixed header strip
//!
//! Insertion order is paint order; later entries paint on top.

use std::sync::atomic::{AtomicU64, Ordering};

use md_core::{Color, TimeRange};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Overlay identity
pub type OverlayId = u64;

static NEXT_OVERLAY_ID: AtomicU64 = AtomicU64::new(1);

fn new_overlay_id() -> OverlayId {
    NEXT_OVERLAY_ID.fetch_add(1, Ordering::Relaxed)
}

/// What an overlay shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayContent {
    /// Label text
    pub text: String,
    /// Longer description (tooltip)
    pub description: String,
    /// Override colour; the theme colour is used when absent
    pub color: Option<Color>,
    /// Link opened when the label is clicked
    pub link: Option<String>,
}

impl OverlayContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OVERLAY ENTITIES
// ═══════════════════════════════════════════════════════════════════════════════

/// Label painted inside the timeline body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelOverlay {
    pub id: OverlayId,
    /// Time span covered (zero length for a point label)
    pub span: TimeRange,
    /// Vertical placement in `[0, 1]`, bottom to top (amplitude, pitch, ...)
    pub vertical: Option<f32>,
    pub content: OverlayContent,
}

impl LabelOverlay {
    pub fn new(span: TimeRange, content: OverlayContent) -> Self {
        Self {
            id: new_overlay_id(),
            span,
            vertical: None,
            content,
        }
    }

    pub fn with_vertical(mut self, vertical: f32) -> Self {
        self.vertical = Some(vertical.clamp(0.0, 1.0));
        self
    }
}

/// Label painted in the header strip above the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverheadLabel {
    pub id: OverlayId,
    pub span: TimeRange,
    pub content: OverlayContent,
}

impl OverheadLabel {
    pub fn new(span: TimeRange, content: OverlayContent) -> Self {
        Self {
            id: new_overlay_id(),
            span,
            content,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Owns all overlays of one display
#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    inline: Vec<LabelOverlay>,
    overhead: Vec<OverheadLabel>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inline overlay on top of the existing ones
    pub fn add_inline(&mut self, overlay: LabelOverlay) -> OverlayId {
        let id = overlay.id;
        self.inline.push(overlay);
        id
    }

    /// Add an overhead label on top of the existing ones
    pub fn add_overhead(&mut self, label: OverheadLabel) -> OverlayId {
        let id = label.id;
        self.overhead.push(label);
        id
    }

    /// Remove the first inline overlay with this identity. Unknown ids are ignored.
    pub fn remove_inline(&mut self, id: OverlayId) -> Option<LabelOverlay> {
        let pos = self.inline.iter().position(|o| o.id == id)?;
        Some(self.inline.remove(pos))
    }

    /// Remove the first overhead label with this identity. Unknown ids are ignored.
    pub fn remove_overhead(&mut self, id: OverlayId) -> Option<OverheadLabel> {
        let pos = self.overhead.iter().position(|o| o.id == id)?;
        Some(self.overhead.remove(pos))
    }

    /// Remove an overlay of either kind. Returns whether anything was removed.
    pub fn remove(&mut self, id: OverlayId) -> bool {
        self.remove_inline(id).is_some() || self.remove_overhead(id).is_some()
    }

    pub fn clear_all(&mut self) {
        self.inline.clear();
        self.overhead.clear();
    }

    /// Inline overlays in paint order
    pub fn iter_inline(&self) -> std::slice::Iter<'_, LabelOverlay> {
        self.inline.iter()
    }

    /// Overhead labels in paint order
    pub fn iter_overhead(&self) -> std::slice::Iter<'_, OverheadLabel> {
        self.overhead.iter()
    }

    /// Inline overlays touching `visible`, in paint order
    pub fn inline_in_range(&self, visible: TimeRange) -> impl Iterator<Item = &LabelOverlay> {
        self.inline.iter().filter(move |o| o.span.intersects(&visible))
    }

    /// Overhead labels touching `visible`, in paint order
    pub fn overhead_in_range(
        &self,
        visible: TimeRange,
    ) -> impl Iterator<Item = &OverheadLabel> {
        self.overhead
            .iter()
            .filter(move |o| o.span.intersects(&visible))
    }

    pub fn len_inline(&self) -> usize {
        self.inline.len()
    }

    pub fn len_overhead(&self) -> usize {
        self.overhead.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inline.is_empty() && self.overhead.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(at: f64, text: &str) -> LabelOverlay {
        LabelOverlay::new(TimeRange::at(at), OverlayContent::new(text))
    }

    #[test]
    fn test_remove_keeps_others() {
        let mut reg = OverlayRegistry::new();
        let l1 = reg.add_inline(inline(1.0, "L1"));
        let l2 = reg.add_inline(inline(2.0, "L2"));

        assert!(reg.remove_inline(l1).is_some());

        let ids: Vec<_> = reg.iter_inline().map(|o| o.id).collect();
        assert_eq!(ids, vec![l2]);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut reg = OverlayRegistry::new();
        reg.add_inline(inline(1.0, "L1"));
        assert!(reg.remove_inline(u64::MAX).is_none());
        assert!(!reg.remove(u64::MAX));
        assert_eq!(reg.len_inline(), 1);
    }

    #[test]
    fn test_paint_order_is_insertion_order() {
        let mut reg = OverlayRegistry::new();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            reg.add_overhead(OverheadLabel::new(
                TimeRange::at(3.0 - i as f64),
                OverlayContent::new(*name),
            ));
        }
        let names: Vec<_> = reg.iter_overhead().map(|o| o.content.text.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_searches_both_kinds() {
        let mut reg = OverlayRegistry::new();
        let head = reg.add_overhead(OverheadLabel::new(
            TimeRange::new(0.0, 1.0),
            OverlayContent::new("intro"),
        ));
        reg.add_inline(inline(0.5, "peak"));

        assert!(reg.remove(head));
        assert_eq!(reg.len_overhead(), 0);
        assert_eq!(reg.len_inline(), 1);

        reg.clear_all();
        assert!(reg.is_empty());
    }

    #[test]
    fn test_in_range() {
        let mut reg = OverlayRegistry::new();
        reg.add_inline(inline(1.0, "early"));
        reg.add_inline(LabelOverlay::new(
            TimeRange::new(4.0, 8.0),
            OverlayContent::new("long"),
        ));
        reg.add_inline(inline(9.5, "late"));

        let visible = TimeRange::new(5.0, 9.0);
        let names: Vec<_> = reg
            .inline_in_range(visible)
            .map(|o| o.content.text.clone())
            .collect();
        assert_eq!(names, vec!["long".to_string()]);
        assert_eq!(reg.overhead_in_range(visible).count(), 0);
    }

    #[test]
    fn test_vertical_clamped() {
        let o = inline(0.0, "x").with_vertical(1.7);
        assert_eq!(o.vertical, Some(1.0));
    }
}
