//! Timeline time types
//!
//! Everything here is in seconds. Pixel mapping belongs to the renderer.

use serde::{Deserialize, Serialize};

/// Half-open time range `[start, end)` in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub const EMPTY: Self = Self { start: 0.0, end: 0.0 };

    /// Create a range, swapping the bounds if given in reverse
    #[inline]
    pub fn new(start: f64, end: f64) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    #[inline]
    pub fn at(time: f64) -> Self {
        Self::new(time, time)
    }

    #[inline]
    pub fn with_length(start: f64, length: f64) -> Self {
        Self::new(start, start + length.max(0.0))
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length() <= 0.0
    }

    /// Whether `time` lies inside the range. A zero-length range contains its own start.
    pub fn contains(&self, time: f64) -> bool {
        if self.is_empty() {
            time == self.start
        } else {
            time >= self.start && time < self.end
        }
    }

    /// Whether the two ranges share any instant. Point ranges count as touching.
    pub fn intersects(&self, other: &TimeRange) -> bool {
        if self.is_empty() {
            return other.contains(self.start);
        }
        if other.is_empty() {
            return self.contains(other.start);
        }
        self.start < other.end && other.start < self.end
    }

    /// Same length, new start
    pub fn moved_to(&self, start: f64) -> Self {
        Self::with_length(start, self.length())
    }
}

/// Smallest visible span used when preferences don't say otherwise
pub const DEFAULT_MIN_VISIBLE_SECS: f64 = 0.01;

/// Visible window over a piece of media of known length
///
/// Tracks zoom and scroll in time units only. The renderer maps the visible
/// range onto its own pixel geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    total: f64,
    visible: TimeRange,
    min_visible: f64,
}

impl Viewport {
    pub fn new(min_visible: f64) -> Self {
        Self {
            total: 0.0,
            visible: TimeRange::EMPTY,
            min_visible: min_visible.max(0.0),
        }
    }

    #[inline]
    pub fn total_length(&self) -> f64 {
        self.total
    }

    #[inline]
    pub fn visible(&self) -> TimeRange {
        self.visible
    }

    /// How many times the full length fits into the visible range
    pub fn zoom_factor(&self) -> f64 {
        let len = self.visible.length();
        if len <= 0.0 { 1.0 } else { self.total / len }
    }

    /// Set media length and show all of it
    pub fn set_total_length(&mut self, total: f64) {
        self.total = if total.is_finite() { total.max(0.0) } else { 0.0 };
        self.reset();
    }

    /// Show the full length
    pub fn reset(&mut self) {
        self.visible = TimeRange::new(0.0, self.total);
    }

    /// Set the visible range, clamped to the media bounds
    pub fn set_visible(&mut self, range: TimeRange) {
        self.visible = self.clamp(range.start, range.length());
    }

    /// Zoom by `factor` (> 1 zooms in) keeping `anchor` at the same relative spot
    pub fn zoom(&mut self, factor: f64, anchor: f64) {
        if !(factor.is_finite() && factor > 0.0) || self.total <= 0.0 {
            return;
        }

        let len = self.visible.length().max(f64::MIN_POSITIVE);
        let anchor = anchor.clamp(self.visible.start, self.visible.end);
        let rel = (anchor - self.visible.start) / len;
        let new_len = len / factor;
        let new_start = anchor - rel * new_len;

        self.visible = self.clamp(new_start, new_len);
    }

    /// Move the visible window to start at `start`, keeping its length
    pub fn scroll_to(&mut self, start: f64) {
        self.visible = self.clamp(start, self.visible.length());
    }

    /// Page the window so `position` is visible. Returns whether it moved.
    pub fn follow(&mut self, position: f64) -> bool {
        if self.visible.is_empty() || self.visible.contains(position) {
            return false;
        }
        let before = self.visible;
        self.scroll_to(position);
        self.visible != before
    }

    fn clamp(&self, start: f64, length: f64) -> TimeRange {
        if self.total <= 0.0 {
            return TimeRange::EMPTY;
        }
        let length = length.max(self.min_visible.min(self.total)).min(self.total);
        let start = start.clamp(0.0, self.total - length);
        TimeRange::with_length(start, length)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_VISIBLE_SECS)
    }
}
