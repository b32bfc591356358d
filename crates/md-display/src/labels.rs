//! Output labels returned by processing and their overlay placement

use md_core::{Color, TimeRange};
use md_state::{LabelOverlay, OverheadLabel, OverlayContent};
use serde::{Deserialize, Serialize};

/// Vertical anchor carried by some labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LabelAnchor {
    /// Waveform amplitude in `[-1, 1]`
    Amplitude(f32),
    /// Frequency in Hz (spectrogram labels)
    Frequency(f32),
    /// MIDI pitch
    Pitch(u8),
}

impl LabelAnchor {
    /// Position in `[0, 1]`, bottom to top
    pub fn vertical(self) -> f32 {
        match self {
            Self::Amplitude(a) => (a.clamp(-1.0, 1.0) + 1.0) / 2.0,
            // Log scale over 20 Hz .. 20 kHz
            Self::Frequency(hz) => ((hz.max(20.0) / 20.0).log2() / 1000f32.log2()).clamp(0.0, 1.0),
            Self::Pitch(p) => p.min(127) as f32 / 127.0,
        }
    }
}

/// A label produced by a processing step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputLabel {
    /// Start time (seconds)
    pub time: f64,
    /// Length (seconds); point label when absent
    pub duration: Option<f64>,
    pub text: String,
    #[serde(default)]
    pub description: String,
    pub color: Option<Color>,
    pub link: Option<String>,
    pub anchor: Option<LabelAnchor>,
}

impl OutputLabel {
    pub fn new(time: f64, text: impl Into<String>) -> Self {
        Self {
            time,
            duration: None,
            text: text.into(),
            description: String::new(),
            color: None,
            link: None,
            anchor: None,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_anchor(mut self, anchor: LabelAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn span(&self) -> TimeRange {
        TimeRange::with_length(self.time, self.duration.unwrap_or(0.0))
    }

    fn content(&self) -> OverlayContent {
        OverlayContent {
            text: self.text.clone(),
            description: self.description.clone(),
            color: self.color,
            link: self.link.clone(),
        }
    }
}

/// Where a label ends up on the display
#[derive(Debug, Clone, PartialEq)]
pub enum PlacedLabel {
    Inline(LabelOverlay),
    Overhead(OverheadLabel),
}

impl From<&OutputLabel> for PlacedLabel {
    /// Anchored labels go inside the timeline body, the rest above it
    fn from(label: &OutputLabel) -> Self {
        match label.anchor {
            Some(anchor) => PlacedLabel::Inline(
                LabelOverlay::new(label.span(), label.content()).with_vertical(anchor.vertical()),
            ),
            None => PlacedLabel::Overhead(OverheadLabel::new(label.span(), label.content())),
        }
    }
}
