//! Display theming
//!
//! The renderer receives a [`ThemeProvider`] explicitly; there is no
//! process-wide default look to fall back on.

use serde::{Deserialize, Serialize};

/// RGBA colour, components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from 0xRRGGBB
    pub const fn rgb(packed: u32) -> Self {
        let [_, r, g, b] = packed.to_be_bytes();
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// What a colour is used for on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorRole {
    PlaybackCursor,
    InlineOverlay,
    OverheadLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

/// Timeline palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub playback_cursor: Color,
    pub inline_overlay: Color,
    pub overhead_label: Color,
}

impl Theme {
    pub fn for_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self {
                playback_cursor: Color::rgb(0xadff2f),
                inline_overlay: Color::rgb(0x4a9eff).with_alpha(0.6),
                overhead_label: Color::rgb(0xff9040),
            },
            ThemeVariant::Light => Self {
                playback_cursor: Color::rgb(0x2f7d1f),
                inline_overlay: Color::rgb(0x1f5fbf).with_alpha(0.6),
                overhead_label: Color::rgb(0xc05a10),
            },
        }
    }

    pub fn color(&self, role: ColorRole) -> Color {
        match role {
            ColorRole::PlaybackCursor => self.playback_cursor,
            ColorRole::InlineOverlay => self.inline_overlay,
            ColorRole::OverheadLabel => self.overhead_label,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_variant(ThemeVariant::Dark)
    }
}

/// Source of colours handed to the renderer
pub trait ThemeProvider {
    /// Colour for `role`, if this provider defines one
    fn color(&self, role: ColorRole) -> Option<Color>;

    /// Colour for `role`, or the built-in dark palette's
    fn resolve(&self, role: ColorRole) -> Color {
        self.color(role)
            .unwrap_or_else(|| Theme::default().color(role))
    }
}

/// Provider backed by a fixed [`Theme`]
#[derive(Debug, Clone, Default)]
pub struct StaticTheme(pub Theme);

impl StaticTheme {
    pub fn for_variant(variant: ThemeVariant) -> Self {
        Self(Theme::for_variant(variant))
    }
}

impl ThemeProvider for StaticTheme {
    fn color(&self, role: ColorRole) -> Option<Color> {
        Some(self.0.color(role))
    }
}
