//! md-display: Media display coordinator
//!
//! Composes a [`MediaKind`](md_core::MediaKind) with the edit history,
//! overlays and viewport. Painting itself is left to the host's renderer.

mod audio;
mod display;
mod labels;
mod notes;

pub use audio::*;
pub use display::*;
pub use labels::*;
pub use notes::*;
