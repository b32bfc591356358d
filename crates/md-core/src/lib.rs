//! md-core: Shared types and traits for MediaDeck
//!
//! Artifact references and the storage contract, the error type, timeline
//! time types, theming and the media-kind capability trait.

mod artifact;
mod error;
mod media;
mod theme;
mod time;

pub use artifact::*;
pub use error::*;
pub use media::*;
pub use theme::*;
pub use time::*;
