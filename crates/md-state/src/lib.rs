//! md-state: Edit history, timeline overlays and preferences
//!
//! Provides the linear snapshot history behind a media display, the overlay
//! bookkeeping that is reset with it, and persistent display preferences.

mod dropped;
mod history;
mod listener;
mod overlay;
mod preferences;

#[cfg(test)]
mod test_store;

pub use dropped::*;
pub use history::*;
pub use listener::*;
pub use overlay::*;
pub use preferences::*;
