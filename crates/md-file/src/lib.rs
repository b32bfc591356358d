//! md-file: File-backed storage for MediaDeck
//!
//! - Temporary snapshot storage on the local filesystem
//! - WAV header probing (via hound)

mod error;
mod store;
mod wav;

pub use error::*;
pub use store::*;
pub use wav::*;
