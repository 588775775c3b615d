//! WAV/AIFF style chunk containers
//!
//! See [`ChunkContainer`] for how malformed chunk lists are handled.

mod chunk;
pub mod wav;

pub use chunk::{AiffContainer, Chunk, ChunkContainer, RiffContainer};
