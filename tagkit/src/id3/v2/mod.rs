//! ID3v2 items and utilities
//!
//! ## Important notes
//!
//! See:
//!
//! * [`Id3v2Tag`]
//! * [`Frame`]
//!
//! ID3v2.2 and ID3v2.3 tags are upgraded to ID3v2.4 while reading, and are always written as
//! ID3v2.4 unless [`WriteOptions::version`](crate::config::WriteOptions::version) asks for ID3v2.3.

mod frame;
mod header;
mod items;
mod properties;
mod read;
mod tag;
pub mod util;
mod write;

// Exports

pub use header::{ExtendedHeader, Footer, Id3v2Header, Id3v2TagFlags, Id3v2Version, TagState};
pub use util::upgrade::{upgrade_v2, upgrade_v3};

pub use tag::Id3v2Tag;

pub use items::*;

pub use frame::header::{FrameHeader, FrameId};
pub use frame::{Frame, FrameFlags};
