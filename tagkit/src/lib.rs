//! Read and write ID3v2 tags and RIFF style chunk lists, tolerating the damage found in real files.
//!
//! # Overview
//!
//! * [`iff`]: A chunk container, the flat list of named chunks that WAV and AIFF files are made of
//! * [`id3::v2`]: An ID3v2 tag reader and writer, supporting ID3v2.2 through ID3v2.4
//! * [`text`]: The single text representation every decoded field is converted to
//! * [`properties`]: A format agnostic view of tag contents
//!
//! Malformed input is never a reason to fail. Readers recover what they can and report what
//! they corrected through a [`DiagnosticListener`](diagnostics::DiagnosticListener), errors
//! are reserved for I/O failures and requests that cannot be honored.
//!
//! # Examples
//!
//! ## Reading a tag
//!
//! ```rust
//! use tagkit::config::ParseContext;
//! use tagkit::diagnostics::DiagnosticLog;
//! use tagkit::id3::v2::Id3v2Tag;
//! use std::io::Cursor;
//!
//! # fn main() -> tagkit::error::Result<()> {
//! # let content = b"ID3\x03\x00\x00\x00\x00\x00\x0ETIT2\x00\x00\x00\x04\x00\x00\x00Foo".to_vec();
//! let mut file = Cursor::new(content);
//!
//! let log = DiagnosticLog::new();
//! let ctx = ParseContext::new().diagnostics(&log);
//!
//! let tag = Id3v2Tag::read_from(&mut file, 0, &ctx)?;
//! assert_eq!(tag.title(), "Foo");
//!
//! for diagnostic in log.take() {
//! 	println!("{diagnostic:?}");
//! }
//! # Ok(()) }
//! ```
//!
//! ## Converting between tags
//!
//! ```rust
//! use tagkit::id3::v2::Id3v2Tag;
//!
//! let mut tag = Id3v2Tag::new();
//! tag.set_artist("Foo");
//! tag.set_genre("Rock");
//!
//! // Every key a tag supports can be moved through a `PropertyMap`
//! let properties = tag.properties();
//!
//! let mut other = Id3v2Tag::new();
//! other.set_properties(&properties);
//! assert_eq!(other.artist(), "Foo");
//! assert_eq!(other.genre(), "Rock");
//! ```
//!
//! # Important format-specific notes
//!
//! All formats have their own quirks that may produce unexpected results between conversions.
//! Be sure to read the module documentation of each format to see important notes and warnings.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod diagnostics;
pub mod error;
pub(crate) mod macros;
pub mod properties;
mod util;

pub mod id3;
pub mod iff;

pub use util::{charset, io, text};
