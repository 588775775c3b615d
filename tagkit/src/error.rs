//! Error types
//!
//! Every fallible operation returns a [`TagError`], described by its [`ErrorKind`].
//!
//! Damaged input is handled elsewhere. A container or tag that fails its structural checks is
//! flagged as invalid and the problem is reported to a
//! [`DiagnosticListener`](crate::diagnostics::DiagnosticListener). What ends up here is I/O
//! failure, exhausted allocation limits and requests against targets that cannot be changed.

pub use crate::util::text::TextDecodeError;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

/// `Result<T, TagError>`
pub type Result<T> = std::result::Result<T, TagError>;

/// What went wrong
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	/// A size went past the configured allocation limit, or cannot be represented in the format
	TooMuchData,
	/// A size field disagrees with the data it describes
	SizeMismatch,
	/// No chunk exists at this index
	ChunkIndexOutOfRange(usize),

	/// The stream holds a different format than the reader expects
	UnknownFormat,
	/// The container was flagged as invalid while reading, it can no longer be accessed
	InvalidContainer,
	/// The stream cannot be written to
	ReadOnly,
	/// The data looked like a tag at first, but turned out not to be one
	FakeTag,

	/// Text could not be decoded
	TextDecode(TextDecodeError),
	/// An ID3v2 specific error
	Id3v2(Id3v2Error),

	/// An I/O error
	Io(std::io::Error),
	/// An allocation failed
	Alloc(TryReserveError),
	/// Cannot happen, exists for the `Into<TagError>` bounds of [`crate::io`]
	Infallible(std::convert::Infallible),
}

/// What went wrong while handling an ID3v2 tag
#[derive(Debug)]
#[non_exhaustive]
pub enum Id3v2ErrorKind {
	/// The major version is not 2, 3 or 4, or the revision is `0xFF`
	BadId3v2Version(u8, u8),
	/// The header is missing its `ID3` magic, or the size is not synchsafe
	BadHeader,

	/// A frame ID with the wrong length, or characters outside of `A-Z0-9`
	BadFrameId(Vec<u8>),
	/// A frame too large for its size field
	BadFrameLength,
	/// A frame uses an encoding byte outside of `0..=3` (or `0..=4` with UTF-16BE)
	BadTextEncoding(u8),
	/// A frame that cannot be written, either its ID does not match its content (a `COMM` ID on a
	/// URL frame), or its content breaks a limit of the frame type
	BadFrame(String, &'static str),

	/// A compressed frame could not be inflated
	#[cfg(feature = "id3v2_compression_support")]
	Decompression(std::io::Error),
	/// A compressed frame was found, and the `id3v2_compression_support` feature is disabled
	#[cfg(not(feature = "id3v2_compression_support"))]
	CompressedFrameEncountered,

	/// The value needs more than 28 bits, and does not fit in a synchsafe integer
	SynchsafeOverflow(u32),
}

impl Display for Id3v2ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::BadId3v2Version(major, revision) => {
				write!(f, "Unsupported version 2.{major}.{revision}")
			},
			Self::BadHeader => f.write_str("Tag header is malformed"),
			Self::BadFrameId(id) => write!(f, "Frame ID is malformed: 0x{id:02x?}"),
			Self::BadFrameLength => f.write_str("Frame is too large to be written"),
			Self::BadTextEncoding(byte) => write!(f, "Unknown text encoding byte {byte}"),
			Self::BadFrame(id, reason) => write!(f, "Frame `{id}` cannot be written ({reason})"),
			#[cfg(feature = "id3v2_compression_support")]
			Self::Decompression(err) => write!(f, "Unable to inflate frame: {err}"),
			#[cfg(not(feature = "id3v2_compression_support"))]
			Self::CompressedFrameEncountered => {
				f.write_str("Frame is compressed, and compression support is disabled")
			},
			Self::SynchsafeOverflow(value) => write!(f, "{value} does not fit in 28 bits"),
		}
	}
}

/// An ID3v2 specific error
pub struct Id3v2Error {
	kind: Id3v2ErrorKind,
}

impl Id3v2Error {
	/// Wrap an [`Id3v2ErrorKind`]
	#[must_use]
	pub const fn new(kind: Id3v2ErrorKind) -> Self {
		Self { kind }
	}

	/// What went wrong
	pub fn kind(&self) -> &Id3v2ErrorKind {
		&self.kind
	}
}

impl Debug for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Id3v2Error({:?})", self.kind)
	}
}

impl Display for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {}", self.kind)
	}
}

/// The error type of tagkit
pub struct TagError {
	pub(crate) kind: ErrorKind,
}

impl TagError {
	/// Wrap an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::error::{ErrorKind, TagError};
	///
	/// let err = TagError::new(ErrorKind::ChunkIndexOutOfRange(3));
	/// assert_eq!(err.to_string(), "No chunk at index 3");
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// What went wrong
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::error::{ErrorKind, TagError};
	///
	/// let err = TagError::new(ErrorKind::ReadOnly);
	/// assert!(matches!(err.kind(), ErrorKind::ReadOnly));
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for TagError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match &self.kind {
			ErrorKind::Io(err) => Some(err),
			ErrorKind::Alloc(err) => Some(err),
			_ => None,
		}
	}
}

impl Debug for TagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Debug::fmt(&self.kind, f)
	}
}

macro_rules! impl_from {
	($($source:ty => $variant:ident),+ $(,)?) => {
		$(
			impl From<$source> for TagError {
				fn from(input: $source) -> Self {
					Self::new(ErrorKind::$variant(input))
				}
			}
		)+
	};
}

impl_from! {
	Id3v2Error => Id3v2,
	TextDecodeError => TextDecode,
	std::io::Error => Io,
	TryReserveError => Alloc,
	std::convert::Infallible => Infallible,
}

impl Display for TagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.kind {
			ErrorKind::TooMuchData => f.write_str("Refusing to handle an excessive amount of data"),
			ErrorKind::SizeMismatch => f.write_str("A size field does not match its data"),
			ErrorKind::ChunkIndexOutOfRange(index) => write!(f, "No chunk at index {index}"),
			ErrorKind::UnknownFormat => f.write_str("Stream is not of the expected format"),
			ErrorKind::InvalidContainer => f.write_str("Container is invalid and cannot be accessed"),
			ErrorKind::ReadOnly => f.write_str("Stream is read only"),
			ErrorKind::FakeTag => f.write_str("Expected a tag, found unrelated data"),
			ErrorKind::TextDecode(err) => write!(f, "Text decoding: {err}"),
			ErrorKind::Id3v2(err) => Display::fmt(err, f),
			ErrorKind::Io(err) => Display::fmt(err, f),
			ErrorKind::Alloc(err) => Display::fmt(err, f),
			ErrorKind::Infallible(never) => match *never {},
		}
	}
}
