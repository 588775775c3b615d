//! Stream traits used by every save operation

use crate::error::{ErrorKind, Result, TagError};
use crate::macros::err;

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

// `Seek::stream_len` is still unstable
pub(crate) trait SeekStreamLen: Seek {
	fn stream_length(&mut self) -> Result<u64> {
		let pos = self.stream_position()?;
		let len = self.seek(SeekFrom::End(0))?;
		self.seek(SeekFrom::Start(pos))?;

		Ok(len)
	}
}

impl<T: Seek> SeekStreamLen for T {}

/// Shrinking a stream
///
/// Part of [`ByteStream`]. After `truncate(n)` the stream must be exactly `n` bytes long, the
/// splicing methods rely on it.
///
/// # Examples
///
/// ```rust
/// use tagkit::io::Truncate;
///
/// let mut data = vec![1, 2, 3, 4, 5];
/// Truncate::truncate(&mut data, 3).unwrap();
///
/// assert_eq!(data, [1, 2, 3]);
/// ```
pub trait Truncate {
	/// Returned when the stream cannot be shrunk
	type Error: Into<TagError>;

	/// Drop everything past `new_len`
	///
	/// # Errors
	///
	/// Depends on the implementor
	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error>;
}

impl Truncate for File {
	type Error = std::io::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.set_len(new_len)
	}
}

impl Truncate for Vec<u8> {
	type Error = std::convert::Infallible;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.truncate(usize::try_from(new_len).unwrap_or(usize::MAX));
		Ok(())
	}
}

impl<T: Truncate> Truncate for Cursor<T> {
	type Error = T::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.get_mut().truncate(new_len)
	}
}

impl<T: Truncate> Truncate for &mut T {
	type Error = T::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		(**self).truncate(new_len)
	}
}

/// The total length of a stream
///
/// Part of [`ByteStream`]. Offsets written to disk are derived from this value, so it has to be
/// exact.
///
/// # Examples
///
/// ```rust
/// use tagkit::io::Length;
///
/// let data = vec![1, 2, 3, 4, 5];
/// assert_eq!(Length::len(&data).unwrap(), 5);
/// ```
pub trait Length {
	/// Returned when the length is unavailable
	type Error: Into<TagError>;

	/// The length in bytes
	///
	/// # Errors
	///
	/// Depends on the implementor
	fn len(&self) -> std::result::Result<u64, Self::Error>;
}

impl Length for File {
	type Error = std::io::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(self.metadata()?.len())
	}
}

impl Length for Vec<u8> {
	type Error = std::convert::Infallible;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(self.len() as u64)
	}
}

impl<T: Length> Length for Cursor<T> {
	type Error = T::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(self.get_ref())
	}
}

impl<T: Length> Length for &mut T {
	type Error = T::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(*self)
	}
}

/// A seekable, resizable byte stream that supports splicing
///
/// This is a combination of the [`Read`], [`Write`], [`Seek`], [`Truncate`], and [`Length`] traits,
/// plus two splicing operations. Every structural edit made by tagkit is expressed as a single
/// [`ByteStream::insert`] or [`ByteStream::remove_block`] call.
///
/// The provided implementations of the splice methods buffer everything after the edited range,
/// so implementors backed by memory should override them.
///
/// # Examples
///
/// ```rust
/// use tagkit::io::ByteStream;
/// use std::io::Cursor;
///
/// # fn main() -> tagkit::error::Result<()> {
/// let mut stream = Cursor::new(b"Hello world".to_vec());
///
/// // Replace "Hello" with "Goodbye"
/// stream.insert(b"Goodbye", 0, 5)?;
/// assert_eq!(stream.get_ref(), b"Goodbye world");
///
/// stream.remove_block(7, 6)?;
/// assert_eq!(stream.get_ref(), b"Goodbye");
/// # Ok(()) }
/// ```
pub trait ByteStream: Read + Write + Seek + Truncate + Length {
	/// Replace `replace` bytes at `at` with `data`, shifting everything after the range
	///
	/// # Errors
	///
	/// * `at` is beyond the end of the stream
	/// * The stream is read only ([`ByteStream::is_read_only`])
	/// * Any I/O error of the underlying stream
	fn insert(&mut self, data: &[u8], at: u64, replace: u64) -> Result<()> {
		if self.is_read_only() {
			err!(ReadOnly);
		}

		let len = Length::len(&*self).map_err(Into::into)?;
		if at > len {
			err!(SizeMismatch);
		}

		let tail_start = at.saturating_add(replace).min(len);

		let mut tail = Vec::new();
		self.seek(SeekFrom::Start(tail_start))?;
		self.read_to_end(&mut tail)?;

		self.seek(SeekFrom::Start(at))?;
		self.write_all(data)?;
		self.write_all(&tail)?;

		let new_len = at + data.len() as u64 + tail.len() as u64;
		self.truncate(new_len).map_err(Into::into)?;

		Ok(())
	}

	/// Remove `len` bytes starting at `at`
	///
	/// # Errors
	///
	/// See [`ByteStream::insert`]
	fn remove_block(&mut self, at: u64, len: u64) -> Result<()> {
		self.insert(&[], at, len)
	}

	/// Whether the stream refuses modifications
	fn is_read_only(&self) -> bool {
		false
	}
}

impl ByteStream for File {}

impl ByteStream for Cursor<Vec<u8>> {
	fn insert(&mut self, data: &[u8], at: u64, replace: u64) -> Result<()> {
		let buf = self.get_mut();

		let len = Vec::len(buf) as u64;
		if at > len {
			err!(SizeMismatch);
		}

		let start = at as usize;
		let end = at.saturating_add(replace).min(len) as usize;
		buf.splice(start..end, data.iter().copied());

		let new_len = Vec::len(buf) as u64;
		if self.position() > new_len {
			self.set_position(new_len);
		}

		Ok(())
	}
}

impl<T> ByteStream for &mut T
where
	T: ByteStream,
{
	fn insert(&mut self, data: &[u8], at: u64, replace: u64) -> Result<()> {
		(**self).insert(data, at, replace)
	}

	fn remove_block(&mut self, at: u64, len: u64) -> Result<()> {
		(**self).remove_block(at, len)
	}

	fn is_read_only(&self) -> bool {
		(**self).is_read_only()
	}
}

/// A wrapper that makes any readable stream a [`ByteStream`] that refuses all writes
///
/// # Examples
///
/// ```rust
/// use tagkit::io::{ByteStream, ReadOnly};
/// use std::io::Cursor;
///
/// let mut stream = ReadOnly::new(Cursor::new(vec![1, 2, 3]));
/// assert!(stream.is_read_only());
/// assert!(stream.insert(&[4], 3, 0).is_err());
/// ```
#[derive(Debug)]
pub struct ReadOnly<T> {
	inner: T,
}

impl<T> ReadOnly<T> {
	/// Wrap a stream
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Unwrap the stream
	pub fn into_inner(self) -> T {
		self.inner
	}
}

impl<T: Read> Read for ReadOnly<T> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		self.inner.read(buf)
	}
}

impl<T> Write for ReadOnly<T> {
	fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
		Err(std::io::Error::new(
			std::io::ErrorKind::PermissionDenied,
			"stream is read only",
		))
	}

	fn flush(&mut self) -> std::io::Result<()> {
		Ok(())
	}
}

impl<T: Seek> Seek for ReadOnly<T> {
	fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
		self.inner.seek(pos)
	}
}

impl<T> Truncate for ReadOnly<T> {
	type Error = TagError;

	fn truncate(&mut self, _: u64) -> std::result::Result<(), Self::Error> {
		Err(TagError::new(ErrorKind::ReadOnly))
	}
}

impl<T: Length> Length for ReadOnly<T> {
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		self.inner.len()
	}
}

impl<T> ByteStream for ReadOnly<T>
where
	T: Read + Seek + Length,
{
	fn is_read_only(&self) -> bool {
		true
	}
}
