//! WAV files
//!
//! WAV stores its ID3v2 tag as the body of an `ID3 ` chunk. [`WavTags`] reads that chunk from
//! a [`RiffContainer`], and writes it back through the container on save.

use super::chunk::RiffContainer;
use crate::config::{ParseContext, WriteOptions};
use crate::diagnostics::DiagnosticListener;
use crate::error::{ErrorKind, Result};
use crate::id3::v2::{Id3v2Header, Id3v2Tag};
use crate::macros::{diag, err};
use crate::util::io::{ByteStream, SeekStreamLen};

use std::io::{Read, Seek, SeekFrom};

// The header of an ID3v2 tag
const ID3V2_HEADER_SIZE: usize = 10;

/// Chunk names used for ID3v2 tags in the wild
const ID3_CHUNK_NAMES: [[u8; 4]; 5] = [*b"ID3 ", *b"id3 ", *b"ID32", *b"id32", *b"ID3H"];

/// Chunk names replaced when saving
const WRITTEN_CHUNK_NAMES: [[u8; 4]; 2] = [*b"ID3 ", *b"id3 "];

// Verifies that the stream starts with a RIFF WAVE header
fn verify_wav<R>(reader: &mut R) -> Result<()>
where
	R: Read + Seek,
{
	reader.seek(SeekFrom::Start(0))?;

	let mut id = [0; 12];
	reader.read_exact(&mut id)?;

	if &id[..4] != b"RIFF" {
		log::debug!("WAV file doesn't contain a RIFF chunk");
		err!(UnknownFormat);
	}

	if &id[8..] != b"WAVE" {
		log::debug!("Found RIFF file, format is not WAVE");
		err!(UnknownFormat);
	}

	log::debug!("File verified to be WAV");
	Ok(())
}

/// The tags of a WAV file
///
/// # Examples
///
/// ```rust,no_run
/// use tagkit::config::{ParseContext, WriteOptions};
/// use tagkit::diagnostics::LogListener;
/// use tagkit::iff::wav::WavTags;
/// use std::fs::OpenOptions;
///
/// # fn main() -> tagkit::error::Result<()> {
/// let mut file = OpenOptions::new().read(true).write(true).open("foo.wav")?;
///
/// let mut tags = WavTags::read(&mut file, &ParseContext::new())?;
/// tags.id3v2_mut().set_title("Foo");
/// tags.save(&mut file, WriteOptions::new(), &LogListener)?;
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct WavTags {
	container: RiffContainer,
	id3v2: Option<Id3v2Tag>,
}

impl WavTags {
	/// Read the chunk list and ID3v2 tag of a WAV file
	///
	/// Only the first ID3v2 chunk is read, later ones are reported as duplicates. A container
	/// that fails its structural checks is kept, but [`WavTags::save`] will refuse to write to it.
	///
	/// # Errors
	///
	/// * The stream is not a RIFF WAVE file
	/// * Any I/O error of `reader`
	pub fn read<R>(reader: &mut R, ctx: &ParseContext<'_>) -> Result<Self>
	where
		R: Read + Seek,
	{
		verify_wav(reader)?;

		let container = RiffContainer::read(reader, ctx)?;
		if !container.is_valid() {
			diag!(ctx.diagnostics, Warn, "WAV file has an invalid chunk list");
			return Ok(Self {
				container,
				id3v2: None,
			});
		}

		let mut id3v2 = None;
		for (index, chunk) in container.chunks().iter().enumerate() {
			if !ID3_CHUNK_NAMES.contains(&chunk.name()) {
				continue;
			}

			if id3v2.is_some() {
				diag!(
					ctx.diagnostics,
					Debug,
					"Skipping duplicate ID3v2 chunk at {}",
					chunk.offset()
				);
				continue;
			}

			let content = match container.chunk_data(reader, index) {
				Ok(content) => content,
				Err(e) if matches!(e.kind(), ErrorKind::TooMuchData | ErrorKind::Alloc(_)) => {
					diag!(
						ctx.diagnostics,
						Warn,
						"Skipping ID3v2 chunk at {}: {e}",
						chunk.offset()
					);
					continue;
				},
				Err(e) => return Err(e),
			};
			let header = match Id3v2Header::parse(&content) {
				Ok(header) => header,
				Err(e) => {
					diag!(ctx.diagnostics, Warn, "Invalid ID3v2 chunk: {e}");
					continue;
				},
			};

			log::debug!("Found ID3v2 chunk at {}", chunk.offset());
			id3v2 = Some(Id3v2Tag::parse(header, &content[ID3V2_HEADER_SIZE..], ctx));
		}

		Ok(Self { container, id3v2 })
	}

	/// The chunk list of the file
	pub fn container(&self) -> &RiffContainer {
		&self.container
	}

	/// The ID3v2 tag, if the file has one
	pub fn id3v2(&self) -> Option<&Id3v2Tag> {
		self.id3v2.as_ref()
	}

	/// The ID3v2 tag, created if the file has none
	pub fn id3v2_mut(&mut self) -> &mut Id3v2Tag {
		self.id3v2.get_or_insert_with(Id3v2Tag::new)
	}

	/// Replace the ID3v2 tag
	pub fn set_id3v2(&mut self, tag: Id3v2Tag) {
		self.id3v2 = Some(tag);
	}

	/// Remove the ID3v2 tag, it will be removed from the file on save
	pub fn remove_id3v2(&mut self) -> Option<Id3v2Tag> {
		self.id3v2.take()
	}

	/// Write the tags back to `stream`
	///
	/// Existing `ID3 ` and `id3 ` chunks are removed. A non-empty tag is then written as a new
	/// chunk, named `ID3 ` or `id3 ` per [`WriteOptions::uppercase_id3v2_chunk`].
	///
	/// # Errors
	///
	/// * The container is invalid ([`ErrorKind::InvalidContainer`](crate::error::ErrorKind::InvalidContainer))
	/// * The stream is read only ([`ErrorKind::ReadOnly`](crate::error::ErrorKind::ReadOnly))
	/// * The tag cannot be rendered, see [`Id3v2Tag::render_with_file_length`]
	/// * Any I/O error of `stream`
	pub fn save<S>(
		&mut self,
		stream: &mut S,
		write_options: WriteOptions,
		diagnostics: &dyn DiagnosticListener,
	) -> Result<()>
	where
		S: ByteStream,
	{
		if !self.container.is_valid() {
			err!(InvalidContainer);
		}

		if stream.is_read_only() {
			err!(ReadOnly);
		}

		for name in WRITTEN_CHUNK_NAMES {
			self.container.remove_chunks_by_name(stream, name)?;
		}

		let Some(tag) = self.id3v2.as_mut() else {
			return Ok(());
		};

		if tag.is_empty() {
			log::debug!("ID3v2 tag is empty, not writing");
			return Ok(());
		}

		let file_length = stream.stream_length()?;
		let rendered = tag.render_mut(write_options, file_length, diagnostics)?;

		let name = if write_options.uppercase_id3v2_chunk {
			*b"ID3 "
		} else {
			*b"id3 "
		};

		if !self
			.container
			.set_chunk_data_by_name(stream, name, &rendered, false)?
		{
			diag!(diagnostics, Warn, "Unable to append an ID3v2 chunk");
		}

		Ok(())
	}

	/// Remove every ID3v2 chunk from `stream`
	///
	/// # Errors
	///
	/// See [`WavTags::save`]
	pub fn strip<S>(&mut self, stream: &mut S) -> Result<()>
	where
		S: ByteStream,
	{
		if !self.container.is_valid() {
			err!(InvalidContainer);
		}

		if stream.is_read_only() {
			err!(ReadOnly);
		}

		for name in ID3_CHUNK_NAMES {
			self.container.remove_chunks_by_name(stream, name)?;
		}

		self.id3v2 = None;
		Ok(())
	}
}
