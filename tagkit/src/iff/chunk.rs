use crate::config::ParseContext;
use crate::error::{ErrorKind, Result, TagError};
use crate::macros::{diag, err, try_vec};
use crate::util::io::{ByteStream, SeekStreamLen};

use std::io::{Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};

const CHUNK_HEADER_SIZE: u64 = 8;
// "RIFF" + size + form type
const CONTAINER_HEADER_SIZE: u64 = 12;
const SIZE_OFFSET: u64 = 4;
const FOUR_GIB: u64 = 0xFFFF_FFFF;

/// A single chunk of a [`ChunkContainer`]
///
/// The offset points at the chunk *body*, its 8 byte header sits right before it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
	name: [u8; 4],
	offset: u64,
	size: u32,
	padding: u8,
}

impl Chunk {
	/// The chunk name (FourCC)
	pub fn name(&self) -> [u8; 4] {
		self.name
	}

	/// The absolute offset of the chunk body
	pub fn offset(&self) -> u64 {
		self.offset
	}

	/// The size of the chunk body, excluding the padding byte
	pub fn size(&self) -> u32 {
		self.size
	}

	/// 1 if the chunk is followed by a padding byte, 0 otherwise
	pub fn padding(&self) -> u8 {
		self.padding
	}

	fn end(&self) -> u64 {
		self.offset + u64::from(self.size) + u64::from(self.padding)
	}
}

/// A RIFF style container, a flat list of named and sized chunks
///
/// The byte order of the size fields is chosen with `B`, see [`RiffContainer`] and
/// [`AiffContainer`].
///
/// Reading never fails on malformed input. Structural problems (bad magic, a zero container
/// size, implausibly large text chunks, garbage chunk names) leave the container
/// [invalid](ChunkContainer::is_valid), while recoverable problems are corrected and reported
/// through the [`DiagnosticListener`](crate::diagnostics::DiagnosticListener) of the [`ParseContext`].
///
/// # Examples
///
/// ```rust
/// use tagkit::config::ParseContext;
/// use tagkit::iff::RiffContainer;
/// use std::io::Cursor;
///
/// # fn main() -> tagkit::error::Result<()> {
/// let mut file = Vec::new();
/// file.extend_from_slice(b"RIFF\x12\x00\x00\x00WAVE");
/// file.extend_from_slice(b"data\x05\x00\x00\x00abcde\x00");
/// let mut file = Cursor::new(file);
///
/// let mut container = RiffContainer::read(&mut file, &ParseContext::new())?;
/// let data = container.find_chunk(*b"data").unwrap();
/// assert_eq!(container.chunk_data(&mut file, data)?, b"abcde");
///
/// container.set_chunk_data(&mut file, data, b"ab")?;
/// assert_eq!(file.get_ref(), b"RIFF\x0E\x00\x00\x00WAVEdata\x02\x00\x00\x00ab");
/// # Ok(()) }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkContainer<B>
where
	B: ByteOrder,
{
	magic: [u8; 4],
	form_type: [u8; 4],
	size: u32,
	chunks: Vec<Chunk>,
	valid: bool,
	_phantom: PhantomData<B>,
}

/// A little endian container (`RIFF`/`RF64`, WAV)
pub type RiffContainer = ChunkContainer<LittleEndian>;

/// A big endian container (`FORM`, AIFF)
pub type AiffContainer = ChunkContainer<BigEndian>;

impl<B> ChunkContainer<B>
where
	B: ByteOrder,
{
	fn invalid(magic: [u8; 4], form_type: [u8; 4], size: u32) -> Self {
		Self {
			magic,
			form_type,
			size,
			chunks: Vec::new(),
			valid: false,
			_phantom: PhantomData,
		}
	}

	/// Scan the chunk list of `reader`, starting at the beginning of the stream
	///
	/// # Errors
	///
	/// Only I/O errors of `reader`. Malformed input is reported through `ctx`.
	pub fn read<R>(reader: &mut R, ctx: &ParseContext<'_>) -> Result<Self>
	where
		R: Read + Seek,
	{
		let diagnostics = ctx.diagnostics;
		let file_len = reader.stream_length()?;
		reader.rewind()?;

		if file_len < CONTAINER_HEADER_SIZE {
			diag!(diagnostics, Error, "File is too short to hold a chunk container");
			return Ok(Self::invalid([0; 4], [0; 4], 0));
		}

		let mut magic = [0; 4];
		reader.read_exact(&mut magic)?;
		let mut size = reader.read_u32::<B>()?;
		let mut form_type = [0; 4];
		reader.read_exact(&mut form_type)?;

		if size == 0 {
			diag!(diagnostics, Error, "Invalid container size: 0");
			return Ok(Self::invalid(magic, form_type, size));
		}

		if !matches!(&magic, b"RIFF" | b"RF64" | b"FORM") {
			diag!(
				diagnostics,
				Error,
				"Invalid container type: {:?}",
				String::from_utf8_lossy(&magic)
			);
			return Ok(Self::invalid(magic, form_type, size));
		}

		if !matches!(&form_type, b"WAVE" | b"AIFF" | b"AIFC") {
			diag!(
				diagnostics,
				Warn,
				"Unknown form type: {:?}",
				String::from_utf8_lossy(&form_type)
			);
		}

		let over_4gib = file_len > FOUR_GIB;
		if over_4gib {
			diag!(
				diagnostics,
				Warn,
				"File is larger than 4 GiB ({file_len} bytes), chunks after the audio data are \
				 ignored"
			);
		}

		let expected_size = u32::try_from(file_len - CHUNK_HEADER_SIZE).unwrap_or(u32::MAX);
		if size != expected_size {
			diag!(
				diagnostics,
				Warn,
				"Invalid container size: {size}, corrected to {expected_size}"
			);
			size = expected_size;
		}

		let mut container = Self {
			magic,
			form_type,
			size,
			chunks: Vec::new(),
			valid: true,
			_phantom: PhantomData,
		};

		let mut offset = CONTAINER_HEADER_SIZE;
		while offset + CHUNK_HEADER_SIZE < file_len {
			reader.seek(SeekFrom::Start(offset))?;

			let mut name = [0; 4];
			reader.read_exact(&mut name)?;
			let mut chunk_size = reader.read_u32::<B>()?;

			// Null chunks are used as padding by some writers
			if chunk_size == 0 {
				offset += CHUNK_HEADER_SIZE;
				continue;
			}

			if !is_valid_chunk_name(name) {
				diag!(
					diagnostics,
					Error,
					"Invalid chunk name {name:?} at offset {offset}"
				);
				container.valid = false;
				break;
			}

			let body_offset = offset + CHUNK_HEADER_SIZE;
			if body_offset + u64::from(chunk_size) > file_len {
				let clamped = (file_len - body_offset) as u32;
				diag!(
					diagnostics,
					Warn,
					"Chunk {:?} overflows the stream, size adjusted: {chunk_size} -> {clamped}",
					String::from_utf8_lossy(&name)
				);
				chunk_size = clamped;
			}

			if &name == b"LIST" && chunk_size > ctx.options.max_text_chunk_size {
				diag!(
					diagnostics,
					Error,
					"LIST chunk is too large ({chunk_size} bytes), container invalidated"
				);
				container.valid = false;
				break;
			}

			let mut chunk = Chunk {
				name,
				offset: body_offset,
				size: chunk_size,
				padding: 0,
			};

			offset = body_offset + u64::from(chunk_size);
			if offset % 2 != 0 && offset < file_len {
				reader.seek(SeekFrom::Start(offset))?;
				if reader.read_u8()? == 0 {
					chunk.padding = 1;
					offset += 1;
				}
			}

			log::trace!(
				"Found chunk {:?} (offset: {}, size: {})",
				String::from_utf8_lossy(&name),
				chunk.offset,
				chunk.size
			);
			container.chunks.push(chunk);

			if over_4gib && matches!(&name, b"data" | b"SSND") {
				break;
			}
		}

		Ok(container)
	}

	/// Whether the container passed its structural checks
	///
	/// An invalid container refuses every data access and mutation.
	pub fn is_valid(&self) -> bool {
		self.valid
	}

	/// The container magic (`RIFF`, `RF64` or `FORM`)
	pub fn magic(&self) -> [u8; 4] {
		self.magic
	}

	/// The form type following the container size (`WAVE`, `AIFF`, ...)
	pub fn form_type(&self) -> [u8; 4] {
		self.form_type
	}

	/// The container size, after any correction made while reading or by a mutation
	pub fn size(&self) -> u32 {
		self.size
	}

	/// The number of chunks
	pub fn chunk_count(&self) -> usize {
		self.chunks.len()
	}

	/// All chunks in stream order
	pub fn chunks(&self) -> &[Chunk] {
		&self.chunks
	}

	/// The name of the chunk at `index`
	pub fn chunk_name(&self, index: usize) -> Option<[u8; 4]> {
		self.chunks.get(index).map(Chunk::name)
	}

	/// The body offset of the chunk at `index`
	pub fn chunk_offset(&self, index: usize) -> Option<u64> {
		self.chunks.get(index).map(Chunk::offset)
	}

	/// The body size of the chunk at `index`
	pub fn chunk_data_size(&self, index: usize) -> Option<u32> {
		self.chunks.get(index).map(Chunk::size)
	}

	/// The padding of the chunk at `index`
	pub fn chunk_padding(&self, index: usize) -> Option<u8> {
		self.chunks.get(index).map(Chunk::padding)
	}

	/// The index of the first chunk named `name`
	pub fn find_chunk(&self, name: [u8; 4]) -> Option<usize> {
		self.chunks.iter().position(|chunk| chunk.name == name)
	}

	fn check_access(&self, index: usize) -> Result<Chunk> {
		if !self.valid {
			err!(InvalidContainer);
		}

		match self.chunks.get(index) {
			Some(chunk) => Ok(*chunk),
			None => Err(TagError::new(ErrorKind::ChunkIndexOutOfRange(index))),
		}
	}

	/// Read the body of the chunk at `index`
	///
	/// # Errors
	///
	/// * The container is invalid
	/// * `index` is out of range
	/// * The body exceeds the allocation limit
	pub fn chunk_data<R>(&self, reader: &mut R, index: usize) -> Result<Vec<u8>>
	where
		R: Read + Seek,
	{
		let chunk = self.check_access(index)?;

		reader.seek(SeekFrom::Start(chunk.offset))?;
		let mut content = try_vec![0; chunk.size as usize];
		reader.read_exact(&mut content)?;

		Ok(content)
	}

	/// Replace the body of the chunk at `index`
	///
	/// A body of the same size is overwritten in place, otherwise the chunk is spliced and all
	/// later chunks are shifted.
	///
	/// # Errors
	///
	/// * The container is invalid
	/// * `index` is out of range
	/// * `data` is larger than a chunk can hold
	/// * Any I/O error of `stream`
	pub fn set_chunk_data<S>(&mut self, stream: &mut S, index: usize, data: &[u8]) -> Result<()>
	where
		S: ByteStream,
	{
		let chunk = self.check_access(index)?;
		let new_size = chunk_size_of(data)?;

		if new_size == chunk.size {
			stream.seek(SeekFrom::Start(chunk.offset))?;
			stream.write_all(data)?;
			return self.update_global_size(stream);
		}

		let original_len = u64::from(chunk.size) + u64::from(chunk.padding);
		write_chunk::<S, B>(
			stream,
			chunk.name,
			data,
			chunk.offset - CHUNK_HEADER_SIZE,
			original_len + CHUNK_HEADER_SIZE,
		)?;

		let modified = &mut self.chunks[index];
		modified.size = new_size;
		modified.padding = (new_size % 2) as u8;
		let new_len = u64::from(modified.size) + u64::from(modified.padding);

		for later in &mut self.chunks[index + 1..] {
			later.offset = later.offset + new_len - original_len;
		}

		self.update_global_size(stream)
	}

	/// Replace the body of the first chunk named `name`, or append a new chunk
	///
	/// With `always_create`, a new chunk is appended even if one with the name exists. This is
	/// only permitted for `LIST` chunks, which may appear multiple times.
	///
	/// Returns whether the data was written.
	///
	/// # Errors
	///
	/// See [`ChunkContainer::set_chunk_data`]
	pub fn set_chunk_data_by_name<S>(
		&mut self,
		stream: &mut S,
		name: [u8; 4],
		data: &[u8],
		always_create: bool,
	) -> Result<bool>
	where
		S: ByteStream,
	{
		if !self.valid {
			err!(InvalidContainer);
		}

		let Some(last) = self.chunks.last().copied() else {
			log::debug!("No chunks present, refusing to append");
			return Ok(false);
		};

		if always_create && &name != b"LIST" {
			log::warn!("Only LIST chunks can be created unconditionally");
			return Ok(false);
		}

		if !always_create {
			if let Some(index) = self.find_chunk(name) {
				self.set_chunk_data(stream, index, data)?;
				return Ok(true);
			}
		}

		let new_size = chunk_size_of(data)?;

		let mut offset = last.end();
		if offset % 2 != 0 {
			let last_index = self.chunks.len() - 1;
			if last.padding == 1 {
				// Only possible with a corrupted container
				offset -= 1;
				stream.remove_block(offset, 1)?;
				self.chunks[last_index].padding = 0;
			} else {
				stream.insert(&[0], offset, 0)?;
				self.chunks[last_index].padding = 1;
				offset += 1;
			}
		}

		write_chunk::<S, B>(stream, name, data, offset, 0)?;

		self.chunks.push(Chunk {
			name,
			offset: offset + CHUNK_HEADER_SIZE,
			size: new_size,
			padding: (new_size % 2) as u8,
		});

		self.update_global_size(stream)?;
		Ok(true)
	}

	/// Remove the chunk at `index` along with its header and padding
	///
	/// # Errors
	///
	/// * The container is invalid
	/// * `index` is out of range
	/// * Any I/O error of `stream`
	pub fn remove_chunk<S>(&mut self, stream: &mut S, index: usize) -> Result<()>
	where
		S: ByteStream,
	{
		let chunk = self.check_access(index)?;

		let removed = u64::from(chunk.size) + u64::from(chunk.padding) + CHUNK_HEADER_SIZE;
		stream.remove_block(chunk.offset - CHUNK_HEADER_SIZE, removed)?;

		self.chunks.remove(index);
		for later in &mut self.chunks[index..] {
			later.offset -= removed;
		}

		self.update_global_size(stream)
	}

	/// Remove every chunk named `name`, returning how many were removed
	///
	/// # Errors
	///
	/// See [`ChunkContainer::remove_chunk`]
	pub fn remove_chunks_by_name<S>(&mut self, stream: &mut S, name: [u8; 4]) -> Result<usize>
	where
		S: ByteStream,
	{
		if !self.valid {
			err!(InvalidContainer);
		}

		let mut removed = 0;
		for index in (0..self.chunks.len()).rev() {
			if self.chunks[index].name == name {
				self.remove_chunk(stream, index)?;
				removed += 1;
			}
		}

		Ok(removed)
	}

	/// Recompute the container size from the chunk list and write it
	///
	/// # Errors
	///
	/// * The container is invalid
	/// * The container would exceed 4 GiB
	/// * Any I/O error of `stream`
	pub fn update_global_size<S>(&mut self, stream: &mut S) -> Result<()>
	where
		S: ByteStream,
	{
		if !self.valid {
			err!(InvalidContainer);
		}

		let (Some(first), Some(last)) = (self.chunks.first(), self.chunks.last()) else {
			return Ok(());
		};

		let Ok(size) = u32::try_from(last.end() - first.offset + CONTAINER_HEADER_SIZE) else {
			err!(TooMuchData);
		};

		let mut encoded = [0; 4];
		B::write_u32(&mut encoded, size);
		stream.insert(&encoded, SIZE_OFFSET, 4)?;

		self.size = size;
		Ok(())
	}
}

fn is_valid_chunk_name(name: [u8; 4]) -> bool {
	name.iter().all(|c| (32..=127).contains(c))
}

fn chunk_size_of(data: &[u8]) -> Result<u32> {
	match u32::try_from(data.len()) {
		Ok(size) => Ok(size),
		Err(_) => err!(TooMuchData),
	}
}

// name + size + data + padding, replacing `replace` bytes at `offset`
fn write_chunk<S, B>(
	stream: &mut S,
	name: [u8; 4],
	data: &[u8],
	offset: u64,
	replace: u64,
) -> Result<()>
where
	S: ByteStream,
	B: ByteOrder,
{
	let size = chunk_size_of(data)?;

	let mut combined = Vec::with_capacity(data.len() + CHUNK_HEADER_SIZE as usize + 1);
	combined.extend_from_slice(&name);

	let mut encoded_size = [0; 4];
	B::write_u32(&mut encoded_size, size);
	combined.extend_from_slice(&encoded_size);

	combined.extend_from_slice(data);

	// It is required an odd length chunk be padded with a 0
	// The 0 isn't included in the chunk size, however
	if size % 2 != 0 {
		combined.push(0);
	}

	stream.insert(&combined, offset, replace)
}
