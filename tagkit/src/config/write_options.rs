use crate::id3::v2::Id3v2Version;

/// Rendering and saving settings
///
/// The options are `Copy`, one value can be built once and passed to every save.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) version: Id3v2Version,
	pub(crate) min_padding: u32,
	pub(crate) max_padding: u32,
	pub(crate) uppercase_id3v2_chunk: bool,
}

impl WriteOptions {
	/// Default minimum padding size in bytes
	pub const DEFAULT_MIN_PADDING: u32 = 1024;

	/// Default maximum padding size in bytes
	pub const DEFAULT_MAX_PADDING: u32 = 1024 * 1024;

	/// ID3v2.4, 1 KiB of padding reused up to 1 MiB, and an `ID3 ` chunk name
	pub const fn new() -> Self {
		Self {
			version: Id3v2Version::V4,
			min_padding: Self::DEFAULT_MIN_PADDING,
			max_padding: Self::DEFAULT_MAX_PADDING,
			uppercase_id3v2_chunk: true,
		}
	}

	/// The ID3v2 version to render
	///
	/// Only [`Id3v2Version::V3`] and [`Id3v2Version::V4`] can be written. Requesting
	/// [`Id3v2Version::V2`] renders ID3v2.4.
	///
	/// When rendering ID3v2.3, frames are put through a downgrade first. See
	/// [`Id3v2Tag::render`](crate::id3::v2::Id3v2Tag::render).
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::config::WriteOptions;
	/// use tagkit::id3::v2::Id3v2Version;
	///
	/// let options = WriteOptions::new().version(Id3v2Version::V3);
	/// ```
	pub fn version(mut self, version: Id3v2Version) -> Self {
		self.version = match version {
			Id3v2Version::V2 => Id3v2Version::V4,
			version => version,
		};
		self
	}

	/// The padding of a new tag, or a tag that outgrew its old padding
	pub fn min_padding(mut self, min_padding: u32) -> Self {
		self.min_padding = min_padding;
		self
	}

	/// The upper bound of reused padding
	///
	/// Existing padding is kept when a tag shrinks, but never beyond 1% of the file length or
	/// this value, whichever is smaller.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::config::WriteOptions;
	///
	/// let options = WriteOptions::new().max_padding(64 * 1024);
	/// ```
	pub fn max_padding(mut self, max_padding: u32) -> Self {
		self.max_padding = max_padding;
		self
	}

	/// Name a newly written WAV tag chunk `ID3 ` (the default) rather than `id3 `
	///
	/// Both spellings are read, and both are replaced on save.
	pub fn uppercase_id3v2_chunk(mut self, uppercase_id3v2_chunk: bool) -> Self {
		self.uppercase_id3v2_chunk = uppercase_id3v2_chunk;
		self
	}
}

impl Default for WriteOptions {
	/// Same as [`WriteOptions::new`]
	fn default() -> Self {
		Self::new()
	}
}
