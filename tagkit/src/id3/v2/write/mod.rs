mod frame;

use super::header::{Footer, Id3v2Header, Id3v2TagFlags, Id3v2Version, ID3V2_HEADER_SIZE};
use super::tag::Id3v2Tag;
use crate::config::WriteOptions;
use crate::diagnostics::DiagnosticListener;
use crate::error::{ErrorKind, Result, TagError};

use frame::{create_items, downgrade_frames};

impl Id3v2Tag {
	/// Render the tag
	///
	/// This is [`Id3v2Tag::render_with_file_length`] for a file of unknown length.
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::render_with_file_length`]
	pub fn render(
		&self,
		write_options: WriteOptions,
		diagnostics: &dyn DiagnosticListener,
	) -> Result<Vec<u8>> {
		self.render_with_file_length(write_options, 0, diagnostics)
	}

	/// Render the tag, including its header and padding, for a file of `file_length` bytes
	///
	/// The tag is written as the version of [`WriteOptions::version`]. For ID3v2.3, the
	/// frames are downgraded first:
	///
	/// * Frames that only exist in ID3v2.4 (`ASPI`, `EQU2`, `RVA2`, `SEEK`, `SIGN`, `TDRL`, `TDTG`,
	///   `TMOO`, `TPRO`, `TSST`) are dropped
	/// * `TDOR` becomes `TORY`, `TDRC` is split into `TYER`, `TDAT`, and `TIME`
	/// * `TIPL` and `TMCL` are merged into `IPLS`
	/// * Multiple `TCON` values are combined into the `"(17)(RX)Refinement"` form
	///
	/// Regardless of the version, frames with an outdated ID, frames marked with
	/// [`FrameFlags::tag_alter_preservation`](crate::id3::v2::FrameFlags::tag_alter_preservation),
	/// and frames without content are not written.
	///
	/// The padding of the tag that was read is reused as long as it does not exceed 1% of
	/// `file_length` (clamped to [`WriteOptions::min_padding`] and [`WriteOptions::max_padding`]),
	/// otherwise the minimum padding is used. A tag with a footer has no padding.
	///
	/// # Errors
	///
	/// * A frame's content does not match its ID, or cannot be represented
	/// * The tag is too large to be written
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::config::WriteOptions;
	/// use tagkit::diagnostics::NullListener;
	/// use tagkit::id3::v2::Id3v2Tag;
	///
	/// # fn main() -> tagkit::error::Result<()> {
	/// let mut tag = Id3v2Tag::new();
	/// tag.set_title("Foo");
	///
	/// let options = WriteOptions::new().min_padding(16);
	/// let bytes = tag.render_with_file_length(options, 0, &NullListener)?;
	///
	/// // Header, TIT2 frame, padding
	/// assert_eq!(bytes.len(), 10 + 14 + 16);
	/// # Ok(()) }
	/// ```
	pub fn render_with_file_length(
		&self,
		write_options: WriteOptions,
		file_length: u64,
		diagnostics: &dyn DiagnosticListener,
	) -> Result<Vec<u8>> {
		self.create_tag(write_options, file_length, diagnostics)
			.map(|(_, tag)| tag)
	}

	/// Render the tag, and make the result the tag's new on-disk state
	///
	/// The rendered header replaces [`Id3v2Tag::header`], so the padding of the rendered tag is
	/// reused by the next render.
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::render_with_file_length`]
	pub fn render_mut(
		&mut self,
		write_options: WriteOptions,
		file_length: u64,
		diagnostics: &dyn DiagnosticListener,
	) -> Result<Vec<u8>> {
		let (header, tag) = self.create_tag(write_options, file_length, diagnostics)?;

		self.header = header;
		self.original_size = header.size;
		Ok(tag)
	}

	fn create_tag(
		&self,
		write_options: WriteOptions,
		file_length: u64,
		diagnostics: &dyn DiagnosticListener,
	) -> Result<(Id3v2Header, Vec<u8>)> {
		// ID3v2.2 cannot be written
		let version = match write_options.version {
			Id3v2Version::V3 => Id3v2Version::V3,
			_ => Id3v2Version::V4,
		};

		log::debug!("Rendering ID3v2.{} tag", version.major());

		let mut frames = Vec::new();
		if version == Id3v2Version::V3 {
			let downgraded = downgrade_frames(&self.frames, diagnostics);
			create_items(&mut frames, downgraded.iter().map(|f| &**f), version, diagnostics)?;
		} else {
			create_items(&mut frames, &self.frames, version, diagnostics)?;
		}

		// "[A tag] MUST NOT have any padding when a tag footer is added to the tag"
		let has_footer = version == Id3v2Version::V4 && self.header.flags.footer;
		let padding = if has_footer {
			log::trace!("Footer requested, not padding tag");
			0
		} else {
			padding_size(self.original_size, frames.len(), file_length, write_options)
		};

		let size = u32::try_from(frames.len() + padding)
			.map_err(|_| TagError::new(ErrorKind::TooMuchData))?;

		let header = Id3v2Header {
			version,
			revision: 0,
			flags: Id3v2TagFlags {
				experimental: self.header.flags.experimental,
				footer: has_footer,
				..Id3v2TagFlags::default()
			},
			size,
		};

		log::trace!("Padding tag with {padding} bytes");

		let mut tag = Vec::with_capacity(ID3V2_HEADER_SIZE + size as usize);
		tag.extend(header.render()?);
		tag.extend(frames);
		tag.resize(tag.len() + padding, 0);

		if has_footer {
			tag.extend(Footer::render(&header)?);
		}

		Ok((header, tag))
	}
}

fn padding_size(
	original_size: u32,
	frames_len: usize,
	file_length: u64,
	write_options: WriteOptions,
) -> usize {
	let min_padding = write_options.min_padding as usize;

	let padding = i64::from(original_size) - frames_len as i64;
	if padding <= 0 {
		return min_padding;
	}

	// Padding won't grow beyond 1% of the file size
	let threshold = (file_length / 100)
		.max(u64::from(write_options.min_padding))
		.min(u64::from(write_options.max_padding));

	if padding as u64 > threshold {
		return min_padding;
	}

	padding as usize
}
