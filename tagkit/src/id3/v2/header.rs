use crate::error::Result;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, is_synchsafe};
use crate::macros::{err, id3v2_err};

use byteorder::{BigEndian, ByteOrder};

pub(crate) const ID3V2_HEADER_SIZE: usize = 10;
pub(crate) const ID3V2_FOOTER_SIZE: usize = 10;

/// The ID3v2 version
#[derive(PartialEq, Eq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	V4,
}

impl Id3v2Version {
	/// The major version number stored in the header
	pub fn major(self) -> u8 {
		match self {
			Self::V2 => 2,
			Self::V3 => 3,
			Self::V4 => 4,
		}
	}

	/// The size of a frame header in this version
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::Id3v2Version;
	///
	/// assert_eq!(Id3v2Version::V2.frame_header_size(), 6);
	/// assert_eq!(Id3v2Version::V4.frame_header_size(), 10);
	/// ```
	pub fn frame_header_size(self) -> usize {
		match self {
			Self::V2 => 6,
			Self::V3 | Self::V4 => 10,
		}
	}
}

/// Tag wide flags from the header
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Id3v2TagFlags {
	/// The whole tag body is unsynchronised (ID3v2.2 and ID3v2.3), see
	/// [`FrameFlags::unsynchronisation`](crate::id3::v2::FrameFlags::unsynchronisation)
	pub unsynchronisation: bool,
	/// Whether an extended header follows the header
	pub extended_header: bool,
	/// The tag is experimental
	pub experimental: bool,
	/// A footer follows the frames (ID3v2.4 only)
	///
	/// Only valid for ID3v2.4, a footer will be created if the tag is written as ID3v2.4
	pub footer: bool,
}

impl Id3v2TagFlags {
	fn from_byte(byte: u8, version: Id3v2Version) -> Self {
		Self {
			unsynchronisation: byte & 0x80 == 0x80,
			extended_header: version != Id3v2Version::V2 && byte & 0x40 == 0x40,
			experimental: version != Id3v2Version::V2 && byte & 0x20 == 0x20,
			footer: version == Id3v2Version::V4 && byte & 0x10 == 0x10,
		}
	}

	/// Get the byte representation of the flags for `version`
	///
	/// Flags that do not exist in `version` are left out.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::{Id3v2TagFlags, Id3v2Version};
	///
	/// let flags = Id3v2TagFlags {
	/// 	experimental: true,
	/// 	footer: true,
	/// 	..Id3v2TagFlags::default()
	/// };
	///
	/// assert_eq!(flags.as_byte(Id3v2Version::V4), 0x30);
	/// assert_eq!(flags.as_byte(Id3v2Version::V3), 0x20);
	/// ```
	pub fn as_byte(&self, version: Id3v2Version) -> u8 {
		let mut byte = 0;

		if self.unsynchronisation {
			byte |= 0x80;
		}

		if version == Id3v2Version::V2 {
			return byte;
		}

		if self.extended_header {
			byte |= 0x40;
		}

		if self.experimental {
			byte |= 0x20;
		}

		if self.footer && version == Id3v2Version::V4 {
			byte |= 0x10;
		}

		byte
	}
}

/// The 10 byte header at the start of every ID3v2 tag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Id3v2Header {
	pub(crate) version: Id3v2Version,
	pub(crate) revision: u8,
	pub(crate) flags: Id3v2TagFlags,
	/// The size after the header, excluding the footer
	pub(crate) size: u32,
}

impl Default for Id3v2Header {
	fn default() -> Self {
		Self {
			version: Id3v2Version::V4,
			revision: 0,
			flags: Id3v2TagFlags::default(),
			size: 0,
		}
	}
}

impl Id3v2Header {
	/// Parse a header
	///
	/// # Errors
	///
	/// * `data` is shorter than 10 bytes, or does not start with `"ID3"`
	/// * The version is not 2, 3, or 4, or the revision is `0xFF`
	/// * The size is not synchsafe
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::{Id3v2Header, Id3v2Version};
	///
	/// # fn main() -> tagkit::error::Result<()> {
	/// let header = Id3v2Header::parse(b"ID3\x03\x00\x00\x00\x00\x01\x00")?;
	///
	/// assert_eq!(header.version(), Id3v2Version::V3);
	/// assert_eq!(header.size(), 128);
	/// assert_eq!(header.complete_tag_size(), 138);
	/// # Ok(()) }
	/// ```
	pub fn parse(data: &[u8]) -> Result<Self> {
		log::debug!("Parsing ID3v2 header");

		if data.len() < ID3V2_HEADER_SIZE || &data[..3] != b"ID3" {
			err!(FakeTag);
		}

		// [major, revision], the revision only matters when it is 0xFF
		let version = match data[3] {
			2 => Id3v2Version::V2,
			3 => Id3v2Version::V3,
			4 => Id3v2Version::V4,
			major => {
				return Err(id3v2_err!(BadId3v2Version(major, data[4])));
			},
		};

		let revision = data[4];
		if revision == 0xFF {
			return Err(id3v2_err!(BadId3v2Version(data[3], revision)));
		}

		let size_bytes = [data[6], data[7], data[8], data[9]];
		if !is_synchsafe(size_bytes) {
			return Err(id3v2_err!(BadHeader));
		}

		Ok(Self {
			version,
			revision,
			flags: Id3v2TagFlags::from_byte(data[5], version),
			size: u32::from_be_bytes(size_bytes).unsynch(),
		})
	}

	/// Render the header
	///
	/// # Errors
	///
	/// The size does not fit in 28 bits
	pub fn render(&self) -> Result<[u8; ID3V2_HEADER_SIZE]> {
		let mut header = [0; ID3V2_HEADER_SIZE];
		header[..3].copy_from_slice(b"ID3");
		header[3] = self.version.major();
		header[4] = self.revision;
		header[5] = self.flags.as_byte(self.version);
		BigEndian::write_u32(&mut header[6..], self.size.synch()?);

		Ok(header)
	}

	/// The tag version
	pub fn version(&self) -> Id3v2Version {
		self.version
	}

	/// The revision, usually 0
	pub fn revision(&self) -> u8 {
		self.revision
	}

	/// The tag flags
	pub fn flags(&self) -> Id3v2TagFlags {
		self.flags
	}

	/// The size of everything between the header and the footer
	pub fn size(&self) -> u32 {
		self.size
	}

	/// The size of the entire tag, including the header and footer
	pub fn complete_tag_size(&self) -> u64 {
		let footer = if self.flags.footer {
			ID3V2_FOOTER_SIZE as u64
		} else {
			0
		};

		u64::from(self.size) + ID3V2_HEADER_SIZE as u64 + footer
	}
}

/// An ID3v2.3/4 extended header
///
/// tagkit only skips the extended header. It is never written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExtendedHeader {
	size: u32,
}

impl ExtendedHeader {
	/// Read the size of the extended header at the start of the tag data
	///
	/// Returns `None` if there are not enough bytes for the size field.
	pub(crate) fn parse(data: &[u8], version: Id3v2Version) -> Option<Self> {
		let size_bytes: [u8; 4] = data.get(..4)?.try_into().ok()?;
		let size = match version {
			// Excludes the size field itself
			Id3v2Version::V3 => u32::from_be_bytes(size_bytes).saturating_add(4),
			_ => u32::from_be_bytes(size_bytes).unsynch(),
		};

		Some(Self { size })
	}

	/// The number of bytes the extended header occupies, including its size field
	pub fn size(&self) -> u32 {
		self.size
	}
}

/// An ID3v2.4 footer
///
/// The footer is a copy of the header, with the identifier `"3DI"`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Footer;

impl Footer {
	/// Render a footer for `header`
	///
	/// # Errors
	///
	/// See [`Id3v2Header::render`]
	pub fn render(header: &Id3v2Header) -> Result<[u8; ID3V2_FOOTER_SIZE]> {
		let mut footer = header.render()?;
		footer[..3].copy_from_slice(b"3DI");
		Ok(footer)
	}
}

/// The parse progress of an [`Id3v2Tag`](crate::id3::v2::Id3v2Tag)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TagState {
	/// Nothing has been read yet
	#[default]
	Unparsed,
	/// The header was read, the frames are being read
	Parsing,
	/// The tag was read completely
	Parsed,
	/// The header or the tag size is invalid, the tag holds no frames
	Invalid,
}
