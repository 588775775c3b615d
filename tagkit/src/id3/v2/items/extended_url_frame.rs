use super::{FieldReader, encoding_for};
use crate::error::Result;
use crate::id3::v2::frame::content::{FrameContent, verify_encoding};
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
use crate::util::charset::FieldDecoder;
use crate::util::text::{CanonicalString, TextEncoding, split_fields};

const FRAME_ID: FrameId = FrameId::from_static("WXXX");

/// An extended `ID3v2` URL frame
///
/// This is used in the `WXXX` frame, where the frames
/// are told apart by descriptions, rather than their [`FrameId`]s.
/// This means for each `ExtendedUrlFrame` in the tag, the description
/// must be unique.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedUrlFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: CanonicalString,
	/// The URL, always Latin-1
	pub url: CanonicalString,
}

impl ExtendedUrlFrame {
	/// Create a new [`ExtendedUrlFrame`]
	pub fn new(
		encoding: TextEncoding,
		description: impl Into<CanonicalString>,
		url: impl Into<CanonicalString>,
	) -> Self {
		let header = FrameHeader::new(FRAME_ID, FrameFlags::default());
		Self {
			header,
			encoding,
			description: description.into(),
			url: url.into(),
		}
	}

	/// The header flags
	pub fn flags(&self) -> FrameFlags {
		self.header.flags
	}

	/// Replace the header flags
	pub fn set_flags(&mut self, flags: FrameFlags) {
		self.header.flags = flags;
	}

	/// The body of the `ExtendedUrlFrame`, without a header
	pub fn as_bytes(&self, version: Id3v2Version) -> Vec<u8> {
		let encoding = encoding_for(self.encoding, [&self.description], version);

		let mut bytes = vec![encoding as u8];
		bytes.extend(self.description.encode(encoding));
		bytes.extend_from_slice(encoding.delimiter());
		bytes.extend(self.url.encode(TextEncoding::Latin1));

		bytes
	}
}

impl FrameContent for ExtendedUrlFrame {
	fn parse(
		data: &[u8],
		header: FrameHeader,
		decoder: &FieldDecoder<'_>,
		version: Id3v2Version,
	) -> Result<Option<Self>> {
		let Some((&encoding_byte, content)) = data.split_first() else {
			return Ok(None);
		};

		let encoding = verify_encoding(encoding_byte, version)?;

		let parts = split_fields(content, encoding, 2);
		let description = FieldReader::new(encoding, decoder).field(parts[0])?;
		let url = parts
			.get(1)
			.map(|url| CanonicalString::from_latin1(url))
			.unwrap_or_default();

		Ok(Some(ExtendedUrlFrame {
			header,
			encoding,
			description,
			url,
		}))
	}
}
