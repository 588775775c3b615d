use super::{FieldReader, encoding_for, write_fields};
use crate::error::Result;
use crate::id3::v2::frame::content::{FrameContent, verify_encoding};
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
use crate::util::charset::FieldDecoder;
use crate::util::text::{CanonicalString, TextEncoding, split_fields};

use std::iter;

/// An extended `ID3v2` text frame
///
/// This is used in the `TXXX` frame, where the frames
/// are told apart by descriptions, rather than their [`FrameId`]s.
/// This means for each `ExtendedTextFrame` in the tag, the description
/// must be unique.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedTextFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description and its content
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: CanonicalString,
	/// The actual frame content
	pub values: Vec<CanonicalString>,
}

impl ExtendedTextFrame {
	const FRAME_ID: FrameId = FrameId::from_static("TXXX");

	/// Create a new [`ExtendedTextFrame`]
	pub fn new<D, I, V>(encoding: TextEncoding, description: D, values: I) -> Self
	where
		D: Into<CanonicalString>,
		I: IntoIterator<Item = V>,
		V: Into<CanonicalString>,
	{
		let header = FrameHeader::new(Self::FRAME_ID, FrameFlags::default());
		Self {
			header,
			encoding,
			description: description.into(),
			values: values.into_iter().map(Into::into).collect(),
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

	/// The body of the `ExtendedTextFrame`, without a header
	pub fn as_bytes(&self, version: Id3v2Version) -> Vec<u8> {
		let fields = || iter::once(&self.description).chain(&self.values);
		let encoding = encoding_for(self.encoding, fields(), version);

		let mut bytes = vec![encoding as u8];
		write_fields(&mut bytes, encoding, fields());
		bytes
	}
}

impl FrameContent for ExtendedTextFrame {
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
		let mut reader = FieldReader::new(encoding, decoder);

		let parts = split_fields(content, encoding, 2);
		let description = reader.field(parts[0])?;
		let values = match parts.get(1) {
			Some(rest) => reader.fields(rest)?,
			None => Vec::new(),
		};

		Ok(Some(Self {
			header,
			encoding: reader.encoding(),
			description,
			values,
		}))
	}
}

#[cfg(test)]
mod tests {
	use crate::config::ParseContext;
	use crate::id3::v2::frame::content::FrameContent;
	use crate::id3::v2::{ExtendedTextFrame, FrameFlags, FrameHeader, FrameId, Id3v2Version};
	use crate::util::charset::FieldDecoder;
	use crate::util::text::TextEncoding;

	#[test_log::test]
	fn txxx_round_trip() {
		let frame = ExtendedTextFrame::new(
			TextEncoding::UTF16,
			"REPLAYGAIN_TRACK_GAIN",
			["-6.5 dB", "extra"],
		);
		let bytes = frame.as_bytes(Id3v2Version::V4);

		let ctx = ParseContext::new();
		let header = FrameHeader::new(FrameId::new("TXXX").unwrap(), FrameFlags::default());
		let parsed = ExtendedTextFrame::parse(&bytes, header, &FieldDecoder::new(&ctx, None), Id3v2Version::V4)
			.unwrap()
			.unwrap();

		assert_eq!(parsed, frame);
	}

	#[test_log::test]
	fn description_only() {
		let ctx = ParseContext::new();
		let header = FrameHeader::new(FrameId::new("TXXX").unwrap(), FrameFlags::default());
		let parsed = ExtendedTextFrame::parse(b"\x00desc", header, &FieldDecoder::new(&ctx, None), Id3v2Version::V3)
			.unwrap()
			.unwrap();

		assert_eq!(parsed.description, "desc");
		assert!(parsed.values.is_empty());
	}
}
