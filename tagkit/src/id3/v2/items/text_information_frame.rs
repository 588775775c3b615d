use super::{FieldReader, encoding_for, write_fields};
use crate::error::Result;
use crate::id3::v2::frame::content::{FrameContent, verify_encoding};
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
use crate::util::charset::FieldDecoder;
use crate::util::text::{CanonicalString, TextEncoding};

/// An `ID3v2` text frame
///
/// This covers every `T***` frame other than `TXXX`, including the key/value lists `TIPL`
/// and `TMCL`, which store their pairs as consecutive fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextInformationFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// The fields of the frame
	pub values: Vec<CanonicalString>,
}

impl TextInformationFrame {
	/// Create a new [`TextInformationFrame`]
	pub fn new<I, V>(id: FrameId, encoding: TextEncoding, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<CanonicalString>,
	{
		let header = FrameHeader::new(id, FrameFlags::default());
		Self {
			header,
			encoding,
			values: values.into_iter().map(Into::into).collect(),
		}
	}

	/// Get the ID for the frame
	pub fn id(&self) -> &FrameId {
		&self.header.id
	}

	/// The header flags
	pub fn flags(&self) -> FrameFlags {
		self.header.flags
	}

	/// Replace the header flags
	pub fn set_flags(&mut self, flags: FrameFlags) {
		self.header.flags = flags;
	}

	/// The body of the `TextInformationFrame`, without a header
	pub fn as_bytes(&self, version: Id3v2Version) -> Vec<u8> {
		let encoding = encoding_for(self.encoding, &self.values, version);

		let mut content = vec![encoding as u8];
		write_fields(&mut content, encoding, &self.values);
		content
	}
}

impl FrameContent for TextInformationFrame {
	fn parse(
		data: &[u8],
		header: FrameHeader,
		decoder: &FieldDecoder<'_>,
		version: Id3v2Version,
	) -> Result<Option<Self>> {
		let Some((&encoding_byte, content)) = data.split_first() else {
			return Ok(Some(Self {
				header,
				encoding: TextEncoding::Latin1,
				values: Vec::new(),
			}));
		};

		let encoding = verify_encoding(encoding_byte, version)?;
		let values = FieldReader::new(encoding, decoder).fields(content)?;

		Ok(Some(Self {
			header,
			encoding,
			values,
		}))
	}
}
