use crate::error::Result;
use crate::id3::v2::frame::content::FrameContent;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
use crate::macros::id3v2_err;
use crate::util::charset::FieldDecoder;
use crate::util::text::{CanonicalString, TextEncoding, split_fields};

const FRAME_ID: FrameId = FrameId::from_static("UFID");

const MAX_IDENTIFIER_LEN: usize = 64;

/// An `ID3v2` unique file identifier frame (UFID).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UniqueFileIdentifierFrame {
	pub(crate) header: FrameHeader,
	/// The non-empty owner of the identifier.
	pub owner: CanonicalString,
	/// The binary payload with up to 64 bytes of data.
	pub identifier: Vec<u8>,
}

impl UniqueFileIdentifierFrame {
	/// Create a new [`UniqueFileIdentifierFrame`]
	pub fn new(owner: impl Into<CanonicalString>, identifier: Vec<u8>) -> Self {
		let header = FrameHeader::new(FRAME_ID, FrameFlags::default());
		Self {
			header,
			owner: owner.into(),
			identifier,
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

	/// Encode the frame contents as bytes
	///
	/// # Errors
	///
	/// The identifier is longer than 64 bytes
	pub fn as_bytes(&self) -> Result<Vec<u8>> {
		if self.identifier.len() > MAX_IDENTIFIER_LEN {
			return Err(id3v2_err!(BadFrame(
				FRAME_ID.as_str().to_owned(),
				"identifier is longer than 64 bytes"
			)));
		}

		let mut content = self.owner.encode(TextEncoding::Latin1);
		content.push(0);
		content.extend_from_slice(&self.identifier);

		Ok(content)
	}
}

impl FrameContent for UniqueFileIdentifierFrame {
	fn parse(
		data: &[u8],
		header: FrameHeader,
		_: &FieldDecoder<'_>,
		_: Id3v2Version,
	) -> Result<Option<Self>> {
		let parts = split_fields(data, TextEncoding::Latin1, 2);
		let owner = CanonicalString::from_latin1(parts[0]);
		let identifier = parts.get(1).map(|id| id.to_vec()).unwrap_or_default();

		Ok(Some(Self {
			header,
			owner,
			identifier,
		}))
	}
}

#[cfg(test)]
mod tests {
	use crate::config::ParseContext;
	use crate::id3::v2::frame::content::FrameContent;
	use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version, UniqueFileIdentifierFrame};
	use crate::util::charset::FieldDecoder;

	#[test_log::test]
	fn ufid_decode() {
		let ctx = ParseContext::new();
		let header = FrameHeader::new(FrameId::new("UFID").unwrap(), FrameFlags::default());
		let parsed = UniqueFileIdentifierFrame::parse(
			b"http://musicbrainz.org\x00\x01\x00\x02",
			header,
			&FieldDecoder::new(&ctx, None),
			Id3v2Version::V4,
		)
		.unwrap()
		.unwrap();

		assert_eq!(parsed.owner, "http://musicbrainz.org");
		// The identifier is binary, nulls included
		assert_eq!(parsed.identifier, [1, 0, 2]);
	}

	#[test_log::test]
	fn ufid_identifier_limit() {
		let frame = UniqueFileIdentifierFrame::new("owner", vec![b'a'; 64]);
		assert_eq!(frame.as_bytes().unwrap().len(), 6 + 64);

		let frame = UniqueFileIdentifierFrame::new("owner", vec![b'a'; 65]);
		assert!(frame.as_bytes().is_err());
	}
}
