use crate::error::Result;
use crate::id3::v2::frame::content::FrameContent;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
use crate::util::charset::FieldDecoder;
use crate::util::text::{CanonicalString, TextEncoding};

/// An `ID3v2` URL frame
///
/// URLs are always Latin-1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UrlLinkFrame {
	pub(crate) header: FrameHeader,
	/// The URL
	pub url: CanonicalString,
}

impl UrlLinkFrame {
	/// Create a new [`UrlLinkFrame`]
	pub fn new(id: FrameId, url: impl Into<CanonicalString>) -> Self {
		UrlLinkFrame {
			header: FrameHeader::new(id, FrameFlags::default()),
			url: url.into(),
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

	/// The body of the `UrlLinkFrame`, without a header
	pub fn as_bytes(&self) -> Vec<u8> {
		self.url.encode(TextEncoding::Latin1)
	}
}

impl FrameContent for UrlLinkFrame {
	fn parse(
		data: &[u8],
		header: FrameHeader,
		_: &FieldDecoder<'_>,
		_: Id3v2Version,
	) -> Result<Option<Self>> {
		Ok(Some(UrlLinkFrame {
			header,
			url: CanonicalString::from_latin1(data),
		}))
	}
}
