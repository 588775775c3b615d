use crate::error::Result;
use crate::id3::v2::items::{
	BinaryFrame, CommentFrame, ExtendedTextFrame, ExtendedUrlFrame, OwnershipFrame,
	TextInformationFrame, UniqueFileIdentifierFrame, UnsynchronizedTextFrame, UrlLinkFrame,
};
use crate::id3::v2::{Frame, FrameHeader, Id3v2Version};
use crate::macros::id3v2_err;
use crate::util::charset::FieldDecoder;
use crate::util::text::TextEncoding;

/// The content of a frame, read from its (already decoded) body
pub(in crate::id3::v2) trait FrameContent: Sized + Into<Frame> {
	/// `Ok(None)` when there is not enough data to build the frame
	///
	/// Errors are reserved for undecodable content.
	fn parse(
		data: &[u8],
		header: FrameHeader,
		decoder: &FieldDecoder<'_>,
		version: Id3v2Version,
	) -> Result<Option<Self>>;
}

type FrameConstructor =
	fn(&[u8], FrameHeader, &FieldDecoder<'_>, Id3v2Version) -> Result<Option<Frame>>;

enum IdPattern {
	Exact(&'static str),
	Prefix(char),
}

impl IdPattern {
	fn matches(&self, id: &str) -> bool {
		match self {
			IdPattern::Exact(exact) => *exact == id,
			IdPattern::Prefix(prefix) => id.starts_with(*prefix),
		}
	}
}

fn construct<T: FrameContent>(
	data: &[u8],
	header: FrameHeader,
	decoder: &FieldDecoder<'_>,
	version: Id3v2Version,
) -> Result<Option<Frame>> {
	Ok(T::parse(data, header, decoder, version)?.map(Into::into))
}

// Checked in order, the first match wins
#[rustfmt::skip]
const FRAME_CONSTRUCTORS: &[(IdPattern, FrameConstructor)] = &[
	(IdPattern::Exact("TXXX"), construct::<ExtendedTextFrame>),
	(IdPattern::Exact("WXXX"), construct::<ExtendedUrlFrame>),
	(IdPattern::Exact("COMM"), construct::<CommentFrame>),
	(IdPattern::Exact("USLT"), construct::<UnsynchronizedTextFrame>),
	(IdPattern::Exact("OWNE"), construct::<OwnershipFrame>),
	(IdPattern::Exact("UFID"), construct::<UniqueFileIdentifierFrame>),
	// ID3v2.3 IPLS is TIPL with a different ID
	(IdPattern::Exact("IPLS"), construct::<TextInformationFrame>),
	// Apple proprietary frames
	// WFED (Podcast URL), GRP1 (Grouping), MVNM (Movement Name), MVIN (Movement Number)
	(IdPattern::Exact("WFED"), construct::<TextInformationFrame>),
	(IdPattern::Exact("GRP1"), construct::<TextInformationFrame>),
	(IdPattern::Exact("MVNM"), construct::<TextInformationFrame>),
	(IdPattern::Exact("MVIN"), construct::<TextInformationFrame>),
	(IdPattern::Prefix('T'), construct::<TextInformationFrame>),
	(IdPattern::Prefix('W'), construct::<UrlLinkFrame>),
];

/// Build the content of a frame with a known ID
///
/// Unregistered IDs become [`BinaryFrame`]s.
pub(super) fn parse_content(
	data: &[u8],
	header: FrameHeader,
	decoder: &FieldDecoder<'_>,
	version: Id3v2Version,
) -> Result<Option<Frame>> {
	log::trace!("Parsing frame content for ID: {}", header.id);

	let fallback: FrameConstructor = construct::<BinaryFrame>;
	let constructor = FRAME_CONSTRUCTORS
		.iter()
		.find(|(pattern, _)| pattern.matches(header.id.as_str()))
		.map_or(fallback, |(_, constructor)| {
			*constructor
		});

	constructor(data, header, decoder, version)
}

pub(in crate::id3::v2) fn verify_encoding(
	encoding: u8,
	version: Id3v2Version,
) -> Result<TextEncoding> {
	if version == Id3v2Version::V2 && (encoding != 0 && encoding != 1) {
		return Err(id3v2_err!(BadTextEncoding(encoding)));
	}

	TextEncoding::from_u8(encoding).ok_or_else(|| id3v2_err!(BadTextEncoding(encoding)))
}

#[cfg(test)]
mod tests {
	use super::parse_content;
	use crate::config::ParseContext;
	use crate::id3::v2::{Frame, FrameFlags, FrameHeader, FrameId, Id3v2Version};
	use crate::util::charset::FieldDecoder;

	fn content(id: &'static str, data: &[u8]) -> Frame {
		let ctx = ParseContext::new();
		let header = FrameHeader::new(FrameId::new(id).unwrap(), FrameFlags::default());
		parse_content(data, header, &FieldDecoder::new(&ctx, None), Id3v2Version::V4)
			.unwrap()
			.unwrap()
	}

	#[test_log::test]
	fn registry_dispatch() {
		assert!(matches!(content("TXXX", b"\x00a\0b"), Frame::UserText(_)));
		assert!(matches!(content("TIT2", b"\x00a"), Frame::Text(_)));
		assert!(matches!(content("WFED", b"\x00a"), Frame::Text(_)));
		assert!(matches!(content("WOAR", b"https://"), Frame::Url(_)));
		assert!(matches!(content("WXXX", b"\x00\0https://"), Frame::UserUrl(_)));
		assert!(matches!(content("APIC", b"\x00image/png\0"), Frame::Binary(_)));
	}
}
