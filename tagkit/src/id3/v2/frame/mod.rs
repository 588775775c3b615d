pub(super) mod content;
pub(super) mod header;
pub(super) mod read;

use super::items::{
	BinaryFrame, CommentFrame, ExtendedTextFrame, ExtendedUrlFrame, OwnershipFrame,
	TextInformationFrame, UniqueFileIdentifierFrame, UnsynchronizedTextFrame, UrlLinkFrame,
};
use crate::error::Result;
use crate::id3::v2::{FrameHeader, Id3v2Version};
use crate::util::text::CanonicalString;
use header::FrameId;

pub(super) const MUSICBRAINZ_UFID_OWNER: &str = "http://musicbrainz.org";

macro_rules! define_frames {
	(
		$(#[$meta:meta])*
		pub enum Frame {
			$(
				$(#[$field_meta:meta])+
				$variant:ident($type:ty),
			)*
		}
	) => {
		$(#[$meta])*
		pub enum Frame {
			$(
				$(#[$field_meta])+
				$variant($type),
			)*
		}

		impl Frame {
			/// Get the header of the frame
			pub fn header(&self) -> &FrameHeader {
				match self {
					$(
						Frame::$variant(frame) => &frame.header,
					)*
				}
			}

			/// Get the ID of the frame
			pub fn id(&self) -> &FrameId {
				&self.header().id
			}

			/// The header flags
			pub fn flags(&self) -> FrameFlags {
				self.header().flags
			}

			/// Replace the header flags
			pub fn set_flags(&mut self, flags: FrameFlags) {
				match self {
					$(
						Frame::$variant(frame) => frame.header.flags = flags,
					)*
				}
			}

			/// Used for errors in [`Id3v2Tag::render`](crate::id3::v2::Id3v2Tag::render)
			pub(super) fn name(&self) -> &'static str {
				match self {
					$(
						Frame::$variant(_) => stringify!($variant),
					)*
				}
			}
		}

		$(
			impl From<$type> for Frame {
				fn from(value: $type) -> Self {
					Frame::$variant(value)
				}
			}
		)*
	}
}

define_frames! {
	/// A single ID3v2 frame, one variant per payload layout
	///
	/// Frames are always held in their ID3v2.4 form:
	///
	/// * ID3v2.2 IDs are 3 characters long and translated with [`upgrade_v2`](crate::id3::v2::upgrade_v2)
	///   while reading. IDs without a translation stay [`FrameId::Outdated`] and are dropped on
	///   render, since ID3v2.2 is never written.
	/// * ID3v2.3 IDs that were renamed are translated with [`upgrade_v3`](crate::id3::v2::upgrade_v3).
	///   Unknown ID3v2.3 IDs are kept as they are, they are valid ID3v2.4 IDs as well.
	#[non_exhaustive]
	#[derive(Clone, Debug, PartialEq, Eq, Hash)]
	pub enum Frame {
		/// `T***` text frames other than `TXXX`. The people lists `TIPL`, `TMCL` and `IPLS` store
		/// role/name pairs as consecutive values.
		Text(TextInformationFrame),
		/// `TXXX`
		UserText(ExtendedTextFrame),
		/// `COMM`
		Comment(CommentFrame),
		/// `USLT`
		UnsynchronizedText(UnsynchronizedTextFrame),
		/// `OWNE`
		Ownership(OwnershipFrame),
		/// `W***` links other than `WXXX`
		Url(UrlLinkFrame),
		/// `WXXX`
		UserUrl(ExtendedUrlFrame),
		/// `UFID`
		UniqueFileIdentifier(UniqueFileIdentifierFrame),
		/// Anything without a dedicated variant, kept as raw bytes
		///
		/// Encrypted frames and frames with a [`FrameId::Outdated`] ID always end up here.
		Binary(BinaryFrame),
	}
}

impl Frame {
	/// The frame ID as a string
	pub fn id_str(&self) -> &str {
		self.id().as_str()
	}

	/// Whether the frame has no content, such frames are skipped on render
	pub fn is_empty(&self) -> bool {
		match self {
			Frame::Text(text) => text.values.iter().all(CanonicalString::is_empty),
			Frame::UserText(extended_text) => extended_text.values.is_empty(),
			Frame::Comment(comment) => comment.text.is_empty(),
			Frame::UnsynchronizedText(unsync_text) => unsync_text.text.is_empty(),
			Frame::Ownership(ownership) => {
				ownership.price_paid.is_empty()
					&& ownership.date_purchased.is_empty()
					&& ownership.seller.is_empty()
			},
			Frame::Url(link) => link.url.is_empty(),
			Frame::UserUrl(extended_url) => extended_url.url.is_empty(),
			Frame::UniqueFileIdentifier(ufid) => ufid.identifier.is_empty(),
			Frame::Binary(binary) => binary.data.is_empty(),
		}
	}

	/// Render the frame content, without a frame header
	///
	/// # Errors
	///
	/// The frame content cannot be represented, see the individual frame types
	pub fn as_bytes(&self, version: Id3v2Version) -> Result<Vec<u8>> {
		Ok(match self {
			Frame::Text(tif) => tif.as_bytes(version),
			Frame::UserText(content) => content.as_bytes(version),
			Frame::Comment(comment) => comment.as_bytes(version),
			Frame::UnsynchronizedText(lf) => lf.as_bytes(version),
			Frame::Ownership(frame) => frame.as_bytes(version),
			Frame::Url(link) => link.as_bytes(),
			Frame::UserUrl(content) => content.as_bytes(version),
			Frame::UniqueFileIdentifier(frame) => frame.as_bytes()?,
			Frame::Binary(frame) => frame.as_bytes(),
		})
	}

	/// A textual representation of the frame content
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::{Frame, FrameId, TextInformationFrame};
	/// use tagkit::text::TextEncoding;
	///
	/// # fn main() -> tagkit::error::Result<()> {
	/// let frame = Frame::Text(TextInformationFrame::new(
	/// 	FrameId::new("TCON")?,
	/// 	TextEncoding::UTF8,
	/// 	["Rock", "Pop"],
	/// ));
	///
	/// assert_eq!(frame.to_canonical_string(), "Rock Pop");
	/// # Ok(()) }
	/// ```
	pub fn to_canonical_string(&self) -> CanonicalString {
		match self {
			Frame::Text(text) => join(&text.values, " "),
			Frame::UserText(extended_text) => CanonicalString::from(format!(
				"[{}] {}",
				extended_text.description,
				join(&extended_text.values, " ")
			)),
			Frame::Comment(comment) => comment.text.clone(),
			Frame::UnsynchronizedText(unsync_text) => unsync_text.text.clone(),
			Frame::Ownership(ownership) => CanonicalString::from(ownership.to_string()),
			Frame::Url(link) => link.url.clone(),
			Frame::UserUrl(extended_url) => CanonicalString::from(format!(
				"[{}] {}",
				extended_url.description, extended_url.url
			)),
			Frame::UniqueFileIdentifier(ufid) => ufid.owner.clone(),
			Frame::Binary(_) => CanonicalString::new(),
		}
	}
}

pub(super) fn join(values: &[CanonicalString], separator: &str) -> CanonicalString {
	let separator = CanonicalString::from(separator);
	let mut joined = CanonicalString::new();
	for (i, value) in values.iter().enumerate() {
		if i > 0 {
			joined = joined.concat(&separator);
		}
		joined = joined.concat(value);
	}

	joined
}

/// The status and format flags of a frame header
///
/// `grouping_identity`, `encryption` and `data_length_indicator` carry a value in the frame
/// body. Parsing the flags alone sets them to `Some(0)`, the frame reader fills in the value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct FrameFlags {
	/// The frame should be dropped when an unaware writer alters the tag
	///
	/// Frames with this flag are never written by tagkit.
	pub tag_alter_preservation: bool,
	/// The frame should be dropped when an unaware writer alters the audio
	pub file_alter_preservation: bool,
	/// The frame content is not meant to be changed
	pub read_only: bool,
	/// The group byte shared by related frames
	pub grouping_identity: Option<u8>,
	/// The body is zlib compressed
	///
	/// Compressed frames are inflated when read, and always written uncompressed.
	pub compression: bool,
	/// The encryption method byte
	///
	/// Encrypted frames cannot be decoded, they are kept as [`BinaryFrame`]s and written back
	/// byte for byte.
	pub encryption: Option<u8>,
	/// The body is unsynchronised (ID3v2.4 only)
	///
	/// Unsynchronisation inserts a `0x00` after every `0xFF` that could be mistaken for an MPEG
	/// frame sync. It is undone when reading and never applied when writing.
	pub unsynchronisation: bool,
	/// The size of the body before compression and unsynchronisation (ID3v2.4 only)
	pub data_length_indicator: Option<u32>,
}

// The bit of each flag, 0 where a version lacks the flag
struct FlagLayout {
	tag_alter_preservation: u16,
	file_alter_preservation: u16,
	read_only: u16,
	grouping_identity: u16,
	compression: u16,
	encryption: u16,
	unsynchronisation: u16,
	data_length_indicator: u16,
}

const ID3V24_LAYOUT: FlagLayout = FlagLayout {
	tag_alter_preservation: 0x4000,
	file_alter_preservation: 0x2000,
	read_only: 0x1000,
	grouping_identity: 0x0040,
	compression: 0x0008,
	encryption: 0x0004,
	unsynchronisation: 0x0002,
	data_length_indicator: 0x0001,
};

const ID3V23_LAYOUT: FlagLayout = FlagLayout {
	tag_alter_preservation: 0x8000,
	file_alter_preservation: 0x4000,
	read_only: 0x2000,
	grouping_identity: 0x0020,
	compression: 0x0080,
	encryption: 0x0040,
	unsynchronisation: 0,
	data_length_indicator: 0,
};

impl FlagLayout {
	fn parse(&self, flags: u16) -> FrameFlags {
		let set = |bit: u16| bit != 0 && flags & bit == bit;

		FrameFlags {
			tag_alter_preservation: set(self.tag_alter_preservation),
			file_alter_preservation: set(self.file_alter_preservation),
			read_only: set(self.read_only),
			grouping_identity: set(self.grouping_identity).then_some(0),
			compression: set(self.compression),
			encryption: set(self.encryption).then_some(0),
			unsynchronisation: set(self.unsynchronisation),
			data_length_indicator: set(self.data_length_indicator).then_some(0),
		}
	}

	fn render(&self, flags: &FrameFlags) -> u16 {
		[
			(flags.tag_alter_preservation, self.tag_alter_preservation),
			(flags.file_alter_preservation, self.file_alter_preservation),
			(flags.read_only, self.read_only),
			(flags.grouping_identity.is_some(), self.grouping_identity),
			(flags.compression, self.compression),
			(flags.encryption.is_some(), self.encryption),
			(flags.unsynchronisation, self.unsynchronisation),
			(flags.data_length_indicator.is_some(), self.data_length_indicator),
		]
		.into_iter()
		.filter(|(is_set, _)| *is_set)
		.fold(0, |acc, (_, bit)| acc | bit)
	}
}

impl FrameFlags {
	/// Parse the flags of an ID3v2.4 frame header
	pub fn parse_id3v24(flags: u16) -> Self {
		ID3V24_LAYOUT.parse(flags)
	}

	/// Parse the flags of an ID3v2.3 frame header
	///
	/// ID3v2.3 has no `unsynchronisation` or `data_length_indicator` flags.
	pub fn parse_id3v23(flags: u16) -> Self {
		ID3V23_LAYOUT.parse(flags)
	}

	/// The ID3v2.4 frame header representation
	pub fn as_id3v24_bytes(&self) -> u16 {
		ID3V24_LAYOUT.render(self)
	}

	/// The ID3v2.3 frame header representation
	///
	/// Flags that do not exist in ID3v2.3 are dropped.
	pub fn as_id3v23_bytes(&self) -> u16 {
		ID3V23_LAYOUT.render(self)
	}

	/// The flags of a frame that is written with plain content
	pub(crate) fn for_plain_content(self) -> Self {
		Self {
			compression: false,
			unsynchronisation: false,
			data_length_indicator: None,
			..self
		}
	}
}

#[cfg(test)]
mod tests {
	use super::FrameFlags;

	#[test_log::test]
	fn flags_between_versions() {
		let flags = FrameFlags::parse_id3v24(0x4049);
		assert!(flags.tag_alter_preservation);
		assert!(flags.compression);
		assert_eq!(flags.grouping_identity, Some(0));
		assert_eq!(flags.data_length_indicator, Some(0));
		assert_eq!(flags.as_id3v24_bytes(), 0x4049);

		// No data length indicator in ID3v2.3
		assert_eq!(flags.as_id3v23_bytes(), 0x80A0);
		assert_eq!(FrameFlags::parse_id3v23(0x80A0).as_id3v24_bytes(), 0x4048);

		let plain = flags.for_plain_content();
		assert_eq!(plain.as_id3v24_bytes(), 0x4040);
	}
}
