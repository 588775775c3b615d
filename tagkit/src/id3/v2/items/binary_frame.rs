use crate::error::Result;
use crate::id3::v2::frame::content::FrameContent;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
use crate::util::charset::FieldDecoder;

/// A binary fallback for all unknown `ID3v2` frames
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BinaryFrame {
	pub(crate) header: FrameHeader,
	/// The binary data
	pub data: Vec<u8>,
	// Set when `data` is the untouched frame body (encrypted, or compressed without support),
	// including the flag dependent prefix of that version
	pub(crate) raw: Option<Id3v2Version>,
}

impl BinaryFrame {
	/// Create a new [`BinaryFrame`]
	pub fn new(id: FrameId, data: Vec<u8>) -> Self {
		let header = FrameHeader::new(id, FrameFlags::default());
		Self {
			header,
			data,
			raw: None,
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

	/// Whether the data is still encrypted or compressed
	///
	/// These frames can only be written back in the version they were read from.
	pub fn is_raw(&self) -> bool {
		self.raw.is_some()
	}

	pub(crate) fn new_with_header(header: FrameHeader, data: Vec<u8>) -> Self {
		Self {
			header,
			data,
			raw: None,
		}
	}

	pub(crate) fn raw(header: FrameHeader, data: Vec<u8>, version: Id3v2Version) -> Self {
		Self {
			header,
			data,
			raw: Some(version),
		}
	}

	/// The body of the `BinaryFrame`, without a header
	pub fn as_bytes(&self) -> Vec<u8> {
		self.data.clone()
	}
}

impl FrameContent for BinaryFrame {
	fn parse(
		data: &[u8],
		header: FrameHeader,
		_: &FieldDecoder<'_>,
		_: Id3v2Version,
	) -> Result<Option<Self>> {
		Ok(Some(BinaryFrame {
			header,
			data: data.to_vec(),
			raw: None,
		}))
	}
}
