use super::Frame;
use super::content::parse_content;
use crate::id3::v2::items::BinaryFrame;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, is_synchsafe, resynchronize};
use crate::id3::v2::util::upgrade::{is_discontinued_v3, upgrade_v2, upgrade_v3};
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
use crate::macros::diag;
use crate::util::charset::FieldDecoder;

use std::borrow::Cow;

use byteorder::{BigEndian, ByteOrder};

/// The outcome of reading a single frame
pub(in crate::id3::v2) struct ParsedFrame {
	/// `None` when the frame was skipped
	pub(in crate::id3::v2) frame: Option<Frame>,
	/// The declared size of the frame, excluding its header
	pub(in crate::id3::v2) size: u32,
}

impl ParsedFrame {
	fn skipped(size: u32) -> Self {
		Self { frame: None, size }
	}
}

/// Builds frames from the body of a tag
pub(in crate::id3::v2) struct FrameFactory<'a> {
	version: Id3v2Version,
	decoder: FieldDecoder<'a>,
	implicit_conversions: bool,
}

impl<'a> FrameFactory<'a> {
	pub(in crate::id3::v2) fn new(
		version: Id3v2Version,
		decoder: FieldDecoder<'a>,
		implicit_conversions: bool,
	) -> Self {
		Self {
			version,
			decoder,
			implicit_conversions,
		}
	}

	/// Read the frame at the start of `data`
	///
	/// `None` means there is no frame to speak of (broken header, empty or oversized frame),
	/// and the caller should only step over the frame header.
	pub(in crate::id3::v2) fn create(&self, data: &[u8]) -> Option<ParsedFrame> {
		let header_size = self.version.frame_header_size();
		if data.len() < header_size {
			return None;
		}

		let (id, size, mut flags) = match self.version {
			Id3v2Version::V2 => {
				let size = BigEndian::read_u24(&data[3..6]);
				(&data[..3], size, FrameFlags::default())
			},
			Id3v2Version::V3 => {
				let mut id = &data[..4];
				// ID3v2.2 frames written into an ID3v2.3 tag
				if id[3] == 0 {
					id = &id[..3];
				}

				let size = BigEndian::read_u32(&data[4..8]);
				let flags = FrameFlags::parse_id3v23(BigEndian::read_u16(&data[8..10]));
				(id, size, flags)
			},
			Id3v2Version::V4 => {
				let size = self.id3v24_frame_size(data);
				let flags = FrameFlags::parse_id3v24(BigEndian::read_u16(&data[8..10]));
				(&data[..4], size, flags)
			},
		};

		if !FrameId::is_valid_id(id) {
			log::debug!("Invalid frame ID: 0x{id:x?}, skipping frame header");
			return None;
		}

		let id_str: String = id.iter().copied().map(char::from).collect();

		if size == 0 {
			log::debug!("Encountered a zero length frame ({id_str}), skipping frame header");
			return None;
		}

		if flags.data_length_indicator.is_some() && size <= 4 {
			log::debug!("Frame {id_str} is too small for its data length indicator");
			return None;
		}

		let Some(body) = data.get(header_size..header_size + size as usize) else {
			diag!(
				self.decoder.diagnostics(),
				Warn,
				"Frame {id_str} claims to be {size} bytes, but only {} remain",
				data.len() - header_size
			);
			return None;
		};

		let mut discontinued = false;
		let frame_id = match self.version {
			Id3v2Version::V2 => upgraded(id_str, upgrade_v2),
			Id3v2Version::V3 if id_str.len() == 3 => upgraded(id_str, upgrade_v2),
			Id3v2Version::V3 => {
				discontinued = is_discontinued_v3(&id_str);
				if self.implicit_conversions {
					let upgraded = upgrade_v3(&id_str);
					FrameId::Valid(upgraded.map_or(Cow::Owned(id_str), Cow::Borrowed))
				} else {
					FrameId::Valid(Cow::Owned(id_str))
				}
			},
			Id3v2Version::V4 => FrameId::Valid(Cow::Owned(id_str)),
		};

		let header = FrameHeader {
			id: frame_id,
			flags,
			size,
		};

		// The encryption method is unknown, so the content may be in any shape
		if flags.encryption.is_some() {
			log::debug!("Encountered an encrypted frame ({}), keeping raw data", header.id);
			return Some(ParsedFrame {
				frame: Some(Frame::Binary(BinaryFrame::raw(
					header,
					body.to_vec(),
					self.version,
				))),
				size,
			});
		}

		#[cfg(not(feature = "id3v2_compression_support"))]
		if flags.compression {
			diag!(
				self.decoder.diagnostics(),
				Warn,
				"{}",
				crate::error::Id3v2Error::new(
					crate::error::Id3v2ErrorKind::CompressedFrameEncountered
				)
			);
			return Some(ParsedFrame {
				frame: Some(Frame::Binary(BinaryFrame::raw(
					header,
					body.to_vec(),
					self.version,
				))),
				size,
			});
		}

		let Some(content) = self.strip_prefix(body, &mut flags) else {
			diag!(
				self.decoder.diagnostics(),
				Warn,
				"Frame {} is too small for its flags, skipping",
				header.id
			);
			return Some(ParsedFrame::skipped(size));
		};

		let mut content = Cow::Borrowed(content);
		if flags.unsynchronisation {
			log::trace!("Resynchronizing frame {}", header.id);
			content = Cow::Owned(resynchronize(&content));
		}

		#[cfg(feature = "id3v2_compression_support")]
		if flags.compression {
			match decompress(&content) {
				Ok(decompressed) => content = Cow::Owned(decompressed),
				Err(e) => {
					diag!(
						self.decoder.diagnostics(),
						Warn,
						"Failed to decompress frame {}, skipping: {e}",
						header.id
					);
					return Some(ParsedFrame::skipped(size));
				},
			}
		}

		let header = FrameHeader { flags, ..header };

		if header.id.is_outdated() {
			log::debug!("Unable to upgrade frame {}, keeping it as binary", header.id);
			return Some(ParsedFrame {
				frame: Some(Frame::Binary(BinaryFrame::new_with_header(
					header,
					content.into_owned(),
				))),
				size,
			});
		}

		if discontinued {
			log::debug!("Frame {} does not exist in ID3v2.4, it will not be written", header.id);
			let header = FrameHeader {
				flags: FrameFlags {
					tag_alter_preservation: true,
					..header.flags
				},
				..header
			};

			return Some(ParsedFrame {
				frame: Some(Frame::Binary(BinaryFrame::new_with_header(
					header,
					content.into_owned(),
				))),
				size,
			});
		}

		let id = header.id.clone();
		let frame = match parse_content(&content, header, &self.decoder, self.version) {
			Ok(Some(frame)) => Some(frame),
			Ok(None) => {
				log::debug!("Frame {id} has no usable content, skipping");
				None
			},
			Err(e) => {
				diag!(
					self.decoder.diagnostics(),
					Warn,
					"Failed to parse frame {id}, skipping: {e}"
				);
				None
			},
		};

		Some(ParsedFrame { frame, size })
	}

	// iTunes writes ID3v2.4 tags with plain frame sizes, so the synchsafe interpretation is only
	// trusted when it lands on another frame (or the end of the tag)
	fn id3v24_frame_size(&self, data: &[u8]) -> u32 {
		let bytes = [data[4], data[5], data[6], data[7]];
		let plain = u32::from_be_bytes(bytes);
		if !is_synchsafe(bytes) {
			return plain;
		}

		let synchsafe = plain.unsynch();
		let header_size = self.version.frame_header_size();

		if is_frame_boundary(data, header_size + synchsafe as usize) {
			return synchsafe;
		}

		if is_frame_boundary(data, header_size + plain as usize) {
			diag!(
				self.decoder.diagnostics(),
				Debug,
				"Frame size {plain:#x} is not synchsafe, using it as a plain integer"
			);
			return plain;
		}

		synchsafe
	}

	/// Remove the bytes that precede the content, filling in the flags they belong to
	fn strip_prefix<'b>(&self, mut body: &'b [u8], flags: &mut FrameFlags) -> Option<&'b [u8]> {
		let mut take = |len: usize| -> Option<&'b [u8]> {
			let current: &'b [u8] = body;
			let (prefix, rest) = current.split_at_checked(len)?;
			body = rest;
			Some(prefix)
		};

		match self.version {
			Id3v2Version::V4 => {
				if flags.grouping_identity.is_some() {
					flags.grouping_identity = Some(take(1)?[0]);
				}

				if flags.data_length_indicator.is_some() {
					let len = BigEndian::read_u32(take(4)?);
					flags.data_length_indicator = Some(len.unsynch());
				}
			},
			Id3v2Version::V3 => {
				// Decompressed size
				if flags.compression {
					take(4)?;
				}

				if flags.grouping_identity.is_some() {
					flags.grouping_identity = Some(take(1)?[0]);
				}
			},
			Id3v2Version::V2 => {},
		}

		Some(body)
	}
}

fn upgraded(id: String, upgrade: fn(&str) -> Option<&'static str>) -> FrameId {
	match upgrade(&id) {
		Some(upgraded) => FrameId::Valid(Cow::Borrowed(upgraded)),
		None => FrameId::Outdated(Cow::Owned(id)),
	}
}

/// Whether a frame ending at `pos` is followed by something sensible
fn is_frame_boundary(data: &[u8], pos: usize) -> bool {
	if pos == data.len() {
		return true;
	}

	match data.get(pos) {
		// Padding
		Some(0) => true,
		Some(_) => data
			.get(pos..pos + 4)
			.is_some_and(|id| id.iter().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())),
		None => false,
	}
}

#[cfg(feature = "id3v2_compression_support")]
fn decompress(content: &[u8]) -> crate::error::Result<Vec<u8>> {
	use crate::config::global_options;
	use crate::error::{ErrorKind, Id3v2Error, Id3v2ErrorKind, TagError};

	use std::io::Read;

	use flate2::read::ZlibDecoder;

	let limit = global_options().allocation_limit;

	let mut decompressed = Vec::new();
	ZlibDecoder::new(content)
		.take(limit as u64 + 1)
		.read_to_end(&mut decompressed)
		.map_err(|e| Id3v2Error::new(Id3v2ErrorKind::Decompression(e)))?;

	if decompressed.len() > limit {
		return Err(TagError::new(ErrorKind::TooMuchData));
	}

	Ok(decompressed)
}
