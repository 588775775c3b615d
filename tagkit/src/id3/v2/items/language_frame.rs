use super::{FieldReader, encoding_for, write_fields};
use crate::error::Result;
use crate::id3::v2::frame::content::{FrameContent, verify_encoding};
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
use crate::util::charset::FieldDecoder;
use crate::util::text::{CanonicalString, TextEncoding, split_fields};

const UNKNOWN_LANGUAGE: [u8; 3] = *b"XXX";

// The shared body layout of `COMM` and `USLT`: encoding, language, description, text
struct LanguageFrame {
	encoding: TextEncoding,
	language: [u8; 3],
	description: CanonicalString,
	text: CanonicalString,
}

impl LanguageFrame {
	fn parse(data: &[u8], decoder: &FieldDecoder<'_>, version: Id3v2Version) -> Result<Option<Self>> {
		if data.len() < 5 {
			log::debug!("Language frame is too short ({} bytes), skipping", data.len());
			return Ok(None);
		}

		let encoding = verify_encoding(data[0], version)?;

		let mut language = [0; 3];
		language.copy_from_slice(&data[1..4]);

		let mut reader = FieldReader::new(encoding, decoder);
		let parts = split_fields(&data[4..], encoding, 2);

		let (description, text) = match parts.as_slice() {
			[description, text] => (reader.field(description)?, reader.field(text)?),
			_ => (CanonicalString::new(), CanonicalString::new()),
		};

		Ok(Some(Self {
			encoding,
			language,
			description,
			text,
		}))
	}

	fn create_bytes(
		encoding: TextEncoding,
		language: [u8; 3],
		description: &CanonicalString,
		text: &CanonicalString,
		version: Id3v2Version,
	) -> Vec<u8> {
		let encoding = encoding_for(encoding, [description, text], version);

		let language = if language.iter().all(u8::is_ascii_alphabetic) {
			language
		} else {
			UNKNOWN_LANGUAGE
		};

		let mut bytes = vec![encoding as u8];
		bytes.extend_from_slice(&language);
		write_fields(&mut bytes, encoding, [description, text]);

		bytes
	}
}

macro_rules! language_frames {
	($($(#[$meta:meta])* $name:ident => $id:literal;)+) => {
		$(
			$(#[$meta])*
			#[derive(Clone, Debug, PartialEq, Eq, Hash)]
			pub struct $name {
				pub(crate) header: FrameHeader,
				/// The encoding of the description and text
				pub encoding: TextEncoding,
				/// ISO-639-2 language code (3 bytes)
				///
				/// Anything other than ASCII letters is written as `"XXX"`.
				pub language: [u8; 3],
				/// Tells frames with the same ID apart
				pub description: CanonicalString,
				/// The content
				pub text: CanonicalString,
			}

			impl $name {
				const FRAME_ID: FrameId = FrameId::from_static($id);

				#[doc = concat!("Create a new [`", stringify!($name), "`]")]
				pub fn new(
					encoding: TextEncoding,
					language: [u8; 3],
					description: impl Into<CanonicalString>,
					text: impl Into<CanonicalString>,
				) -> Self {
					Self {
						header: FrameHeader::new(Self::FRAME_ID, FrameFlags::default()),
						encoding,
						language,
						description: description.into(),
						text: text.into(),
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

				/// The frame body, without a header
				pub fn as_bytes(&self, version: Id3v2Version) -> Vec<u8> {
					LanguageFrame::create_bytes(
						self.encoding,
						self.language,
						&self.description,
						&self.text,
						version,
					)
				}
			}

			impl FrameContent for $name {
				fn parse(
					data: &[u8],
					header: FrameHeader,
					decoder: &FieldDecoder<'_>,
					version: Id3v2Version,
				) -> Result<Option<Self>> {
					Ok(LanguageFrame::parse(data, decoder, version)?.map(|frame| Self {
						header,
						encoding: frame.encoding,
						language: frame.language,
						description: frame.description,
						text: frame.text,
					}))
				}
			}
		)+
	};
}

language_frames! {
	/// A `COMM` frame, keyed by language and description
	CommentFrame => "COMM";
	/// A `USLT` lyrics frame, keyed by language and description
	UnsynchronizedTextFrame => "USLT";
}
