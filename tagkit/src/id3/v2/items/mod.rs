mod binary_frame;
mod extended_text_frame;
mod extended_url_frame;
mod language_frame;
mod ownership_frame;
mod text_information_frame;
mod unique_file_identifier;
mod url_link_frame;

pub use binary_frame::BinaryFrame;
pub use extended_text_frame::ExtendedTextFrame;
pub use extended_url_frame::ExtendedUrlFrame;
pub use language_frame::{CommentFrame, UnsynchronizedTextFrame};
pub use ownership_frame::OwnershipFrame;
pub use text_information_frame::TextInformationFrame;
pub use unique_file_identifier::UniqueFileIdentifierFrame;
pub use url_link_frame::UrlLinkFrame;

use crate::error::Result;
use crate::id3::v2::Id3v2Version;
use crate::util::charset::FieldDecoder;
use crate::util::text::{CanonicalString, TextEncoding, split_fields};

// Decodes the consecutive text fields of a single frame
//
// Some writers only put a BOM in front of the first UTF-16 field, so the byte order of the last
// BOM seen is kept for the fields that follow.
pub(super) struct FieldReader<'a> {
	encoding: TextEncoding,
	byte_order: Option<TextEncoding>,
	decoder: &'a FieldDecoder<'a>,
}

impl<'a> FieldReader<'a> {
	pub(super) fn new(encoding: TextEncoding, decoder: &'a FieldDecoder<'a>) -> Self {
		Self {
			encoding,
			byte_order: None,
			decoder,
		}
	}

	pub(super) fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	pub(super) fn field(&mut self, data: &[u8]) -> Result<CanonicalString> {
		let mut encoding = self.encoding;
		if encoding == TextEncoding::UTF16 {
			match data {
				[0xFF, 0xFE, ..] => self.byte_order = Some(TextEncoding::UTF16LE),
				[0xFE, 0xFF, ..] => self.byte_order = Some(TextEncoding::UTF16BE),
				_ => {
					if let Some(byte_order) = self.byte_order {
						encoding = byte_order;
					}
				},
			}
		}

		self.decoder.decode(data, encoding)
	}

	/// Every non-empty field of `data`, ignoring trailing delimiters
	pub(super) fn fields(&mut self, data: &[u8]) -> Result<Vec<CanonicalString>> {
		let data = strip_trailing_nulls(data, self.encoding);

		let mut values = Vec::new();
		for field in split_fields(data, self.encoding, 0) {
			if field.is_empty() {
				continue;
			}

			let value = self.field(field)?;
			if !value.is_empty() {
				values.push(value);
			}
		}

		Ok(values)
	}
}

fn strip_trailing_nulls(data: &[u8], encoding: TextEncoding) -> &[u8] {
	let mut end = data.len();
	while end > 0 && data[end - 1] == 0 {
		end -= 1;
	}

	// A UTF-16 code unit can end in a zero byte
	let width = encoding.code_unit_width();
	if end % width != 0 {
		end = (end + width - end % width).min(data.len());
	}

	&data[..end]
}

/// The encoding to write `fields` with
///
/// Latin-1 is upgraded to UTF-16 when a field cannot be represented, and ID3v2.3 only gets the
/// encodings it knows.
pub(super) fn encoding_for<'a, I>(encoding: TextEncoding, fields: I, version: Id3v2Version) -> TextEncoding
where
	I: IntoIterator<Item = &'a CanonicalString>,
{
	let mut encoding = encoding;
	if encoding == TextEncoding::Latin1 && !fields.into_iter().all(CanonicalString::is_latin1) {
		log::trace!("Field is not representable in Latin-1, switching to UTF-16");
		encoding = TextEncoding::UTF16;
	}

	if version == Id3v2Version::V3 {
		encoding = encoding.to_id3v23();
	}

	encoding
}

/// Append `fields` separated by the delimiter of `encoding`
///
/// Every UTF-16 field gets its own byte order mark.
pub(super) fn write_fields<'a, I>(content: &mut Vec<u8>, encoding: TextEncoding, fields: I)
where
	I: IntoIterator<Item = &'a CanonicalString>,
{
	for (i, field) in fields.into_iter().enumerate() {
		if i > 0 {
			content.extend_from_slice(encoding.delimiter());
		}

		content.extend(field.encode(encoding));
	}
}

#[cfg(test)]
mod tests {
	use super::{FieldReader, strip_trailing_nulls};
	use crate::config::ParseContext;
	use crate::util::charset::FieldDecoder;
	use crate::util::text::TextEncoding;

	#[test_log::test]
	#[allow(trivial_casts)]
	fn trailing_nulls_keep_code_units_whole() {
		assert_eq!(strip_trailing_nulls(b"abc\0\0", TextEncoding::Latin1), b"abc");
		assert_eq!(
			strip_trailing_nulls(&[0x61, 0x00, 0x00, 0x00], TextEncoding::UTF16LE),
			&[0x61, 0x00]
		);
		assert_eq!(strip_trailing_nulls(&[0, 0], TextEncoding::UTF16), &[] as &[u8]);
	}

	#[test_log::test]
	fn byte_order_carries_over() {
		let ctx = ParseContext::new();
		let decoder = FieldDecoder::new(&ctx, None);

		let data = [
			0xFE, 0xFF, 0x00, 0x61, 0x00, 0x00, // "a" with a BOM
			0x00, 0x62, // "b" without one
		];
		let values = FieldReader::new(TextEncoding::UTF16, &decoder)
			.fields(&data)
			.unwrap();
		assert_eq!(values, ["a", "b"]);
	}
}
