use super::{FieldReader, encoding_for};
use crate::error::Result;
use crate::id3::v2::frame::content::{FrameContent, verify_encoding};
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
use crate::util::charset::FieldDecoder;
use crate::util::text::{CanonicalString, TextEncoding};

use std::fmt::{Display, Formatter};

const FRAME_ID: FrameId = FrameId::from_static("OWNE");

const DATE_LEN: usize = 8;

/// An `OWNE` frame, the record of a purchase
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OwnershipFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of `seller`, the other fields are always Latin-1
	pub encoding: TextEncoding,
	/// An ISO 4217 currency code followed by the amount, such as `"USD9.99"`
	pub price_paid: CanonicalString,
	/// `YYYYMMDD`
	pub date_purchased: CanonicalString,
	/// Who sold it
	pub seller: CanonicalString,
}

impl OwnershipFrame {
	/// An `OWNE` frame with default flags
	pub fn new(
		encoding: TextEncoding,
		price_paid: impl Into<CanonicalString>,
		date_purchased: impl Into<CanonicalString>,
		seller: impl Into<CanonicalString>,
	) -> Self {
		let header = FrameHeader::new(FRAME_ID, FrameFlags::default());
		Self {
			header,
			encoding,
			price_paid: price_paid.into(),
			date_purchased: date_purchased.into(),
			seller: seller.into(),
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
	///
	/// The date is cut or space padded to 8 characters.
	pub fn as_bytes(&self, version: Id3v2Version) -> Vec<u8> {
		let encoding = encoding_for(self.encoding, [&self.seller], version);

		let mut bytes = vec![encoding as u8];

		bytes.extend(self.price_paid.encode(TextEncoding::Latin1));
		bytes.push(0);

		let mut date = self.date_purchased.encode(TextEncoding::Latin1);
		date.resize(DATE_LEN, b' ');
		bytes.extend(date);

		bytes.extend(self.seller.encode(encoding));
		bytes
	}
}

impl Display for OwnershipFrame {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"pricePaid={} datePurchased={} seller={}",
			self.price_paid, self.date_purchased, self.seller
		)
	}
}

impl FrameContent for OwnershipFrame {
	fn parse(
		data: &[u8],
		header: FrameHeader,
		decoder: &FieldDecoder<'_>,
		version: Id3v2Version,
	) -> Result<Option<Self>> {
		let Some((&encoding_byte, mut content)) = data.split_first() else {
			return Ok(None);
		};

		let encoding = verify_encoding(encoding_byte, version)?;

		let price_end = content.iter().position(|b| *b == 0).unwrap_or(content.len());
		let price_paid = decoder.decode_latin1(&content[..price_end]);
		content = content.get(price_end + 1..).unwrap_or_default();

		let mut date_purchased = CanonicalString::new();
		if content.len() >= DATE_LEN {
			date_purchased = decoder.decode_latin1(&content[..DATE_LEN]);
			content = &content[DATE_LEN..];
		}

		let seller = FieldReader::new(encoding, decoder).field(content)?;

		Ok(Some(Self {
			header,
			encoding,
			price_paid,
			date_purchased,
			seller,
		}))
	}
}
