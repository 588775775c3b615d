//! The canonical text representation and its conversions
//!
//! Every text field read by tagkit is converted exactly once into a [`CanonicalString`], a
//! sequence of UTF-16 code units in host byte order. The string does not remember where it came
//! from, so the encoding to write it back with must be tracked by the owner (frames keep their
//! [`TextEncoding`] next to their fields).

use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

const BOM: u16 = 0xFEFF;

/// Errors that can occur while decoding text
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextDecodeError {
	encoding: TextEncoding,
	message: &'static str,
}

impl TextDecodeError {
	pub(crate) const fn new(encoding: TextEncoding, message: &'static str) -> Self {
		Self { encoding, message }
	}

	/// The encoding the input was decoded as
	pub fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	/// A description of the problem
	pub fn message(&self) -> &'static str {
		self.message
	}
}

impl Display for TextDecodeError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "invalid {} input: {}", self.encoding.name(), self.message)
	}
}

impl std::error::Error for TextDecodeError {}

/// The text encoding of an ID3v2 text field
///
/// The discriminant is the encoding byte stored at the start of the payload.
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash, Default)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	#[default]
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian
	UTF16BE = 2,
	/// UTF-8
	UTF8 = 3,
	/// UTF-16 little endian
	///
	/// This is not part of ID3v2, but is accepted because some writers emit it.
	UTF16LE = 4,
}

impl TextEncoding {
	/// Get a `TextEncoding` from a u8, must be 0-4 inclusive
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::text::TextEncoding;
	///
	/// assert_eq!(TextEncoding::from_u8(3), Some(TextEncoding::UTF8));
	/// assert_eq!(TextEncoding::from_u8(5), None);
	/// ```
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::UTF16),
			2 => Some(Self::UTF16BE),
			3 => Some(Self::UTF8),
			4 => Some(Self::UTF16LE),
			_ => None,
		}
	}

	/// The null delimiter separating fields of this encoding
	pub fn delimiter(self) -> &'static [u8] {
		match self.code_unit_width() {
			1 => &[0],
			_ => &[0, 0],
		}
	}

	/// The width in bytes of a single code unit
	pub fn code_unit_width(self) -> usize {
		match self {
			Self::Latin1 | Self::UTF8 => 1,
			Self::UTF16 | Self::UTF16BE | Self::UTF16LE => 2,
		}
	}

	/// ID3v2.3 only knows Latin-1 and UTF-16 with a BOM
	pub(crate) fn to_id3v23(self) -> Self {
		match self {
			Self::UTF8 | Self::UTF16BE | Self::UTF16LE => {
				log::debug!(
					"Text encoding {:?} is not supported in ID3v2.3, substituting with UTF-16",
					self
				);
				Self::UTF16
			},
			_ => self,
		}
	}

	fn name(self) -> &'static str {
		match self {
			Self::Latin1 => "Latin-1",
			Self::UTF16 => "UTF-16",
			Self::UTF16BE => "UTF-16 BE",
			Self::UTF8 => "UTF-8",
			Self::UTF16LE => "UTF-16 LE",
		}
	}
}

/// A string stored as UTF-16 code units in host byte order
///
/// Conversions happen once on construction ([`CanonicalString::decode`]) and once on output
/// ([`CanonicalString::encode`]).
///
/// # Examples
///
/// ```rust
/// use tagkit::text::{CanonicalString, TextEncoding};
///
/// # fn main() -> Result<(), tagkit::error::TextDecodeError> {
/// let latin1 = CanonicalString::decode(&[0xB0, 0xA5], TextEncoding::Latin1)?;
/// assert_eq!(latin1.units(), &[0x00B0, 0x00A5]);
///
/// // Rendering as UTF-8 produces two multi-byte sequences
/// assert_eq!(latin1.encode(TextEncoding::UTF8), "°¥".as_bytes());
/// # Ok(()) }
/// ```
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalString {
	units: Vec<u16>,
}

impl CanonicalString {
	/// Create an empty string
	pub const fn new() -> Self {
		Self { units: Vec::new() }
	}

	/// Create a string from raw code units
	pub fn from_units(units: Vec<u16>) -> Self {
		Self { units }
	}

	/// Widen every byte into a code unit
	pub fn from_latin1(bytes: &[u8]) -> Self {
		let mut units: Vec<u16> = bytes.iter().map(|b| u16::from(*b)).collect();
		truncate_at_null(&mut units);
		Self { units }
	}

	/// Decode `bytes` as `encoding`
	///
	/// The result ends at the first null code unit.
	///
	/// # Errors
	///
	/// * Malformed UTF-8
	/// * [`TextEncoding::UTF16`] input without a recognized byte order mark
	pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<Self, TextDecodeError> {
		let mut units = match encoding {
			TextEncoding::Latin1 => return Ok(Self::from_latin1(bytes)),
			TextEncoding::UTF8 => match std::str::from_utf8(bytes) {
				Ok(text) => text.encode_utf16().collect(),
				Err(_) => {
					return Err(TextDecodeError::new(encoding, "malformed UTF-8 sequence"));
				},
			},
			TextEncoding::UTF16 => {
				if bytes.is_empty() {
					return Ok(Self::new());
				}

				match bytes {
					[0xFF, 0xFE, rest @ ..] => utf16_units(rest, u16::from_le_bytes),
					[0xFE, 0xFF, rest @ ..] => utf16_units(rest, u16::from_be_bytes),
					_ => {
						return Err(TextDecodeError::new(
							encoding,
							"missing or unrecognized byte order mark",
						));
					},
				}
			},
			TextEncoding::UTF16BE => utf16_units(bytes, u16::from_be_bytes),
			TextEncoding::UTF16LE => utf16_units(bytes, u16::from_le_bytes),
		};

		truncate_at_null(&mut units);
		Ok(Self { units })
	}

	/// Decode `bytes` as `encoding`, never failing
	///
	/// Malformed UTF-8 sequences become U+FFFD, and UTF-16 input without a byte order mark is
	/// assumed to be little endian.
	pub fn decode_lossy(bytes: &[u8], encoding: TextEncoding) -> Self {
		match Self::decode(bytes, encoding) {
			Ok(decoded) => decoded,
			Err(_) => {
				let mut units = match encoding {
					TextEncoding::UTF8 => String::from_utf8_lossy(bytes).encode_utf16().collect(),
					_ => utf16_units(bytes, u16::from_le_bytes),
				};

				truncate_at_null(&mut units);
				Self { units }
			},
		}
	}

	/// Encode the string as `encoding`, without a terminator
	///
	/// [`TextEncoding::Latin1`] keeps the low byte of every code unit, [`TextEncoding::UTF16`]
	/// is written in host byte order with a byte order mark.
	pub fn encode(&self, encoding: TextEncoding) -> Vec<u8> {
		match encoding {
			TextEncoding::Latin1 => self.units.iter().map(|u| *u as u8).collect(),
			TextEncoding::UTF8 => self.to_string_lossy().into_bytes(),
			TextEncoding::UTF16 => {
				let mut out = Vec::with_capacity((self.units.len() + 1) * 2);
				out.extend_from_slice(&BOM.to_ne_bytes());
				out.extend(self.units.iter().flat_map(|u| u.to_ne_bytes()));
				out
			},
			TextEncoding::UTF16BE => self.units.iter().flat_map(|u| u.to_be_bytes()).collect(),
			TextEncoding::UTF16LE => self.units.iter().flat_map(|u| u.to_le_bytes()).collect(),
		}
	}

	/// The code units
	pub fn units(&self) -> &[u16] {
		&self.units
	}

	/// The number of code units
	pub fn len(&self) -> usize {
		self.units.len()
	}

	/// Whether the string has no code units
	pub fn is_empty(&self) -> bool {
		self.units.is_empty()
	}

	/// Whether every code unit fits in a single Latin-1 byte
	pub fn is_latin1(&self) -> bool {
		self.units.iter().all(|u| *u <= 0xFF)
	}

	/// Whether every code unit is ASCII
	pub fn is_ascii(&self) -> bool {
		self.units.iter().all(|u| *u < 0x80)
	}

	/// Convert to a `String`, replacing unpaired surrogates with U+FFFD
	pub fn to_string_lossy(&self) -> String {
		String::from_utf16_lossy(&self.units)
	}

	/// Parse the entire string as a signed decimal integer
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::text::CanonicalString;
	///
	/// assert_eq!(CanonicalString::from("17").to_int(), Some(17));
	/// assert_eq!(CanonicalString::from("-3").to_int(), Some(-3));
	/// assert_eq!(CanonicalString::from("17a").to_int(), None);
	/// ```
	pub fn to_int(&self) -> Option<i32> {
		if self.units.is_empty() || !self.is_ascii() {
			return None;
		}

		self.to_string_lossy().parse().ok()
	}

	/// Uppercase the ASCII letters of the string
	pub fn to_ascii_uppercase(&self) -> Self {
		Self {
			units: self
				.units
				.iter()
				.map(|u| match u8::try_from(*u) {
					Ok(b) => u16::from(b.to_ascii_uppercase()),
					Err(_) => *u,
				})
				.collect(),
		}
	}

	/// Append `other` to a copy of this string
	pub fn concat(&self, other: &CanonicalString) -> Self {
		let mut units = Vec::with_capacity(self.units.len() + other.units.len());
		units.extend_from_slice(&self.units);
		units.extend_from_slice(&other.units);
		Self { units }
	}
}

fn utf16_units(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> Vec<u16> {
	bytes
		.chunks_exact(2)
		.map(|c| endianness([c[0], c[1]]))
		.collect()
}

fn truncate_at_null(units: &mut Vec<u16>) {
	if let Some(pos) = units.iter().position(|u| *u == 0) {
		units.truncate(pos);
	}
}

impl From<&str> for CanonicalString {
	fn from(value: &str) -> Self {
		Self {
			units: value.encode_utf16().collect(),
		}
	}
}

impl From<String> for CanonicalString {
	fn from(value: String) -> Self {
		Self::from(value.as_str())
	}
}

impl From<&String> for CanonicalString {
	fn from(value: &String) -> Self {
		Self::from(value.as_str())
	}
}

impl From<Cow<'_, str>> for CanonicalString {
	fn from(value: Cow<'_, str>) -> Self {
		Self::from(&*value)
	}
}

impl FromStr for CanonicalString {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::from(s))
	}
}

impl PartialEq<str> for CanonicalString {
	fn eq(&self, other: &str) -> bool {
		self.units.iter().copied().eq(other.encode_utf16())
	}
}

impl PartialEq<&str> for CanonicalString {
	fn eq(&self, other: &&str) -> bool {
		self == *other
	}
}

impl Display for CanonicalString {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.to_string_lossy())
	}
}

impl Debug for CanonicalString {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Debug::fmt(&self.to_string_lossy(), f)
	}
}

/// Split `data` on the null delimiter of `encoding`
///
/// Delimiters are only matched at multiples of the code unit width. When `max` is non-zero, at
/// most `max` parts are produced and the final part holds the remainder.
pub(crate) fn split_fields(data: &[u8], encoding: TextEncoding, max: usize) -> Vec<&[u8]> {
	let width = encoding.code_unit_width();

	let mut fields = Vec::new();
	let mut start = 0;
	let mut pos = 0;
	while pos + width <= data.len() {
		if max != 0 && fields.len() + 1 == max {
			break;
		}

		if data[pos..pos + width].iter().all(|b| *b == 0) {
			fields.push(&data[start..pos]);
			start = pos + width;
		}

		pos += width;
	}

	fields.push(&data[start..]);
	fields
}
