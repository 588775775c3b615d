//! Strategies for text that claims to be Latin-1
//!
//! ID3v2 only allows Latin-1 for single byte text, yet a large share of real files store a
//! regional charset (EUC-KR, Shift_JIS, GBK, ...) in Latin-1 fields. tagkit never guesses on its
//! own. The caller decides through the [`ParseContext`]:
//!
//! * A [`Latin1StringHandler`] converts every Latin-1 field. [`DefaultLatin1Handler`] performs
//!   the exact widening, [`LegacyCharsetHandler`] decodes a fixed charset.
//! * A [`CharsetDetector`], only consulted when
//!   [`ParseOptions::smart_encoding`](crate::config::ParseOptions::smart_encoding) is enabled,
//!   guesses a charset per tag.

use crate::config::{ParseContext, ParsingMode};
use crate::diagnostics::DiagnosticListener;
use crate::error::Result;
use crate::macros::diag;
use crate::util::text::{CanonicalString, TextEncoding};

use encoding_rs::Encoding;

/// Detector results that never select a charset
const IGNORED_CHARSETS: [&str; 6] = [
	"UNDETECTED",
	"UNKNOWN",
	"NOUSE",
	"ASCII",
	"WINDOWS-1252",
	"UTF-8",
];

/// Converts the bytes of a Latin-1 field
pub trait Latin1StringHandler {
	/// Convert `data`, which holds no terminator
	fn parse(&self, data: &[u8]) -> CanonicalString;
}

/// Widens every byte to a single code unit
///
/// # Examples
///
/// ```rust
/// use tagkit::charset::{DefaultLatin1Handler, Latin1StringHandler};
///
/// let text = DefaultLatin1Handler.parse(&[0xB0, 0xA5]);
/// assert_eq!(text.units(), &[0x00B0, 0x00A5]);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DefaultLatin1Handler;

impl Latin1StringHandler for DefaultLatin1Handler {
	fn parse(&self, data: &[u8]) -> CanonicalString {
		CanonicalString::from_latin1(data)
	}
}

/// Decodes every Latin-1 field with a fixed legacy charset
///
/// Malformed sequences become U+FFFD.
///
/// # Examples
///
/// ```rust
/// use tagkit::charset::{Latin1StringHandler, LegacyCharsetHandler};
///
/// let handler = LegacyCharsetHandler::for_label("shift_jis").unwrap();
/// assert_eq!(handler.parse(&[0x82, 0xA0]), "\u{3042}");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LegacyCharsetHandler {
	encoding: &'static Encoding,
}

impl LegacyCharsetHandler {
	/// Use `encoding` for every Latin-1 field
	pub fn new(encoding: &'static Encoding) -> Self {
		Self { encoding }
	}

	/// Look up a charset by its WHATWG label (`"euc-kr"`, `"shift_jis"`, `"gbk"`, ...)
	pub fn for_label(label: &str) -> Option<Self> {
		Encoding::for_label(label.as_bytes()).map(Self::new)
	}

	/// The charset in use
	pub fn encoding(&self) -> &'static Encoding {
		self.encoding
	}
}

impl Latin1StringHandler for LegacyCharsetHandler {
	fn parse(&self, data: &[u8]) -> CanonicalString {
		let (decoded, _) = self.encoding.decode_without_bom_handling(data);
		let mut units: Vec<u16> = decoded.encode_utf16().collect();
		if let Some(pos) = units.iter().position(|u| *u == 0) {
			units.truncate(pos);
		}

		CanonicalString::from_units(units)
	}
}

/// Guesses the charset of unlabelled single byte text
///
/// This is a collaborator interface, tagkit ships no implementation.
pub trait CharsetDetector {
	/// Returns the detected charset name and a confidence in `0.0..=1.0`
	fn detect(&self, data: &[u8]) -> Option<(String, f32)>;
}

/// Resolve a detector result into a charset
///
/// Results at or below `threshold`, or naming a charset that is already handled by the plain
/// Latin-1 path, are discarded.
pub(crate) fn resolve_detected_charset(
	detector: &dyn CharsetDetector,
	data: &[u8],
	threshold: f32,
	diagnostics: &dyn DiagnosticListener,
) -> Option<&'static Encoding> {
	let (name, confidence) = detector.detect(data)?;

	if confidence <= threshold {
		log::debug!("Ignoring detected charset `{name}` (confidence {confidence})");
		return None;
	}

	if IGNORED_CHARSETS
		.iter()
		.any(|ignored| ignored.eq_ignore_ascii_case(&name))
	{
		return None;
	}

	let encoding = Encoding::for_label(name.trim().as_bytes());
	if encoding.is_none() {
		diag!(
			diagnostics,
			Warn,
			"Detected charset `{name}` is not supported, falling back to Latin-1"
		);
	}

	encoding
}

/// Decodes the text fields of a single tag
///
/// Carries the Latin-1 strategy and the charset detected for the tag, if any.
#[derive(Copy, Clone)]
pub(crate) struct FieldDecoder<'a> {
	handler: &'a dyn Latin1StringHandler,
	legacy: Option<&'static Encoding>,
	diagnostics: &'a dyn DiagnosticListener,
	parsing_mode: ParsingMode,
}

impl<'a> FieldDecoder<'a> {
	pub(crate) fn new(ctx: &ParseContext<'a>, legacy: Option<&'static Encoding>) -> Self {
		Self {
			handler: ctx.latin1_handler,
			legacy,
			diagnostics: ctx.diagnostics,
			parsing_mode: ctx.options.parsing_mode,
		}
	}

	pub(crate) fn diagnostics(&self) -> &'a dyn DiagnosticListener {
		self.diagnostics
	}

	pub(crate) fn parsing_mode(&self) -> ParsingMode {
		self.parsing_mode
	}

	/// Decode a single field
	///
	/// With [`ParsingMode::Strict`], an undecodable field is an error so the frame can be
	/// discarded. Otherwise the field is emptied (or lossily decoded) with a diagnostic.
	pub(crate) fn decode(&self, data: &[u8], encoding: TextEncoding) -> Result<CanonicalString> {
		if encoding == TextEncoding::Latin1 {
			return Ok(self.decode_latin1(data));
		}

		match CanonicalString::decode(data, encoding) {
			Ok(decoded) => Ok(decoded),
			Err(e) => match self.parsing_mode {
				ParsingMode::Strict => Err(e.into()),
				ParsingMode::BestAttempt => {
					diag!(self.diagnostics, Warn, "{e}, replacing field with an empty string");
					Ok(CanonicalString::new())
				},
				ParsingMode::Relaxed => {
					diag!(self.diagnostics, Warn, "{e}, decoding lossily");
					Ok(CanonicalString::decode_lossy(data, encoding))
				},
			},
		}
	}

	/// Decode a field that is Latin-1 regardless of the frame encoding (URLs, owners, prices)
	pub(crate) fn decode_latin1(&self, data: &[u8]) -> CanonicalString {
		let Some(legacy) = self.legacy else {
			return self.handler.parse(data);
		};

		let end = data.iter().position(|b| *b == 0).unwrap_or(data.len());
		match legacy.decode_without_bom_handling_and_without_replacement(&data[..end]) {
			Some(decoded) => CanonicalString::from(decoded),
			None => {
				diag!(
					self.diagnostics,
					Debug,
					"Field is not valid {}, falling back to Latin-1",
					legacy.name()
				);
				self.handler.parse(data)
			},
		}
	}
}
