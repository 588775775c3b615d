/// How much damage an item may have before it is dropped
///
/// No mode aborts a scan because of one bad frame or chunk, the mode only decides the fate of
/// that item.
///
/// # Examples
///
/// ```rust
/// use tagkit::config::{ParseOptions, ParsingMode};
///
/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
/// ```
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Drop any frame that does not decode cleanly
	///
	/// Undecodable text and unknown encoding bytes both cost the whole frame.
	Strict,
	/// Keep what can be kept
	///
	/// Undecodable text becomes an empty field, a frame with an unknown encoding byte is kept
	/// as a binary frame.
	#[default]
	BestAttempt,
	/// Keep as much as possible
	///
	/// Undecodable sequences become U+FFFD, a frame with an unknown encoding byte is kept as a
	/// binary frame.
	Relaxed,
}

/// Options to control how tagkit parses a container or tag
#[derive(Copy, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) implicit_conversions: bool,
	pub(crate) smart_encoding: bool,
	pub(crate) charset_confidence_threshold: f32,
	pub(crate) max_text_chunk_size: u32,
}

impl Default for ParseOptions {
	/// Same as [`ParseOptions::new`]:
	///
	/// ```rust,ignore
	/// ParseOptions {
	/// 	parsing_mode: ParsingMode::BestAttempt,
	/// 	implicit_conversions: true,
	/// 	smart_encoding: false,
	/// 	charset_confidence_threshold: 0.5,
	/// 	max_text_chunk_size: 100 * 1024,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Default minimum confidence for a detected charset to be used
	pub const DEFAULT_CHARSET_CONFIDENCE_THRESHOLD: f32 = 0.5;

	/// Default ceiling for chunks holding textual metadata (`LIST`)
	pub const DEFAULT_MAX_TEXT_CHUNK_SIZE: u32 = 100 * 1024;

	/// The default options
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			implicit_conversions: true,
			smart_encoding: false,
			charset_confidence_threshold: Self::DEFAULT_CHARSET_CONFIDENCE_THRESHOLD,
			max_text_chunk_size: Self::DEFAULT_MAX_TEXT_CHUNK_SIZE,
		}
	}

	/// The [`ParsingMode`], [`ParsingMode::BestAttempt`] by default
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// Upgrade outdated frames while reading, enabled by default
	///
	/// This upgrades older frames to their ID3v2.4 counterparts while reading:
	///
	/// * ID3v2.2 three character IDs are mapped to their four character replacements
	/// * `TYER`, `TDAT`, and `TIME` are combined into a single `TDRC` frame
	/// * `TORY` becomes `TDOR`, `IPLS` becomes `TIPL`
	/// * ID3v2.3 style genres (`"(17)(RX)Refinement"`) are split into separate fields
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::config::ParseOptions;
	///
	/// // Keep the frames as they are stored
	/// let parsing_options = ParseOptions::new().implicit_conversions(false);
	/// ```
	pub fn implicit_conversions(&mut self, implicit_conversions: bool) -> Self {
		self.implicit_conversions = implicit_conversions;
		*self
	}

	/// Guess the charset of Latin-1 text, disabled by default
	///
	/// Many encoders store text in a legacy charset (EUC-KR, Shift_JIS, ...) while labelling it
	/// as Latin-1. When enabled, and a [`CharsetDetector`](crate::util::charset::CharsetDetector)
	/// is provided through [`ParseContext`](crate::config::ParseContext), Latin-1 fields are
	/// decoded with the detected charset.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new().smart_encoding(true);
	/// ```
	pub fn smart_encoding(&mut self, smart_encoding: bool) -> Self {
		self.smart_encoding = smart_encoding;
		*self
	}

	/// The confidence a detected charset must exceed to be used
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new()
	/// 	.smart_encoding(true)
	/// 	.charset_confidence_threshold(0.9);
	/// ```
	pub fn charset_confidence_threshold(&mut self, charset_confidence_threshold: f32) -> Self {
		self.charset_confidence_threshold = charset_confidence_threshold;
		*self
	}

	/// The maximum size of a chunk holding textual metadata
	///
	/// A `LIST` chunk declaring a larger size marks the entire container as invalid.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new().max_text_chunk_size(1024 * 1024);
	/// ```
	pub fn max_text_chunk_size(&mut self, max_text_chunk_size: u32) -> Self {
		self.max_text_chunk_size = max_text_chunk_size;
		*self
	}
}
