use super::ParseOptions;
use crate::diagnostics::{DiagnosticListener, LogListener};
use crate::util::charset::{CharsetDetector, DefaultLatin1Handler, Latin1StringHandler};

use std::fmt::{Debug, Formatter};

/// Everything a parse needs besides the bytes
///
/// This bundles the [`ParseOptions`] with the collaborators that are injected into the
/// parsing call chain: where diagnostics go, how Latin-1 text is turned into a
/// [`CanonicalString`](crate::text::CanonicalString), and an optional charset detector.
///
/// # Examples
///
/// ```rust
/// use tagkit::config::{ParseContext, ParseOptions};
/// use tagkit::diagnostics::DiagnosticLog;
///
/// let log = DiagnosticLog::new();
/// let ctx = ParseContext::new()
/// 	.options(ParseOptions::new().max_text_chunk_size(4096))
/// 	.diagnostics(&log);
/// ```
#[derive(Copy, Clone)]
pub struct ParseContext<'a> {
	pub(crate) options: ParseOptions,
	pub(crate) diagnostics: &'a dyn DiagnosticListener,
	pub(crate) latin1_handler: &'a dyn Latin1StringHandler,
	pub(crate) detector: Option<&'a dyn CharsetDetector>,
}

impl<'a> ParseContext<'a> {
	/// Creates a `ParseContext` with default options, a [`LogListener`], and the
	/// [`DefaultLatin1Handler`]
	pub fn new() -> Self {
		Self {
			options: ParseOptions::new(),
			diagnostics: &LogListener,
			latin1_handler: &DefaultLatin1Handler,
			detector: None,
		}
	}

	/// Replace the [`ParseOptions`]
	pub fn options(mut self, options: ParseOptions) -> Self {
		self.options = options;
		self
	}

	/// Where diagnostics should be sent
	pub fn diagnostics(mut self, listener: &'a dyn DiagnosticListener) -> Self {
		self.diagnostics = listener;
		self
	}

	/// The strategy used to decode text labelled as Latin-1
	pub fn latin1_handler(mut self, handler: &'a dyn Latin1StringHandler) -> Self {
		self.latin1_handler = handler;
		self
	}

	/// A detector used for Latin-1 text when [`ParseOptions::smart_encoding`] is enabled
	pub fn charset_detector(mut self, detector: &'a dyn CharsetDetector) -> Self {
		self.detector = Some(detector);
		self
	}

	/// The [`ParseOptions`] in use
	pub fn parse_options(&self) -> ParseOptions {
		self.options
	}
}

impl Default for ParseContext<'_> {
	fn default() -> Self {
		Self::new()
	}
}

impl Debug for ParseContext<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ParseContext")
			.field("options", &self.options)
			.field("detector", &self.detector.is_some())
			.finish_non_exhaustive()
	}
}
