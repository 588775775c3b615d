//! Reporting of recoverable problems found in the input
//!
//! Tag reading must never abort on a single bad file, so problems that are recovered from
//! (clamped sizes, skipped frames, folded duplicate tags, undecodable text, ...) are reported
//! through a [`DiagnosticListener`] instead of being returned as errors.
//!
//! The default listener, [`LogListener`], forwards everything to the [`log`] facade.
//!
//! # Examples
//!
//! ```rust
//! use tagkit::config::ParseContext;
//! use tagkit::diagnostics::DiagnosticLog;
//! use tagkit::iff::RiffContainer;
//!
//! # fn main() -> tagkit::error::Result<()> {
//! // A RIFF header that claims to be much larger than it is
//! let mut file = std::io::Cursor::new(b"RIFF\xFF\x00\x00\x00WAVE".to_vec());
//!
//! let log = DiagnosticLog::new();
//! let container = RiffContainer::read(&mut file, &ParseContext::new().diagnostics(&log))?;
//!
//! assert!(container.is_valid());
//! assert!(!log.is_empty());
//! # Ok(()) }
//! ```

use std::cell::RefCell;

use log::Level;

const DIAGNOSTICS_TARGET: &str = "tagkit::diagnostics";

/// A receiver of diagnostics
pub trait DiagnosticListener {
	/// Handle a single diagnostic
	fn message(&self, level: Level, message: &str);
}

impl<T: DiagnosticListener + ?Sized> DiagnosticListener for &T {
	fn message(&self, level: Level, message: &str) {
		(**self).message(level, message)
	}
}

/// Forwards diagnostics to the [`log`] facade
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LogListener;

impl DiagnosticListener for LogListener {
	fn message(&self, level: Level, message: &str) {
		log::log!(target: DIAGNOSTICS_TARGET, level, "{message}");
	}
}

/// Discards all diagnostics
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NullListener;

impl DiagnosticListener for NullListener {
	fn message(&self, _: Level, _: &str) {}
}

/// A single diagnostic collected by a [`DiagnosticLog`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
	/// The severity
	pub level: Level,
	/// The message
	pub message: String,
}

/// Collects diagnostics in memory
///
/// Useful in bulk processing, where the problems found in each file are reported at the end.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
	entries: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticLog {
	/// Create an empty `DiagnosticLog`
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether no diagnostics were collected
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}

	/// The number of collected diagnostics
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Whether any collected message contains `needle`
	pub fn contains(&self, needle: &str) -> bool {
		self.entries
			.borrow()
			.iter()
			.any(|entry| entry.message.contains(needle))
	}

	/// Take all collected diagnostics, leaving the log empty
	pub fn take(&self) -> Vec<Diagnostic> {
		self.entries.take()
	}
}

impl DiagnosticListener for DiagnosticLog {
	fn message(&self, level: Level, message: &str) {
		log::log!(target: DIAGNOSTICS_TARGET, level, "{message}");
		self.entries.borrow_mut().push(Diagnostic {
			level,
			message: message.to_owned(),
		});
	}
}

#[cfg(test)]
mod tests {
	use super::{DiagnosticListener, DiagnosticLog, NullListener};
	use crate::macros::diag;

	#[test_log::test]
	fn log_collects_messages() {
		let log = DiagnosticLog::new();
		diag!(&log, Warn, "Chunk {} is too large", "LIST");
		diag!(&log, Debug, "second");

		assert_eq!(log.len(), 2);
		assert!(log.contains("LIST"));

		let entries = log.take();
		assert_eq!(entries[0].level, log::Level::Warn);
		assert_eq!(entries[1].message, "second");
		assert!(log.is_empty());
	}

	#[test_log::test]
	fn listener_through_reference() {
		let log = DiagnosticLog::new();
		let by_ref: &dyn DiagnosticListener = &log;
		diag!(&by_ref, Info, "forwarded");
		assert!(log.contains("forwarded"));

		diag!(&NullListener, Error, "dropped");
	}
}
