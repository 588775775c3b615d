use crate::error::Result;
use crate::id3::v2::FrameFlags;
use crate::macros::id3v2_err;

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// The ID and flags of a frame
///
/// Every frame type creates one for itself, building it by hand is seldom needed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameHeader {
	pub(crate) id: FrameId,
	/// The frame flags
	pub flags: FrameFlags,
	pub(crate) size: u32,
}

impl FrameHeader {
	/// A header for `id`, which cannot be changed afterwards
	pub const fn new(id: FrameId, flags: FrameFlags) -> Self {
		Self { id, flags, size: 0 }
	}

	/// The frame ID
	pub const fn id(&self) -> &FrameId {
		&self.id
	}

	/// The payload size declared in the tag the frame was read from
	///
	/// This is 0 for frames that were not read from a tag.
	pub const fn size(&self) -> u32 {
		self.size
	}
}

/// A frame ID
///
/// Orders by variant, then by text. The variants are not checked, prefer [`FrameId::new`] over
/// building them directly.
#[derive(PartialEq, Clone, Debug, Eq, Hash, PartialOrd, Ord)]
pub enum FrameId {
	/// A four character ID3v2.3/ID3v2.4 ID
	Valid(Cow<'static, str>),
	/// A three character ID3v2.2 ID without a known upgrade
	///
	/// Its frame is kept as a [`BinaryFrame`](crate::id3::v2::BinaryFrame) and skipped when
	/// rendering, unless the caller replaces the ID with a [`FrameId::Valid`] one.
	Outdated(Cow<'static, str>),
}

impl FrameId {
	/// Check and wrap `id`, three character IDs become [`FrameId::Outdated`] as they are
	///
	/// # Errors
	///
	/// `id` is not 3 or 4 characters of `A-Z0-9`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::FrameId;
	///
	/// # fn main() -> tagkit::error::Result<()> {
	/// let id_valid = FrameId::new("TPE1")?;
	/// assert!(id_valid.is_valid());
	///
	/// let id_outdated = FrameId::new("TP1")?;
	/// assert!(id_outdated.is_outdated());
	///
	/// assert!(FrameId::new("tpe1").is_err());
	/// # Ok(()) }
	/// ```
	pub fn new<I>(id: I) -> Result<Self>
	where
		I: Into<Cow<'static, str>>,
	{
		Self::new_cow(id.into())
	}

	// Non generic half of `new`
	pub(crate) fn new_cow(id: Cow<'static, str>) -> Result<Self> {
		if !Self::is_valid_id(id.as_bytes()) {
			return Err(id3v2_err!(BadFrameId(id.into_owned().into_bytes())));
		}

		match id.len() {
			3 => Ok(FrameId::Outdated(id)),
			_ => Ok(FrameId::Valid(id)),
		}
	}

	/// Whether `id` is 3 or 4 characters in `'A'..='Z'` and `'0'..='9'`
	pub(crate) fn is_valid_id(id: &[u8]) -> bool {
		(3..=4).contains(&id.len())
			&& id
				.iter()
				.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
	}

	/// Whether this is a [`FrameId::Outdated`] ID, which is never written
	pub fn is_outdated(&self) -> bool {
		matches!(self, FrameId::Outdated(_))
	}

	/// Whether this is a [`FrameId::Valid`] ID
	pub fn is_valid(&self) -> bool {
		matches!(self, FrameId::Valid(_))
	}

	/// The ID text
	pub fn as_str(&self) -> &str {
		match self {
			FrameId::Valid(v) | FrameId::Outdated(v) => v,
		}
	}

	/// The ID text, by value
	pub fn into_inner(self) -> Cow<'static, str> {
		match self {
			FrameId::Valid(v) | FrameId::Outdated(v) => v,
		}
	}

	// Unchecked, for the ID constants
	pub(crate) const fn from_static(id: &'static str) -> Self {
		FrameId::Valid(Cow::Borrowed(id))
	}
}

impl Display for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl PartialEq<str> for FrameId {
	fn eq(&self, other: &str) -> bool {
		self.as_str() == other
	}
}

impl PartialEq<&str> for FrameId {
	fn eq(&self, other: &&str) -> bool {
		self.as_str() == *other
	}
}

impl From<FrameId> for Cow<'static, str> {
	fn from(id: FrameId) -> Self {
		id.into_inner()
	}
}
