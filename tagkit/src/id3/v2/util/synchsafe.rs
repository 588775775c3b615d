//! Utilities for working with synchsafe integers and unsynchronized ID3v2 content
//!
//! See [`FrameFlags::unsynchronisation`](crate::id3::v2::FrameFlags::unsynchronisation) for an explanation.

use crate::error::Result;
use crate::macros::id3v2_err;

/// An integer that can be converted to and from synchsafe variants
pub trait SynchsafeInteger: Sized {
	/// Create a synchsafe integer
	///
	/// # Errors
	///
	/// `self` doesn't fit in <`INTEGER_TYPE::BITS - size_of::<INTEGER_TYPE>()`> bits
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// # fn main() -> tagkit::error::Result<()> {
	/// // Maximum value we can represent in a synchsafe u32
	/// let unsynch_number = 0xFFF_FFFF_u32;
	/// let synch_number = unsynch_number.synch()?;
	///
	/// // Each byte should have 7 set bits and an MSB of 0
	/// assert_eq!(synch_number, 0b01111111_01111111_01111111_01111111_u32);
	///
	/// assert!(0x1000_0000_u32.synch().is_err());
	/// # Ok(()) }
	/// ```
	fn synch(self) -> Result<Self>;

	/// Unsynchronise a synchsafe integer
	///
	/// The most significant bit of every byte is ignored.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// assert_eq!(0x0000_0201_u32.unsynch(), 257);
	/// ```
	fn unsynch(self) -> Self;
}

impl SynchsafeInteger for u32 {
	fn synch(self) -> Result<Self> {
		const MAXIMUM_INTEGER: u32 = u32::MAX >> 4;

		if self > MAXIMUM_INTEGER {
			return Err(id3v2_err!(SynchsafeOverflow(self)));
		}

		Ok((self & 0x7F)
			| ((self & (0x7F << 7)) << 1)
			| ((self & (0x7F << 14)) << 2)
			| ((self & (0x7F << 21)) << 3))
	}

	fn unsynch(self) -> Self {
		(self & 0x7F)
			| ((self & 0x7F00) >> 1)
			| ((self & 0x007F_0000) >> 2)
			| ((self & 0x7F00_0000) >> 3)
	}
}

/// Whether no byte of a synchsafe integer has its most significant bit set
pub(crate) fn is_synchsafe(bytes: [u8; 4]) -> bool {
	bytes.iter().all(|b| b & 0x80 == 0)
}

/// Undo the unsynchronisation scheme, removing every `0x00` that follows a `0xFF`
///
/// # Examples
///
/// ```rust
/// use tagkit::id3::v2::util::synchsafe::resynchronize;
///
/// // The content has two `0xFF 0x00` pairs, which will be removed
/// let content = [0xFF, 0x00, 0x1A, 0xFF, 0x00, 0x15];
///
/// assert_eq!(resynchronize(&content), [0xFF, 0x1A, 0xFF, 0x15]);
/// ```
pub fn resynchronize(data: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(data.len());

	let mut encountered_ff = false;
	for &byte in data {
		if encountered_ff && byte == 0 {
			encountered_ff = false;
			continue;
		}

		encountered_ff = byte == 0xFF;
		out.push(byte);
	}

	out
}
