use super::frame::Frame;
use super::header::{ExtendedHeader, Footer, Id3v2Header, Id3v2Version, TagState};
use super::items::{CommentFrame, TextInformationFrame};
use super::read::read_tag;
use crate::config::ParseContext;
use crate::error::Result;
use crate::id3::v1;
use crate::id3::v2::FrameId;
use crate::util::text::{CanonicalString, TextEncoding};

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::{Read, Seek};

use encoding_rs::Encoding;

macro_rules! impl_accessor {
	($($name:ident => $id:literal;)+) => {
		paste::paste! {
			$(
				#[doc = "The content of the first `" $id "` frame"]
				///
				/// This is empty if there is no such frame.
				pub fn $name(&self) -> CanonicalString {
					self.frame_string($id)
				}

				#[doc = "Replace the content of the first `" $id "` frame"]
				///
				/// An empty value removes every frame with this ID.
				pub fn [<set_ $name>](&mut self, value: impl Into<CanonicalString>) {
					self.set_text_frame(FrameId::from_static($id), value);
				}
			)+
		}
	}
}

/// An `ID3v2` tag
///
/// Frames are kept in the order they were read or added. Multiple frames may share an ID, see
/// [`Id3v2Tag::frame_list`].
///
/// ## Reading
///
/// Reading never fails because of the content of the tag. Frames that cannot be read are skipped,
/// and a tag with a broken header is [`TagState::Invalid`]. Every recovered problem is reported
/// through the [`DiagnosticListener`](crate::diagnostics::DiagnosticListener) of the
/// [`ParseContext`].
///
/// ## Conversions
///
/// With [`ParseOptions::implicit_conversions`](crate::config::ParseOptions::implicit_conversions)
/// (the default), older tags are upgraded while reading:
///
/// * ID3v2.2 IDs are mapped to their ID3v2.4 counterparts
/// * `TYER` + `TDAT` + `TIME` become a single `TDRC`
/// * `TCON` values such as `"(17)(RX)Refinement"` are split into separate fields
///
/// ## Writing
///
/// Tags are always written as ID3v2.4 or ID3v2.3, see [`Id3v2Tag::render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Id3v2Tag {
	pub(super) header: Id3v2Header,
	pub(super) extended_header: Option<ExtendedHeader>,
	pub(super) footer: Option<Footer>,
	pub(super) frames: Vec<Frame>,
	pub(super) index: BTreeMap<Cow<'static, str>, Vec<usize>>,
	pub(super) state: TagState,
	/// The size of the tag body on disk, used to reuse its padding
	pub(super) original_size: u32,
	pub(super) detected_charset: Option<&'static Encoding>,
}

impl Default for Id3v2Tag {
	fn default() -> Self {
		Self {
			header: Id3v2Header::default(),
			extended_header: None,
			footer: None,
			frames: Vec::new(),
			index: BTreeMap::new(),
			state: TagState::Unparsed,
			original_size: 0,
			detected_charset: None,
		}
	}
}

impl Id3v2Tag {
	/// Create a new empty `ID3v2.4` tag
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::Id3v2Tag;
	///
	/// let id3v2_tag = Id3v2Tag::new();
	/// assert!(id3v2_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Read a tag starting at `offset`
	///
	/// Tags that directly follow this one are treated as padding of this tag, so they are
	/// overwritten on the next save.
	///
	/// # Errors
	///
	/// * Unable to read from or seek in `reader`
	/// * The tag is larger than the allocation limit, see
	///   [`GlobalOptions::allocation_limit`](crate::config::GlobalOptions::allocation_limit)
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::config::ParseContext;
	/// use tagkit::id3::v2::{Id3v2Tag, TagState};
	///
	/// # fn main() -> tagkit::error::Result<()> {
	/// let mut file = std::io::Cursor::new(
	/// 	b"ID3\x04\x00\x00\x00\x00\x00\x10TIT2\x00\x00\x00\x04\x00\x00\x03Foo\x00\x00".to_vec(),
	/// );
	///
	/// let tag = Id3v2Tag::read_from(&mut file, 0, &ParseContext::new())?;
	/// assert_eq!(tag.state(), TagState::Parsed);
	/// assert_eq!(tag.title(), "Foo");
	/// # Ok(()) }
	/// ```
	pub fn read_from<R>(reader: &mut R, offset: u64, ctx: &ParseContext<'_>) -> Result<Self>
	where
		R: Read + Seek,
	{
		read_tag(reader, offset, ctx)
	}

	/// Build a tag from a header and the bytes that follow it
	///
	/// `body` is the `header.size()` bytes of the tag body, followed by the footer when
	/// [`Id3v2TagFlags::footer`](super::Id3v2TagFlags::footer) is set.
	/// This is for tags that are not stored in a plain stream, such as an `ID3 ` chunk.
	/// See [`Id3v2Tag::read_from`] for the reading rules.
	pub fn parse(header: Id3v2Header, body: &[u8], ctx: &ParseContext<'_>) -> Self {
		super::read::parse_tag(header, body, ctx)
	}

	/// The parse state of the tag
	pub fn state(&self) -> TagState {
		self.state
	}

	/// The header the tag was read with
	///
	/// For a new tag, this is an empty ID3v2.4 header.
	pub fn header(&self) -> &Id3v2Header {
		&self.header
	}

	/// The version the tag was read as
	pub fn original_version(&self) -> Id3v2Version {
		self.header.version
	}

	/// The extended header, if the tag had a valid one
	pub fn extended_header(&self) -> Option<&ExtendedHeader> {
		self.extended_header.as_ref()
	}

	/// The footer, if the tag had one
	pub fn footer(&self) -> Option<&Footer> {
		self.footer.as_ref()
	}

	/// The charset Latin-1 text was decoded with
	///
	/// This is only set when [`ParseOptions::smart_encoding`](crate::config::ParseOptions::smart_encoding)
	/// is enabled and the detector was confident enough.
	pub fn detected_charset(&self) -> Option<&'static Encoding> {
		self.detected_charset
	}

	/// All frames, in tag order
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// All frames with the ID `id`, in tag order
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::{CommentFrame, Id3v2Tag};
	/// use tagkit::text::TextEncoding;
	///
	/// let mut tag = Id3v2Tag::new();
	/// tag.add_frame(CommentFrame::new(TextEncoding::UTF8, *b"eng", "", "first"));
	/// tag.add_frame(CommentFrame::new(TextEncoding::UTF8, *b"eng", "desc", "second"));
	///
	/// assert_eq!(tag.frame_list("COMM").count(), 2);
	/// assert_eq!(tag.frame_list("TIT2").count(), 0);
	/// ```
	pub fn frame_list<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Frame> + use<'a> {
		let indices = self.index.get(id).map_or(&[][..], Vec::as_slice);
		indices.iter().map(|i| &self.frames[*i])
	}

	/// The first frame with the ID `id`
	pub fn get(&self, id: &str) -> Option<&Frame> {
		self.frame_list(id).next()
	}

	pub(super) fn frame_mut(&mut self, index: usize) -> Option<&mut Frame> {
		self.frames.get_mut(index)
	}

	pub(super) fn frame_indices(&self, id: &str) -> &[usize] {
		self.index.get(id).map_or(&[], Vec::as_slice)
	}

	/// The distinct frame IDs of the tag, sorted
	pub(super) fn frame_ids(&self) -> impl Iterator<Item = &str> {
		self.index.keys().map(|id| &**id)
	}

	/// Append a frame
	///
	/// Frames with the same ID are not replaced.
	pub fn add_frame(&mut self, frame: impl Into<Frame>) {
		let frame = frame.into();
		let key = frame.id().clone().into_inner();

		self.index.entry(key).or_default().push(self.frames.len());
		self.frames.push(frame);
	}

	/// Remove the frame at `index`
	///
	/// Returns `None` if `index` is out of bounds.
	pub fn remove_frame(&mut self, index: usize) -> Option<Frame> {
		if index >= self.frames.len() {
			return None;
		}

		let frame = self.frames.remove(index);
		self.rebuild_index();
		Some(frame)
	}

	/// Remove every frame with the ID `id`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::Id3v2Tag;
	///
	/// let mut tag = Id3v2Tag::new();
	/// tag.set_title("Foo");
	///
	/// let removed = tag.remove_frames("TIT2");
	/// assert_eq!(removed.len(), 1);
	/// assert!(tag.is_empty());
	/// ```
	pub fn remove_frames(&mut self, id: &str) -> Vec<Frame> {
		if !self.index.contains_key(id) {
			return Vec::new();
		}

		let (removed, kept) = std::mem::take(&mut self.frames)
			.into_iter()
			.partition(|frame| frame.id_str() == id);

		self.frames = kept;
		self.rebuild_index();
		removed
	}

	/// Retain frames based on the predicate
	pub fn retain<P>(&mut self, predicate: P)
	where
		P: FnMut(&Frame) -> bool,
	{
		self.frames.retain(predicate);
		self.rebuild_index();
	}

	/// Whether the tag has no frames
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// The number of frames
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	fn rebuild_index(&mut self) {
		self.index.clear();
		for (i, frame) in self.frames.iter().enumerate() {
			self.index
				.entry(frame.id().clone().into_inner())
				.or_default()
				.push(i);
		}
	}

	fn frame_string(&self, id: &str) -> CanonicalString {
		self.get(id)
			.map(Frame::to_canonical_string)
			.unwrap_or_default()
	}

	/// Replace the content of the first frame with the ID `id`
	///
	/// If there is no such frame, a new UTF-8 text frame is appended. If the frame is not a
	/// text frame, every frame with the ID is replaced. An empty value removes every frame with
	/// the ID.
	pub fn set_text_frame(&mut self, id: FrameId, value: impl Into<CanonicalString>) {
		let value = value.into();
		if value.is_empty() {
			self.remove_frames(id.as_str());
			return;
		}

		if let Some(&first) = self.frame_indices(id.as_str()).first() {
			if let Some(Frame::Text(text)) = self.frame_mut(first) {
				text.values = vec![value];
				return;
			}

			self.remove_frames(id.as_str());
		}

		self.add_frame(TextInformationFrame::new(id, TextEncoding::UTF8, [value]));
	}

	impl_accessor!(
		title  => "TIT2";
		artist => "TPE1";
		album  => "TALB";
	);

	/// The comment without a description, or the first comment
	pub fn comment(&self) -> CanonicalString {
		let undescribed = self.frame_list("COMM").find(
			|frame| matches!(frame, Frame::Comment(comment) if comment.description.is_empty()),
		);

		undescribed
			.or_else(|| self.get("COMM"))
			.map(Frame::to_canonical_string)
			.unwrap_or_default()
	}

	/// Set the comment
	///
	/// This replaces the text of the comment without a description (or the first comment).
	/// An empty value removes every comment.
	pub fn set_comment(&mut self, value: impl Into<CanonicalString>) {
		let value = value.into();
		if value.is_empty() {
			self.remove_frames("COMM");
			return;
		}

		let indices = self.frame_indices("COMM").to_vec();
		let target = indices
			.iter()
			.copied()
			.find(|i| {
				matches!(&self.frames[*i], Frame::Comment(comment) if comment.description.is_empty())
			})
			.or_else(|| {
				indices
					.iter()
					.copied()
					.find(|i| matches!(self.frames[*i], Frame::Comment(_)))
			});

		if let Some(Frame::Comment(comment)) = target.and_then(|i| self.frame_mut(i)) {
			comment.text = value;
			return;
		}

		self.add_frame(CommentFrame::new(TextEncoding::UTF8, *b"XXX", "", value));
	}

	/// The genres of the first `TCON` frame, separated by spaces
	///
	/// Numeric genres are replaced with their ID3v1 names, and duplicates are skipped.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::{FrameId, Id3v2Tag, TextInformationFrame};
	/// use tagkit::text::TextEncoding;
	///
	/// # fn main() -> tagkit::error::Result<()> {
	/// let mut tag = Id3v2Tag::new();
	/// tag.add_frame(TextInformationFrame::new(
	/// 	FrameId::new("TCON")?,
	/// 	TextEncoding::UTF8,
	/// 	["17", "Rock", "Jazz"],
	/// ));
	///
	/// assert_eq!(tag.genre(), "Rock Jazz");
	/// # Ok(()) }
	/// ```
	pub fn genre(&self) -> CanonicalString {
		let Some(Frame::Text(tcon)) = self.get("TCON") else {
			return CanonicalString::new();
		};

		let mut genres: Vec<CanonicalString> = Vec::new();
		for field in tcon.values.iter().filter(|field| !field.is_empty()) {
			let genre = match field.to_int().and_then(|n| u8::try_from(n).ok()) {
				Some(number) => v1::genre(number).map_or_else(|| field.clone(), CanonicalString::from),
				None => field.clone(),
			};

			if !genres.contains(&genre) {
				genres.push(genre);
			}
		}

		let separator = CanonicalString::from(" ");
		genres
			.iter()
			.enumerate()
			.fold(CanonicalString::new(), |joined, (i, genre)| {
				if i == 0 {
					genre.clone()
				} else {
					joined.concat(&separator).concat(genre)
				}
			})
	}

	/// Set the genre, an empty value removes the `TCON` frames
	pub fn set_genre(&mut self, value: impl Into<CanonicalString>) {
		self.set_text_frame(FrameId::from_static("TCON"), value);
	}

	/// The year of the first `TDRC` frame, or 0
	pub fn year(&self) -> u32 {
		self.get("TDRC")
			.map_or(0, |frame| leading_number(&frame.to_canonical_string(), 4))
	}

	/// Set the year, 0 removes the `TDRC` frames
	pub fn set_year(&mut self, year: u32) {
		let value = if year == 0 { String::new() } else { year.to_string() };
		self.set_text_frame(FrameId::from_static("TDRC"), value);
	}

	/// The track number of the first `TRCK` frame, or 0
	///
	/// A track total (`"3/12"`) is ignored.
	pub fn track(&self) -> u32 {
		self.get("TRCK")
			.map_or(0, |frame| leading_number(&frame.to_canonical_string(), usize::MAX))
	}

	/// Set the track number, 0 removes the `TRCK` frames
	pub fn set_track(&mut self, track: u32) {
		let value = if track == 0 { String::new() } else { track.to_string() };
		self.set_text_frame(FrameId::from_static("TRCK"), value);
	}
}

/// The number formed by the leading digits of the first `max_len` characters
fn leading_number(value: &CanonicalString, max_len: usize) -> u32 {
	value
		.units()
		.iter()
		.take(max_len)
		.map_while(|unit| char::from_u32(u32::from(*unit)).and_then(|c| c.to_digit(10)))
		.fold(0_u32, |number, digit| {
			number.saturating_mul(10).saturating_add(digit)
		})
}

#[cfg(test)]
mod tests {
	use crate::id3::v2::{
		BinaryFrame, CommentFrame, Frame, FrameId, Id3v2Tag, TextInformationFrame,
	};
	use crate::util::text::TextEncoding;

	fn text_frame(id: &'static str, values: &[&str]) -> TextInformationFrame {
		TextInformationFrame::new(
			FrameId::new(id).unwrap(),
			TextEncoding::UTF8,
			values.iter().copied(),
		)
	}

	#[test_log::test]
	fn index_follows_removals() {
		let mut tag = Id3v2Tag::new();
		tag.add_frame(text_frame("TIT2", &["a"]));
		tag.add_frame(text_frame("TPE1", &["b"]));
		tag.add_frame(text_frame("TIT2", &["c"]));

		assert_eq!(tag.frame_list("TIT2").count(), 2);
		assert_eq!(tag.frame_ids().collect::<Vec<_>>(), ["TIT2", "TPE1"]);

		let removed = tag.remove_frame(0).unwrap();
		assert_eq!(removed.to_canonical_string(), "a");
		assert_eq!(tag.title(), "c");
		assert_eq!(tag.frame_indices("TIT2"), [1]);

		assert!(tag.remove_frame(5).is_none());
	}

	#[test_log::test]
	fn text_setters() {
		let mut tag = Id3v2Tag::new();
		tag.set_title("Foo");
		tag.set_artist("Bar");
		tag.set_title("Baz");

		assert_eq!(tag.len(), 2);
		assert_eq!(tag.title(), "Baz");
		assert_eq!(tag.artist(), "Bar");
		assert_eq!(tag.album(), "");

		tag.set_artist("");
		assert!(tag.get("TPE1").is_none());
	}

	#[test_log::test]
	fn non_text_frames_are_replaced() {
		let mut tag = Id3v2Tag::new();
		tag.add_frame(BinaryFrame::new(FrameId::new("TALB").unwrap(), vec![0xFF]));
		tag.set_album("Album");

		assert_eq!(tag.len(), 1);
		assert!(matches!(tag.get("TALB"), Some(Frame::Text(_))));
	}

	#[test_log::test]
	fn comments_prefer_no_description() {
		let mut tag = Id3v2Tag::new();
		tag.add_frame(CommentFrame::new(TextEncoding::UTF8, *b"eng", "desc", "described"));
		assert_eq!(tag.comment(), "described");

		tag.add_frame(CommentFrame::new(TextEncoding::UTF8, *b"eng", "", "plain"));
		assert_eq!(tag.comment(), "plain");

		tag.set_comment("changed");
		assert_eq!(tag.comment(), "changed");
		assert_eq!(tag.frame_list("COMM").count(), 2);

		tag.set_comment("");
		assert!(tag.is_empty());

		tag.set_comment("new");
		let Some(Frame::Comment(comment)) = tag.get("COMM") else {
			panic!("expected a comment");
		};
		assert_eq!(&comment.language, b"XXX");
	}

	#[test_log::test]
	fn genres() {
		let mut tag = Id3v2Tag::new();
		tag.add_frame(text_frame("TCON", &["13", "", "Pop", "Jazz", "250"]));
		assert_eq!(tag.genre(), "Pop Jazz 250");

		tag.set_genre("Rock");
		assert_eq!(tag.genre(), "Rock");

		tag.set_genre("");
		assert_eq!(tag.genre(), "");
	}

	#[test_log::test]
	fn numbers() {
		let mut tag = Id3v2Tag::new();
		assert_eq!(tag.year(), 0);

		tag.add_frame(text_frame("TDRC", &["2004-05-06"]));
		tag.add_frame(text_frame("TRCK", &["3/12"]));
		assert_eq!(tag.year(), 2004);
		assert_eq!(tag.track(), 3);

		tag.set_year(1999);
		tag.set_track(0);
		assert_eq!(tag.year(), 1999);
		assert!(tag.get("TRCK").is_none());
	}
}
