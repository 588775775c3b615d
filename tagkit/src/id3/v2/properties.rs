use super::frame::{Frame, MUSICBRAINZ_UFID_OWNER, join};
use super::items::{
	CommentFrame, ExtendedTextFrame, ExtendedUrlFrame, TextInformationFrame,
	UniqueFileIdentifierFrame, UnsynchronizedTextFrame, UrlLinkFrame,
};
use super::tag::Id3v2Tag;
use super::util::mappings::{
	COMMENT_PREFIX, INSTRUMENT_PREFIX, LYRICS_PREFIX, URL_PREFIX, frame_id_to_key,
	involved_role_to_key, key_to_frame_id, key_to_involved_role, key_to_user_text,
	user_text_to_key,
};
use crate::id3::v1;
use crate::id3::v2::FrameId;
use crate::properties::PropertyMap;
use crate::util::text::{CanonicalString, TextEncoding};

use std::collections::BTreeSet;

const MUSICBRAINZ_TRACK_ID_KEY: &str = "MUSICBRAINZ_TRACKID";
const UNKNOWN_PREFIX: &str = "UNKNOWN/";

impl Frame {
	/// Project the frame onto a [`PropertyMap`]
	///
	/// Frames without a key/value representation produce an empty map with a single
	/// [`PropertyMap::unsupported_data`] entry, see
	/// [`Id3v2Tag::remove_unsupported_properties`] for their format.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::{Frame, FrameId, TextInformationFrame};
	/// use tagkit::text::TextEncoding;
	///
	/// # fn main() -> tagkit::error::Result<()> {
	/// let frame = Frame::Text(TextInformationFrame::new(
	/// 	FrameId::new("TCON")?,
	/// 	TextEncoding::UTF8,
	/// 	["17", "Shoegaze"],
	/// ));
	///
	/// let properties = frame.as_properties();
	/// assert_eq!(properties.get("GENRE").unwrap(), ["Rock", "Shoegaze"]);
	/// # Ok(()) }
	/// ```
	pub fn as_properties(&self) -> PropertyMap {
		match self {
			Frame::Text(text) => text_properties(text),
			Frame::UserText(extended_text) => {
				let mut properties = PropertyMap::new();
				let key = user_text_to_key(&extended_text.description.to_string_lossy());
				properties.insert(key, extended_text.values.iter().cloned());
				properties
			},
			Frame::Comment(comment) => {
				described_property("COMMENT", &comment.description, comment.text.clone())
			},
			Frame::UnsynchronizedText(lyrics) => {
				described_property("LYRICS", &lyrics.description, lyrics.text.clone())
			},
			Frame::UserUrl(extended_url) => {
				described_property("URL", &extended_url.description, extended_url.url.clone())
			},
			Frame::Url(link) => {
				let mut properties = PropertyMap::new();
				match frame_id_to_key(link.id().as_str()) {
					Some(key) => {
						properties.insert(key, [link.url.clone()]);
					},
					None => properties.push_unsupported(link.id().as_str()),
				}
				properties
			},
			Frame::UniqueFileIdentifier(ufid) => {
				let mut properties = PropertyMap::new();
				if ufid.owner == MUSICBRAINZ_UFID_OWNER {
					properties.insert(
						MUSICBRAINZ_TRACK_ID_KEY,
						[CanonicalString::from_latin1(&ufid.identifier)],
					);
				} else {
					properties.push_unsupported(format!("UFID/{}", ufid.owner));
				}
				properties
			},
			Frame::Binary(binary) => {
				let mut properties = PropertyMap::new();
				properties.push_unsupported(format!("{UNKNOWN_PREFIX}{}", binary.id().as_str()));
				properties
			},
			Frame::Ownership(_) => unsupported(self),
		}
	}
}

fn unsupported(frame: &Frame) -> PropertyMap {
	let mut properties = PropertyMap::new();
	properties.push_unsupported(frame.id_str());
	properties
}

// An empty description, or one equal to the base key, maps to the bare key
fn described_property(
	base: &str,
	description: &CanonicalString,
	value: CanonicalString,
) -> PropertyMap {
	let description = description.to_string_lossy().to_ascii_uppercase();

	let mut properties = PropertyMap::new();
	if description.is_empty() || description == base {
		properties.insert(base, [value]);
	} else {
		properties.insert(format!("{base}:{description}"), [value]);
	}

	properties
}

fn text_properties(frame: &TextInformationFrame) -> PropertyMap {
	let id = frame.id().as_str();
	match id {
		"TIPL" | "IPLS" => return involved_people_properties(frame),
		"TMCL" => return musician_credit_properties(frame),
		_ => {},
	}

	let mut properties = PropertyMap::new();
	let Some(key) = frame_id_to_key(id) else {
		properties.push_unsupported(id);
		return properties;
	};

	if id == "TCON" {
		let genres = frame.values.iter().map(|value| {
			value
				.to_int()
				.and_then(|n| u8::try_from(n).ok())
				.and_then(v1::genre)
				.map_or_else(|| value.clone(), CanonicalString::from)
		});
		properties.insert(key, genres);
	} else {
		properties.insert(key, frame.values.iter().cloned());
	}

	properties
}

fn split_names(names: &CanonicalString) -> impl Iterator<Item = CanonicalString> + use<'_> {
	names
		.units()
		.split(|unit| *unit == u16::from(b','))
		.map(|name| CanonicalString::from_units(name.to_vec()))
}

fn involved_people_properties(frame: &TextInformationFrame) -> PropertyMap {
	let mut properties = PropertyMap::new();
	if frame.values.len() % 2 != 0 {
		properties.push_unsupported(frame.id().as_str());
		return properties;
	}

	for pair in frame.values.chunks_exact(2) {
		let role = pair[0].to_string_lossy();
		let Some(key) = involved_role_to_key(&role) else {
			log::debug!("Unknown involved people role \"{role}\"");

			let mut properties = PropertyMap::new();
			properties.push_unsupported(frame.id().as_str());
			return properties;
		};

		properties.insert(key, split_names(&pair[1]));
	}

	properties
}

fn musician_credit_properties(frame: &TextInformationFrame) -> PropertyMap {
	let mut properties = PropertyMap::new();
	if frame.values.len() % 2 != 0 {
		properties.push_unsupported(frame.id().as_str());
		return properties;
	}

	for pair in frame.values.chunks_exact(2) {
		let instrument = pair[0].to_string_lossy().to_ascii_uppercase();
		if instrument.is_empty() {
			let mut properties = PropertyMap::new();
			properties.push_unsupported(frame.id().as_str());
			return properties;
		}

		properties.insert(format!("{INSTRUMENT_PREFIX}{instrument}"), split_names(&pair[1]));
	}

	properties
}

/// A [`PropertyMap`] split by the frames its entries are stored in
struct SplitProperties {
	single: PropertyMap,
	involved_people: PropertyMap,
	musician_credits: PropertyMap,
}

impl SplitProperties {
	fn new(properties: &PropertyMap) -> Self {
		let mut split = Self {
			single: PropertyMap::new(),
			involved_people: PropertyMap::new(),
			musician_credits: PropertyMap::new(),
		};

		for (key, values) in properties {
			let target = if key_to_involved_role(key).is_some() {
				&mut split.involved_people
			} else if key.starts_with(INSTRUMENT_PREFIX) {
				&mut split.musician_credits
			} else {
				&mut split.single
			};

			target.insert(key, values.iter().cloned());
		}

		split
	}
}

fn paired_frame<F>(id: &'static str, properties: &PropertyMap, role: F) -> TextInformationFrame
where
	F: Fn(&str) -> Option<&str>,
{
	let mut values = Vec::with_capacity(properties.len() * 2);
	for (key, names) in properties {
		let Some(role) = role(key) else {
			continue;
		};

		values.push(CanonicalString::from(role));
		values.push(join(names, ","));
	}

	TextInformationFrame::new(FrameId::from_static(id), TextEncoding::UTF8, values)
}

fn is_text_id(id: &str) -> bool {
	// Apple proprietary frames, stored as text
	id.starts_with('T') || matches!(id, "WFED" | "MVNM" | "MVIN" | "GRP1")
}

fn frame_for_property(key: &str, values: &[CanonicalString]) -> Frame {
	let single_value = match values {
		[value] => Some(value.clone()),
		_ => None,
	};

	if let Some(id) = key_to_frame_id(key) {
		if is_text_id(id) {
			return TextInformationFrame::new(
				FrameId::from_static(id),
				TextEncoding::UTF8,
				values.iter().cloned(),
			)
			.into();
		}

		if let (true, Some(url)) = (id.starts_with('W'), &single_value) {
			return UrlLinkFrame::new(FrameId::from_static(id), url.clone()).into();
		}
	}

	if let Some(value) = single_value {
		if key == MUSICBRAINZ_TRACK_ID_KEY {
			return UniqueFileIdentifierFrame::new(
				MUSICBRAINZ_UFID_OWNER,
				value.encode(TextEncoding::UTF8),
			)
			.into();
		}

		if let Some(description) = description_of(key, "LYRICS", LYRICS_PREFIX) {
			return UnsynchronizedTextFrame::new(TextEncoding::UTF8, *b"XXX", description, value)
				.into();
		}

		if let Some(description) = description_of(key, "URL", URL_PREFIX) {
			return ExtendedUrlFrame::new(TextEncoding::UTF8, description, value).into();
		}

		if let Some(description) = description_of(key, "COMMENT", COMMENT_PREFIX) {
			return CommentFrame::new(TextEncoding::UTF8, *b"XXX", description, value).into();
		}
	}

	ExtendedTextFrame::new(TextEncoding::UTF8, key_to_user_text(key), values.iter().cloned())
		.into()
}

fn description_of<'a>(key: &'a str, base: &str, prefix: &str) -> Option<&'a str> {
	if key == base {
		return Some("");
	}

	key.strip_prefix(prefix)
}

impl Id3v2Tag {
	/// The properties of every frame, merged in frame order
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::Id3v2Tag;
	///
	/// let mut tag = Id3v2Tag::new();
	/// tag.set_title("Foo");
	/// tag.set_comment("Bar");
	///
	/// let properties = tag.properties();
	/// assert_eq!(properties.get("TITLE").unwrap(), ["Foo"]);
	/// assert_eq!(properties.get("COMMENT").unwrap(), ["Bar"]);
	/// ```
	pub fn properties(&self) -> PropertyMap {
		let mut properties = PropertyMap::new();
		for frame in &self.frames {
			properties.merge(frame.as_properties());
		}

		properties
	}

	/// Make the tag's properties equal to `properties`
	///
	/// Frames whose properties are already part of `properties` are kept untouched, everything
	/// else is replaced by new UTF-8 frames. Frames without properties (such as pictures) are
	/// never removed, see [`Id3v2Tag::remove_unsupported_properties`].
	///
	/// Keys are stored as follows:
	///
	/// * Involved people roles (`PRODUCER`, `MIXER`, ...) in a single `TIPL` frame
	/// * `PERFORMER:<INSTRUMENT>` in a single `TMCL` frame
	/// * Keys with a frame ID in their own text or URL frame
	/// * `MUSICBRAINZ_TRACKID` in a `UFID` frame
	/// * `LYRICS[:DESC]`, `URL[:DESC]`, `COMMENT[:DESC]` in `USLT`, `WXXX`, `COMM` frames
	/// * Anything else in a `TXXX` frame
	///
	/// Keys that do not fit their frame (such as multiple comments) fall back to `TXXX`.
	///
	/// Returns the properties that could not be stored, which is always empty.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::Id3v2Tag;
	/// use tagkit::properties::PropertyMap;
	///
	/// let mut tag = Id3v2Tag::new();
	/// tag.set_title("Foo");
	///
	/// let mut properties = tag.properties();
	/// properties.replace("ARTIST", ["Bar"]);
	/// properties.replace("PRODUCER", ["Baz"]);
	///
	/// let rejected = tag.set_properties(&properties);
	/// assert!(rejected.is_empty());
	///
	/// assert_eq!(tag.properties(), properties);
	/// assert!(tag.get("TIPL").is_some());
	/// ```
	pub fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap {
		let SplitProperties {
			mut single,
			mut involved_people,
			mut musician_credits,
		} = SplitProperties::new(properties);

		let mut to_delete = BTreeSet::new();
		for id in self.frame_ids() {
			for &index in self.frame_indices(id) {
				let frame_properties = self.frames[index].as_properties();

				let requested = match id {
					"TIPL" => &mut involved_people,
					"TMCL" => &mut musician_credits,
					_ => {
						if single.contains(&frame_properties) {
							single.erase(&frame_properties);
						} else {
							to_delete.insert(index);
						}
						continue;
					},
				};

				if *requested == frame_properties {
					requested.erase(&frame_properties);
				} else {
					to_delete.insert(index);
				}
			}
		}

		if !to_delete.is_empty() {
			log::debug!("Replacing {} frames", to_delete.len());

			let mut index = 0;
			self.retain(|_| {
				let keep = !to_delete.contains(&index);
				index += 1;
				keep
			});
		}

		if !involved_people.is_empty() {
			self.add_frame(paired_frame("TIPL", &involved_people, |key| {
				key_to_involved_role(key)
			}));
		}

		if !musician_credits.is_empty() {
			self.add_frame(paired_frame("TMCL", &musician_credits, |key| {
				key.strip_prefix(INSTRUMENT_PREFIX)
			}));
		}

		for (key, values) in &single {
			self.add_frame(frame_for_property(key, values));
		}

		PropertyMap::new()
	}

	/// Remove the frames behind entries of [`PropertyMap::unsupported_data`]
	///
	/// Entries have one of the following forms:
	///
	/// * `UNKNOWN/<ID>`: every [`Frame::Binary`] with the ID
	/// * `<ID>`: every frame with the ID
	/// * `<ID>/<DESCRIPTION>`: the first `TXXX`, `WXXX`, `COMM`, or `USLT` frame with the
	///   description, or the first `UFID` frame with the owner
	///
	/// Malformed entries are ignored.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagkit::id3::v2::{BinaryFrame, FrameId, Id3v2Tag};
	///
	/// # fn main() -> tagkit::error::Result<()> {
	/// let mut tag = Id3v2Tag::new();
	/// tag.add_frame(BinaryFrame::new(FrameId::new("APIC")?, vec![0; 16]));
	///
	/// let properties = tag.properties();
	/// assert_eq!(properties.unsupported_data(), ["UNKNOWN/APIC"]);
	///
	/// tag.remove_unsupported_properties(properties.unsupported_data());
	/// assert!(tag.is_empty());
	/// # Ok(()) }
	/// ```
	pub fn remove_unsupported_properties<S: AsRef<str>>(&mut self, properties: &[S]) {
		for item in properties {
			let item = item.as_ref();

			if let Some(id) = item.strip_prefix(UNKNOWN_PREFIX) {
				if id.len() != 4 {
					continue;
				}

				self.retain(|frame| !(matches!(frame, Frame::Binary(_)) && frame.id_str() == id));
				continue;
			}

			if item.len() == 4 {
				self.remove_frames(item);
				continue;
			}

			let (Some(id), Some(description)) = (item.get(..4), item.get(5..)) else {
				continue;
			};

			if description.is_empty() {
				continue;
			}

			let found = self.frame_indices(id).iter().copied().find(|&index| {
				match &self.frames[index] {
					Frame::UserText(frame) if id == "TXXX" => frame.description == description,
					Frame::UserUrl(frame) if id == "WXXX" => frame.description == description,
					Frame::Comment(frame) if id == "COMM" => frame.description == description,
					Frame::UnsynchronizedText(frame) if id == "USLT" => {
						frame.description == description
					},
					Frame::UniqueFileIdentifier(frame) if id == "UFID" => frame.owner == description,
					_ => false,
				}
			});

			if let Some(index) = found {
				self.remove_frame(index);
			}
		}
	}
}
