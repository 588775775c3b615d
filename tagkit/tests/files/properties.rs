use crate::util::{id3v2, text_frame};

use tagkit::config::{ParseContext, WriteOptions};
use tagkit::diagnostics::NullListener;
use tagkit::id3::v2::{
	BinaryFrame, CommentFrame, Frame, FrameId, Id3v2Tag, TextInformationFrame,
	UnsynchronizedTextFrame,
};
use tagkit::properties::PropertyMap;
use tagkit::text::TextEncoding;

use std::io::Cursor;

fn values(properties: &PropertyMap, key: &str) -> Vec<String> {
	properties
		.get(key)
		.unwrap_or_default()
		.iter()
		.map(ToString::to_string)
		.collect()
}

#[test_log::test]
fn test_properties_of_read_tag() {
	let content = id3v2(
		3,
		&[
			text_frame(3, b"TIT2", "Title"),
			text_frame(3, b"TCON", "(17)Refinement"),
			text_frame(3, b"TYER", "2004"),
			text_frame(3, b"IPLS", "PRODUCER\0Foo"),
		],
		0,
	);

	let tag = Id3v2Tag::read_from(&mut Cursor::new(content), 0, &ParseContext::new()).unwrap();
	let properties = tag.properties();

	assert_eq!(values(&properties, "TITLE"), ["Title"]);
	assert_eq!(values(&properties, "GENRE"), ["Rock", "Refinement"]);
	assert_eq!(values(&properties, "DATE"), ["2004"]);
	assert_eq!(values(&properties, "PRODUCER"), ["Foo"]);
	assert!(properties.unsupported_data().is_empty());
}

#[test_log::test]
fn test_described_keys() {
	let mut tag = Id3v2Tag::new();
	tag.add_frame(CommentFrame::new(TextEncoding::UTF8, *b"eng", "", "Plain"));
	tag.add_frame(CommentFrame::new(TextEncoding::UTF8, *b"eng", "Source", "Described"));
	tag.add_frame(UnsynchronizedTextFrame::new(TextEncoding::UTF8, *b"eng", "", "Lyrics"));

	let properties = tag.properties();
	assert_eq!(values(&properties, "COMMENT"), ["Plain"]);
	assert_eq!(values(&properties, "COMMENT:SOURCE"), ["Described"]);
	assert_eq!(values(&properties, "LYRICS"), ["Lyrics"]);
}

#[test_log::test]
fn test_set_properties_is_a_diff() {
	let mut tag = Id3v2Tag::new();
	tag.set_title("Title");
	tag.set_artist("Artist");
	tag.add_frame(BinaryFrame::new(FrameId::new("APIC").unwrap(), vec![0; 8]));

	let before = tag.frames().to_vec();

	// Setting the current properties changes nothing
	let properties = tag.properties();
	assert!(tag.set_properties(&properties).is_empty());
	assert_eq!(tag.frames(), before);

	let mut properties = PropertyMap::new();
	properties.insert("TITLE", ["Title"]);
	properties.insert("ALBUM", ["Album"]);
	properties.insert("PRODUCER", ["Foo", "Bar"]);
	properties.insert("ENGINEER", ["Baz"]);
	properties.insert("PERFORMER:VOCALS", ["Qux"]);
	tag.set_properties(&properties);

	// The title frame is kept in place, the artist is gone, the picture has no properties
	let ids = tag.frames().iter().map(Frame::id_str).collect::<Vec<_>>();
	assert_eq!(ids, ["TIT2", "APIC", "TIPL", "TMCL", "TALB"]);

	let Some(Frame::Text(TextInformationFrame { values: tipl, .. })) = tag.get("TIPL") else {
		panic!("Expected a TIPL text frame");
	};
	assert_eq!(tipl, &["ENGINEER", "Baz", "PRODUCER", "Foo,Bar"]);

	let mut read_back = tag.properties();
	assert_eq!(read_back.unsupported_data(), ["UNKNOWN/APIC"]);

	tag.remove_unsupported_properties(read_back.unsupported_data());
	read_back = tag.properties();
	assert_eq!(read_back, properties);
}

#[test_log::test]
fn test_properties_survive_id3v23() {
	let mut properties = PropertyMap::new();
	properties.insert("TITLE", ["Title"]);
	properties.insert("DATE", ["2004-05-06"]);
	properties.insert("ORIGINALDATE", ["1999"]);
	properties.insert("PRODUCER", ["Foo"]);
	properties.insert("REPLAYGAIN_TRACK_GAIN", ["-1.00 dB"]);

	let mut tag = Id3v2Tag::new();
	tag.set_properties(&properties);

	let rendered = tag
		.render(WriteOptions::new().version(tagkit::id3::v2::Id3v2Version::V3), &NullListener)
		.unwrap();
	let reread = Id3v2Tag::read_from(&mut Cursor::new(rendered), 0, &ParseContext::new()).unwrap();

	let read_back = reread.properties();
	assert_eq!(values(&read_back, "TITLE"), ["Title"]);
	assert_eq!(values(&read_back, "DATE"), ["2004-05-06"]);
	assert_eq!(values(&read_back, "ORIGINALDATE"), ["1999"]);
	assert_eq!(values(&read_back, "PRODUCER"), ["Foo"]);
	assert_eq!(values(&read_back, "REPLAYGAIN_TRACK_GAIN"), ["-1.00 dB"]);
	assert_eq!(read_back, properties);
}

#[test_log::test]
fn test_musician_credits_in_id3v23() {
	let mut properties = PropertyMap::new();
	properties.insert("PRODUCER", ["Foo"]);
	properties.insert("PERFORMER:GUITAR", ["Bar"]);

	let mut tag = Id3v2Tag::new();
	tag.set_properties(&properties);

	let rendered = tag
		.render(WriteOptions::new().version(tagkit::id3::v2::Id3v2Version::V3), &NullListener)
		.unwrap();
	let reread = Id3v2Tag::read_from(&mut Cursor::new(rendered), 0, &ParseContext::new()).unwrap();

	// ID3v2.3 has a single list for both, the instrument is not an involvement role
	let read_back = reread.properties();
	assert!(!read_back.contains_key("PRODUCER"));
	assert_eq!(read_back.unsupported_data(), ["TIPL"]);
}
