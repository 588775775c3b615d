use crate::temp_file;
use crate::util::{id3v2, text_frame};

use tagkit::charset::LegacyCharsetHandler;
use tagkit::config::{ParseContext, ParseOptions, WriteOptions};
use tagkit::diagnostics::{DiagnosticLog, NullListener};
use tagkit::id3::v2::{FrameId, Id3v2Header, Id3v2Tag, Id3v2Version, TagState};
use tagkit::text::CanonicalString;

use std::io::Cursor;

fn read(content: &[u8], ctx: &ParseContext<'_>) -> Id3v2Tag {
	Id3v2Tag::read_from(&mut Cursor::new(content), 0, ctx).unwrap()
}

fn without_conversions() -> ParseContext<'static> {
	ParseContext::new().options(ParseOptions::new().implicit_conversions(false))
}

#[test_log::test]
fn test_render_matches_input() {
	let content = id3v2(
		4,
		&[
			text_frame(4, b"TIT2", "Title"),
			text_frame(4, b"TPE1", "Artist"),
			text_frame(4, b"TDRC", "2004-05-06"),
		],
		100,
	);

	let tag = read(&content, &ParseContext::new());
	assert_eq!(tag.state(), TagState::Parsed);

	let rendered = tag.render(WriteOptions::new(), &NullListener).unwrap();
	assert_eq!(rendered, content);
}

#[test_log::test]
fn test_renders_are_stable() {
	let mut tag = Id3v2Tag::new();
	tag.set_title("Title");
	tag.set_comment("Comment");

	let first = tag.render_mut(WriteOptions::new(), 0, &NullListener).unwrap();
	let second = tag.render_mut(WriteOptions::new(), 0, &NullListener).unwrap();
	assert_eq!(first, second);

	let reread = read(&second, &ParseContext::new());
	let third = reread.render(WriteOptions::new(), &NullListener).unwrap();
	assert_eq!(second, third);
}

#[test_log::test]
fn test_padding_reuse() {
	// 1000 bytes of frames, no padding
	let content = id3v2(4, &[text_frame(4, b"TIT2", &"a".repeat(989))], 0);
	assert_eq!(Id3v2Header::parse(&content).unwrap().size(), 1000);

	let mut tag = read(&content, &ParseContext::new());

	// Shrinking keeps the tag size
	tag.set_title("a".repeat(979));
	let rendered = tag
		.render_with_file_length(WriteOptions::new(), 1_000_000, &NullListener)
		.unwrap();
	assert_eq!(rendered.len(), 10 + 1000);

	// Growing far beyond the old size only adds the minimum padding
	tag.set_title("a".repeat(979 + 2_000_000));
	let rendered = tag
		.render_with_file_length(WriteOptions::new(), 1_000_000, &NullListener)
		.unwrap();
	assert_eq!(rendered.len(), 10 + 2_000_990 + 1024);
}

#[test_log::test]
fn test_id3v23_date_split() {
	let mut tag = Id3v2Tag::new();
	tag.set_text_frame(FrameId::new("TDRC").unwrap(), "2001-03-15T10:30");

	let rendered = tag
		.render(WriteOptions::new().version(Id3v2Version::V3), &NullListener)
		.unwrap();

	let reread = read(&rendered, &without_conversions());
	assert_eq!(reread.header().version(), Id3v2Version::V3);
	assert!(reread.get("TDRC").is_none());
	assert_eq!(reread.get("TYER").unwrap().to_canonical_string(), "2001");
	assert_eq!(reread.get("TDAT").unwrap().to_canonical_string(), "1503");
	assert_eq!(reread.get("TIME").unwrap().to_canonical_string(), "1030");

	// The frames are merged back by default
	let reread = read(&rendered, &ParseContext::new());
	assert_eq!(reread.get("TDRC").unwrap().to_canonical_string(), "2001-03-15T10:30");
	assert_eq!(reread.len(), 1);
}

#[test_log::test]
fn test_id3v23_genres() {
	let options = WriteOptions::new().version(Id3v2Version::V3);

	let mut tag = Id3v2Tag::new();
	tag.set_genre("Rock");
	let rendered = tag.render(options, &NullListener).unwrap();
	let reread = read(&rendered, &without_conversions());
	assert_eq!(reread.get("TCON").unwrap().to_canonical_string(), "Rock");

	tag.set_genre("17");
	let rendered = tag.render(options, &NullListener).unwrap();
	let reread = read(&rendered, &without_conversions());
	assert_eq!(reread.get("TCON").unwrap().to_canonical_string(), "(17)");

	let reread = read(&rendered, &ParseContext::new());
	assert_eq!(reread.get("TCON").unwrap().to_canonical_string(), "17");
	assert_eq!(reread.genre(), "Rock");
}

#[test_log::test]
fn test_id3v22_ids_are_upgraded() {
	// ID3v2.2 frame headers are 6 bytes: 3 byte ID, 3 byte size, no flags
	let mut content = b"ID3\x02\x00\x00\x00\x00\x00\x0ATT2\x00\x00\x04\x00Foo".to_vec();
	content.resize(content.len() + 10, 0);
	content[9] = 20;

	let tag = read(&content, &ParseContext::new());
	assert_eq!(tag.original_version(), Id3v2Version::V2);
	assert_eq!(tag.title(), "Foo");
	assert_eq!(tag.frames()[0].id_str(), "TIT2");

	// Only ID3v2.4 and ID3v2.3 are written
	let rendered = tag.render(WriteOptions::new().version(Id3v2Version::V2), &NullListener).unwrap();
	assert_eq!(rendered[3], 4);
}

#[test_log::test]
fn test_latin1_is_widened() {
	let content = id3v2(4, &[[b"TIT2\x00\x00\x00\x03\x00\x00\x00".as_slice(), &[0xB0, 0xA5]].concat()], 0);

	let tag = read(&content, &ParseContext::new());
	assert_eq!(tag.title().units(), [0x00B0, 0x00A5]);
	assert_eq!(tag.title(), CanonicalString::from_latin1(&[0xB0, 0xA5]));
}

#[test_log::test]
fn test_legacy_charset_handler() {
	// "При" in windows-1251
	let content = id3v2(4, &[[b"TIT2\x00\x00\x00\x04\x00\x00\x00".as_slice(), b"\xCF\xF0\xE8"].concat()], 0);

	let handler = LegacyCharsetHandler::for_label("windows-1251").unwrap();
	let log = DiagnosticLog::new();
	let ctx = ParseContext::new().latin1_handler(&handler).diagnostics(&log);

	let tag = read(&content, &ctx);
	assert_eq!(tag.title(), "При");
}

#[test_log::test]
fn test_read_from_offset() {
	let mut content = b"junk".to_vec();
	content.extend(id3v2(3, &[text_frame(3, b"TALB", "Album")], 16));

	let mut file = temp_file!(content);
	let tag = Id3v2Tag::read_from(&mut file, 4, &ParseContext::new()).unwrap();
	assert_eq!(tag.album(), "Album");
	assert_eq!(tag.original_version(), Id3v2Version::V3);
}

#[test_log::test]
fn test_garbage_is_not_a_tag() {
	let log = DiagnosticLog::new();
	let ctx = ParseContext::new().diagnostics(&log);

	let tag = read(b"ID3\xFF\x00\x00\x00\x00\x00\x00", &ctx);
	assert_eq!(tag.state(), TagState::Invalid);
	assert!(tag.is_empty());
	assert!(!log.is_empty());
}
