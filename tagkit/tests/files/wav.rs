use crate::temp_file;
use crate::util::{file_contents, id3v2, text_frame, wav};

use tagkit::config::{ParseContext, WriteOptions};
use tagkit::diagnostics::{DiagnosticLog, NullListener};
use tagkit::iff::wav::WavTags;
use tagkit::iff::RiffContainer;

use std::io::Cursor;

fn chunk_names(container: &RiffContainer) -> Vec<[u8; 4]> {
	container.chunks().iter().map(|chunk| chunk.name()).collect()
}

#[test_log::test]
fn test_read_lowercase_chunk() {
	let tag = id3v2(3, &[text_frame(3, b"TIT2", "Title")], 8);
	let mut file = temp_file!(wav(&[(b"data", &[1, 2, 3, 4]), (b"id3 ", &tag)]));

	let tags = WavTags::read(&mut file, &ParseContext::new()).unwrap();
	assert_eq!(tags.id3v2().unwrap().title(), "Title");
}

#[test_log::test]
fn test_save_keeps_audio_data() {
	let mut file = temp_file!(wav(&[(b"data", &[1, 2, 3])]));

	let mut tags = WavTags::read(&mut file, &ParseContext::new()).unwrap();
	tags.id3v2_mut().set_title("Title");
	tags.id3v2_mut().set_artist("Artist");
	tags.save(&mut file, WriteOptions::new().min_padding(0), &NullListener)
		.unwrap();

	let content = file_contents(&mut file);
	let reread = RiffContainer::read(&mut Cursor::new(&content), &ParseContext::new()).unwrap();
	assert!(reread.is_valid());
	assert_eq!(chunk_names(&reread), [*b"fmt ", *b"data", *b"ID3 "]);
	assert_eq!(reread.chunk_data(&mut Cursor::new(&content), 1).unwrap(), [1, 2, 3]);
	assert_eq!(u64::from(reread.size()), content.len() as u64 - 8);

	let tags = WavTags::read(&mut Cursor::new(content), &ParseContext::new()).unwrap();
	let tag = tags.id3v2().unwrap();
	assert_eq!(tag.title(), "Title");
	assert_eq!(tag.artist(), "Artist");
}

#[test_log::test]
fn test_save_replaces_both_spellings() {
	let tag = id3v2(4, &[text_frame(4, b"TIT2", "Old")], 0);
	let mut file = temp_file!(wav(&[(b"ID3 ", &tag), (b"id3 ", &tag), (b"data", &[0; 4])]));

	let mut tags = WavTags::read(&mut file, &ParseContext::new()).unwrap();
	tags.id3v2_mut().set_title("New");
	tags.save(&mut file, WriteOptions::new().uppercase_id3v2_chunk(false), &NullListener)
		.unwrap();

	let tags = WavTags::read(&mut file, &ParseContext::new()).unwrap();
	assert_eq!(tags.id3v2().unwrap().title(), "New");
	assert_eq!(chunk_names(tags.container()), [*b"fmt ", *b"data", *b"id3 "]);
}

#[test_log::test]
fn test_empty_tag_removes_chunk() {
	let tag = id3v2(4, &[text_frame(4, b"TIT2", "Title")], 0);
	let mut file = temp_file!(wav(&[(b"ID3 ", &tag), (b"data", &[0; 4])]));

	let mut tags = WavTags::read(&mut file, &ParseContext::new()).unwrap();
	tags.id3v2_mut().remove_frames("TIT2");
	tags.save(&mut file, WriteOptions::new(), &NullListener).unwrap();

	assert_eq!(file_contents(&mut file), wav(&[(b"data", &[0; 4])]));
}

#[test_log::test]
fn test_strip_removes_every_spelling() {
	let tag = id3v2(4, &[text_frame(4, b"TIT2", "Title")], 0);
	let mut file = temp_file!(wav(&[(b"ID32", &tag), (b"data", &[0; 4]), (b"ID3H", &tag)]));

	let mut tags = WavTags::read(&mut file, &ParseContext::new()).unwrap();
	assert!(tags.id3v2().is_some());

	tags.strip(&mut file).unwrap();
	assert_eq!(file_contents(&mut file), wav(&[(b"data", &[0; 4])]));
}

#[test_log::test]
fn test_broken_tag_chunk() {
	let log = DiagnosticLog::new();
	let ctx = ParseContext::new().diagnostics(&log);

	let mut file = Cursor::new(wav(&[(b"ID3 ", b"not a tag"), (b"data", &[0; 4])]));
	let tags = WavTags::read(&mut file, &ctx).unwrap();

	assert!(tags.id3v2().is_none());
	assert!(log.contains("Invalid ID3v2 chunk"));
}
