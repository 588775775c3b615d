use crate::temp_file;
use crate::util::{file_contents, riff};

use tagkit::config::{ParseContext, ParseOptions};
use tagkit::diagnostics::DiagnosticLog;
use tagkit::error::ErrorKind;
use tagkit::iff::{AiffContainer, RiffContainer};

use std::io::Cursor;

fn assert_contiguous(container: &RiffContainer) {
	for pair in container.chunks().windows(2) {
		assert_eq!(
			pair[1].offset(),
			pair[0].offset() + u64::from(pair[0].size()) + u64::from(pair[0].padding()) + 8
		);
	}
}

#[test_log::test]
fn test_read_chunks() {
	let mut file = temp_file!(riff(b"WAVE", &[(b"fmt ", &[1; 16]), (b"abc ", b"odd"), (b"data", &[2; 4])]));
	let container = RiffContainer::read(&mut file, &ParseContext::new()).unwrap();

	assert!(container.is_valid());
	assert_eq!(container.magic(), *b"RIFF");
	assert_eq!(container.form_type(), *b"WAVE");
	assert_eq!(container.chunk_count(), 3);

	assert_eq!(container.chunk_name(1), Some(*b"abc "));
	assert_eq!(container.chunk_offset(0), Some(20));
	assert_eq!(container.chunk_data_size(1), Some(3));
	assert_eq!(container.chunk_padding(1), Some(1));
	assert_eq!(container.chunk_padding(2), Some(0));
	assert_eq!(container.chunk_name(3), None);
	assert_contiguous(&container);

	assert_eq!(container.chunk_data(&mut file, 1).unwrap(), b"odd");
	assert_eq!(container.find_chunk(*b"data"), Some(2));
	assert_eq!(container.find_chunk(*b"LIST"), None);
}

#[test_log::test]
fn test_aiff_sizes_are_big_endian() {
	let mut content = b"FORM\x00\x00\x00\x10AIFFCOMM\x00\x00\x00\x04abcd".to_vec();
	let container = AiffContainer::read(&mut Cursor::new(&mut content), &ParseContext::new()).unwrap();

	assert!(container.is_valid());
	assert_eq!(container.size(), 16);
	assert_eq!(container.chunk_data_size(0), Some(4));
}

#[test_log::test]
fn test_zero_sized_chunks_are_skipped() {
	// A long run of null chunks, the scan must still terminate
	let mut content = b"RIFF\x00\x00\x00\x00WAVE".to_vec();
	content.resize(12 + 8 * 1000, 0);
	content.extend_from_slice(b"data\x02\x00\x00\x00ab");
	let size = (content.len() - 8) as u32;
	content[4..8].copy_from_slice(&size.to_le_bytes());

	let container = RiffContainer::read(&mut Cursor::new(content), &ParseContext::new()).unwrap();
	assert!(container.is_valid());
	assert_eq!(container.chunk_count(), 1);
	assert_eq!(container.chunk_offset(0), Some(12 + 8 * 1000 + 8));
}

#[test_log::test]
fn test_sizes_are_clamped() {
	let log = DiagnosticLog::new();
	let ctx = ParseContext::new().diagnostics(&log);

	// Container claims 1000 bytes, the data chunk claims 100
	let content = b"RIFF\xE8\x03\x00\x00WAVEdata\x64\x00\x00\x00abcdef".to_vec();
	let len = content.len() as u64;

	let mut file = Cursor::new(content);
	let container = RiffContainer::read(&mut file, &ctx).unwrap();

	assert!(container.is_valid());
	assert_eq!(u64::from(container.size()), len - 8);

	let offset = container.chunk_offset(0).unwrap();
	let size = container.chunk_data_size(0).unwrap();
	assert_eq!(offset + u64::from(size), len);
	assert_eq!(container.chunk_data(&mut file, 0).unwrap(), b"abcdef");

	assert!(log.contains("Invalid container size"));
	assert!(log.contains("overflows the stream"));
}

#[test_log::test]
fn test_structural_violations() {
	let log = DiagnosticLog::new();

	// Bad magic
	let ctx = ParseContext::new().diagnostics(&log);
	let mut file = Cursor::new(b"RIFX\x04\x00\x00\x00WAVE".to_vec());
	assert!(!RiffContainer::read(&mut file, &ctx).unwrap().is_valid());

	// Zero container size
	let mut file = Cursor::new(b"RIFF\x00\x00\x00\x00WAVEdata\x01\x00\x00\x00a\x00".to_vec());
	assert!(!RiffContainer::read(&mut file, &ctx).unwrap().is_valid());

	// Garbage chunk name
	let mut file = Cursor::new(riff(b"WAVE", &[(b"fmt ", &[0; 4]), (b"\x01\x02\x03\x04", b"ab")]));
	let container = RiffContainer::read(&mut file, &ctx).unwrap();
	assert!(!container.is_valid());

	let err = container.chunk_data(&mut file, 0).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::InvalidContainer));
	assert_eq!(log.len(), 3);
}

#[test_log::test]
fn test_text_chunk_limit() {
	let options = ParseOptions::new().max_text_chunk_size(16);
	let ctx = ParseContext::new().options(options);

	let mut file = Cursor::new(riff(b"WAVE", &[(b"LIST", &[b'a'; 32])]));
	assert!(!RiffContainer::read(&mut file, &ctx).unwrap().is_valid());

	// Other chunks are unaffected
	let mut file = Cursor::new(riff(b"WAVE", &[(b"data", &[b'a'; 32])]));
	assert!(RiffContainer::read(&mut file, &ctx).unwrap().is_valid());
}

#[test_log::test]
fn test_resize_chunks() {
	let mut file = temp_file!(riff(b"WAVE", &[(b"fmt ", &[1; 16]), (b"abc ", b"odd"), (b"data", &[2; 4])]));
	let mut container = RiffContainer::read(&mut file, &ParseContext::new()).unwrap();

	// Same size, overwritten in place
	container.set_chunk_data(&mut file, 1, b"ODD").unwrap();
	assert_eq!(file_contents(&mut file).len(), 12 + 24 + 12 + 12);

	// Grow the odd chunk to an even size, the padding byte goes away
	container.set_chunk_data(&mut file, 1, b"even").unwrap();
	assert_eq!(container.chunk_padding(1), Some(0));
	assert_contiguous(&container);

	// Shrink the first chunk
	container.set_chunk_data(&mut file, 0, b"x").unwrap();
	assert_eq!(container.chunk_padding(0), Some(1));
	assert_contiguous(&container);

	assert_eq!(container.chunk_data(&mut file, 1).unwrap(), b"even");
	assert_eq!(container.chunk_data(&mut file, 2).unwrap(), [2; 4]);

	let content = file_contents(&mut file);
	assert_eq!(
		content,
		riff(b"WAVE", &[(b"fmt ", b"x"), (b"abc ", b"even"), (b"data", &[2; 4])])
	);

	// What was written is what is read
	let reread = RiffContainer::read(&mut Cursor::new(content), &ParseContext::new()).unwrap();
	assert_eq!(reread, container);
}

#[test_log::test]
fn test_append_and_remove_chunks() {
	let mut file = temp_file!(riff(b"WAVE", &[(b"fmt ", &[1; 16]), (b"data", b"abc")]));
	let mut container = RiffContainer::read(&mut file, &ParseContext::new()).unwrap();

	assert!(container.set_chunk_data_by_name(&mut file, *b"LIST", b"INFO", false).unwrap());
	assert!(container.set_chunk_data_by_name(&mut file, *b"LIST", b"INFO2", true).unwrap());
	assert_eq!(container.chunk_count(), 4);
	assert_contiguous(&container);

	// Only LIST chunks may appear twice
	assert!(!container.set_chunk_data_by_name(&mut file, *b"data", b"x", true).unwrap());

	// An existing chunk is replaced instead
	assert!(container.set_chunk_data_by_name(&mut file, *b"data", b"xy", false).unwrap());
	assert_eq!(container.chunk_count(), 4);

	assert_eq!(container.remove_chunks_by_name(&mut file, *b"LIST").unwrap(), 2);
	assert_eq!(
		file_contents(&mut file),
		riff(b"WAVE", &[(b"fmt ", &[1; 16]), (b"data", b"xy")])
	);

	container.remove_chunk(&mut file, 0).unwrap();
	assert_eq!(file_contents(&mut file), riff(b"WAVE", &[(b"data", b"xy")]));
	assert_eq!(container.chunk_offset(0), Some(20));

	let err = container.remove_chunk(&mut file, 5).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::ChunkIndexOutOfRange(5)));
}

#[test_log::test]
fn test_mutations_refuse_invalid_containers() {
	let mut file = Cursor::new(riff(b"WAVE", &[(b"fmt ", &[0; 4]), (b"\x01abc", b"ab")]));
	let mut container = RiffContainer::read(&mut file, &ParseContext::new()).unwrap();

	let err = container.set_chunk_data(&mut file, 0, b"x").unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::InvalidContainer));

	let err = container
		.set_chunk_data_by_name(&mut file, *b"data", b"x", false)
		.unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::InvalidContainer));
}
