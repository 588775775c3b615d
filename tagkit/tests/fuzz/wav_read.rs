use crate::{bounded_test, mutations};
use tagkit::config::ParseContext;
use tagkit::iff::wav::WavTags;

use std::io::Cursor;

fn read_wav(reader: &mut Cursor<Vec<u8>>, ctx: &ParseContext<'_>) {
	let _ = WavTags::read(reader, ctx);
}

#[test_log::test]
fn nested_tag_sizes() {
	// The ID3 chunk is 12 bytes, the tag inside claims far more
	let content = b"RIFF\x18\x00\x00\x00WAVEID3 \x0C\x00\x00\x00ID3\x04\x00\x00\x7F\x7F\x7F\x7Fab".to_vec();
	bounded_test(content, read_wav);
}

#[test_log::test]
fn mutated_wav() {
	let content = [
		b"RIFF\x38\x00\x00\x00WAVE".as_slice(),
		b"fmt \x04\x00\x00\x00\x01\x00\x02\x00",
		b"ID3 \x16\x00\x00\x00",
		b"ID3\x04\x00\x00\x00\x00\x00\x0CTIT2\x00\x00\x00\x02\x00\x00\x03a",
		b"data\x02\x00\x00\x00\x00\x00",
	]
	.concat();

	for data in mutations(&content) {
		bounded_test(data, read_wav);
	}
}
