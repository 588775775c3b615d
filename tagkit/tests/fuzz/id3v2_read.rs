use crate::{bounded_test, mutations};
use tagkit::config::{ParseContext, WriteOptions};
use tagkit::diagnostics::NullListener;
use tagkit::id3::v2::{Id3v2Tag, Id3v2Version};

use std::io::Cursor;

fn read_and_render(reader: &mut Cursor<Vec<u8>>, ctx: &ParseContext<'_>) {
	let Ok(tag) = Id3v2Tag::read_from(reader, 0, ctx) else {
		return;
	};

	let _ = tag.properties();
	let _ = tag.render(WriteOptions::new(), &NullListener);
	let _ = tag.render(WriteOptions::new().version(Id3v2Version::V3), &NullListener);
}

#[test_log::test]
fn oversized_tag() {
	// Claims a 256MiB body
	bounded_test(b"ID3\x04\x00\x00\x7F\x7F\x7F\x7F".to_vec(), read_and_render);
}

#[test_log::test]
fn oversized_frame() {
	let content = b"ID3\x03\x00\x00\x00\x00\x00\x14TXXX\x7F\xFF\xFF\xFF\x00\x00\x01\xFF\xFE\x00".to_vec();
	bounded_test(content, read_and_render);
}

#[test_log::test]
fn bad_extended_header() {
	let content = b"ID3\x04\x00\x40\x00\x00\x00\x10\x7F\x7F\x7F\x7F\x01\x70\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00".to_vec();
	bounded_test(content, read_and_render);
}

#[test_log::test]
fn mutated_tag() {
	let content = [
		b"ID3\x03\x00\x00\x00\x00\x00\x38".as_slice(),
		b"TIT2\x00\x00\x00\x04\x00\x00\x00Foo",
		b"COMM\x00\x00\x00\x0A\x00\x00\x01eng\xFF\xFE\x00\x00a\x00",
		b"IPLS\x00\x00\x00\x08\x00\x00\x00a\x00b\x00c\x00d",
		b"\x00\x00\x00\x00",
	]
	.concat();

	for data in mutations(&content) {
		bounded_test(data, read_and_render);
	}
}
