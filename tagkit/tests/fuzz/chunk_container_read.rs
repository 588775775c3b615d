use crate::{bounded_test, mutations};
use tagkit::config::{ParseContext, ParseOptions};
use tagkit::diagnostics::NullListener;
use tagkit::iff::{AiffContainer, RiffContainer};

use std::io::Cursor;

fn read_riff(reader: &mut Cursor<Vec<u8>>, ctx: &ParseContext<'_>) {
	let Ok(container) = RiffContainer::read(reader, ctx) else {
		return;
	};

	for index in 0..container.chunk_count() {
		let _ = container.chunk_data(reader, index);
	}
}

fn read_aiff(reader: &mut Cursor<Vec<u8>>, ctx: &ParseContext<'_>) {
	let _ = AiffContainer::read(reader, ctx);
}

#[test_log::test]
fn huge_sizes() {
	bounded_test(b"RIFF\xFF\xFF\xFF\xFFWAVEdata\xFF\xFF\xFF\xFF".to_vec(), read_riff);
	bounded_test(b"FORM\xFF\xFF\xFF\xFFAIFFSSND\xFF\xFF\xFF\xFF".to_vec(), read_aiff);
}

#[test_log::test]
fn huge_list_chunk() {
	// The LIST chunk claims 4GiB, it must not be allocated
	let content = b"RIFF\xFF\xFF\xFF\xFFWAVELIST\xFE\xFF\xFF\xFFINFO".to_vec();
	bounded_test(content, |reader, _| {
		let options = ParseOptions::new().max_text_chunk_size(u32::MAX);
		read_riff(reader, &ParseContext::new().options(options).diagnostics(&NullListener));
	});
}

#[test_log::test]
fn mutated_container() {
	let content =
		b"RIFF\x28\x00\x00\x00WAVEfmt \x04\x00\x00\x00abcdabc \x03\x00\x00\x00odd\x00data\x04\x00\x00\x00wxyz"
			.to_vec();

	for data in mutations(&content) {
		bounded_test(data, read_riff);
	}
}
