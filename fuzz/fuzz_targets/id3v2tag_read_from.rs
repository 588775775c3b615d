#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use tagkit::config::{ParseContext, WriteOptions};
use tagkit::diagnostics::NullListener;

fuzz_target!(|data: Vec<u8>| {
	let ctx = ParseContext::new().diagnostics(&NullListener);
	if let Ok(tag) = tagkit::id3::v2::Id3v2Tag::read_from(&mut Cursor::new(data), 0, &ctx) {
		let _ = tag.properties();
		let _ = tag.render(WriteOptions::new(), &NullListener);
	}
});
