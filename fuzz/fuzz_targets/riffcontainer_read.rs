#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use tagkit::config::ParseContext;
use tagkit::diagnostics::NullListener;

fuzz_target!(|data: Vec<u8>| {
	let mut reader = Cursor::new(data);
	let ctx = ParseContext::new().diagnostics(&NullListener);
	if let Ok(container) = tagkit::iff::RiffContainer::read(&mut reader, &ctx) {
		for index in 0..container.chunk_count() {
			let _ = container.chunk_data(&mut reader, index);
		}
	}
});
