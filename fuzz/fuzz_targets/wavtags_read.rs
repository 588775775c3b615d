#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use tagkit::config::ParseContext;
use tagkit::diagnostics::NullListener;

fuzz_target!(|data: Vec<u8>| {
	let ctx = ParseContext::new().diagnostics(&NullListener);
	let _ = tagkit::iff::wav::WavTags::read(&mut Cursor::new(data), &ctx);
});
