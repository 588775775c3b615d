#![allow(missing_docs)]

use tagkit::config::ParseContext;
use tagkit::diagnostics::NullListener;

use std::io::Cursor;
use std::thread;
use std::time::Instant;

mod chunk_container_read;
mod id3v2_read;
mod wav_read;

/// Run `f` on `data`, failing if it panics or takes more than 3 seconds
#[allow(clippy::missing_panics_doc)]
pub fn bounded_test(data: Vec<u8>, f: fn(&mut Cursor<Vec<u8>>, &ParseContext<'_>)) {
	let instant = Instant::now();
	let thread = thread::spawn(move || {
		let ctx = ParseContext::new().diagnostics(&NullListener);
		f(&mut Cursor::new(data), &ctx);
	});

	while instant.elapsed().as_secs() < 3 {
		if thread.is_finished() {
			assert!(thread.join().is_ok(), "Reader panicked");
			return;
		}
	}

	panic!("Failed to run test");
}

/// Every prefix of `data`, and `data` with each byte replaced by `0xFF`
pub fn mutations(data: &[u8]) -> impl Iterator<Item = Vec<u8>> + use<'_> {
	let truncated = (0..data.len()).map(move |len| data[..len].to_vec());
	let flipped = (0..data.len()).map(move |pos| {
		let mut data = data.to_vec();
		data[pos] = 0xFF;
		data
	});

	truncated.chain(flipped)
}
