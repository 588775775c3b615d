#![no_main]

use libfuzzer_sys::fuzz_target;
use tagkit::text::{CanonicalString, TextEncoding};

fuzz_target!(|data: &[u8]| {
	let Some((&encoding, bytes)) = data.split_first() else {
		return;
	};

	let Some(encoding) = TextEncoding::from_u8(encoding % 5) else {
		return;
	};

	if let Ok(decoded) = CanonicalString::decode(bytes, encoding) {
		let _ = decoded.encode(encoding);
	}
});
