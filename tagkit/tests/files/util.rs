// Test file builders
//
// Files are assembled in memory, `temp_file!` turns them into a real `File` so the
// `ByteStream` implementation of `std::fs::File` is covered as well.

#[macro_export]
macro_rules! temp_file {
	($content:expr) => {{
		use std::io::{Seek, Write};
		let mut file = tempfile::tempfile().unwrap();
		file.write_all(&$content).unwrap();

		file.seek(std::io::SeekFrom::Start(0)).unwrap();

		file
	}};
}

pub fn file_contents(file: &mut std::fs::File) -> Vec<u8> {
	use std::io::{Read, Seek, SeekFrom};

	let mut content = Vec::new();
	file.seek(SeekFrom::Start(0)).unwrap();
	file.read_to_end(&mut content).unwrap();
	content
}

/// A RIFF container with a little endian size, chunk bodies are padded to even lengths
pub fn riff(form_type: &[u8; 4], chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
	let mut body = form_type.to_vec();
	for (name, data) in chunks {
		body.extend_from_slice(&name[..]);
		body.extend_from_slice(&u32::try_from(data.len()).unwrap().to_le_bytes());
		body.extend_from_slice(data);
		if data.len() % 2 == 1 {
			body.push(0);
		}
	}

	let mut file = b"RIFF".to_vec();
	file.extend_from_slice(&u32::try_from(body.len()).unwrap().to_le_bytes());
	file.extend(body);
	file
}

pub fn wav(chunks: &[(&[u8; 4], &[u8])]) -> Vec<u8> {
	let mut all = vec![(b"fmt ", &[0_u8; 16][..])];
	all.extend_from_slice(chunks);
	riff(b"WAVE", &all)
}

/// An ID3v2 text frame with a Latin-1 body
pub fn text_frame(version: u8, id: &[u8; 4], text: &str) -> Vec<u8> {
	let mut content = vec![0];
	content.extend_from_slice(text.as_bytes());

	let size = u32::try_from(content.len()).unwrap();
	let size = if version == 4 { synch(size) } else { size };

	let mut frame = id.to_vec();
	frame.extend_from_slice(&size.to_be_bytes());
	frame.extend_from_slice(&[0, 0]);
	frame.extend(content);
	frame
}

/// An ID3v2 tag with `padding` zero bytes after the frames
pub fn id3v2(version: u8, frames: &[Vec<u8>], padding: usize) -> Vec<u8> {
	let body_len = frames.iter().map(Vec::len).sum::<usize>() + padding;

	let mut tag = vec![b'I', b'D', b'3', version, 0, 0];
	tag.extend_from_slice(&synch(u32::try_from(body_len).unwrap()).to_be_bytes());
	for frame in frames {
		tag.extend_from_slice(frame);
	}
	tag.resize(tag.len() + padding, 0);
	tag
}

fn synch(n: u32) -> u32 {
	(n & 0x7F) | ((n & 0x3F80) << 1) | ((n & 0x1F_C000) << 2) | ((n & 0x0FE0_0000) << 3)
}
