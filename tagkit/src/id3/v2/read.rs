use super::frame::Frame;
use super::frame::read::FrameFactory;
use super::header::{
	ExtendedHeader, Footer, ID3V2_FOOTER_SIZE, ID3V2_HEADER_SIZE, Id3v2Header, Id3v2Version,
	TagState,
};
use super::tag::Id3v2Tag;
use super::util::synchsafe::resynchronize;
use crate::config::ParseContext;
use crate::error::Result;
use crate::id3::v1;
use crate::macros::diag;
use crate::util::alloc::check_allocation;
use crate::util::charset::{FieldDecoder, resolve_detected_charset};
use crate::util::io::SeekStreamLen;
use crate::util::text::CanonicalString;

use std::borrow::Cow;
use std::io::{Read, Seek, SeekFrom};

pub(super) fn read_tag<R>(reader: &mut R, offset: u64, ctx: &ParseContext<'_>) -> Result<Id3v2Tag>
where
	R: Read + Seek,
{
	reader.seek(SeekFrom::Start(offset))?;

	let mut header_bytes = Vec::with_capacity(ID3V2_HEADER_SIZE);
	reader
		.by_ref()
		.take(ID3V2_HEADER_SIZE as u64)
		.read_to_end(&mut header_bytes)?;

	let header = match Id3v2Header::parse(&header_bytes) {
		Ok(header) => header,
		Err(e) => {
			diag!(ctx.diagnostics, Warn, "Invalid ID3v2 header at {offset}: {e}");
			return Ok(Id3v2Tag {
				state: TagState::Invalid,
				..Id3v2Tag::default()
			});
		},
	};

	log::debug!(
		"Reading ID3v2.{} tag at {offset}, size: {}",
		header.version.major(),
		header.size
	);

	// The footer is read with the body, it is split off during the frame scan
	let declared_size = header.complete_tag_size() - ID3V2_HEADER_SIZE as u64;
	let remaining = reader
		.stream_length()?
		.saturating_sub(offset + ID3V2_HEADER_SIZE as u64);

	if remaining < declared_size {
		diag!(
			ctx.diagnostics,
			Warn,
			"ID3v2 tag claims to be {declared_size} bytes, but only {remaining} remain"
		);
	}

	let body_size = declared_size.min(remaining);
	check_allocation(usize::try_from(body_size).unwrap_or(usize::MAX))?;

	let mut body = Vec::new();
	reader.by_ref().take(body_size).read_to_end(&mut body)?;

	let mut tag = parse_tag(header, &body, ctx);

	// Tags directly after this one are treated as its padding, they will be overwritten on save
	let mut duplicate_size = 0_u64;
	loop {
		reader.seek(SeekFrom::Start(
			offset + header.complete_tag_size() + duplicate_size,
		))?;

		let mut next = Vec::with_capacity(ID3V2_HEADER_SIZE);
		reader
			.by_ref()
			.take(ID3V2_HEADER_SIZE as u64)
			.read_to_end(&mut next)?;

		if next.len() < ID3V2_HEADER_SIZE || !next.starts_with(b"ID3") {
			break;
		}

		let Ok(duplicate) = Id3v2Header::parse(&next) else {
			break;
		};

		duplicate_size += duplicate.complete_tag_size();
	}

	if duplicate_size != 0 {
		diag!(
			ctx.diagnostics,
			Debug,
			"Found duplicate ID3v2 tags ({duplicate_size} bytes), treating them as padding"
		);

		let duplicate_size = u32::try_from(duplicate_size).unwrap_or(u32::MAX);
		tag.header.size = tag.header.size.saturating_add(duplicate_size);
		tag.original_size = tag.header.size;
	}

	Ok(tag)
}

pub(super) fn parse_tag(header: Id3v2Header, body: &[u8], ctx: &ParseContext<'_>) -> Id3v2Tag {
	let mut tag = Id3v2Tag {
		header,
		state: TagState::Parsing,
		original_size: header.size,
		..Id3v2Tag::default()
	};

	// ID3v2.4 only unsynchronises individual frames
	let data = if header.flags.unsynchronisation && header.version <= Id3v2Version::V3 {
		Cow::Owned(resynchronize(body))
	} else {
		Cow::Borrowed(body)
	};

	let mut pos = 0;
	let mut end = data.len();

	if header.flags.extended_header {
		match ExtendedHeader::parse(&data, header.version) {
			Some(extended_header) if extended_header.size() as usize <= data.len() => {
				pos = extended_header.size() as usize;
				tag.extended_header = Some(extended_header);
			},
			_ => diag!(
				ctx.diagnostics,
				Warn,
				"ID3v2 extended header does not fit in the tag, ignoring it"
			),
		}
	}

	if header.flags.footer && end - pos >= ID3V2_FOOTER_SIZE {
		end -= ID3V2_FOOTER_SIZE;
		tag.footer = Some(Footer);
	}

	let detected_charset = match (ctx.options.smart_encoding, ctx.detector) {
		(true, Some(detector)) => {
			// Pictures are irrelevant to the charset, and usually the last frames of a tag
			let sample = match data.windows(4).position(|window| window == b"APIC") {
				Some(apic) if apic > 0 => &data[..apic],
				_ => &data[..],
			};

			resolve_detected_charset(
				detector,
				sample,
				ctx.options.charset_confidence_threshold,
				ctx.diagnostics,
			)
		},
		_ => None,
	};

	if let Some(charset) = detected_charset {
		log::debug!("Decoding Latin-1 text as {}", charset.name());
	}

	tag.detected_charset = detected_charset;

	let factory = FrameFactory::new(
		header.version,
		FieldDecoder::new(ctx, detected_charset),
		ctx.options.implicit_conversions,
	);

	let frame_header_size = header.version.frame_header_size();
	while pos + frame_header_size < end {
		if data[pos] == 0 {
			if tag.footer.is_some() {
				diag!(
					ctx.diagnostics,
					Warn,
					"ID3v2 tag has both padding and a footer, this is not allowed"
				);
			}

			break;
		}

		let Some(parsed) = factory.create(&data[pos..end]) else {
			pos += frame_header_size;
			continue;
		};

		pos += parsed.size as usize + frame_header_size;

		if let Some(frame) = parsed.frame {
			tag.add_frame(frame);
		}
	}

	if header.version <= Id3v2Version::V3 && ctx.options.implicit_conversions {
		merge_date_frames(&mut tag, ctx);
		split_genres(&mut tag);
	}

	tag.state = TagState::Parsed;
	tag
}

/// The only value of the only frame with the ID `id`, if it is 4 ASCII characters long
fn single_short_field<'a>(tag: &'a Id3v2Tag, id: &str) -> Option<&'a CanonicalString> {
	let mut frames = tag.frame_list(id);
	let (Some(Frame::Text(frame)), None) = (frames.next(), frames.next()) else {
		return None;
	};

	match frame.values.as_slice() {
		[value] if value.len() == 4 && value.is_ascii() => Some(value),
		_ => None,
	}
}

// ID3v2.3 stores the date and time in TDAT (DDMM) and TIME (HHMM), next to the year
fn merge_date_frames(tag: &mut Id3v2Tag, ctx: &ParseContext<'_>) {
	let (Some(year), Some(date)) = (
		single_short_field(tag, "TDRC"),
		single_short_field(tag, "TDAT"),
	) else {
		return;
	};

	let date = date.to_string_lossy();
	let mut timestamp = format!("{year}-{}-{}", &date[2..], &date[..2]);

	let time = single_short_field(tag, "TIME").map(CanonicalString::to_string_lossy);
	if let Some(time) = &time {
		timestamp.push_str(&format!("T{}:{}", &time[..2], &time[2..]));
	}

	diag!(ctx.diagnostics, Debug, "Merging ID3v2.3 date frames into TDRC ({timestamp})");

	let tdrc = tag.frame_indices("TDRC")[0];
	if let Some(Frame::Text(tdrc)) = tag.frame_mut(tdrc) {
		tdrc.values = vec![CanonicalString::from(timestamp)];
	}

	tag.remove_frames("TDAT");
	if time.is_some() {
		tag.remove_frames("TIME");
	}
}

fn split_genres(tag: &mut Id3v2Tag) {
	for index in tag.frame_indices("TCON").to_vec() {
		let Some(Frame::Text(tcon)) = tag.frame_mut(index) else {
			continue;
		};

		let values = std::mem::take(&mut tcon.values);
		tcon.values = values.into_iter().flat_map(split_genre).collect();
	}
}

/// Split an ID3v2.3 genre, such as `"(17)(RX)Refinement"`, into separate values
///
/// A numeric genre whose name is the refinement is redundant and dropped. `"(("` escapes a
/// literal parenthesis.
fn split_genre(value: CanonicalString) -> Vec<CanonicalString> {
	let text = value.to_string_lossy();
	if !text.starts_with('(') {
		return vec![value];
	}

	let mut rest = text.as_str();
	let mut codes = Vec::new();
	while let Some(inner) = rest.strip_prefix('(') {
		if inner.starts_with('(') {
			rest = inner;
			break;
		}

		let Some(end) = inner.find(')') else {
			break;
		};

		codes.push(&inner[..end]);
		rest = &inner[end + 1..];
	}

	let mut values: Vec<CanonicalString> = codes
		.into_iter()
		.filter(|code| match code.parse::<u8>() {
			Ok(number) => v1::genre(number) != Some(rest),
			Err(_) => !code.is_empty(),
		})
		.map(CanonicalString::from)
		.collect();

	if !rest.is_empty() {
		values.push(CanonicalString::from(rest));
	}

	values
}

#[cfg(test)]
mod tests {
	use super::split_genre;
	use crate::config::{ParseContext, ParseOptions};
	use crate::diagnostics::DiagnosticLog;
	use crate::id3::v2::{Frame, Id3v2Header, Id3v2Tag, TagState};
	use crate::util::charset::CharsetDetector;
	use crate::util::text::CanonicalString;

	use std::io::Cursor;

	fn v3_frame(id: &[u8; 4], body: &[u8]) -> Vec<u8> {
		let mut frame = id.to_vec();
		frame.extend((body.len() as u32).to_be_bytes());
		frame.extend([0, 0]);
		frame.extend_from_slice(body);
		frame
	}

	fn tag_bytes(version: u8, flags: u8, body: &[u8]) -> Vec<u8> {
		let size = body.len() as u32;
		let mut bytes = vec![b'I', b'D', b'3', version, 0, flags];
		bytes.extend([
			(size >> 21) as u8 & 0x7F,
			(size >> 14) as u8 & 0x7F,
			(size >> 7) as u8 & 0x7F,
			size as u8 & 0x7F,
		]);
		bytes.extend_from_slice(body);
		bytes
	}

	fn read(bytes: Vec<u8>, ctx: &ParseContext<'_>) -> Id3v2Tag {
		Id3v2Tag::read_from(&mut Cursor::new(bytes), 0, ctx).unwrap()
	}

	#[test_log::test]
	fn invalid_header() {
		let log = DiagnosticLog::new();
		let tag = read(b"ID3\x09\x00\x00\x00\x00\x00\x00".to_vec(), &ParseContext::new().diagnostics(&log));

		assert_eq!(tag.state(), TagState::Invalid);
		assert!(tag.is_empty());
		assert!(!log.is_empty());
	}

	#[test_log::test]
	fn scan_stops_at_padding() {
		let mut body = v3_frame(b"TIT2", b"\x00Title");
		body.extend([0; 32]);
		// Never reached
		body.extend(v3_frame(b"TPE1", b"\x00Artist"));

		let tag = read(tag_bytes(3, 0, &body), &ParseContext::new());
		assert_eq!(tag.state(), TagState::Parsed);
		assert_eq!(tag.len(), 1);
		assert_eq!(tag.title(), "Title");
	}

	#[test_log::test]
	fn broken_frames_are_stepped_over() {
		// A frame with an invalid ID makes the scan move on by one frame header
		let mut body = v3_frame(b"ti\0\0", b"");
		body.extend(v3_frame(b"TALB", b"\x00Album"));

		let tag = read(tag_bytes(3, 0, &body), &ParseContext::new());
		assert_eq!(tag.album(), "Album");
	}

	#[test_log::test]
	fn id3v23_dates_are_merged() {
		let mut body = v3_frame(b"TYER", b"\x002004");
		body.extend(v3_frame(b"TDAT", b"\x000605"));
		body.extend(v3_frame(b"TIME", b"\x001230"));

		let tag = read(tag_bytes(3, 0, &body), &ParseContext::new());
		assert_eq!(tag.len(), 1);
		assert_eq!(tag.get("TDRC").unwrap().to_canonical_string(), "2004-05-06T12:30");
		assert_eq!(tag.year(), 2004);
	}

	#[test_log::test]
	fn id3v23_dates_without_conversions() {
		let mut body = v3_frame(b"TYER", b"\x002004");
		body.extend(v3_frame(b"TDAT", b"\x000605"));

		let ctx = ParseContext::new().options(ParseOptions::new().implicit_conversions(false));
		let tag = read(tag_bytes(3, 0, &body), &ctx);

		assert_eq!(tag.len(), 2);
		assert!(tag.get("TYER").is_some());
	}

	#[test_log::test]
	fn id3v23_genres_are_split() {
		let body = v3_frame(b"TCON", b"\x00(17)(RX)Refinement");
		let tag = read(tag_bytes(3, 0, &body), &ParseContext::new());

		let Some(Frame::Text(tcon)) = tag.get("TCON") else {
			panic!("expected a text frame");
		};
		assert_eq!(tcon.values, ["17", "RX", "Refinement"]);
	}

	#[test_log::test]
	fn genre_splitting() {
		let split = |s: &str| split_genre(CanonicalString::from(s));

		assert_eq!(split("Rock"), ["Rock"]);
		assert_eq!(split("(13)"), ["13"]);
		// The name of genre 17 is the refinement
		assert_eq!(split("(17)Rock"), ["Rock"]);
		assert_eq!(split("(CR)(4)"), ["CR", "4"]);
		assert_eq!(split("((Parenthesized"), ["(Parenthesized"]);
		assert_eq!(split("(unterminated"), ["(unterminated"]);
	}

	#[test_log::test]
	fn whole_tag_unsynchronisation() {
		// The frame size describes the resynchronised content
		let mut body = v3_frame(b"TIT2", b"\x00\xFF\x00ab");
		body[7] = 4;
		body.extend([0; 4]);

		let tag = read(tag_bytes(3, 0x80, &body), &ParseContext::new());
		assert_eq!(tag.title().units(), [0xFF, u16::from(b'a'), u16::from(b'b')]);
	}

	#[test_log::test]
	fn extended_header_is_skipped() {
		// ID3v2.3 extended header, 6 bytes after the size field
		let mut body = vec![0, 0, 0, 6, 0, 0, 0, 0, 0, 0];
		body.extend(v3_frame(b"TIT2", b"\x00Title"));

		let tag = read(tag_bytes(3, 0x40, &body), &ParseContext::new());
		assert_eq!(tag.extended_header().unwrap().size(), 10);
		assert_eq!(tag.title(), "Title");

		// Far too large
		let log = DiagnosticLog::new();
		let mut body = vec![0, 0, 0x10, 0];
		body.extend(v3_frame(b"TIT2", b"\x00Title"));
		let header = Id3v2Header::parse(&tag_bytes(3, 0x40, &body)).unwrap();
		let tag = Id3v2Tag::parse(header, &body, &ParseContext::new().diagnostics(&log));

		assert!(tag.extended_header().is_none());
		assert!(!log.is_empty());
	}

	#[test_log::test]
	fn duplicate_tags_become_padding() {
		let first = tag_bytes(3, 0, &v3_frame(b"TIT2", b"\x00First"));
		let second = tag_bytes(3, 0, &v3_frame(b"TIT2", b"\x00Second"));
		let declared = first.len() - 10;

		let mut file = first.clone();
		file.extend(&second);
		file.extend(&second);
		file.extend(b"audio");

		let log = DiagnosticLog::new();
		let tag = read(file, &ParseContext::new().diagnostics(&log));

		assert_eq!(tag.title(), "First");
		assert_eq!(tag.len(), 1);
		assert_eq!(tag.header().size() as usize, declared + 2 * second.len());
		assert!(log.contains("duplicate"));
	}

	#[test_log::test]
	fn truncated_tag_with_huge_size() {
		// Declares 32 MiB, twice the default allocation limit
		let mut file = b"ID3\x04\x00\x00\x10\x00\x00\x00".to_vec();
		file.extend(b"TIT2\x00\x00\x00\x04\x00\x00\x03Foo");

		let log = DiagnosticLog::new();
		let tag = read(file, &ParseContext::new().diagnostics(&log));

		assert_eq!(tag.state(), TagState::Parsed);
		assert_eq!(tag.title(), "Foo");
		assert!(log.contains("but only 14 remain"));
	}

	#[test_log::test]
	fn padding_before_footer() {
		let mut body = b"TIT2\x00\x00\x00\x04\x00\x00\x03Foo".to_vec();
		body.extend([0; 16]);
		// Never reached
		body.extend(b"TPE1\x00\x00\x00\x04\x00\x00\x03Bar");

		let mut file = tag_bytes(4, 0x10, &body);
		let mut footer = file[..10].to_vec();
		footer[..3].copy_from_slice(b"3DI");
		file.extend(footer);

		let log = DiagnosticLog::new();
		let tag = read(file, &ParseContext::new().diagnostics(&log));

		assert_eq!(tag.state(), TagState::Parsed);
		assert_eq!(tag.len(), 1);
		assert_eq!(tag.title(), "Foo");
		assert!(log.contains("padding and a footer"));
	}

	struct Korean;

	impl CharsetDetector for Korean {
		fn detect(&self, _: &[u8]) -> Option<(String, f32)> {
			Some((String::from("EUC-KR"), 0.99))
		}
	}

	#[test_log::test]
	fn smart_encoding() {
		// "가" in EUC-KR
		let body = v3_frame(b"TIT2", b"\x00\xB0\xA1");
		let bytes = tag_bytes(3, 0, &body);

		let tag = read(bytes.clone(), &ParseContext::new().charset_detector(&Korean));
		assert!(tag.detected_charset().is_none());
		assert_eq!(tag.title().units(), [0xB0, 0xA1]);

		let ctx = ParseContext::new()
			.options(ParseOptions::new().smart_encoding(true))
			.charset_detector(&Korean);
		let tag = read(bytes, &ctx);

		assert_eq!(tag.detected_charset(), Some(encoding_rs::EUC_KR));
		assert_eq!(tag.title(), "가");
	}
}
