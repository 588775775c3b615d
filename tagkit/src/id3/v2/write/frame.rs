use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v1;
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::id3::v2::{Frame, FrameFlags, FrameId, Id3v2Version, TextInformationFrame};
use crate::diagnostics::DiagnosticListener;
use crate::macros::diag;
use crate::util::text::{CanonicalString, TextEncoding};

use std::borrow::Cow;
use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

pub(in crate::id3::v2) fn create_items<'a, W>(
	writer: &mut W,
	frames: impl IntoIterator<Item = &'a Frame>,
	version: Id3v2Version,
	diagnostics: &dyn DiagnosticListener,
) -> Result<()>
where
	W: Write,
{
	for frame in frames {
		if frame.id_str().len() != 4 || frame.id().is_outdated() {
			diag!(
				diagnostics,
				Debug,
				"Discarding frame {}, it has an outdated or unknown ID",
				frame.id_str()
			);
			continue;
		}

		if frame.flags().tag_alter_preservation {
			log::debug!(
				"Discarding frame {}, it is marked to be discarded on tag alteration",
				frame.id_str()
			);
			continue;
		}

		verify_frame(frame)?;

		if let Frame::Binary(binary) = frame {
			match binary.raw {
				Some(raw_version) if raw_version == version => {
					log::trace!("Writing raw frame {}", frame.id_str());
					write_frame_header(writer, frame.id_str(), binary.data.len(), frame.flags(), version)?;
					writer.write_all(&binary.data)?;
					continue;
				},
				Some(_) => {
					diag!(
						diagnostics,
						Warn,
						"Discarding frame {}, its raw content cannot be converted to ID3v2.{}",
						frame.id_str(),
						version.major()
					);
					continue;
				},
				None => {},
			}
		}

		let value = frame.as_bytes(version)?;
		if value.is_empty() {
			diag!(diagnostics, Debug, "Discarding empty frame {}", frame.id_str());
			continue;
		}

		write_frame(writer, frame.id_str(), frame.flags(), &value, version)?;
	}

	Ok(())
}

fn verify_frame(frame: &Frame) -> Result<()> {
	match (frame.id_str(), frame) {
		("USLT", Frame::UnsynchronizedText(_))
		| ("COMM", Frame::Comment(_))
		| ("TXXX", Frame::UserText(_))
		| ("WXXX", Frame::UserUrl(_))
		| ("OWNE", Frame::Ownership(_))
		| (_, Frame::Binary(_))
		| ("UFID", Frame::UniqueFileIdentifier(_))
		| ("WFED" | "GRP1" | "MVNM" | "MVIN" | "IPLS", Frame::Text { .. }) => Ok(()),
		(id, Frame::Text { .. }) if id.starts_with('T') => Ok(()),
		(id, Frame::Url(_)) if id.starts_with('W') => Ok(()),
		(id, frame_value) => Err(Id3v2Error::new(Id3v2ErrorKind::BadFrame(
			id.to_string(),
			frame_value.name(),
		))
		.into()),
	}
}

fn write_frame<W>(
	writer: &mut W,
	name: &str,
	flags: FrameFlags,
	value: &[u8],
	version: Id3v2Version,
) -> Result<()>
where
	W: Write,
{
	// The content is always written as is
	let flags = FrameFlags {
		encryption: None,
		..flags.for_plain_content()
	};

	let len = value.len() + usize::from(flags.grouping_identity.is_some());
	write_frame_header(writer, name, len, flags, version)?;

	if let Some(group) = flags.grouping_identity {
		writer.write_u8(group)?;
	}

	writer.write_all(value)?;

	Ok(())
}

fn write_frame_header<W>(
	writer: &mut W,
	name: &str,
	len: usize,
	flags: FrameFlags,
	version: Id3v2Version,
) -> Result<()>
where
	W: Write,
{
	let len = u32::try_from(len).map_err(|_| Id3v2Error::new(Id3v2ErrorKind::BadFrameLength))?;

	writer.write_all(name.as_bytes())?;
	match version {
		Id3v2Version::V3 => {
			writer.write_u32::<BigEndian>(len)?;
			writer.write_u16::<BigEndian>(flags.as_id3v23_bytes())?;
		},
		_ => {
			writer.write_u32::<BigEndian>(len.synch()?)?;
			writer.write_u16::<BigEndian>(flags.as_id3v24_bytes())?;
		},
	}

	Ok(())
}

// Frames introduced in ID3v2.4
// iTunes reads TSOA, TSOT and TSOP from ID3v2.3, so those are kept
const FRAMES_TO_DISCARD: &[&str] = &[
	"ASPI", "EQU2", "RVA2", "SEEK", "SIGN", "TDRL", "TDTG", "TMOO", "TPRO", "TSST",
];

/// Convert the frames of an ID3v2.4 tag into their ID3v2.3 counterparts
///
/// Frames without a counterpart are dropped. The replacements of `TDOR`, `TDRC`, `TIPL`/`TMCL`
/// and `TCON` are appended after the remaining frames.
pub(in crate::id3::v2) fn downgrade_frames<'a>(
	frames: &'a [Frame],
	diagnostics: &dyn DiagnosticListener,
) -> Vec<Cow<'a, Frame>> {
	let mut tdor = None;
	let mut tdrc = None;
	let mut tipl = None;
	let mut tmcl = None;
	let mut tcon = None;

	let mut downgraded = Vec::with_capacity(frames.len());
	for frame in frames {
		let id = frame.id_str();
		if FRAMES_TO_DISCARD.contains(&id) {
			diag!(
				diagnostics,
				Debug,
				"Discarding frame {id}, not supported in ID3v2.3"
			);
			continue;
		}

		let text = match frame {
			Frame::Text(text) => Some(text),
			_ => None,
		};

		match id {
			"TDOR" => tdor = text,
			"TDRC" => tdrc = text,
			"TIPL" => tipl = text,
			"TMCL" => tmcl = text,
			"TCON" => tcon = text,
			_ => downgraded.push(Cow::Borrowed(frame)),
		}
	}

	let mut push = |id: &'static str, values: Vec<CanonicalString>| {
		downgraded.push(Cow::Owned(Frame::Text(TextInformationFrame::new(
			FrameId::from_static(id),
			TextEncoding::Latin1,
			values,
		))));
	};

	// TORY (Original release year) is the only component of TDOR that is supported in ID3v2.3
	if let Some(tdor) = tdor {
		let content = Frame::Text(tdor.clone()).to_canonical_string();
		if content.len() >= 4 {
			push("TORY", vec![substr(&content, 0, 4)]);
		}
	}

	// YYYY-MM-DDTHH:MM into TYER, TDAT and TIME
	if let Some(tdrc) = tdrc {
		let content = Frame::Text(tdrc.clone()).to_canonical_string();
		let is = |pos: usize, c: u8| content.units().get(pos) == Some(&u16::from(c));

		if content.len() >= 4 {
			push("TYER", vec![substr(&content, 0, 4)]);

			if content.len() >= 10 && is(4, b'-') && is(7, b'-') {
				// DDMM
				let date = substr(&content, 8, 2).concat(&substr(&content, 5, 2));
				push("TDAT", vec![date]);

				if content.len() >= 16 && is(10, b'T') && is(13, b':') {
					// HHMM
					let time = substr(&content, 11, 2).concat(&substr(&content, 14, 2));
					push("TIME", vec![time]);
				}
			}
		}
	}

	// ID3v2.3 only has IPLS for both people lists
	if tipl.is_some() || tmcl.is_some() {
		let people = [tmcl, tipl]
			.into_iter()
			.flatten()
			.flat_map(|frame| frame.values.chunks_exact(2).flatten().cloned())
			.collect();

		push("IPLS", people);
	}

	// ID3v2.3 genres are a single string, numeric genres go in parentheses
	if let Some(tcon) = tcon {
		push("TCON", vec![CanonicalString::from(combine_genres(&tcon.values))]);
	}

	downgraded
}

fn combine_genres(genres: &[CanonicalString]) -> String {
	let has_multiple_genres = genres.len() > 1;

	let mut combined = String::new();
	let mut refinement = None;
	for genre in genres {
		let text = genre.to_string_lossy();
		if matches!(genre.to_int(), Some(0..=255)) || text == "RX" || text == "CR" {
			combined.push_str(&format!("({text})"));
			continue;
		}

		// Only the first genre without an ID3v1 number can be kept, as the refinement
		match v1::genre_index(&text) {
			Some(index) if has_multiple_genres => combined.push_str(&format!("({index})")),
			_ => {
				refinement.get_or_insert(text);
			},
		}
	}

	if let Some(refinement) = refinement {
		combined.push_str(&refinement);
	}

	combined
}

fn substr(value: &CanonicalString, start: usize, len: usize) -> CanonicalString {
	let units = value.units();
	let start = start.min(units.len());
	let end = (start + len).min(units.len());
	CanonicalString::from_units(units[start..end].to_vec())
}
