//! Frame ID and description lookups for [`PropertyMap`](crate::properties::PropertyMap) keys

/// Text and URL frame IDs with a property key
///
/// The first entry of a key wins when mapping a key back to an ID.
const FRAME_KEYS: &[(&str, &str)] = &[
	// Text information frames
	("TALB", "ALBUM"),
	("TBPM", "BPM"),
	("TCOM", "COMPOSER"),
	("TCON", "GENRE"),
	("TCOP", "COPYRIGHT"),
	("TDEN", "ENCODINGTIME"),
	("TDLY", "PLAYLISTDELAY"),
	("TDOR", "ORIGINALDATE"),
	("TDRC", "DATE"),
	("TDRL", "RELEASEDATE"),
	("TDTG", "TAGGINGDATE"),
	("TENC", "ENCODEDBY"),
	("TEXT", "LYRICIST"),
	("TFLT", "FILETYPE"),
	("TIT1", "CONTENTGROUP"),
	("TIT2", "TITLE"),
	("TIT3", "SUBTITLE"),
	("TKEY", "INITIALKEY"),
	("TLAN", "LANGUAGE"),
	("TLEN", "LENGTH"),
	("TMED", "MEDIA"),
	("TMOO", "MOOD"),
	("TOAL", "ORIGINALALBUM"),
	("TOFN", "ORIGINALFILENAME"),
	("TOLY", "ORIGINALLYRICIST"),
	("TOPE", "ORIGINALARTIST"),
	("TOWN", "OWNER"),
	("TPE1", "ARTIST"),
	("TPE2", "ALBUMARTIST"),
	("TPE3", "CONDUCTOR"),
	("TPE4", "REMIXER"),
	("TPOS", "DISCNUMBER"),
	("TPRO", "PRODUCEDNOTICE"),
	("TPUB", "LABEL"),
	("TRCK", "TRACKNUMBER"),
	("TRSN", "RADIOSTATION"),
	("TRSO", "RADIOSTATIONOWNER"),
	("TSOA", "ALBUMSORT"),
	("TSOC", "COMPOSERSORT"),
	("TSOP", "ARTISTSORT"),
	("TSOT", "TITLESORT"),
	("TSO2", "ALBUMARTISTSORT"),
	("TSRC", "ISRC"),
	("TSSE", "ENCODING"),
	// ID3v2.3 dates, replaced by TDRC
	("TRDA", "DATE"),
	("TDAT", "DATE"),
	("TYER", "DATE"),
	("TIME", "DATE"),
	// URL link frames
	("WCOP", "COPYRIGHTURL"),
	("WOAF", "FILEWEBPAGE"),
	("WOAR", "ARTISTWEBPAGE"),
	("WOAS", "AUDIOSOURCEWEBPAGE"),
	("WORS", "RADIOSTATIONWEBPAGE"),
	("WPAY", "PAYMENTWEBPAGE"),
	("WPUB", "PUBLISHERWEBPAGE"),
	// Other frames
	("COMM", "COMMENT"),
	// iTunes
	("TCMP", "COMPILATION"),
	("PCST", "PODCAST"),
	("TCAT", "PODCASTCATEGORY"),
	("TDES", "PODCASTDESC"),
	("TGID", "PODCASTID"),
	("WFED", "PODCASTURL"),
	("MVNM", "MOVEMENTNAME"),
	("MVIN", "MOVEMENTNUMBER"),
	("GRP1", "GROUPING"),
];

/// `TXXX` descriptions with a property key other than the upper-cased description
const USER_TEXT_KEYS: &[(&str, &str)] = &[
	("MusicBrainz Album Id", "MUSICBRAINZ_ALBUMID"),
	("MusicBrainz Artist Id", "MUSICBRAINZ_ARTISTID"),
	("MusicBrainz Album Artist Id", "MUSICBRAINZ_ALBUMARTISTID"),
	("MusicBrainz Release Group Id", "MUSICBRAINZ_RELEASEGROUPID"),
	("MusicBrainz Work Id", "MUSICBRAINZ_WORKID"),
	("Acoustid Id", "ACOUSTID_ID"),
	("Acoustid Fingerprint", "ACOUSTID_FINGERPRINT"),
	("MusicIP PUID", "MUSICIP_PUID"),
];

/// `TIPL` roles and their property keys
const INVOLVED_PEOPLE: &[(&str, &str)] = &[
	("ARRANGER", "ARRANGER"),
	("ENGINEER", "ENGINEER"),
	("PRODUCER", "PRODUCER"),
	("DJ-MIX", "DJMIXER"),
	("MIX", "MIXER"),
];

/// The key prefix of `TMCL` entries
pub(crate) const INSTRUMENT_PREFIX: &str = "PERFORMER:";

pub(crate) const COMMENT_PREFIX: &str = "COMMENT:";
pub(crate) const LYRICS_PREFIX: &str = "LYRICS:";
pub(crate) const URL_PREFIX: &str = "URL:";

pub(crate) fn frame_id_to_key(id: &str) -> Option<&'static str> {
	FRAME_KEYS
		.iter()
		.find(|(frame_id, _)| *frame_id == id)
		.map(|(_, key)| *key)
}

pub(crate) fn key_to_frame_id(key: &str) -> Option<&'static str> {
	FRAME_KEYS
		.iter()
		.find(|(_, k)| *k == key)
		.map(|(frame_id, _)| *frame_id)
}

/// Map an upper-cased `TXXX` description to a property key
pub(crate) fn user_text_to_key(description: &str) -> String {
	USER_TEXT_KEYS
		.iter()
		.find(|(d, _)| d.eq_ignore_ascii_case(description))
		.map_or_else(|| description.to_ascii_uppercase(), |(_, key)| (*key).to_owned())
}

pub(crate) fn key_to_user_text(key: &str) -> &str {
	USER_TEXT_KEYS
		.iter()
		.find(|(_, k)| *k == key)
		.map_or(key, |(description, _)| *description)
}

pub(crate) fn involved_role_to_key(role: &str) -> Option<&'static str> {
	INVOLVED_PEOPLE
		.iter()
		.find(|(r, _)| *r == role)
		.map(|(_, key)| *key)
}

pub(crate) fn key_to_involved_role(key: &str) -> Option<&'static str> {
	INVOLVED_PEOPLE
		.iter()
		.find(|(_, k)| *k == key)
		.map(|(role, _)| *role)
}

#[cfg(test)]
mod tests {
	use super::{
		frame_id_to_key, involved_role_to_key, key_to_frame_id, key_to_involved_role,
		key_to_user_text, user_text_to_key,
	};

	#[test_log::test]
	fn dates_map_back_to_tdrc() {
		assert_eq!(frame_id_to_key("TYER"), Some("DATE"));
		assert_eq!(key_to_frame_id("DATE"), Some("TDRC"));
		assert_eq!(key_to_frame_id("COMMENT"), Some("COMM"));
		assert_eq!(key_to_frame_id("NOT A KEY"), None);
	}

	#[test_log::test]
	fn user_text_descriptions() {
		assert_eq!(user_text_to_key("MUSICBRAINZ ALBUM ID"), "MUSICBRAINZ_ALBUMID");
		assert_eq!(user_text_to_key("replaygain_track_gain"), "REPLAYGAIN_TRACK_GAIN");
		assert_eq!(key_to_user_text("MUSICBRAINZ_WORKID"), "MusicBrainz Work Id");
		assert_eq!(key_to_user_text("CUSTOM"), "CUSTOM");
	}

	#[test_log::test]
	fn involved_people() {
		assert_eq!(involved_role_to_key("DJ-MIX"), Some("DJMIXER"));
		assert_eq!(key_to_involved_role("MIXER"), Some("MIX"));
		assert_eq!(involved_role_to_key("SINGER"), None);
	}
}
