//! ID3v1 items
//!
//! tagkit does not read or write ID3v1 tags. The genre list is still shared with ID3v2, which
//! refers to it with numeric `TCON` values.

/// The ID3v1 genre list, including the Winamp extensions
///
/// The position of a genre is its numeric value.
pub const GENRES: [&str; 192] = [
	"Blues", "Classic rock", "Country", "Dance", "Disco", "Funk",
	"Grunge", "Hip-Hop", "Jazz", "Metal", "New Age", "Oldies",
	"Other", "Pop", "Rhythm and Blues", "Rap", "Reggae", "Rock",
	"Techno", "Industrial", "Alternative", "Ska", "Death metal", "Pranks",
	"Soundtrack", "Euro-Techno", "Ambient", "Trip-Hop", "Vocal", "Jazz & Funk",
	"Fusion", "Trance", "Classical", "Instrumental", "Acid", "House",
	"Game", "Sound clip", "Gospel", "Noise", "Alternative Rock", "Bass",
	"Soul", "Punk", "Space", "Meditative", "Instrumental Pop", "Instrumental Rock",
	"Ethnic", "Gothic", "Darkwave", "Techno-Industrial", "Electronic", "Pop-Folk",
	"Eurodance", "Dream", "Southern Rock", "Comedy", "Cult", "Gangsta",
	"Top 40", "Christian Rap", "Pop/Funk", "Jungle", "Native US", "Cabaret",
	"New Wave", "Psychedelic", "Rave", "Show tunes", "Trailer", "Lo-Fi",
	"Tribal", "Acid Punk", "Acid Jazz", "Polka", "Retro", "Musical",
	"Rock 'n Roll", "Hard Rock", "Folk", "Folk-Rock", "National Folk", "Swing",
	"Fast Fusion", "Bebop", "Latin", "Revival", "Celtic", "Bluegrass",
	"Avantgarde", "Gothic Rock", "Progressive Rock", "Psychedelic Rock", "Symphonic Rock", "Slow rock",
	"Big Band", "Chorus", "Easy Listening", "Acoustic", "Humour", "Speech",
	"Chanson", "Opera", "Chamber music", "Symphonia", "Symphony", "Booty bass",
	"Primus", "Porn groove", "Satire", "Slow jam", "Club", "Tango",
	"Samba", "Folklore", "Ballad", "Power ballad", "Rhythmic Soul", "Freestyle",
	"Duet", "Punk Rock", "Drum solo", "A cappella", "Euro-House", "Dance Hall",
	"Goa", "Drum & Bass", "Club-House", "Hardcore Techno", "Terror", "Indie",
	"BritPop", "Afro-Punk", "Polsk Punk", "Beat", "Christian Gangsta Rap", "Heavy Metal",
	"Black Metal", "Crossover", "Contemporary Christian", "Christian rock", "Merengue", "Salsa",
	"Thrash Metal", "Anime", "Jpop", "Synthpop", "Abstract", "Art Rock",
	"Baroque", "Bhangra", "Big beat", "Breakbeat", "Chillout", "Downtempo",
	"Dub", "EBM", "Eclectic", "Electro", "Electroclash", "Emo",
	"Experimental", "Garage", "Global", "IDM", "Illbient", "Industro-Goth",
	"Jam Band", "Krautrock", "Leftfield", "Lounge", "Math Rock", "New Romantic",
	"Nu-Breakz", "Post-Punk", "Post-Rock", "Psytrance", "Shoegaze", "Space Rock",
	"Trop Rock", "World Music", "Neoclassical", "Audiobook", "Audio theatre", "Neue Deutsche Welle",
	"Podcast", "Indie-Rock", "G-Funk", "Dubstep", "Garage Rock", "Psybient",
];

/// Get the genre name for a numeric value
///
/// # Examples
///
/// ```rust
/// use tagkit::id3::v1;
///
/// assert_eq!(v1::genre(17), Some("Rock"));
/// assert_eq!(v1::genre(200), None);
/// ```
pub fn genre(index: u8) -> Option<&'static str> {
	GENRES.get(usize::from(index)).copied()
}

/// Get the numeric value of a genre name, ignoring ASCII case
///
/// # Examples
///
/// ```rust
/// use tagkit::id3::v1;
///
/// assert_eq!(v1::genre_index("Pop"), Some(13));
/// assert_eq!(v1::genre_index("classic ROCK"), Some(1));
/// assert_eq!(v1::genre_index("Not a genre"), None);
/// ```
pub fn genre_index(name: &str) -> Option<u8> {
	GENRES
		.iter()
		.position(|genre| genre.eq_ignore_ascii_case(name))
		.and_then(|index| u8::try_from(index).ok())
}
