//! A format agnostic view of tag contents
//!
//! A [`PropertyMap`] maps upper-cased keys (`"TITLE"`, `"COMMENT:SOURCE"`, ...) to ordered lists
//! of values. Tags project their native items onto it with `properties()`, and accept a complete
//! desired state with `set_properties()`.
//!
//! Items that have no representation as a key/value pair are listed in
//! [`PropertyMap::unsupported_data`], so callers can at least report (or remove) them.
//!
//! # Examples
//!
//! ```rust
//! use tagkit::properties::PropertyMap;
//!
//! let mut properties = PropertyMap::new();
//! properties.insert("Artist", ["Foo"]);
//! properties.insert("ARTIST", ["Bar"]);
//!
//! let artists = properties.get("artist").unwrap();
//! assert_eq!(artists, ["Foo", "Bar"]);
//! ```

use crate::util::text::CanonicalString;

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt::{Display, Formatter};

/// A map of upper-cased keys to ordered lists of values
///
/// Iteration is sorted by key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyMap {
	map: BTreeMap<String, Vec<CanonicalString>>,
	unsupported: Vec<String>,
}

fn normalize_key(key: &str) -> Option<String> {
	if key.is_empty() {
		return None;
	}

	Some(key.to_ascii_uppercase())
}

impl PropertyMap {
	/// Create an empty `PropertyMap`
	pub fn new() -> Self {
		Self::default()
	}

	/// Append `values` to `key`
	///
	/// Returns `false` if the key is empty.
	pub fn insert<K, I, V>(&mut self, key: K, values: I) -> bool
	where
		K: AsRef<str>,
		I: IntoIterator<Item = V>,
		V: Into<CanonicalString>,
	{
		let Some(key) = normalize_key(key.as_ref()) else {
			return false;
		};

		self.map
			.entry(key)
			.or_default()
			.extend(values.into_iter().map(Into::into));
		true
	}

	/// Replace the values of `key`
	///
	/// Returns `false` if the key is empty.
	pub fn replace<K, I, V>(&mut self, key: K, values: I) -> bool
	where
		K: AsRef<str>,
		I: IntoIterator<Item = V>,
		V: Into<CanonicalString>,
	{
		let Some(key) = normalize_key(key.as_ref()) else {
			return false;
		};

		self.map
			.insert(key, values.into_iter().map(Into::into).collect());
		true
	}

	/// Get the values of `key`, ignoring ASCII case
	pub fn get(&self, key: &str) -> Option<&[CanonicalString]> {
		self.map
			.get(&key.to_ascii_uppercase())
			.map(Vec::as_slice)
	}

	/// Whether `key` is present, ignoring ASCII case
	pub fn contains_key(&self, key: &str) -> bool {
		self.map.contains_key(&key.to_ascii_uppercase())
	}

	/// Whether every key of `other` is present with exactly the same values
	///
	/// An empty `other` is always contained.
	pub fn contains(&self, other: &PropertyMap) -> bool {
		other
			.map
			.iter()
			.all(|(key, values)| self.map.get(key) == Some(values))
	}

	/// Remove every key of `other`, regardless of its values
	pub fn erase(&mut self, other: &PropertyMap) {
		for key in other.map.keys() {
			self.map.remove(key);
		}
	}

	/// Append every entry and unsupported item of `other`
	pub fn merge(&mut self, other: PropertyMap) {
		for (key, values) in other.map {
			self.map.entry(key).or_default().extend(values);
		}

		self.unsupported.extend(other.unsupported);
	}

	/// Remove a key, returning its values
	pub fn remove(&mut self, key: &str) -> Option<Vec<CanonicalString>> {
		self.map.remove(&key.to_ascii_uppercase())
	}

	/// Items that could not be represented as properties
	///
	/// The format of the entries depends on the tag, see
	/// [`Id3v2Tag::remove_unsupported_properties`](crate::id3::v2::Id3v2Tag::remove_unsupported_properties).
	pub fn unsupported_data(&self) -> &[String] {
		&self.unsupported
	}

	/// Record an item that could not be represented as properties
	pub fn push_unsupported(&mut self, item: impl Into<String>) {
		self.unsupported.push(item.into());
	}

	/// Whether the map has no keys
	///
	/// Unsupported items are not considered.
	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	/// The number of keys
	pub fn len(&self) -> usize {
		self.map.len()
	}

	/// Iterate over the keys and their values, sorted by key
	pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<CanonicalString>> {
		self.map.iter()
	}

	/// Iterate over the keys, sorted
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.map.keys().map(String::as_str)
	}

	/// Empty the map, including the unsupported items
	pub fn clear(&mut self) {
		self.map.clear();
		self.unsupported.clear();
	}
}

impl<'a> IntoIterator for &'a PropertyMap {
	type Item = (&'a String, &'a Vec<CanonicalString>);
	type IntoIter = btree_map::Iter<'a, String, Vec<CanonicalString>>;

	fn into_iter(self) -> Self::IntoIter {
		self.map.iter()
	}
}

impl IntoIterator for PropertyMap {
	type Item = (String, Vec<CanonicalString>);
	type IntoIter = btree_map::IntoIter<String, Vec<CanonicalString>>;

	fn into_iter(self) -> Self::IntoIter {
		self.map.into_iter()
	}
}

impl<K, V> FromIterator<(K, V)> for PropertyMap
where
	K: AsRef<str>,
	V: Into<CanonicalString>,
{
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		let mut map = Self::new();
		for (key, value) in iter {
			map.insert(key, [value]);
		}

		map
	}
}

impl Display for PropertyMap {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		for (key, values) in &self.map {
			write!(f, "{key}=")?;
			for (i, value) in values.iter().enumerate() {
				if i > 0 {
					f.write_str(", ")?;
				}
				write!(f, "{value}")?;
			}
			writeln!(f)?;
		}

		if !self.unsupported.is_empty() {
			writeln!(f, "Unsupported Data: {}", self.unsupported.join(", "))?;
		}

		Ok(())
	}
}
