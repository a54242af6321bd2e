use std::collections::BTreeMap;

use derive_more::Deref;
use derive_more::DerefMut;
use serde::Deserialize;
use serde::Serialize;

/// A mapping from symbol name to its string value.
///
/// Used as the variable set for placeholder substitution and as the initial
/// definitions for the source filter. Ordered so that diagnostics list names
/// deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variables(
	#[deref]
	#[deref_mut]
	BTreeMap<String, String>,
);

impl Variables {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bind `name` to `value`, returning the previous value if there was one.
	pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.insert(name.into(), value.into())
	}

	pub fn is_defined(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Sorted variable names, used for diagnostics.
	pub fn names(&self) -> Vec<String> {
		self.0.keys().cloned().collect()
	}

	/// Parse a `NAME=VALUE` pair. A missing `=` defines `NAME` as the empty
	/// string, matching the `-DNAME` compiler convention.
	pub fn parse_definition(definition: &str) -> (String, String) {
		match definition.split_once('=') {
			Some((name, value)) => (name.to_string(), value.to_string()),
			None => (definition.to_string(), String::new()),
		}
	}
}

impl<K, V> FromIterator<(K, V)> for Variables
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(
			iter.into_iter()
				.map(|(name, value)| (name.into(), value.into()))
				.collect(),
		)
	}
}

impl<K, V, const N: usize> From<[(K, V); N]> for Variables
where
	K: Into<String>,
	V: Into<String>,
{
	fn from(entries: [(K, V); N]) -> Self {
		entries.into_iter().collect()
	}
}

impl Extend<(String, String)> for Variables {
	fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
		self.0.extend(iter);
	}
}

impl IntoIterator for Variables {
	type IntoIter = std::collections::btree_map::IntoIter<String, String>;
	type Item = (String, String);

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
