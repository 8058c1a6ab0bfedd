use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::path::PathBuf;

/// Section that holds keys appearing before any `[section]` header.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A named group of key/value pairs.
///
/// Entries keep their insertion order. Inserting an existing key replaces the
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
	name: String,
	entries: Vec<(String, String)>,
}

impl Section {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			entries: Vec::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Raw value for `key`, exactly as parsed.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.iter().any(|(k, _)| k == key)
	}

	/// Set `key`, overriding any earlier value for it.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((key, value)),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(k, _)| k.as_str())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn to_map(&self) -> HashMap<String, String> {
		self.entries.iter().cloned().collect()
	}
}

impl Serialize for Section {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (key, value) in &self.entries {
			map.serialize_entry(key, value)?;
		}
		map.end()
	}
}

/// A parsed configuration document: an ordered list of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
	sections: Vec<Section>,
}

impl Document {
	pub fn section(&self, name: &str) -> Option<&Section> {
		self.sections.iter().find(|s| s.name == name)
	}

	/// Get the named section, appending an empty one if it doesn't exist yet.
	pub fn section_mut(&mut self, name: &str) -> &mut Section {
		let index = match self.sections.iter().position(|s| s.name == name) {
			Some(index) => index,
			None => {
				self.sections.push(Section::new(name));
				self.sections.len() - 1
			}
		};
		&mut self.sections[index]
	}

	pub fn sections(&self) -> impl Iterator<Item = &Section> {
		self.sections.iter()
	}

	pub fn section_names(&self) -> impl Iterator<Item = &str> {
		self.sections.iter().map(|s| s.name.as_str())
	}

	pub fn is_empty(&self) -> bool {
		self.sections.iter().all(Section::is_empty)
	}

	/// Layer `other` on top of this document.
	///
	/// Keys from `other` override same-named keys within the same section;
	/// sections and keys new to this document are appended.
	pub fn overlay(&mut self, other: Document) {
		for section in other.sections {
			let target = self.section_mut(&section.name);
			for (key, value) in section.entries {
				target.insert(key, value);
			}
		}
	}
}

impl Serialize for Document {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.sections.len()))?;
		for section in &self.sections {
			map.serialize_entry(&section.name, section)?;
		}
		map.end()
	}
}

/// A parsed document together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedSource {
	/// The parsed document.
	pub document: Document,

	/// The path this document was loaded from.
	pub path: PathBuf,
}
