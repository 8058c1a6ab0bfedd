//! The loaded configuration and its typed accessors.
//!
//! A [`ConfigStore`] is built once from a glob pattern and then queried by
//! reference. Lookups take an ordered fallback chain of section names and the
//! first section that defines the key wins.
//!
//! Two layers of accessors are provided:
//! - [`ConfigStore::lookup`] and [`ConfigStore::resolve`] return structured
//!   results so callers can decide how to react to a missing or bad value.
//! - `get_string`, `get_int`, `get_bool` and `get_float` never fail. They log
//!   a critical diagnostic and hand back a degraded value (zero, default or
//!   sentinel) instead.

pub mod value;

use crate::config::{Document, load_merged_document};
use crate::error::{ConfigError, Result, report};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use value::{BAD_FLOAT, BAD_INT, Lookup, ParamValue};

/// A loaded configuration document plus the sources it was built from.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
	pattern: String,
	sources: Vec<PathBuf>,
	document: Document,
}

impl ConfigStore {
	/// Load every file matching `pattern`.
	///
	/// The first matched file is the primary source. Each further match is
	/// layered on top, overriding same-named keys within a section.
	pub fn load(pattern: &str) -> Result<Self> {
		let (sources, document) = load_merged_document(pattern)?;
		debug!(pattern, sources = sources.len(), "loaded configuration");

		Ok(Self {
			pattern: pattern.to_string(),
			sources,
			document,
		})
	}

	/// Load `pattern`, logging any failure at critical instead of returning it.
	pub fn open(pattern: &str) -> Option<Self> {
		Self::load(pattern).map_err(|err| report(&err)).ok()
	}

	/// Wrap an already-built document.
	pub fn from_document(document: Document) -> Self {
		Self {
			document,
			..Self::default()
		}
	}

	/// Load the stored pattern again.
	///
	/// The document is only replaced when the whole load succeeds; on error
	/// the previous contents stay in place.
	pub fn reload(&mut self) -> Result<()> {
		let (sources, document) = load_merged_document(&self.pattern)?;
		self.sources = sources;
		self.document = document;
		debug!(pattern = %self.pattern, "reloaded configuration");
		Ok(())
	}

	/// The glob pattern this store was loaded from (empty for `from_document`).
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Matched files, primary first.
	pub fn sources(&self) -> &[PathBuf] {
		&self.sources
	}

	pub fn primary_source(&self) -> Option<&Path> {
		self.sources.first().map(PathBuf::as_path)
	}

	pub fn document(&self) -> &Document {
		&self.document
	}

	/// All raw key/value pairs of a section; empty if the section is unknown.
	pub fn section_values(&self, section: &str) -> HashMap<String, String> {
		self.document
			.section(section)
			.map(|s| s.to_map())
			.unwrap_or_default()
	}

	/// Keys of a section in the order they were defined.
	pub fn section_keys(&self, section: &str) -> Vec<String> {
		self.document
			.section(section)
			.map(|s| s.keys().map(str::to_string).collect())
			.unwrap_or_default()
	}

	/// Whether `section` exists and defines exactly `key`.
	pub fn has_param(&self, section: &str, key: &str) -> bool {
		self.document
			.section(section)
			.is_some_and(|s| s.contains_key(key))
	}

	/// The raw value of `key` from the first section in `sections` defining it.
	pub fn find<'a>(&'a self, key: &str, sections: &[&'a str]) -> Option<(&'a str, &'a str)> {
		sections.iter().find_map(|&name| {
			self.document
				.section(name)
				.and_then(|s| s.get(key))
				.map(|value| (name, value))
		})
	}

	/// Find `key` across `sections` and coerce it to `T`.
	pub fn lookup<'a, T: ParamValue>(&'a self, key: &str, sections: &[&'a str]) -> Lookup<'a, T> {
		match self.find(key, sections) {
			Some((section, raw)) => match T::parse_param(raw) {
				Some(value) => Lookup::Found { section, value },
				None => Lookup::Invalid { section, raw },
			},
			None => Lookup::Missing,
		}
	}

	/// Resolve `key` to a value, reporting missing and bad values as errors.
	///
	/// A missing key yields `default` unless `mandatory` is set.
	pub fn resolve<T: ParamValue>(
		&self,
		key: &str,
		default: T,
		mandatory: bool,
		sections: &[&str],
	) -> Result<T> {
		match self.lookup::<T>(key, sections) {
			Lookup::Found { value, .. } => Ok(value),
			Lookup::Invalid { section, raw } => Err(ConfigError::BadValue {
				key: key.to_string(),
				section: section.to_string(),
				value: raw.to_string(),
				expected: T::EXPECTED,
			}),
			Lookup::Missing if mandatory => Err(missing(key, sections)),
			Lookup::Missing => Ok(default),
		}
	}

	/// Trimmed string value; an empty string if a mandatory key is missing.
	pub fn get_string(&self, key: &str, default: &str, mandatory: bool, sections: &[&str]) -> String {
		self.resolve(key, default.to_string(), mandatory, sections)
			.unwrap_or_else(|err| degrade(&err, String::new(), String::new()))
	}

	/// Integer value; `0` if a mandatory key is missing, [`BAD_INT`] if the
	/// stored text isn't an integer.
	pub fn get_int(&self, key: &str, default: i64, mandatory: bool, sections: &[&str]) -> i64 {
		self.resolve(key, default, mandatory, sections)
			.unwrap_or_else(|err| degrade(&err, 0, BAD_INT))
	}

	/// Boolean value; `false` if a mandatory key is missing.
	///
	/// Unparsable text silently falls back to `default` without a diagnostic.
	pub fn get_bool(&self, key: &str, default: bool, mandatory: bool, sections: &[&str]) -> bool {
		match self.lookup::<bool>(key, sections) {
			Lookup::Found { value, .. } => value,
			Lookup::Invalid { .. } => default,
			Lookup::Missing if mandatory => {
				report(&missing(key, sections));
				false
			}
			Lookup::Missing => default,
		}
	}

	/// Float value; `0.0` if a mandatory key is missing, [`BAD_FLOAT`] if the
	/// stored text isn't a number.
	pub fn get_float(&self, key: &str, default: f64, mandatory: bool, sections: &[&str]) -> f64 {
		self.resolve(key, default, mandatory, sections)
			.unwrap_or_else(|err| degrade(&err, 0.0, BAD_FLOAT))
	}
}

fn missing(key: &str, sections: &[&str]) -> ConfigError {
	ConfigError::MissingParameter {
		key: key.to_string(),
		sections: sections.iter().map(|s| s.to_string()).collect(),
	}
}

/// Log `err` and pick the value handed back in its place.
fn degrade<T>(err: &ConfigError, when_missing: T, when_bad: T) -> T {
	report(err);
	match err {
		ConfigError::BadValue { .. } => when_bad,
		_ => when_missing,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parse_ini_str;

	fn store(content: &str) -> ConfigStore {
		let document = parse_ini_str(content, Path::new("test.ini")).unwrap();
		ConfigStore::from_document(document)
	}

	const SAMPLE: &str = r#"
[common]
name = common-name
port = 80
debug = yes
ratio = 0.5

[http]
port = 8080
greeting =   hello
timeout = soon
enabled = maybe
scale = wide
"#;

	#[test]
	fn test_present_key_beats_default() {
		let store = store(SAMPLE);

		assert_eq!(store.get_string("name", "def", false, &["common"]), "common-name");
		assert_eq!(store.get_int("port", 1, false, &["common"]), 80);
		assert!(store.get_bool("debug", false, false, &["common"]));
		assert_eq!(store.get_float("ratio", 9.0, false, &["common"]), 0.5);
	}

	#[test]
	fn test_absent_key_returns_default() {
		let store = store(SAMPLE);
		let chain = ["http", "common"];

		assert_eq!(store.get_string("missing", "def", false, &chain), "def");
		assert_eq!(store.get_int("missing", 7, false, &chain), 7);
		assert!(store.get_bool("missing", true, false, &chain));
		assert_eq!(store.get_float("missing", 1.5, false, &chain), 1.5);
	}

	#[test]
	fn test_first_match_wins() {
		let store = store(SAMPLE);

		assert_eq!(store.get_int("port", 0, false, &["http", "common"]), 8080);
		assert_eq!(store.get_int("port", 0, false, &["common", "http"]), 80);
		assert_eq!(store.find("port", &["nope", "http"]), Some(("http", "8080")));
	}

	#[test]
	fn test_fallback_to_later_section() {
		let store = store(SAMPLE);

		assert_eq!(store.get_string("name", "", true, &["http", "common"]), "common-name");
	}

	#[test]
	fn test_get_string_trims() {
		let store = ConfigStore::from_document({
			let mut doc = Document::default();
			doc.section_mut("main").insert("greeting", "  hello  ");
			doc
		});

		assert_eq!(store.get_string("greeting", "", false, &["main"]), "hello");
		assert_eq!(store.section_values("main")["greeting"], "  hello  ");
	}

	#[test]
	fn test_mandatory_missing_returns_zero_values() {
		let store = store(SAMPLE);
		let chain = ["http", "common"];

		assert_eq!(store.get_string("missing", "def", true, &chain), "");
		assert_eq!(store.get_int("missing", 7, true, &chain), 0);
		assert!(!store.get_bool("missing", true, true, &chain));
		assert_eq!(store.get_float("missing", 1.5, true, &chain), 0.0);
	}

	#[test]
	fn test_mandatory_missing_resolve_error() {
		let store = store(SAMPLE);

		match store.resolve::<i64>("missing", 0, true, &["http", "common"]).unwrap_err() {
			ConfigError::MissingParameter { key, sections } => {
				assert_eq!(key, "missing");
				assert_eq!(sections, vec!["http", "common"]);
			}
			other => panic!("Expected MissingParameter, got {other:?}"),
		}
	}

	#[test]
	fn test_bad_numbers_return_sentinels() {
		let store = store(SAMPLE);

		assert_eq!(store.get_int("timeout", 30, false, &["http"]), BAD_INT);
		assert_eq!(store.get_float("scale", 1.0, false, &["http"]), BAD_FLOAT);
		// Mandatory doesn't change the outcome for a present-but-bad value
		assert_eq!(store.get_int("timeout", 30, true, &["http"]), BAD_INT);
	}

	#[test]
	fn test_bad_number_resolve_error() {
		let store = store(SAMPLE);

		match store.resolve::<i64>("timeout", 30, false, &["http", "common"]).unwrap_err() {
			ConfigError::BadValue {
				key,
				section,
				value,
				expected,
			} => {
				assert_eq!(key, "timeout");
				assert_eq!(section, "http");
				assert_eq!(value, "soon");
				assert_eq!(expected, "int");
			}
			other => panic!("Expected BadValue, got {other:?}"),
		}
	}

	#[test]
	fn test_bad_bool_silently_uses_default() {
		let store = store(SAMPLE);

		assert!(store.get_bool("enabled", true, true, &["http"]));
		assert!(!store.get_bool("enabled", false, true, &["http"]));
		assert!(matches!(
			store.lookup::<bool>("enabled", &["http"]),
			Lookup::Invalid { section: "http", raw: "maybe" }
		));
	}

	#[test]
	fn test_stored_sentinel_is_indistinguishable_from_bad_value() {
		// Known quirk of the non-failing getters: a real -999999999 and a
		// parse failure return the same thing. Only lookup tells them apart.
		let store = store("[main]\nreal = -999999999\nbogus = x\n");

		assert_eq!(store.get_int("real", 0, false, &["main"]), BAD_INT);
		assert_eq!(store.get_int("bogus", 0, false, &["main"]), BAD_INT);

		assert_eq!(store.lookup::<i64>("real", &["main"]).value(), Some(BAD_INT));
		assert!(matches!(
			store.lookup::<i64>("bogus", &["main"]),
			Lookup::Invalid { .. }
		));
	}

	#[test]
	fn test_section_values() {
		let store = store(SAMPLE);
		let common = store.section_values("common");

		assert_eq!(common.len(), 4);
		assert_eq!(common["port"], "80");
		assert_eq!(
			store.section_keys("common"),
			vec!["name", "port", "debug", "ratio"]
		);
	}

	#[test]
	fn test_unknown_section_is_empty() {
		let store = store(SAMPLE);

		assert!(store.section_values("nope").is_empty());
		assert!(store.section_keys("nope").is_empty());
	}

	#[test]
	fn test_has_param() {
		let store = store(SAMPLE);

		assert!(store.has_param("http", "port"));
		assert!(!store.has_param("http", "name"));
		assert!(!store.has_param("nope", "port"));
		assert!(!store.has_param("http", "PORT"));
	}

	#[test]
	fn test_empty_chain_is_missing() {
		let store = store(SAMPLE);

		assert_eq!(store.get_int("port", 5, false, &[]), 5);
		assert!(store.lookup::<i64>("port", &[]).is_missing());
	}
}
