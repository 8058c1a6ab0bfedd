use crate::config::types::{DEFAULT_SECTION, Document};
use crate::error::{ConfigError, Result};
use ini::{Ini, ParseOption};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static INLINE_COMMENT_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m)(?:^|[ \t]+)[;#].*$").expect("valid inline comment regex"));

/// Fixed parse options: no escape processing, indented continuation lines.
///
/// Quotes are handled by `clean_value` so that comment characters inside a
/// quoted value survive inline comment stripping.
fn parse_options() -> ParseOption {
	ParseOption {
		enabled_quote: false,
		enabled_escape: false,
		enabled_indented_mutiline_value: true,
		..ParseOption::default()
	}
}

/// Parse an ini file from the given path.
pub fn parse_ini_file(path: &Path) -> Result<Document> {
	let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_ini_str(&content, path)
}

/// Parse an ini document from a string (useful for testing).
pub fn parse_ini_str(content: &str, path: &Path) -> Result<Document> {
	let ini = Ini::load_from_str_opt(content, parse_options()).map_err(|source| {
		ConfigError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		}
	})?;

	let mut document = Document::default();
	for (name, properties) in ini.iter() {
		// rust-ini always reports the general section, even when it's empty
		if name.is_none() && properties.is_empty() {
			continue;
		}

		let section = document.section_mut(name.unwrap_or(DEFAULT_SECTION));
		for (key, value) in properties.iter() {
			section.insert(key, clean_value(value));
		}
	}

	Ok(document)
}

/// Unquote a value wrapped in double quotes, otherwise strip inline comments.
///
/// Quotes only count when nothing but a comment follows the closing one.
fn clean_value(raw: &str) -> String {
	if let Some(rest) = raw.strip_prefix('"')
		&& let Some(end) = rest.find('"')
		&& INLINE_COMMENT_RE.replace_all(&rest[end + 1..], "").trim().is_empty()
	{
		return rest[..end].to_string();
	}

	INLINE_COMMENT_RE.replace_all(raw, "").into_owned()
}
