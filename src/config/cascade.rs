use crate::config::parser::parse_ini_file;
use crate::config::types::{Document, LoadedSource};
use crate::error::{ConfigError, Result};
use std::path::PathBuf;
use tracing::debug;

/// Expand a glob pattern into the list of ini files to load.
///
/// Paths come back in glob expansion order. The first one is the primary
/// source, the rest are overlays.
pub fn discover_sources(pattern: &str) -> Result<Vec<PathBuf>> {
	let paths = glob::glob(pattern).map_err(|source| ConfigError::InvalidPattern {
		pattern: pattern.to_string(),
		source,
	})?;

	let files = paths
		.collect::<std::result::Result<Vec<_>, _>>()
		.map_err(|source| ConfigError::GlobFailed {
			pattern: pattern.to_string(),
			source,
		})?;

	if files.is_empty() {
		return Err(ConfigError::NoFilesMatched {
			pattern: pattern.to_string(),
		});
	}

	debug!(pattern, count = files.len(), "expanded ini file pattern");
	Ok(files)
}

/// Parse every source, failing on the first unreadable or malformed file.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<LoadedSource>> {
	paths
		.iter()
		.map(|path| {
			let document = parse_ini_file(path)?;
			debug!(path = %path.display(), sections = document.sections().count(), "parsed ini file");
			Ok(LoadedSource {
				document,
				path: path.clone(),
			})
		})
		.collect()
}

/// Merge sources into a single effective document.
///
/// Sources are layered in order, so keys in later files override same-named
/// keys from earlier ones within the same section.
pub fn merge_sources(sources: Vec<LoadedSource>) -> Document {
	let mut sources = sources.into_iter();
	let mut merged = match sources.next() {
		Some(primary) => primary.document,
		None => return Document::default(),
	};

	for overlay in sources {
		debug!(path = %overlay.path.display(), "overlaying ini file");
		merged.overlay(overlay.document);
	}

	merged
}

/// Convenience function to discover, load, and merge the files for a pattern.
///
/// Returns the matched paths alongside the merged document.
pub fn load_merged_document(pattern: &str) -> Result<(Vec<PathBuf>, Document)> {
	let paths = discover_sources(pattern)?;
	let sources = load_sources(&paths)?;
	Ok((paths, merge_sources(sources)))
}
