//! Error types and the critical diagnostic sink.
//!
//! `tracing::error!` with `severity = "critical"` is the CRITICAL level for
//! this crate: every fatal misconfiguration that isn't returned to the caller
//! goes through [`report`].

use std::path::PathBuf;

/// Library-level structured errors for iniconf.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Invalid ini file pattern: {pattern}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: glob::PatternError,
	},

	#[error("Failed to expand ini file pattern: {pattern}")]
	GlobFailed {
		pattern: String,
		#[source]
		source: glob::GlobError,
	},

	#[error("No ini files \"{pattern}\" found")]
	NoFilesMatched { pattern: String },

	#[error("Failed to read ini file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse ini file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: ini::ParseError,
	},

	#[error("The parameter \"{key}\" is undefined in sections {}", quote_sections(.sections))]
	MissingParameter { key: String, sections: Vec<String> },

	#[error("The parameter \"{key}\" has bad value \"{value}\" in section \"{section}\" (must be {expected})")]
	BadValue {
		key: String,
		section: String,
		value: String,
		expected: &'static str,
	},
}

/// Result type alias using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Render a fallback chain as `"a", "b", "c"`.
pub fn quote_sections(sections: &[String]) -> String {
	sections
		.iter()
		.map(|s| format!("\"{s}\""))
		.collect::<Vec<_>>()
		.join(", ")
}

/// Emit a critical diagnostic for an error, including its source chain.
pub fn report(err: &ConfigError) {
	let mut message = err.to_string();
	let mut source = std::error::Error::source(err);
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	tracing::error!(severity = "critical", "{message}");
}
