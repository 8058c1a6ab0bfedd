//! Configuration file loading and parsing for iniconf.
//!
//! This module handles:
//! - INI file parsing via `rust-ini`
//! - Glob discovery of source files
//! - Overlay merging of multiple sources

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{discover_sources, load_merged_document, load_sources, merge_sources};
pub use parser::{parse_ini_file, parse_ini_str};
pub use types::{DEFAULT_SECTION, Document, LoadedSource, Section};
