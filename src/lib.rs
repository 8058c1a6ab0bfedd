//! iniconf - load glob-matched INI files and query typed parameters.
//!
//! This library provides:
//! - Glob discovery of one or more INI files, merged in match order
//! - Section enumeration and key existence checks
//! - Typed getters with defaults, mandatory keys, and section fallback chains
//!
//! # Example
//!
//! ```no_run
//! use iniconf::ConfigStore;
//!
//! let store = ConfigStore::load("/etc/myapp/*.ini").unwrap();
//!
//! // Look in [http] first, then fall back to [common]
//! let port = store.get_int("port", 8080, false, &["http", "common"]);
//! let host = store.resolve::<String>("host", String::new(), true, &["http", "common"]);
//!
//! match host {
//!     Ok(host) => println!("listening on {host}:{port}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

pub mod config;
pub mod error;
pub mod store;

pub use error::{ConfigError, Result};
pub use store::{BAD_FLOAT, BAD_INT, ConfigStore, Lookup, ParamValue};
