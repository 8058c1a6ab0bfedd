use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use iniconf::ConfigStore;
use iniconf::config::Document;
use iniconf::store::ParamValue;

#[derive(Parser)]
#[command(name = "iniconf")]
#[command(
	author,
	version,
	about = "Query typed parameters from glob-matched INI files"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Glob pattern of the ini files to load (first match is primary)
	#[arg(short, long, global = true, env = "INICONF_FILE", value_name = "PATTERN")]
	config: Option<String>,

	/// Enable verbose logging (sets log level to DEBUG)
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Display the merged configuration with its source files
	Show {
		/// Print as JSON instead of ini text
		#[arg(long)]
		json: bool,
	},
	/// Resolve a parameter across a section fallback chain
	Get(GetArgs),
	/// Check whether a section defines a key (exit code 1 if not)
	Has { section: String, key: String },
	/// Check that the ini files load without errors
	Validate,
}

#[derive(Args)]
struct GetArgs {
	/// Parameter name
	key: String,

	/// Section to search, in order; repeat for a fallback chain
	#[arg(short, long = "section", value_name = "SECTION", required = true)]
	sections: Vec<String>,

	/// Type to coerce the value to
	#[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::String)]
	value_type: ValueType,

	/// Value to use when no section defines the key
	#[arg(short, long)]
	default: Option<String>,

	/// Report the key as undefined when no section defines it
	#[arg(short, long)]
	mandatory: bool,

	/// Fail instead of printing a degraded value for missing or bad parameters
	#[arg(long)]
	strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ValueType {
	String,
	Int,
	Bool,
	Float,
}

#[derive(Serialize)]
struct ShowOutput<'a> {
	sources: &'a [PathBuf],
	sections: &'a Document,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	let pattern = cli.config.as_deref();
	match cli.command {
		Commands::Show { json } => handle_show(&load_store(pattern)?, json),
		Commands::Get(args) => handle_get(&load_store(pattern)?, &args),
		Commands::Has { section, key } => handle_has(&load_store(pattern)?, &section, &key),
		Commands::Validate => handle_validate(pattern),
	}
}

fn init_tracing(verbose: bool) {
	// RUST_LOG in the environment always takes precedence
	let level = if verbose { Level::DEBUG } else { Level::WARN };
	let filter = EnvFilter::from_default_env().add_directive(level.into());
	let _ = tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr))
		.with(filter)
		.try_init();
}

fn require_pattern(pattern: Option<&str>) -> Result<&str> {
	pattern.context("No ini file pattern given (use --config or INICONF_FILE)")
}

fn load_store(pattern: Option<&str>) -> Result<ConfigStore> {
	let pattern = require_pattern(pattern)?;
	ConfigStore::load(pattern)
		.with_context(|| format!("Failed to load configuration from {pattern}"))
}

fn handle_show(store: &ConfigStore, json: bool) -> Result<ExitCode> {
	if json {
		let output = ShowOutput {
			sources: store.sources(),
			sections: store.document(),
		};
		let text = serde_json::to_string_pretty(&output).context("Failed to serialize configuration")?;
		println!("{text}");
		return Ok(ExitCode::SUCCESS);
	}

	for (i, source) in store.sources().iter().enumerate() {
		let role = if i == 0 { "primary" } else { "overlay" };
		println!("# Source: {} ({role})", source.display());
	}

	for section in store.document().sections() {
		println!();
		println!("[{}]", section.name());
		for (key, value) in section.iter() {
			println!("{key} = {}", value.replace('\n', "\n    "));
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_get(store: &ConfigStore, args: &GetArgs) -> Result<ExitCode> {
	let sections: Vec<&str> = args.sections.iter().map(String::as_str).collect();

	let value = if args.strict {
		match args.value_type {
			ValueType::String => resolve_strict::<String>(store, args, &sections)?,
			ValueType::Int => resolve_strict::<i64>(store, args, &sections)?,
			ValueType::Bool => resolve_strict::<bool>(store, args, &sections)?,
			ValueType::Float => resolve_strict::<f64>(store, args, &sections)?,
		}
	} else {
		let key = args.key.as_str();
		match args.value_type {
			ValueType::String => {
				let default = args.default.as_deref().unwrap_or_default();
				store.get_string(key, default, args.mandatory, &sections)
			}
			ValueType::Int => {
				let default = parse_default::<i64>(args.default.as_deref())?;
				store.get_int(key, default, args.mandatory, &sections).to_string()
			}
			ValueType::Bool => {
				let default = parse_default::<bool>(args.default.as_deref())?;
				store.get_bool(key, default, args.mandatory, &sections).to_string()
			}
			ValueType::Float => {
				let default = parse_default::<f64>(args.default.as_deref())?;
				store.get_float(key, default, args.mandatory, &sections).to_string()
			}
		}
	};

	println!("{value}");
	Ok(ExitCode::SUCCESS)
}

fn resolve_strict<T: ParamValue + Default + ToString>(
	store: &ConfigStore,
	args: &GetArgs,
	sections: &[&str],
) -> Result<String> {
	let default = parse_default::<T>(args.default.as_deref())?;
	let value = store.resolve(&args.key, default, args.mandatory, sections)?;
	Ok(value.to_string())
}

fn parse_default<T: ParamValue + Default>(raw: Option<&str>) -> Result<T> {
	match raw {
		Some(raw) => T::parse_param(raw)
			.with_context(|| format!("Invalid --default {raw:?} (must be {})", T::EXPECTED)),
		None => Ok(T::default()),
	}
}

fn handle_has(store: &ConfigStore, section: &str, key: &str) -> Result<ExitCode> {
	let present = store.has_param(section, key);
	println!("{present}");
	Ok(if present {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	})
}

fn handle_validate(pattern: Option<&str>) -> Result<ExitCode> {
	let pattern = require_pattern(pattern)?;

	// Failures are logged by `open` itself
	let Some(store) = ConfigStore::open(pattern) else {
		eprintln!("Configuration is invalid: {pattern}");
		return Ok(ExitCode::FAILURE);
	};

	println!("All ini files are valid:");
	for source in store.sources() {
		println!("  {}", source.display());
	}
	println!(
		"{} sections after merge",
		store.document().sections().count()
	);

	Ok(ExitCode::SUCCESS)
}
