//! Optional TOML configuration for the demo binary.
//!
//! Looked up at `--config PATH` when given, otherwise at
//! `$XDG_CONFIG_HOME/switchpoint/config.toml` (or the platform equivalent) when
//! that file exists. Every field has a default; command-line flags override
//! whatever the file sets.
//!
//! ```toml
//! [scenario]
//! name = "site1"
//! first = "Foo"
//! second = "Bar"
//! invokes = 3
//! placeholder = "(null)"
//!
//! [bench]
//! times = 500000
//! rounds = 10
//! seed = 42
//! strategy = "both"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::cli::StrategyChoice;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The file is not valid TOML or does not match the schema.
	#[error("invalid configuration in {path}: {error}")]
	Parse {
		/// Path to the offending file.
		path: PathBuf,
		/// The underlying parse error.
		error: toml::de::Error,
	},
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Settings for `switchpoint scenario`.
	pub scenario: ScenarioConfig,
	/// Settings for `switchpoint bench`.
	pub bench: BenchConfig,
}

/// Settings for the invalidation scenario.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
	/// Constant name the call site looks up.
	pub name: String,
	/// Value stored before the first batch of invokes.
	pub first: String,
	/// Value stored after invalidation.
	pub second: String,
	/// Invokes per batch.
	pub invokes: usize,
	/// Value returned for a missing constant; `None` makes a miss an error.
	pub placeholder: Option<String>,
}

impl Default for ScenarioConfig {
	fn default() -> Self {
		Self {
			name: "site1".into(),
			first: "Foo".into(),
			second: "Bar".into(),
			invokes: 3,
			placeholder: Some("(null)".into()),
		}
	}
}

/// Settings for the dispatch benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
	/// Calls per timed run.
	pub times: u64,
	/// Number of rounds; each round times every selected strategy once.
	pub rounds: u32,
	/// RNG seed for argument generation; random when absent.
	pub seed: Option<u64>,
	/// Strategies to time.
	pub strategy: StrategyChoice,
}

impl Default for BenchConfig {
	fn default() -> Self {
		Self {
			times: 500_000,
			rounds: 10,
			seed: None,
			strategy: StrategyChoice::Both,
		}
	}
}

impl Config {
	/// Loads configuration from `explicit`, or from the default location if it exists.
	///
	/// An explicit path must exist; a missing default file yields defaults.
	pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
		match explicit {
			Some(path) => Self::from_file(path),
			None => match default_path().filter(|p| p.is_file()) {
				Some(path) => Self::from_file(&path),
				None => Ok(Self::default()),
			},
		}
	}

	/// Reads and parses a configuration file.
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::parse(&text).map_err(|error| ConfigError::Parse {
			path: path.to_path_buf(),
			error,
		})?;
		debug!(path = %path.display(), "loaded configuration");
		Ok(config)
	}

	/// Parses configuration from TOML text.
	pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(text)
	}
}

/// Default configuration file location.
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("switchpoint").join("config.toml"))
}
