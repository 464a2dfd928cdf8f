//! Configuration for config-cloner
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (~/.config/config-cloner/config.toml, or a .json/.json5 file)
//! 3. Environment variables (CONFIG_CLONER_* prefix)
//! 4. CLI flags (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CloneError;
use crate::validation::{validate_launcher, validate_timeout_secs, ValidationError, Validator};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CONFIG_CLONER_";

// ============================================================================
// MAIN CONFIGURATION STRUCT
// ============================================================================

/// Unified configuration for clone runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	/// Dry run mode - read sources, skip every create/update/delete
	pub dry_run: bool,

	/// Log level (trace, debug, info, warn, error) when RUST_LOG is unset
	pub log_level: String,

	/// How remote commands are issued
	pub cli: CliConfig,
}

impl Default for Config {
	fn default() -> Self {
		Config { dry_run: false, log_level: "info".to_string(), cli: CliConfig::default() }
	}
}

/// CLI client used as remote command transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CliConfig {
	/// Program and leading arguments, e.g. `java -jar jenkins-cli.jar`
	pub launcher: Vec<String>,

	/// Arguments inserted after `-s <endpoint>` (authentication and the like)
	pub extra_args: Vec<String>,

	/// Per-command timeout in seconds
	pub timeout_secs: u64,
}

impl Default for CliConfig {
	fn default() -> Self {
		CliConfig {
			launcher: vec!["java".to_string(), "-jar".to_string(), "jenkins-cli.jar".to_string()],
			extra_args: vec![],
			timeout_secs: 300,
		}
	}
}

impl Config {
	/// Default location of the configuration file
	pub fn default_path() -> Option<PathBuf> {
		std::env::var_os("XDG_CONFIG_HOME")
			.map(PathBuf::from)
			.or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
			.map(|dir| dir.join("config-cloner").join("config.toml"))
	}

	/// Load configuration from `path`, or from the default location.
	///
	/// A missing file at the default location is not an error; a missing
	/// explicitly named file is.
	pub fn load(path: Option<&Path>) -> Result<Self, CloneError> {
		let config = match path {
			Some(path) => Self::from_file(path)?,
			None => match Self::default_path() {
				Some(path) if path.exists() => Self::from_file(&path)?,
				_ => Config::default(),
			},
		};
		Ok(config.with_env(|name| std::env::var(name).ok()))
	}

	/// Parse a TOML file, or JSON5 for `.json`/`.json5` files
	pub fn from_file(path: &Path) -> Result<Self, CloneError> {
		let config_error =
			|message: String| CloneError::Config { path: path.display().to_string(), message };

		let contents = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
		match path.extension().and_then(|e| e.to_str()) {
			Some("json") | Some("json5") => {
				json5::from_str(&contents).map_err(|e| config_error(e.to_string()))
			}
			_ => toml::from_str(&contents).map_err(|e| config_error(e.to_string())),
		}
	}

	/// Apply `CONFIG_CLONER_*` overrides read through `lookup`
	pub fn with_env<F>(mut self, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

		if let Some(value) = var("DRY_RUN") {
			self.dry_run = matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
		}
		if let Some(value) = var("LAUNCHER") {
			self.cli.launcher = value.split_whitespace().map(str::to_string).collect();
		}
		if let Some(value) = var("TIMEOUT") {
			if let Ok(secs) = value.trim().parse() {
				self.cli.timeout_secs = secs;
			}
		}
		if let Some(value) = var("LOG_LEVEL") {
			self.log_level = value;
		}
		self
	}
}

impl Validator for Config {
	fn validate(&self) -> Result<(), ValidationError> {
		validate_launcher(&self.cli.launcher)?;
		validate_timeout_secs(self.cli.timeout_secs)
	}
}


// vim: ts=4
