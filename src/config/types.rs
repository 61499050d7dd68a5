use crate::error::{Result, ShadeError};
use crate::relocation::SimpleRelocator;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.shade.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop the directory cascade here; only ~/.shade.toml is added after it.
	#[serde(default)]
	pub root: bool,

	/// If true, use this file alone: no parent directories, no user config.
	#[serde(default)]
	pub no_external_lookup: bool,

	/// Environment variable name that, if truthy, skips ~/.shade.toml lookup.
	/// Useful for CI environments.
	#[serde(default)]
	pub user_config_lookup_disable_env_var: Option<String>,

	/// Relocations, in declaration order. For paths and classes the first
	/// applicable relocation wins.
	#[serde(default)]
	pub relocations: Vec<Relocation>,
}

/// One declared relocation mapping.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Relocation {
	/// Source namespace (`com.foo` or `com/foo`), or a regex when `raw_string` is set.
	#[serde(default)]
	pub pattern: String,

	/// Target namespace. Defaults to `hidden.<pattern>`; required when `raw_string` is set.
	pub shaded_pattern: Option<String>,

	/// Globs an entry must match for the relocation to apply.
	#[serde(default)]
	pub includes: Vec<String>,

	/// Globs that prevent the relocation from applying.
	#[serde(default)]
	pub excludes: Vec<String>,

	/// Treat `pattern` and `shaded_pattern` as a regex and its replacement,
	/// applied to resource paths only.
	#[serde(default)]
	pub raw_string: bool,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// All relocations from all configs, in cascade order.
	pub relocations: Vec<RelocationWithSource>,

	/// Whether external lookup is disabled (from any config in cascade).
	pub no_external_lookup: bool,
}

/// A relocation with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct RelocationWithSource {
	pub relocation: Relocation,

	/// The config file this relocation came from.
	pub source: PathBuf,
}

impl Relocation {
	/// Validate fields that cannot be checked by deserialization alone.
	pub fn validate(&self) -> Result<()> {
		if self.raw_string && self.shaded_pattern.is_none() {
			return Err(ShadeError::Configuration {
				pattern: self.pattern.clone(),
				reason: "raw_string requires shaded_pattern".to_string(),
			});
		}
		if self.raw_string {
			regex::Regex::new(&self.pattern).map_err(|source| ShadeError::InvalidRegex {
				pattern: self.pattern.clone(),
				source,
			})?;
		}
		Ok(())
	}

	/// Build the relocator described by this entry.
	pub fn compile(&self) -> Result<SimpleRelocator> {
		self.validate()?;
		SimpleRelocator::with_raw_string(
			&self.pattern,
			self.shaded_pattern.as_deref(),
			&self.includes,
			&self.excludes,
			self.raw_string,
		)
	}
}

impl Config {
	/// Validate all relocations in this config.
	pub fn validate(&self) -> Result<()> {
		for relocation in &self.relocations {
			relocation.validate()?;
		}
		Ok(())
	}
}
