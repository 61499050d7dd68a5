use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig, RelocationWithSource};
use crate::error::{Result, ShadeError};
use crate::relocation::RelocatorSet;
use std::path::{Path, PathBuf};

/// File name looked up in each directory of the cascade.
pub const CONFIG_FILE_NAME: &str = ".shade.toml";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.shade.toml`
/// 2. If found and `root = true`, skip to user config only
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.shade.toml (unless disabled)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();

	for dir in start_dir.ancestors() {
		let config_path = dir.join(CONFIG_FILE_NAME);
		if !config_path.exists() {
			continue;
		}

		let config = parse_config_file(&config_path)?;
		tracing::debug!(path = %config_path.display(), "found config");

		if config.no_external_lookup {
			configs.push(LoadedConfig {
				config,
				path: config_path,
			});
			return Ok(configs);
		}

		let root = config.root;
		configs.push(LoadedConfig {
			config,
			path: config_path,
		});

		if root {
			break;
		}
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.shade.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	for loaded in existing_configs {
		if let Some(ref env_var) = loaded.config.user_config_lookup_disable_env_var
			&& is_env_truthy(env_var)
		{
			tracing::debug!(env_var = %env_var, "user config lookup disabled");
			return Ok(None);
		}
	}

	let path = user_config_path()?;
	if path.exists() && !existing_configs.iter().any(|loaded| loaded.path == path) {
		let config = parse_config_file(&path)?;
		Ok(Some(LoadedConfig { config, path }))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge multiple configs into a single effective config.
///
/// Relocations are collected in cascade order, so the most specific config's
/// relocations are consulted first.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs {
		merged
			.relocations
			.extend(loaded.config.relocations.iter().map(|relocation| {
				RelocationWithSource {
					relocation: relocation.clone(),
					source: loaded.path.clone(),
				}
			}));

		if loaded.config.no_external_lookup {
			merged.no_external_lookup = true;
		}
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Load a single config file without any cascade.
pub fn load_config_file(path: &Path) -> Result<MergedConfig> {
	let config = parse_config_file(path)?;
	Ok(merge_configs(&[LoadedConfig {
		config,
		path: path.to_path_buf(),
	}]))
}

/// Build relocators for every relocation in a merged config.
pub fn compile_relocations(config: &MergedConfig) -> Result<RelocatorSet> {
	let relocators = config
		.relocations
		.iter()
		.map(|rws| rws.relocation.compile())
		.collect::<Result<Vec<_>>>()?;
	tracing::debug!(count = relocators.len(), "compiled relocations");
	Ok(relocators.into_iter().collect())
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(ShadeError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	#[test]
	fn test_is_env_truthy() {
		// SAFETY: These env var operations are safe in single-threaded test context
		unsafe {
			std::env::remove_var("TEST_SHADE_ENV_1");
			assert!(!is_env_truthy("TEST_SHADE_ENV_1"));

			std::env::set_var("TEST_SHADE_ENV_2", "");
			assert!(!is_env_truthy("TEST_SHADE_ENV_2"));

			std::env::set_var("TEST_SHADE_ENV_3", "0");
			assert!(!is_env_truthy("TEST_SHADE_ENV_3"));

			std::env::set_var("TEST_SHADE_ENV_4", "FALSE");
			assert!(!is_env_truthy("TEST_SHADE_ENV_4"));

			std::env::set_var("TEST_SHADE_ENV_5", "no");
			assert!(!is_env_truthy("TEST_SHADE_ENV_5"));

			std::env::set_var("TEST_SHADE_ENV_6", "1");
			assert!(is_env_truthy("TEST_SHADE_ENV_6"));

			std::env::set_var("TEST_SHADE_ENV_7", "yes");
			assert!(is_env_truthy("TEST_SHADE_ENV_7"));

			for i in 1..=7 {
				std::env::remove_var(format!("TEST_SHADE_ENV_{}", i));
			}
		}
	}

	#[test]
	fn test_user_config_path() {
		let path = user_config_path().unwrap();
		assert!(path.ends_with(".shade.toml"));
	}

	#[test]
	fn test_cascade_collects_parent_configs() {
		let temp_dir = tempfile::tempdir().unwrap();
		let outer = temp_dir.path();
		let inner = outer.join("module");
		fs::create_dir(&inner).unwrap();

		fs::write(
			outer.join(CONFIG_FILE_NAME),
			"no-external-lookup = true\n[[relocations]]\npattern = \"org.outer\"\n",
		)
		.unwrap();
		fs::write(
			inner.join(CONFIG_FILE_NAME),
			"[[relocations]]\npattern = \"org.inner\"\n",
		)
		.unwrap();

		let configs = discover_configs(&inner).unwrap();
		assert_eq!(configs.len(), 2);
		assert_eq!(configs[0].path, inner.join(CONFIG_FILE_NAME));
		assert_eq!(configs[1].path, outer.join(CONFIG_FILE_NAME));

		let merged = merge_configs(&configs);
		assert!(merged.no_external_lookup);
		let patterns: Vec<_> = merged
			.relocations
			.iter()
			.map(|rws| rws.relocation.pattern.as_str())
			.collect();
		assert_eq!(patterns, ["org.inner", "org.outer"]);
	}

	#[test]
	fn test_no_external_lookup_uses_single_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let inner = temp_dir.path().join("module");
		fs::create_dir(&inner).unwrap();

		fs::write(
			temp_dir.path().join(CONFIG_FILE_NAME),
			"[[relocations]]\npattern = \"org.outer\"\n",
		)
		.unwrap();
		fs::write(
			inner.join(CONFIG_FILE_NAME),
			"no-external-lookup = true\n[[relocations]]\npattern = \"org.inner\"\n",
		)
		.unwrap();

		let configs = discover_configs(&inner).unwrap();
		assert_eq!(configs.len(), 1);
		assert_eq!(configs[0].config.relocations[0].pattern, "org.inner");
	}

	#[test]
	fn test_compile_relocations() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join(CONFIG_FILE_NAME);
		fs::write(
			&path,
			r#"
[[relocations]]
pattern = "org.old"
shaded_pattern = "org.shaded.old"

[[relocations]]
pattern = "v[0-9]+"
shaded_pattern = "vN"
raw_string = true
"#,
		)
		.unwrap();

		let merged = load_config_file(&path).unwrap();
		let relocators = compile_relocations(&merged).unwrap();
		assert_eq!(relocators.len(), 2);
		assert_eq!(
			relocators.map_class("org.old.Helper").unwrap(),
			Some("org.shaded.old.Helper".to_string())
		);
		assert_eq!(
			relocators.map_path("lib/v2/util").unwrap(),
			Some("lib/vN/util".to_string())
		);
	}

	#[test]
	fn test_load_config_file_invalid_regex() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join(CONFIG_FILE_NAME);
		fs::write(
			&path,
			"[[relocations]]\npattern = \"[broken\"\nshaded_pattern = \"x\"\nraw_string = true\n",
		)
		.unwrap();

		assert!(matches!(
			load_config_file(&path).unwrap_err(),
			ShadeError::InvalidRegex { .. }
		));
	}
}
