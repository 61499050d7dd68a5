//! Configuration loading and parsing for shade.
//!
//! This module handles:
//! - TOML config file parsing
//! - Directory cascade discovery
//! - Config merging and relocator compilation

pub mod cascade;
pub mod parser;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, compile_relocations, discover_configs, load_config_file,
	load_merged_config, merge_configs, user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use types::{Config, LoadedConfig, MergedConfig, Relocation, RelocationWithSource};

/// Template written by `shade --init`.
pub fn generate_init_template() -> String {
	r#"# shade configuration
#
# Relocations are tried in order; for class names and paths the first
# relocation that applies wins. Source text is rewritten by every relocation.

# Stop looking for .shade.toml files in parent directories.
root = true

# Skip ~/.shade.toml when this environment variable is truthy.
# user-config-lookup-disable-env-var = "CI"

[[relocations]]
pattern = "org.example.lib"
shaded_pattern = "org.example.shaded.lib"
# includes = ["org/example/lib/**"]
# excludes = ["org/example/lib/internal/**"]

# Raw relocations rewrite resource paths with a regular expression.
# [[relocations]]
# pattern = "META-INF/native/libexample"
# shaded_pattern = "META-INF/native/libshaded_example"
# raw_string = true
"#
	.to_string()
}
