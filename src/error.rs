use std::path::PathBuf;

/// Library-level structured errors for shade.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ShadeError {
	#[error("Invalid relocation for pattern '{pattern}': {reason}")]
	Configuration { pattern: String, reason: String },

	#[error("Invalid regex pattern in relocation: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid include/exclude glob: {pattern}")]
	InvalidGlob {
		pattern: String,
		#[source]
		source: globset::Error,
	},

	#[error(
		"Relocation failed: rawString={raw_string}, input={input}, pattern={pattern}, shadedPattern={shaded_pattern}"
	)]
	Relocation {
		raw_string: bool,
		input: String,
		pattern: String,
		shaded_pattern: String,
	},

	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using ShadeError.
pub type Result<T> = std::result::Result<T, ShadeError>;
