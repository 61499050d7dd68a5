use crate::error::{Result, ShadeError};
use crate::relocation::classifier::PathFilter;
use regex::Regex;

/// Namespace segment prefixed to the source pattern when no shaded pattern is given.
pub const DEFAULT_SHADED_PREFIX: &str = "hidden";

/// Compiled matchers for one relocation, chosen by mode at construction time.
#[derive(Debug, Clone)]
pub(crate) enum Matchers {
	/// Literal prefix relocation over dotted and slash-separated names.
	Structured {
		path: Regex,
		class: Regex,
		source: Regex,
	},

	/// Regular expression relocation applied to resource paths only.
	Raw { path: Regex },
}

/// A single relocation rule: source namespace, shaded namespace and filters.
///
/// Both separator conventions of the source and shaded patterns are derived
/// once here and never change afterwards, so the dotted and slash forms cannot
/// drift apart. All queries take `&self` and the value is `Send + Sync`.
#[derive(Debug, Clone)]
pub struct SimpleRelocator {
	pub(crate) pattern: String,
	pub(crate) path_pattern: String,
	pub(crate) shaded_pattern: String,
	pub(crate) shaded_path_pattern: String,
	pub(crate) includes: PathFilter,
	pub(crate) excludes: PathFilter,
	pub(crate) raw_string: bool,
	pub(crate) matchers: Matchers,
}

impl SimpleRelocator {
	/// Build a structured relocation.
	///
	/// `pattern` may use either `.` or `/` as separator; an empty pattern matches
	/// everything. Without a `shaded_pattern` the rule relocates into
	/// `hidden.<pattern>`.
	pub fn new(
		pattern: &str,
		shaded_pattern: Option<&str>,
		includes: &[String],
		excludes: &[String],
	) -> Result<Self> {
		Self::with_raw_string(pattern, shaded_pattern, includes, excludes, false)
	}

	/// Build a relocation, selecting raw regular expression mode with `raw_string`.
	///
	/// In raw mode `pattern` is a regular expression searched anywhere in a
	/// path and `shaded_pattern` is required; it is the replacement text.
	pub fn with_raw_string(
		pattern: &str,
		shaded_pattern: Option<&str>,
		includes: &[String],
		excludes: &[String],
		raw_string: bool,
	) -> Result<Self> {
		let includes = PathFilter::new(includes)?;
		let excludes = PathFilter::new(excludes)?;

		if raw_string {
			let shaded = shaded_pattern.ok_or_else(|| ShadeError::Configuration {
				pattern: pattern.to_string(),
				reason: "raw string relocation requires a shaded pattern".to_string(),
			})?;

			return Ok(SimpleRelocator {
				pattern: String::new(),
				path_pattern: pattern.to_string(),
				shaded_pattern: String::new(),
				shaded_path_pattern: shaded.to_string(),
				includes,
				excludes,
				raw_string,
				matchers: Matchers::Raw {
					path: compile_regex(pattern)?,
				},
			});
		}

		let dotted = pattern.replace('/', ".");
		let path_pattern = pattern.replace('.', "/");

		let (shaded_pattern, shaded_path_pattern) = match shaded_pattern {
			Some(shaded) => (shaded.replace('/', "."), shaded.replace('.', "/")),
			None => (
				format!("{DEFAULT_SHADED_PREFIX}.{dotted}"),
				format!("{DEFAULT_SHADED_PREFIX}/{path_pattern}"),
			),
		};

		let matchers = Matchers::Structured {
			path: compile_regex(&regex::escape(&path_pattern))?,
			class: compile_regex(&regex::escape(&dotted))?,
			source: compile_regex(&format!(r"\b{}", regex::escape(&dotted)))?,
		};

		Ok(SimpleRelocator {
			pattern: dotted,
			path_pattern,
			shaded_pattern,
			shaded_path_pattern,
			includes,
			excludes,
			raw_string,
			matchers,
		})
	}

	/// Dotted form of the source namespace. Empty in raw mode.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Slash form of the source namespace, or the regular expression in raw mode.
	pub fn path_pattern(&self) -> &str {
		&self.path_pattern
	}

	/// Dotted form of the shaded namespace. Empty in raw mode.
	pub fn shaded_pattern(&self) -> &str {
		&self.shaded_pattern
	}

	/// Slash form of the shaded namespace, or the replacement text in raw mode.
	pub fn shaded_path_pattern(&self) -> &str {
		&self.shaded_path_pattern
	}

	/// Normalized include globs, in declaration order.
	pub fn includes(&self) -> &[String] {
		self.includes.patterns()
	}

	/// Normalized exclude globs, in declaration order.
	pub fn excludes(&self) -> &[String] {
		self.excludes.patterns()
	}

	pub fn is_raw_string(&self) -> bool {
		self.raw_string
	}
}

fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| ShadeError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_shaded_pattern() {
		let relocator = SimpleRelocator::new("com.foo", None, &[], &[]).unwrap();
		assert_eq!(relocator.pattern(), "com.foo");
		assert_eq!(relocator.path_pattern(), "com/foo");
		assert_eq!(relocator.shaded_pattern(), "hidden.com.foo");
		assert_eq!(relocator.shaded_path_pattern(), "hidden/com/foo");
	}

	#[test]
	fn test_slash_separated_patterns_are_normalized() {
		let relocator =
			SimpleRelocator::new("org/old", Some("org/shaded/old"), &[], &[]).unwrap();
		assert_eq!(relocator.pattern(), "org.old");
		assert_eq!(relocator.path_pattern(), "org/old");
		assert_eq!(relocator.shaded_pattern(), "org.shaded.old");
		assert_eq!(relocator.shaded_path_pattern(), "org/shaded/old");
	}

	#[test]
	fn test_empty_pattern_defaults() {
		let relocator = SimpleRelocator::new("", None, &[], &[]).unwrap();
		assert_eq!(relocator.pattern(), "");
		assert_eq!(relocator.path_pattern(), "");
		assert_eq!(relocator.shaded_pattern(), "hidden.");
		assert_eq!(relocator.shaded_path_pattern(), "hidden/");
	}

	#[test]
	fn test_wildcard_include_adds_package_pattern() {
		let includes = vec!["org.foo.*".to_string(), "org.bar.Baz".to_string()];
		let excludes = vec!["org/foo/internal/*".to_string()];
		let relocator = SimpleRelocator::new("org.foo", None, &includes, &excludes).unwrap();
		assert_eq!(relocator.includes(), ["org/foo/*", "org/foo", "org/bar/Baz"]);
		assert_eq!(relocator.excludes(), ["org/foo/internal/*", "org/foo/internal"]);
	}

	#[test]
	fn test_raw_string_keeps_patterns_verbatim() {
		let relocator =
			SimpleRelocator::with_raw_string(r"v[0-9]+", Some("vN"), &[], &[], true).unwrap();
		assert!(relocator.is_raw_string());
		assert_eq!(relocator.path_pattern(), "v[0-9]+");
		assert_eq!(relocator.shaded_path_pattern(), "vN");
		assert_eq!(relocator.pattern(), "");
		assert_eq!(relocator.shaded_pattern(), "");
	}

	#[test]
	fn test_raw_string_invalid_regex() {
		let result = SimpleRelocator::with_raw_string("[invalid", Some("x"), &[], &[], true);
		match result.unwrap_err() {
			ShadeError::InvalidRegex { pattern, .. } => assert_eq!(pattern, "[invalid"),
			other => panic!("Expected InvalidRegex error, got {other:?}"),
		}
	}

	#[test]
	fn test_raw_string_requires_shaded_pattern() {
		let result = SimpleRelocator::with_raw_string("META-INF", None, &[], &[], true);
		assert!(matches!(
			result.unwrap_err(),
			ShadeError::Configuration { .. }
		));
	}

	#[test]
	fn test_structured_pattern_with_regex_metacharacters_compiles() {
		let relocator = SimpleRelocator::new("com.foo[1]", None, &[], &[]);
		assert!(relocator.is_ok());
	}
}
