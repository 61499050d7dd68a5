use crate::error::{Result, ShadeError};
use crate::relocation::rule::{Matchers, SimpleRelocator};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

const CLASS_SUFFIX: &str = ".class";

/// Ordered, de-duplicated set of include or exclude globs over slash-separated paths.
///
/// `*` and `?` never cross a `/`; `**` spans any number of segments. Matching is
/// case-sensitive.
#[derive(Debug, Clone)]
pub struct PathFilter {
	patterns: Vec<String>,
	globs: GlobSet,
}

impl PathFilter {
	/// Normalize `patterns` to slash form and compile them.
	///
	/// A pattern ending in `/*` also contributes its parent directory, so that
	/// `org.foo.*` selects the package `org/foo` itself as well as its members.
	/// A trailing `/**` also matches zero segments, so `org/foo/**` accepts
	/// `org/foo`; that parent glob is compiled but not listed in `patterns()`.
	pub fn new(patterns: &[String]) -> Result<Self> {
		let mut normalized: Vec<String> = Vec::new();
		let mut push = |pattern: String| {
			if !normalized.contains(&pattern) {
				normalized.push(pattern);
			}
		};

		for pattern in patterns {
			let class_pattern = pattern.replace('.', "/");
			let package_pattern = class_pattern
				.strip_suffix("/*")
				.map(|parent| parent.to_string());
			push(class_pattern);
			if let Some(package_pattern) = package_pattern {
				push(package_pattern);
			}
		}

		let mut builder = GlobSetBuilder::new();
		for pattern in &normalized {
			builder.add(compile_glob(pattern)?);
			if let Some(parent) = pattern.strip_suffix("/**")
				&& !parent.is_empty()
			{
				builder.add(compile_glob(parent)?);
			}
		}
		let globs = builder.build().map_err(|source| ShadeError::InvalidGlob {
			pattern: normalized.join(", "),
			source,
		})?;

		Ok(PathFilter {
			patterns: normalized,
			globs,
		})
	}

	pub fn patterns(&self) -> &[String] {
		&self.patterns
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	/// Check if any glob matches `path`.
	pub fn is_match(&self, path: &str) -> bool {
		self.globs.is_match(path)
	}
}

fn compile_glob(pattern: &str) -> Result<Glob> {
	GlobBuilder::new(pattern)
		.literal_separator(true)
		.build()
		.map_err(|source| ShadeError::InvalidGlob {
			pattern: pattern.to_string(),
			source,
		})
}

impl SimpleRelocator {
	/// Check if this relocation applies to a resource path or class file path.
	///
	/// Raw relocations search their regular expression anywhere in `path`.
	/// Structured relocations strip a `.class` suffix, apply includes then
	/// excludes, and finally require `path` to start with the source path
	/// pattern, optionally after a single leading `/`.
	///
	/// The prefix test is literal: `com/foo` also accepts `com/foobar`.
	pub fn can_relocate_path(&self, path: &str) -> bool {
		if let Matchers::Raw { path: regex } = &self.matchers {
			return regex.is_match(path);
		}

		let path = path.strip_suffix(CLASS_SUFFIX).unwrap_or(path);

		if !self.is_included(path) || self.is_excluded(path) {
			return false;
		}

		// Resource loaders such as `getResource("/a/b/c.properties")` prepend a separator.
		path.starts_with(&self.path_pattern)
			|| path
				.strip_prefix('/')
				.is_some_and(|rest| rest.starts_with(&self.path_pattern))
	}

	/// Check if this relocation applies to a dotted class name.
	///
	/// Names containing `/` are already paths and are rejected, as is every
	/// name in raw mode.
	pub fn can_relocate_class(&self, class: &str) -> bool {
		!self.raw_string && !class.contains('/') && self.can_relocate_path(&class.replace('.', "/"))
	}

	fn is_included(&self, path: &str) -> bool {
		self.includes.is_empty() || self.includes.is_match(path)
	}

	fn is_excluded(&self, path: &str) -> bool {
		!self.excludes.is_empty() && self.excludes.is_match(path)
	}
}
