use crate::error::{Result, ShadeError};
use crate::relocation::rule::{Matchers, SimpleRelocator};
use regex::{NoExpand, Regex};

const TOKEN_DOLLAR: &str = "$";

/// Stand-in for `$` while a replacement passes through regex substitution,
/// where a bare `$` would be read as a capture group reference.
pub const ESCAPE_TOKEN_DOLLAR: &str = "__DOLLAR__";

/// How many matches a substitution rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Occurrence {
	First,
	All,
}

/// Escape every literal `$` in a replacement.
fn escape_substitution(replacement: &str) -> String {
	replacement.replace(TOKEN_DOLLAR, ESCAPE_TOKEN_DOLLAR)
}

/// Restore escaped dollars in a substitution result.
///
/// When `shaded` ends with `$`, another `$` is inserted right after the last
/// `separator` of the result, keeping synthetic outer markers adjacent to the
/// separator of nested names.
fn unescape_relocation_result(escaped: &str, shaded: &str, separator: char) -> String {
	let mut result = escaped.replace(ESCAPE_TOKEN_DOLLAR, TOKEN_DOLLAR);
	if shaded.ends_with(TOKEN_DOLLAR)
		&& let Some(index) = result.rfind(separator)
		&& index > 0
	{
		result.insert_str(index + 1, TOKEN_DOLLAR);
	}
	result
}

/// Run one substitution, returning `None` when `regex` does not match `input`.
fn substitute(regex: &Regex, input: &str, replacement: &str, occurrence: Occurrence) -> Option<String> {
	if !regex.is_match(input) {
		return None;
	}
	let replaced = match occurrence {
		Occurrence::First => regex.replacen(input, 1, replacement),
		Occurrence::All => regex.replace_all(input, replacement),
	};
	Some(replaced.into_owned())
}

impl SimpleRelocator {
	/// Rewrite a resource or class file path.
	///
	/// Structured relocations replace the first occurrence of the source path
	/// pattern; raw relocations replace every match of their expression. The
	/// caller is expected to have checked [`SimpleRelocator::can_relocate_path`].
	pub fn relocate_path(&self, path: &str) -> Result<String> {
		let (regex, occurrence) = match &self.matchers {
			Matchers::Structured { path: regex, .. } => (regex, Occurrence::First),
			Matchers::Raw { path: regex } => (regex, Occurrence::All),
		};
		self.rewrite(regex, path, &self.shaded_path_pattern, occurrence, '/')
	}

	/// Rewrite a dotted class name.
	///
	/// Raw relocations never apply to class names and always fail here.
	pub fn relocate_class(&self, class: &str) -> Result<String> {
		match &self.matchers {
			Matchers::Structured { class: regex, .. } => {
				self.rewrite(regex, class, &self.shaded_pattern, Occurrence::First, '.')
			}
			Matchers::Raw { .. } => Err(self.relocation_error(class)),
		}
	}

	/// Rewrite every word-anchored occurrence of the dotted pattern in source text.
	///
	/// Raw relocations return the text unchanged.
	pub fn apply_to_source_text(&self, text: &str) -> String {
		match &self.matchers {
			Matchers::Structured { source, .. } => source
				.replace_all(text, NoExpand(&self.shaded_pattern))
				.into_owned(),
			Matchers::Raw { .. } => text.to_string(),
		}
	}

	fn rewrite(
		&self,
		regex: &Regex,
		input: &str,
		shaded: &str,
		occurrence: Occurrence,
		separator: char,
	) -> Result<String> {
		let escaped = escape_substitution(shaded);
		let substituted = substitute(regex, input, &escaped, occurrence)
			.ok_or_else(|| self.relocation_error(input))?;
		Ok(unescape_relocation_result(&substituted, shaded, separator))
	}

	fn relocation_error(&self, input: &str) -> ShadeError {
		let (pattern, shaded_pattern) = if self.raw_string {
			(&self.path_pattern, &self.shaded_path_pattern)
		} else {
			(&self.pattern, &self.shaded_pattern)
		};
		ShadeError::Relocation {
			raw_string: self.raw_string,
			input: input.to_string(),
			pattern: pattern.clone(),
			shaded_pattern: shaded_pattern.clone(),
		}
	}
}
