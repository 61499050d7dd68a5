//! Relocation of class names, resource paths and source text.
//!
//! This module handles:
//! - Relocation rule construction and pattern normalization
//! - Deciding whether a rule applies to a path or class name
//! - Rewriting paths, class names and source text into the shaded namespace

pub mod classifier;
pub mod rewriter;
pub mod rule;

pub use classifier::PathFilter;
pub use rewriter::ESCAPE_TOKEN_DOLLAR;
pub use rule::{DEFAULT_SHADED_PREFIX, SimpleRelocator};

use crate::error::Result;
use std::fmt::Debug;

/// Capability consumed by archive processing: classify and rewrite names.
///
/// Implementations are immutable after construction and may be shared across
/// threads freely.
pub trait Relocator: Debug + Send + Sync {
	fn can_relocate_path(&self, path: &str) -> bool;

	fn can_relocate_class(&self, class: &str) -> bool;

	/// Rewrite a path previously accepted by `can_relocate_path`.
	fn relocate_path(&self, path: &str) -> Result<String>;

	/// Rewrite a class name previously accepted by `can_relocate_class`.
	fn relocate_class(&self, class: &str) -> Result<String>;

	fn apply_to_source_text(&self, text: &str) -> String;
}

impl Relocator for SimpleRelocator {
	fn can_relocate_path(&self, path: &str) -> bool {
		SimpleRelocator::can_relocate_path(self, path)
	}

	fn can_relocate_class(&self, class: &str) -> bool {
		SimpleRelocator::can_relocate_class(self, class)
	}

	fn relocate_path(&self, path: &str) -> Result<String> {
		SimpleRelocator::relocate_path(self, path)
	}

	fn relocate_class(&self, class: &str) -> Result<String> {
		SimpleRelocator::relocate_class(self, class)
	}

	fn apply_to_source_text(&self, text: &str) -> String {
		SimpleRelocator::apply_to_source_text(self, text)
	}
}

/// Ordered relocators; for paths and classes the first applicable one wins.
#[derive(Debug, Default)]
pub struct RelocatorSet {
	relocators: Vec<Box<dyn Relocator>>,
}

impl RelocatorSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, relocator: impl Relocator + 'static) {
		self.relocators.push(Box::new(relocator));
	}

	pub fn len(&self) -> usize {
		self.relocators.len()
	}

	pub fn is_empty(&self) -> bool {
		self.relocators.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &dyn Relocator> {
		self.relocators.iter().map(|r| r.as_ref())
	}

	/// Find the first relocator that accepts `path`.
	pub fn find_for_path(&self, path: &str) -> Option<&dyn Relocator> {
		self.iter().find(|r| r.can_relocate_path(path))
	}

	/// Find the first relocator that accepts `class`.
	pub fn find_for_class(&self, class: &str) -> Option<&dyn Relocator> {
		self.iter().find(|r| r.can_relocate_class(class))
	}

	/// Relocate `path` with the first applicable relocator, if any.
	pub fn map_path(&self, path: &str) -> Result<Option<String>> {
		self.find_for_path(path)
			.map(|r| r.relocate_path(path))
			.transpose()
	}

	/// Relocate `class` with the first applicable relocator, if any.
	pub fn map_class(&self, class: &str) -> Result<Option<String>> {
		self.find_for_class(class)
			.map(|r| r.relocate_class(class))
			.transpose()
	}

	/// Apply every relocator to `text`, in order.
	pub fn apply_to_source_text(&self, text: &str) -> String {
		self.iter().fold(text.to_string(), |content, relocator| {
			relocator.apply_to_source_text(&content)
		})
	}
}

impl FromIterator<SimpleRelocator> for RelocatorSet {
	fn from_iter<I: IntoIterator<Item = SimpleRelocator>>(iter: I) -> Self {
		let mut set = RelocatorSet::new();
		for relocator in iter {
			set.push(relocator);
		}
		set
	}
}
