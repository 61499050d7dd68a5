//! Shade - relocation of class names, resource paths and source text for shaded archives.
//!
//! This library provides the core functionality for shade, including:
//! - Relocation rules with include/exclude filtering and raw regex mode
//! - Class, path and source text rewriting
//! - Configuration file parsing and cascade discovery
//!
//! # Example
//!
//! ```
//! use shade_cli::relocation::SimpleRelocator;
//!
//! let relocator = SimpleRelocator::new("org.old", Some("org.shaded.old"), &[], &[]).unwrap();
//!
//! assert!(relocator.can_relocate_class("org.old.Helper"));
//! assert_eq!(
//!     relocator.relocate_class("org.old.Helper").unwrap(),
//!     "org.shaded.old.Helper"
//! );
//! assert_eq!(
//!     relocator.relocate_path("org/old/Helper.class").unwrap(),
//!     "org/shaded/old/Helper.class"
//! );
//! ```

pub mod config;
pub mod error;
pub mod relocation;

pub use error::{Result, ShadeError};
