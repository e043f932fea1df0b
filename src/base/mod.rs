//! Foundation types for declaration analysis.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Interned file identifiers
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`Deferred`] - Compute-once cells for memoized derived views
//! - [`limits`] - Fixed analysis limits
//!
//! This module has NO dependencies on other tern-decl modules.

pub mod limits;

mod deferred;
mod file_id;

pub use deferred::Deferred;
pub use file_id::FileId;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};

/// Identifier names throughout the crate are small, cheaply cloned strings.
pub use smol_str::SmolStr;
