//! Fixed limits for declaration analysis.
//!
//! The library has no runtime configuration surface; tunables live here as
//! named constants.

/// Maximum namespace/type nesting depth the declaration parser descends
/// into. Deeper subtrees are skimmed and reported as a diagnostic.
pub const MAX_DECL_DEPTH: usize = 128;
