//! Diagnostics: parse and directive problem reporting.
//!
//! Declaration parsing never fails outright; problems are recorded as
//! [`Diagnostic`]s carried by parse results and root declarations. This
//! crate only produces diagnostics; rendering and publishing are the
//! caller's concern.

use std::sync::Arc;

use crate::base::{FileId, TextRange};

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file containing this diagnostic.
    pub file: FileId,
    /// Byte range of the offending source.
    pub range: TextRange,
    /// Severity level.
    pub severity: Severity,
    /// Diagnostic code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(file: FileId, range: TextRange, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            range,
            severity: Severity::Error,
            code: None,
            message: message.into(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(file: FileId, range: TextRange, message: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            range,
            severity: Severity::Warning,
            code: None,
            message: message.into(),
        }
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Standard diagnostic codes for declaration parsing.
///
/// ## Error Code Ranges
///
/// - **E0001-E0009**: Reference directive problems (carried on the root
///   declaration, surfaced through the directive-diagnostics view)
/// - **E0010-E0099**: Declaration parse errors (carried on the parse result)
pub mod codes {
    // ========================================================================
    // DIRECTIVE DIAGNOSTICS (E0001-E0009)
    // ========================================================================

    /// `#ref` is not followed by a string literal.
    pub const EXPECTED_REFERENCE_PATH: &str = "E0001";
    /// `#ref` names an empty path.
    pub const EMPTY_REFERENCE_PATH: &str = "E0002";
    /// `#ref` appears after the first declaration.
    pub const DIRECTIVE_AFTER_DECLARATION: &str = "E0003";

    // ========================================================================
    // PARSE ERRORS (E0010-E0099)
    // ========================================================================

    /// A declaration keyword is not followed by a name.
    pub const EXPECTED_NAME: &str = "E0010";
    /// A stray token at declaration level was skipped.
    pub const UNEXPECTED_TOKEN: &str = "E0011";
    /// A `{` was never closed before end of file.
    pub const UNCLOSED_BRACE: &str = "E0012";
    /// Declaration nesting exceeds [`crate::base::limits::MAX_DECL_DEPTH`].
    pub const DECL_TOO_DEEP: &str = "E0013";
    /// A type header is not followed by a body or `;`.
    pub const EXPECTED_BODY: &str = "E0014";
}
