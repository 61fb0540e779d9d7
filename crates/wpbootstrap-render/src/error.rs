//! Error types for view resolution and template rendering.
//!
//! This module provides [`RenderError`], the primary error type for all rendering
//! operations. It abstracts over the underlying template engine's errors, providing
//! a stable public API.

use std::fmt;
use std::path::PathBuf;

/// Error type for view resolution and rendering operations.
///
/// This error type provides a stable API that doesn't expose implementation details
/// of the underlying template engine. All public rendering functions return this type.
#[derive(Debug)]
pub enum RenderError {
    /// The view file does not exist under the plugin's own view root.
    ///
    /// Fatal to the single invocation that asked for it; never retried.
    ViewNotFound(PathBuf),

    /// The name cannot address a view file (empty, a character outside
    /// `[A-Za-z0-9_]`, or a derivation with an empty segment).
    InvalidViewName(String),

    /// Template syntax error or evaluation failure, including an
    /// `{% include %}` of a template that does not exist.
    TemplateError(String),

    /// Parameter serialization error.
    SerializationError(String),

    /// I/O error (e.g., reading a view from disk).
    IoError(std::io::Error),

    /// Other operational error.
    OperationError(String),
}

impl RenderError {
    /// Returns true if this error means the requested view file is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RenderError::ViewNotFound(_))
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ViewNotFound(path) => {
                write!(f, "view file does not exist: \"{}\"", path.display())
            }
            RenderError::InvalidViewName(name) => write!(f, "invalid view name {:?}", name),
            RenderError::TemplateError(msg) => write!(f, "template error: {}", msg),
            RenderError::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            RenderError::IoError(err) => write!(f, "I/O error: {}", err),
            RenderError::OperationError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::IoError(err)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::SerializationError(err.to_string())
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            // Views are probed before rendering, so a missing template here is
            // always an include or extends target.
            ErrorKind::TemplateNotFound
            | ErrorKind::SyntaxError
            | ErrorKind::BadEscape
            | ErrorKind::UndefinedError
            | ErrorKind::UnknownTest
            | ErrorKind::UnknownFunction
            | ErrorKind::UnknownFilter
            | ErrorKind::UnknownMethod => RenderError::TemplateError(err.to_string()),
            ErrorKind::BadSerialization => RenderError::SerializationError(err.to_string()),
            _ => RenderError::OperationError(err.to_string()),
        }
    }
}
