//! Unified error types for cvefeed.
//!
//! Matching itself never fails: a malformed identifier only removes its rule
//! from consideration. Errors surface where callers ask for them explicitly:
//! parsing an identifier, loading a feed or configuration, and listing a
//! record's unresolved rules.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cvefeed operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CvefeedError {
    /// Errors while binding an identifier string
    #[error("Failed to parse identifier: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// Errors while decoding a feed document
    #[error("Failed to read feed: {context}")]
    Feed {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific identifier parse error kinds.
///
/// `Clone` so that a rule can keep its own resolution failure around for
/// diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Empty identifier")]
    Empty,

    #[error("Unknown identifier prefix - expected 'cpe:2.3:' or 'cpe:/'")]
    InvalidPrefix,

    #[error("Expected {expected} components, found {found}")]
    ComponentCount { expected: String, found: usize },

    #[error("Invalid part '{0}' (expected a, o, h or *)")]
    InvalidPart(String),

    #[error("Invalid escape sequence in '{0}'")]
    InvalidEscape(String),

    #[error("Invalid percent encoding in '{0}'")]
    InvalidPercentEncoding(String),

    #[error("Invalid wildcard pattern {0}")]
    InvalidPattern(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for cvefeed operations
pub type Result<T> = std::result::Result<T, CvefeedError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl CvefeedError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a feed decoding error with context
    pub fn feed(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Feed {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for CvefeedError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for CvefeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::feed(String::new(), err)
    }
}

impl From<ParseErrorKind> for CvefeedError {
    fn from(kind: ParseErrorKind) -> Self {
        Self::parse(String::new(), kind)
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// ```ignore
/// use cvefeed::error::ErrorContext;
///
/// let cpe = cvefeed::wfn::parse(raw).with_context(|| format!("rule in {cve_id}"))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    ///
    /// The context string is prepended to the error's existing context.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<CvefeedError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: CvefeedError, new_ctx: &str) -> CvefeedError {
    match err {
        CvefeedError::Parse {
            context: existing,
            source,
        } => CvefeedError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        CvefeedError::Feed {
            context: existing,
            source,
        } => CvefeedError::Feed {
            context: chain_context(new_ctx, &existing),
            source,
        },
        CvefeedError::Io {
            path,
            message,
            source,
        } => CvefeedError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        CvefeedError::Config(msg) => CvefeedError::Config(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
