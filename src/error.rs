//! Error types.
//!
//! [`AnnotationError`] is what the lexer reports for a docblock it cannot
//! make sense of.  [`Error`] is the crate-wide error that additionally
//! covers reading files, loading configuration, and persisting the cache.

use std::io;
use std::path::PathBuf;

/// A docblock could not be parsed into annotations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    /// The docblock contains an annotation that does not follow the
    /// `@Name[Type]{argument}(param='value', ...)` grammar, or the scan
    /// ended while an annotation was still open.
    #[error("malformed annotation on {target} at line {line}, column {column}: {message}")]
    Malformed {
        target: String,
        line: usize,
        column: usize,
        message: String,
    },
}

impl AnnotationError {
    /// The target identifier the failing docblock was parsed for.
    pub fn target(&self) -> &str {
        match self {
            AnnotationError::Malformed { target, .. } => target,
        }
    }

    /// Human readable description without the location prefix.
    pub fn message(&self) -> &str {
        match self {
            AnnotationError::Malformed { message, .. } => message,
        }
    }
}

/// Crate-wide error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("corrupt annotation cache {}: {source}", path.display())]
    Cache {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to walk {}: {source}", path.display())]
    Walk { path: PathBuf, source: ignore::Error },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
