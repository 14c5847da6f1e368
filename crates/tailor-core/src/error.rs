//! Error types for tailor operations
//!
//! Parse and compile failures inside the canonicalization engine are never
//! surfaced through these types: they degrade to an invalid signature. The
//! errors below cover configuration, I/O and design-system construction.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tailor operations
#[derive(Debug, Error)]
pub enum TailorError {
    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A custom utility `@apply`s itself, directly or through other utilities
    #[error("Circular @apply dependency detected: {chain}")]
    CircularApply { chain: String },

    /// A custom utility references a candidate the design system cannot compile
    #[error("Unknown candidate '{candidate}' in @apply of '{utility}'")]
    UnknownCandidate { utility: String, candidate: String },

    /// Theme definition errors
    #[error("Theme error: {message}")]
    ThemeError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
    Apply,
    Theme,
}

impl TailorError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TailorError::ConfigError { .. } => ErrorKind::Config,
            TailorError::IoError { .. } => ErrorKind::Io,
            TailorError::CircularApply { .. } => ErrorKind::Apply,
            TailorError::UnknownCandidate { .. } => ErrorKind::Apply,
            TailorError::ThemeError { .. } => ErrorKind::Theme,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a circular `@apply` error from the offending chain of utilities
    pub fn circular_apply(chain: &[String]) -> Self {
        Self::CircularApply {
            chain: chain.join(" -> "),
        }
    }

    /// Create an unknown candidate error
    pub fn unknown_candidate(utility: impl Into<String>, candidate: impl Into<String>) -> Self {
        Self::UnknownCandidate {
            utility: utility.into(),
            candidate: candidate.into(),
        }
    }

    /// Create a theme error
    pub fn theme_error(message: impl Into<String>) -> Self {
        Self::ThemeError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(TailorError::config_error("x").kind(), ErrorKind::Config);
        assert_eq!(
            TailorError::circular_apply(&["a".into(), "b".into(), "a".into()]).kind(),
            ErrorKind::Apply
        );
        assert_eq!(TailorError::theme_error("x").kind(), ErrorKind::Theme);
    }

    #[test]
    fn test_circular_apply_message() {
        let err = TailorError::circular_apply(&["btn".into(), "card".into(), "btn".into()]);
        assert_eq!(
            err.to_string(),
            "Circular @apply dependency detected: btn -> card -> btn"
        );
    }
}
