use thiserror::Error;

use crate::types::Kind;

#[derive(Debug, Error)]
pub enum TagfigError {
    #[error("Invalid target '{field}': {reason}")]
    InvalidTarget { field: String, reason: String },

    #[error("Invalid value {value:?} for '{field}': expected {expected} ({reason})")]
    TypeMismatch {
        field: String,
        value: String,
        expected: Kind,
        reason: String,
    },

    #[error("Field '{field}' has kind {kind}, which cannot be set from text")]
    Unsupported { field: String, kind: Kind },

    #[error("Field '{path}' is required")]
    MissingRequiredField { path: String },

    #[error("Failed to read {origin}: {source}")]
    SourceUnavailable {
        origin: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {origin}: {reason}")]
    ParseError { origin: String, reason: String },

    #[error("Unknown keys in {origin}: {}", .keys.join(", "))]
    UnknownKeys { origin: String, keys: Vec<String> },

    /// Command-line parsing failed; carries the parser's rendered message.
    #[error("Invalid command-line arguments: {0}")]
    InvalidArguments(String),
}

/// Why a single coercion failed, before the field path is known.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("expected {expected}: {reason}")]
    Mismatch { expected: Kind, reason: String },

    #[error("kind {0} has no coercion rule")]
    Unsupported(Kind),
}

impl CoerceError {
    pub fn mismatch(expected: Kind, reason: impl ToString) -> Self {
        CoerceError::Mismatch {
            expected,
            reason: reason.to_string(),
        }
    }

    /// Attach the field path and offending text.
    pub(crate) fn at(self, field: String, value: &str) -> TagfigError {
        match self {
            CoerceError::Mismatch { expected, reason } => TagfigError::TypeMismatch {
                field,
                value: value.to_string(),
                expected,
                reason,
            },
            CoerceError::Unsupported(kind) => TagfigError::Unsupported { field, kind },
        }
    }
}
