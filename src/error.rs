//! Error types for the dump reader

use crate::reader::TokenKind;
use thiserror::Error;

/// Errors reported while reading a syntax-tree dump
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A consume operation was called while its lookahead predicate was false
    ///
    /// **Triggered by:** calling `read_*` without first checking the matching `can_read_*`
    /// **Example:** `read_location()` on `foo bar`
    /// **Prevention:** always branch on the predicate before consuming
    #[error("Expected {expected} at line {line}, column {column} (offset {offset}), found {found:?}")]
    ContractViolation {
        /// Grammar rule the caller asked for
        expected: TokenKind,
        /// Byte offset of the cursor in the original input
        offset: usize,
        /// Line of the cursor (1-indexed)
        line: usize,
        /// Column of the cursor (1-indexed)
        column: usize,
        /// Bounded preview of the remaining text
        found: String,
    },

    /// No grammar rule matches at the current position
    #[error("No recognized token at line {line}, column {column} (offset {offset}): {found:?}")]
    NoRecognizedToken {
        /// Byte offset of the cursor in the original input
        offset: usize,
        /// Line of the cursor (1-indexed)
        line: usize,
        /// Column of the cursor (1-indexed)
        column: usize,
        /// Bounded preview of the remaining text
        found: String,
    },

    /// The expression ended with open groups (or closed more than it opened)
    #[error("Unbalanced nesting: depth {depth} at end of expression")]
    UnbalancedNesting {
        /// Nesting depth when the reader was finished
        depth: i64,
    },

    /// Text was left over after the expression was read
    #[error("Trailing input at offset {offset}: {found:?}")]
    TrailingInput {
        /// Byte offset of the first unread character
        offset: usize,
        /// Bounded preview of the remaining text
        found: String,
    },

    /// A composed key in the configuration is malformed
    #[error("Invalid composed key {key:?}: {reason}")]
    InvalidComposedKey {
        /// The rejected key
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration text could not be deserialized
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Defect in the caller or its configuration; the parse attempt must stop
    Fatal,
    /// Bad input for this expression; the caller may move on to the next one
    Recoverable,
}

impl Error {
    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Classify error severity
    pub fn classify(&self) -> ErrorSeverity {
        match self {
            Error::ContractViolation { .. } => ErrorSeverity::Fatal,
            Error::UnbalancedNesting { .. } => ErrorSeverity::Fatal,
            Error::InvalidComposedKey { .. } => ErrorSeverity::Fatal,
            Error::Config(_) => ErrorSeverity::Fatal,

            Error::NoRecognizedToken { .. } => ErrorSeverity::Recoverable,
            Error::TrailingInput { .. } => ErrorSeverity::Recoverable,
        }
    }

    /// Grammar rule a contract violation was raised for
    pub fn expected_rule(&self) -> Option<TokenKind> {
        match self {
            Error::ContractViolation { expected, .. } => Some(*expected),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::config(err.to_string())
    }
}

/// Result type for dump reader operations
pub type Result<T> = std::result::Result<T, Error>;
