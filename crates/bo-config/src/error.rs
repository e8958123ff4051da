//! Error types for the configuration front end
//!
//! All fallible operations return `Result<T, Error>`.
//! User-facing failures carry the offending token and its position.

use crate::parser::tokenizer::{Span, TokenKind};

/// Configuration front-end error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Scanner could not classify a run of characters
    #[error("Lexical error at {span}: expected {expected}, found INVALID_TOKEN '{content}'")]
    LexicalError {
        expected: String,
        content: String,
        span: Span,
    },

    /// Token did not match the production currently expected
    #[error("Syntax error at {span}: expected {expected}, found {found} '{content}'")]
    SyntaxError {
        expected: String,
        found: TokenKind,
        content: String,
        span: Span,
    },

    /// Keyword paired with a literal of the wrong kind
    #[error(
        "Semantic error at {span}: {keyword} expects {expected}, found {found} '{content}'"
    )]
    SemanticError {
        keyword: TokenKind,
        expected: TokenKind,
        found: TokenKind,
        content: String,
        span: Span,
    },

    /// Semantic stack overflow. Indicates a parser bug, never bad input.
    #[error("Internal error: semantic stack full (capacity {capacity})")]
    CapacityError { capacity: usize },

    /// The underlying stream failed while scanning
    #[error("Read error at {span}: expected {expected}, found ERROR ({message})")]
    ReadError {
        expected: String,
        message: String,
        span: Span,
    },
}

impl Error {
    /// Returns false for internal invariant violations.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Error::CapacityError { .. })
    }

    /// Source position of the offending token, if any
    pub fn span(&self) -> Option<&Span> {
        match self {
            Error::LexicalError { span, .. }
            | Error::SyntaxError { span, .. }
            | Error::SemanticError { span, .. }
            | Error::ReadError { span, .. } => Some(span),
            Error::CapacityError { .. } => None,
        }
    }
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, Error>;
