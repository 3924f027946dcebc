//! Error types for the transpiler.

use crate::dialect::Dialect;
use crate::lexer::{Span, TokenKind};

/// Errors that can occur while transpiling SQL.
#[derive(Debug, thiserror::Error)]
pub enum TranspileError {
    /// No `CREATE [OR REPLACE] PROCEDURE name (...)` header was found.
    #[error("No procedure signature found in: {0}")]
    NoProcedure(String),

    /// A dialect name that is not recognised.
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    /// A dialect pair with no conversion rules.
    #[error("Unsupported conversion: {from} to {to}")]
    UnsupportedPair {
        /// Source dialect.
        from: Dialect,
        /// Target dialect.
        to: Dialect,
    },

    /// A column type with no mapping, reported in strict mode.
    #[error("Unmapped type '{type_name}' for column {table}.{column}")]
    UnmappedType {
        /// The table declaring the column.
        table: String,
        /// The column name.
        column: String,
        /// The declared type as written.
        type_name: String,
    },

    /// A rename or rule pattern failed to compile.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Invalid configuration document.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// A conversion finished with errors.
    #[error("Conversion failed:\n{}", .0.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n"))]
    Conversion(Vec<String>),
}

/// Result type for transpiler operations.
pub type Result<T> = std::result::Result<T, TranspileError>;

/// A parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// The actual token found.
    pub found: Option<TokenKind>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            found: None,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: &str, found: TokenKind, span: Span) -> Self {
        let message = if matches!(found, TokenKind::Eof) {
            format!("Unexpected end of input: expected {expected}")
        } else {
            format!("Unexpected token: expected {expected}, found {found:?}")
        };
        Self {
            message,
            span,
            found: Some(found),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at position {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::unexpected("'('", TokenKind::Comma, Span::new(4, 5));
        assert_eq!(
            err.to_string(),
            "Unexpected token: expected '(', found Comma at position 4..5"
        );
        let eof = ParseError::unexpected("name", TokenKind::Eof, Span::new(9, 9));
        assert!(eof.message.starts_with("Unexpected end of input"));
    }

    #[test]
    fn test_conversion_error_lists_every_message() {
        let err = TranspileError::Conversion(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Conversion failed:\n  - a\n  - b");
    }
}
