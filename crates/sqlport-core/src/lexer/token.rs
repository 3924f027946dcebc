//! Token types for the SQL lexer.

use super::Span;

/// Keywords the DDL and procedure parsers dispatch on.
///
/// Everything else (type names, function names) stays a plain identifier so
/// dialect vocabularies never need to be listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // Statements
    Create,
    Or,
    Replace,
    Drop,
    Table,
    Index,
    Procedure,
    Global,
    Temporary,

    // Existence guards
    If,
    Not,
    Exists,

    // Constraints
    Null,
    Primary,
    Key,
    Foreign,
    References,
    Unique,
    Check,
    Constraint,
    Default,
    Cascade,
    On,

    // Procedure signatures
    In,
    Out,
    Nocopy,
    Is,
    As,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Some(Self::Create),
            "OR" => Some(Self::Or),
            "REPLACE" => Some(Self::Replace),
            "DROP" => Some(Self::Drop),
            "TABLE" => Some(Self::Table),
            "INDEX" => Some(Self::Index),
            "PROCEDURE" => Some(Self::Procedure),
            "GLOBAL" => Some(Self::Global),
            "TEMPORARY" => Some(Self::Temporary),
            "IF" => Some(Self::If),
            "NOT" => Some(Self::Not),
            "EXISTS" => Some(Self::Exists),
            "NULL" => Some(Self::Null),
            "PRIMARY" => Some(Self::Primary),
            "KEY" => Some(Self::Key),
            "FOREIGN" => Some(Self::Foreign),
            "REFERENCES" => Some(Self::References),
            "UNIQUE" => Some(Self::Unique),
            "CHECK" => Some(Self::Check),
            "CONSTRAINT" => Some(Self::Constraint),
            "DEFAULT" => Some(Self::Default),
            "CASCADE" => Some(Self::Cascade),
            "ON" => Some(Self::On),
            "IN" => Some(Self::In),
            "OUT" => Some(Self::Out),
            "NOCOPY" => Some(Self::Nocopy),
            "IS" => Some(Self::Is),
            "AS" => Some(Self::As),
            _ => None,
        }
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Or => "OR",
            Self::Replace => "REPLACE",
            Self::Drop => "DROP",
            Self::Table => "TABLE",
            Self::Index => "INDEX",
            Self::Procedure => "PROCEDURE",
            Self::Global => "GLOBAL",
            Self::Temporary => "TEMPORARY",
            Self::If => "IF",
            Self::Not => "NOT",
            Self::Exists => "EXISTS",
            Self::Null => "NULL",
            Self::Primary => "PRIMARY",
            Self::Key => "KEY",
            Self::Foreign => "FOREIGN",
            Self::References => "REFERENCES",
            Self::Unique => "UNIQUE",
            Self::Check => "CHECK",
            Self::Constraint => "CONSTRAINT",
            Self::Default => "DEFAULT",
            Self::Cascade => "CASCADE",
            Self::On => "ON",
            Self::In => "IN",
            Self::Out => "OUT",
            Self::Nocopy => "NOCOPY",
            Self::Is => "IS",
            Self::As => "AS",
        }
    }

    /// Returns true if a column-list fragment starting with this keyword is a
    /// table-level constraint rather than a column definition.
    #[must_use]
    pub const fn starts_constraint(&self) -> bool {
        matches!(
            self,
            Self::Primary | Self::Foreign | Self::Unique | Self::Check | Self::Constraint
        )
    }
}

/// The kind of token.
///
/// Operators are not told apart: neither the DDL grammar nor procedure
/// signatures need more than the delimiters below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Numeric literal as written (e.g., `10`, `2.5`, `1e3`)
    Number(String),
    /// String literal, quotes removed and `''` unescaped
    String(String),
    /// Bare identifier (e.g., column_name, VARCHAR2, seq$id)
    Identifier(String),
    /// Quoted identifier (e.g., "Order Lines" or `orders`)
    QuotedIdentifier(String),
    /// SQL keyword
    Keyword(Keyword),

    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// %, as in `orders.id%TYPE`
    Percent,
    /// :=
    Assign,
    /// Any other punctuation or operator character
    Symbol(char),

    /// End of input
    Eof,
    /// Unterminated literal or quoted identifier
    Error(String),
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns true if this token is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Returns the name carried by a word-like token.
    ///
    /// Keywords count as words so that columns named `key` or `index` still
    /// parse. Quoted identifiers yield their unquoted content.
    #[must_use]
    pub fn word(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => Some(name),
            TokenKind::Keyword(kw) => Some(kw.as_str()),
            _ => None,
        }
    }
}
