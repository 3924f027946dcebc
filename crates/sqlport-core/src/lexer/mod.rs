//! SQL / PL-SQL Lexer
//!
//! A hand-written lexer producing tokens with byte spans into the input. The
//! DDL parser, the procedure signature parser and the source segmenter all
//! share it.

mod cursor;
mod span;
mod token;
mod tokenizer;

pub use cursor::Cursor;
pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
