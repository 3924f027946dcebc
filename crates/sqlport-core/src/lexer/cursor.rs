//! Token cursor shared by the DDL and procedure parsers.

use super::{Keyword, Span, Token, TokenKind};
use crate::error::ParseError;

/// A cursor over a slice of tokens.
///
/// Running past the end yields an `Eof` token positioned at the end of the
/// slice, so sub-cursors over a single fragment behave like a whole input.
pub struct Cursor<'a, 't> {
    source: &'a str,
    tokens: &'t [Token],
    pos: usize,
    eof: Token,
}

impl<'a, 't> Cursor<'a, 't> {
    /// Creates a cursor over `tokens`, which were lexed from `source`.
    #[must_use]
    pub fn new(source: &'a str, tokens: &'t [Token]) -> Self {
        let end = tokens
            .iter()
            .rev()
            .find(|t| !t.is_eof())
            .map_or(0, |t| t.span.end);
        Self {
            source,
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, Span::new(end, end)),
        }
    }

    /// Returns the source text.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Returns the current position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Moves to `pos`.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    /// Returns the tokens in `[from, to)`.
    #[must_use]
    pub fn tokens(&self, from: usize, to: usize) -> &'t [Token] {
        let to = to.min(self.tokens.len());
        &self.tokens[from.min(to)..to]
    }

    /// Returns the current token.
    #[must_use]
    pub fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Returns the token `n` positions ahead.
    #[must_use]
    pub fn peek_at(&self, n: usize) -> &Token {
        self.tokens.get(self.pos + n).unwrap_or(&self.eof)
    }

    /// Returns the token before the current one.
    #[must_use]
    pub fn previous(&self) -> &Token {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .unwrap_or(&self.eof)
    }

    /// Returns true at the end of input.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.peek().is_eof()
    }

    /// Advances to the next token.
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Checks if the current token matches the given kind.
    #[must_use]
    pub fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    #[must_use]
    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_keyword(keyword)
    }

    /// Checks if the current token is a bare word equal to `word`, ignoring
    /// case. Used for contextual words that are not keywords.
    #[must_use]
    pub fn check_word(&self, word: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Identifier(name) if name.eq_ignore_ascii_case(word))
    }

    /// Consumes the current token if it has the given kind.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        let found = self.check(kind);
        if found {
            self.advance();
        }
        found
    }

    /// Consumes the current token if it is the given keyword.
    pub fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let found = self.check_keyword(keyword);
        if found {
            self.advance();
        }
        found
    }

    /// Expects the current token to be the given kind.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` naming `expected` otherwise.
    pub fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Span, ParseError> {
        if self.check(kind) {
            let span = self.peek().span;
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Expects the current token to be the given keyword.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` otherwise.
    pub fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// Expects and returns a word: an identifier, a quoted identifier or a
    /// keyword used as a name. Keywords keep their original spelling.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the current token is not word-like.
    pub fn expect_word(&mut self, expected: &str) -> Result<String, ParseError> {
        let token = self.peek();
        let word = match &token.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => name.clone(),
            TokenKind::Keyword(_) => token.span.slice(self.source).to_string(),
            _ => return Err(self.unexpected(expected)),
        };
        self.advance();
        Ok(word)
    }

    /// Parses `word(.word)*` and joins the parts with `.`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if a part is missing.
    pub fn expect_qualified_name(&mut self, expected: &str) -> Result<String, ParseError> {
        let mut name = self.expect_word(expected)?;
        while self.eat(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_word(expected)?);
        }
        Ok(name)
    }

    /// Consumes a balanced parenthesised group starting at the current `(`
    /// and returns the span from `(` to `)` inclusive.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the current token is not `(` or the group is
    /// not closed.
    pub fn skip_group(&mut self) -> Result<Span, ParseError> {
        let open = self.expect(&TokenKind::LeftParen, "'('")?;
        let mut depth = 1usize;
        loop {
            match self.peek().kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        let close = self.peek().span;
                        self.advance();
                        return Ok(open.to(close));
                    }
                }
                TokenKind::Eof => return Err(ParseError::new("Unbalanced parentheses", open)),
                _ => {}
            }
            self.advance();
        }
    }

    /// Parses `( word [, word]* )`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the list is malformed.
    pub fn expect_name_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(&TokenKind::LeftParen, "'('")?;
        let mut names = vec![self.expect_word("column name")?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.expect_word("column name")?);
        }
        self.expect(&TokenKind::RightParen, "')'")?;
        Ok(names)
    }

    /// Splits the contents of the group opening at the current `(` on
    /// top-level commas. Returns the token ranges of the parts and the span
    /// of the closing `)`; the cursor ends after the `)`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the group is not closed.
    pub fn split_group(&mut self) -> Result<(Vec<(usize, usize)>, Span), ParseError> {
        let open = self.expect(&TokenKind::LeftParen, "'('")?;
        let mut parts = Vec::new();
        let mut start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen if depth == 0 => {
                    let close = self.peek().span;
                    if self.pos > start {
                        parts.push((start, self.pos));
                    }
                    self.advance();
                    return Ok((parts, close));
                }
                TokenKind::RightParen => depth -= 1,
                TokenKind::Comma if depth == 0 => {
                    if self.pos > start {
                        parts.push((start, self.pos));
                    }
                    start = self.pos + 1;
                }
                TokenKind::Eof => return Err(ParseError::new("Unbalanced parentheses", open)),
                _ => {}
            }
            self.advance();
        }
    }

    /// Builds an "unexpected token" error at the current token.
    #[must_use]
    pub fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::unexpected(expected, self.peek().kind.clone(), self.peek().span)
    }
}
