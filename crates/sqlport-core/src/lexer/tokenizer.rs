//! SQL / PL-SQL tokenizer.

use super::{Keyword, Span, Token, TokenKind};

/// Returns true for characters allowed after the first one of a bare
/// identifier. Oracle adds `$` and `#` to the usual set.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '#')
}

/// A lexer over SQL and PL/SQL text.
///
/// Comments never produce tokens, but their spans are kept so that
/// [`crate::source`] can keep textual rewrites out of them.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Byte offset where the token being scanned begins.
    start: usize,
    comments: Vec<Span>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            comments: Vec::new(),
        }
    }

    /// Returns the input this lexer reads from.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.input
    }

    /// Returns the spans of the comments passed so far.
    #[must_use]
    pub fn comments(&self) -> &[Span] {
        &self.comments
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn current(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn lookahead(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.current()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes characters while `accept` holds.
    fn bump_while(&mut self, accept: impl Fn(char) -> bool) {
        while self.current().is_some_and(&accept) {
            self.bump();
        }
    }

    /// Consumes one comment if the input is at one, recording its span. The
    /// newline ending a `--` comment is not part of it; an unterminated
    /// `/*` comment runs to the end of input.
    fn comment(&mut self) -> bool {
        let start = self.pos;
        if self.rest().starts_with("--") {
            self.bump_while(|c| c != '\n');
        } else if self.rest().starts_with("/*") {
            self.pos += 2;
            self.pos = self.rest().find("*/").map_or(self.input.len(), |end| self.pos + end + 2);
        } else {
            return false;
        }
        self.comments.push(Span::new(start, self.pos));
        true
    }

    fn skip_trivia(&mut self) {
        loop {
            self.bump_while(char::is_whitespace);
            if !self.comment() {
                break;
            }
        }
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn word(&mut self) -> Token {
        self.bump_while(is_word_char);
        let text = &self.input[self.start..self.pos];
        let kind = Keyword::from_str(text)
            .map_or_else(|| TokenKind::Identifier(text.to_string()), TokenKind::Keyword);
        self.token(kind)
    }

    /// Scans the body of a `quote`-delimited token whose opening quote has
    /// been consumed. A doubled quote stands for one quote character.
    fn delimited(&mut self, quote: char) -> Option<String> {
        let mut value = String::new();
        loop {
            match self.bump()? {
                c if c == quote && self.current() == Some(quote) => {
                    self.bump();
                    value.push(quote);
                }
                c if c == quote => return Some(value),
                c => value.push(c),
            }
        }
    }

    /// Scans digits with an optional fraction and exponent. The text is kept
    /// as written.
    fn number(&mut self) -> Token {
        self.bump_while(|c| c.is_ascii_digit());
        if self.current() == Some('.') && self.lookahead().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }
        if matches!(self.current(), Some('e' | 'E'))
            && self
                .lookahead()
                .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
        {
            self.bump();
            if matches!(self.current(), Some('+' | '-')) {
                self.bump();
            }
            self.bump_while(|c| c.is_ascii_digit());
        }
        self.token(TokenKind::Number(self.input[self.start..self.pos].to_string()))
    }

    /// Scans the next token, or `Eof` at the end of input.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        self.start = self.pos;

        let Some(c) = self.bump() else {
            return self.token(TokenKind::Eof);
        };

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '%' => TokenKind::Percent,
            ':' if self.current() == Some('=') => {
                self.bump();
                TokenKind::Assign
            }
            '\'' => self.delimited('\'').map_or_else(
                || TokenKind::Error("Unterminated string literal".to_string()),
                TokenKind::String,
            ),
            '"' | '`' => self.delimited(c).map_or_else(
                || TokenKind::Error("Unterminated quoted identifier".to_string()),
                TokenKind::QuotedIdentifier,
            ),
            c if c.is_ascii_digit() => return self.number(),
            c if c.is_alphabetic() || c == '_' => return self.word(),
            other => TokenKind::Symbol(other),
        };
        self.token(kind)
    }

    /// Tokenizes the whole input. The last token is always `Eof`.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }
}
