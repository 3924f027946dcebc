//! Splits SQL text into code and protected segments.
//!
//! Every rewrite stage in this crate is textual. Running those rewrites over
//! string literals or comments would corrupt data (`'NUMBER'` is a value, not
//! a type), so the text is first cut into segments using the lexer and each
//! stage only touches the segment kinds it is allowed to.

use crate::lexer::{Lexer, Span, TokenKind};

/// What a slice of SQL text is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Keywords, identifiers, punctuation and whitespace.
    Code,
    /// A single-quoted string literal, quotes included.
    Literal,
    /// A double-quoted or backtick-quoted identifier, quotes included.
    QuotedIdentifier,
    /// A `--` or `/* */` comment.
    Comment,
}

/// A contiguous slice of the input with a single [`SegmentKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The segment kind.
    pub kind: SegmentKind,
    /// The verbatim text.
    pub text: &'a str,
}

/// Cuts `sql` into segments. Concatenating the segment texts yields `sql`.
#[must_use]
pub fn segments(sql: &str) -> Vec<Segment<'_>> {
    let mut lexer = Lexer::new(sql);
    let tokens = lexer.tokenize();

    let mut protected: Vec<(Span, SegmentKind)> = tokens
        .iter()
        .filter_map(|token| match token.kind {
            TokenKind::String(_) => Some((token.span, SegmentKind::Literal)),
            TokenKind::QuotedIdentifier(_) => Some((token.span, SegmentKind::QuotedIdentifier)),
            _ => None,
        })
        .collect();
    protected.extend(
        lexer
            .comments()
            .iter()
            .map(|span| (*span, SegmentKind::Comment)),
    );
    protected.sort_by_key(|(span, _)| span.start);

    let mut out = Vec::with_capacity(protected.len() * 2 + 1);
    let mut pos = 0;
    for (span, kind) in protected {
        if span.start > pos {
            out.push(Segment {
                kind: SegmentKind::Code,
                text: &sql[pos..span.start],
            });
        }
        out.push(Segment {
            kind,
            text: span.slice(sql),
        });
        pos = span.end;
    }
    if pos < sql.len() {
        out.push(Segment {
            kind: SegmentKind::Code,
            text: &sql[pos..],
        });
    }
    out
}

/// Applies `rewrite` to every segment whose kind satisfies `applies`, copying
/// all other segments through unchanged.
pub fn rewrite_segments<P, F>(sql: &str, applies: P, mut rewrite: F) -> String
where
    P: Fn(SegmentKind) -> bool,
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(sql.len());
    for segment in segments(sql) {
        if applies(segment.kind) {
            out.push_str(&rewrite(segment.text));
        } else {
            out.push_str(segment.text);
        }
    }
    out
}

/// Applies `rewrite` to code segments only.
pub fn rewrite_code<F>(sql: &str, rewrite: F) -> String
where
    F: FnMut(&str) -> String,
{
    rewrite_segments(sql, |kind| kind == SegmentKind::Code, rewrite)
}
