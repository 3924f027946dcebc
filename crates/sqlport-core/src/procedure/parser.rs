//! PL/SQL procedure signature parser.

use tracing::debug;

use super::ParameterDirection;
use crate::error::ParseError;
use crate::lexer::{Cursor, Keyword, Lexer, Span, TokenKind};

/// A parameter as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredParameter {
    /// Name as written, e.g. `p_customer_id`.
    pub name: String,
    /// Declared direction.
    pub direction: ParameterDirection,
    /// Declared type as written, e.g. `NUMBER` or `orders.id%TYPE`.
    pub source_type: String,
}

/// A procedure header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Procedure name as written, schema prefix included.
    pub name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<DeclaredParameter>,
    /// Parameter fragments that could not be parsed.
    pub skipped: Vec<String>,
}

/// Finds the first `CREATE [OR REPLACE] PROCEDURE` header in `sql`.
///
/// Returns `None` if there is none.
#[must_use]
pub fn parse_signature(sql: &str) -> Option<Signature> {
    let tokens = Lexer::new(sql).tokenize();
    let mut cursor = Cursor::new(sql, &tokens);
    while !cursor.is_eof() {
        if cursor.check_keyword(Keyword::Create) {
            let start = cursor.position();
            match parse_header(&mut cursor) {
                Ok(signature) => return Some(signature),
                Err(err) => {
                    debug!(error = %err, "not a procedure header");
                    cursor.seek(start + 1);
                    continue;
                }
            }
        }
        cursor.advance();
    }
    None
}

fn parse_header(c: &mut Cursor<'_, '_>) -> Result<Signature, ParseError> {
    c.expect_keyword(Keyword::Create)?;
    if c.eat_keyword(Keyword::Or) {
        c.expect_keyword(Keyword::Replace)?;
    }
    if c.check_word("EDITIONABLE") || c.check_word("NONEDITIONABLE") {
        c.advance();
    }
    c.expect_keyword(Keyword::Procedure)?;
    let name = c.expect_qualified_name("procedure name")?;

    let mut parameters = Vec::new();
    let mut skipped = Vec::new();
    if c.check(&TokenKind::LeftParen) {
        let (parts, _) = c.split_group()?;
        for (from, to) in parts {
            let tokens = c.tokens(from, to);
            let mut fragment = Cursor::new(c.source(), tokens);
            match parse_parameter(&mut fragment) {
                Ok(parameter) => parameters.push(parameter),
                Err(err) => {
                    let text = tokens
                        .first()
                        .zip(tokens.last())
                        .map(|(first, last)| first.span.to(last.span).slice(c.source()))
                        .unwrap_or_default()
                        .to_string();
                    debug!(parameter = %text, error = %err, "skipping parameter");
                    skipped.push(text);
                }
            }
        }
    } else if !(c.check_keyword(Keyword::Is) || c.check_keyword(Keyword::As)) {
        return Err(c.unexpected("'(', IS or AS"));
    }

    Ok(Signature {
        name,
        parameters,
        skipped,
    })
}

/// Parses `name [IN | OUT | IN OUT] [NOCOPY] type [DEFAULT expr | := expr]`.
fn parse_parameter(c: &mut Cursor<'_, '_>) -> Result<DeclaredParameter, ParseError> {
    let name = c.expect_word("parameter name")?;

    let direction = if c.eat_keyword(Keyword::In) {
        if c.eat_keyword(Keyword::Out) {
            ParameterDirection::InOut
        } else {
            ParameterDirection::In
        }
    } else if c.eat_keyword(Keyword::Out) {
        ParameterDirection::Out
    } else {
        ParameterDirection::In
    };
    c.eat_keyword(Keyword::Nocopy);

    if !matches!(
        c.peek().kind,
        TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
    ) {
        return Err(c.unexpected("parameter type"));
    }
    let start = c.peek().span.start;
    while !c.is_eof() && !c.check_keyword(Keyword::Default) && !c.check(&TokenKind::Assign) {
        if c.check(&TokenKind::LeftParen) {
            c.skip_group()?;
        } else {
            c.advance();
        }
    }
    let end = c.previous().span.end;

    Ok(DeclaredParameter {
        name,
        direction,
        source_type: Span::new(start, end).slice(c.source()).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, direction: ParameterDirection, source_type: &str) -> DeclaredParameter {
        DeclaredParameter {
            name: name.into(),
            direction,
            source_type: source_type.into(),
        }
    }

    #[test]
    fn test_directions_and_types() {
        let signature = parse_signature(
            "CREATE OR REPLACE PROCEDURE sp_update_order (
                p_id IN NUMBER,
                p_status VARCHAR2,
                p_total IN OUT NUMBER(10,2),
                p_message OUT VARCHAR2
            ) AS BEGIN NULL; END;",
        )
        .unwrap();
        assert_eq!(signature.name, "sp_update_order");
        assert_eq!(
            signature.parameters,
            vec![
                param("p_id", ParameterDirection::In, "NUMBER"),
                param("p_status", ParameterDirection::In, "VARCHAR2"),
                param("p_total", ParameterDirection::InOut, "NUMBER(10,2)"),
                param("p_message", ParameterDirection::Out, "VARCHAR2"),
            ]
        );
        assert!(signature.skipped.is_empty());
    }

    #[test]
    fn test_modifiers_defaults_and_anchored_types() {
        let signature = parse_signature(
            "-- header comment\n\
             create procedure hr.load_rows(p_rows OUT NOCOPY SYS_REFCURSOR, \
             p_id orders.id%TYPE, p_limit NUMBER DEFAULT 10, p_flag BOOLEAN := TRUE)",
        )
        .unwrap();
        assert_eq!(signature.name, "hr.load_rows");
        assert_eq!(
            signature.parameters,
            vec![
                param("p_rows", ParameterDirection::Out, "SYS_REFCURSOR"),
                param("p_id", ParameterDirection::In, "orders.id%TYPE"),
                param("p_limit", ParameterDirection::In, "NUMBER"),
                param("p_flag", ParameterDirection::In, "BOOLEAN"),
            ]
        );
    }

    #[test]
    fn test_parameterless_procedure() {
        let signature = parse_signature("CREATE PROCEDURE refresh_stats IS BEGIN NULL; END;").unwrap();
        assert!(signature.parameters.is_empty());
    }

    #[test]
    fn test_unparseable_parameters_are_reported() {
        let signature = parse_signature("CREATE PROCEDURE p (p_a NUMBER, 42, p_b IN)").unwrap();
        assert_eq!(signature.parameters.len(), 1);
        assert_eq!(signature.skipped, vec!["42", "p_b IN"]);
    }

    #[test]
    fn test_no_procedure() {
        assert!(parse_signature("CREATE TABLE t (id NUMBER)").is_none());
        assert!(parse_signature("PROCEDURE p (a NUMBER)").is_none());
        assert!(parse_signature("CREATE PROCEDURE p (a NUMBER").is_none());
        assert!(parse_signature("").is_none());
    }

    #[test]
    fn test_first_header_after_other_statements() {
        let signature = parse_signature(
            "CREATE TABLE t (id NUMBER);\nCREATE OR REPLACE PROCEDURE second (p_x NUMBER) IS",
        )
        .unwrap();
        assert_eq!(signature.name, "second");
    }
}
