//! Oracle syntax rewriting.
//!
//! The rule list is ordered and built once. Precision-specific `NUMBER(n)`
//! rules come before the generic `NUMBER` fallback; reordering them loses
//! precision information.

use std::sync::LazyLock;

use regex::Regex;

use crate::lexer::{Cursor, Lexer, TokenKind};
use crate::source::{rewrite_code, segments, SegmentKind};

/// A named regex substitution.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    /// Short rule name used in logs.
    pub name: &'static str,
    /// Compiled, case-insensitive pattern.
    pub pattern: Regex,
    /// Replacement text, `$n` group references allowed.
    pub replacement: &'static str,
}

impl RewriteRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(&format!("(?i){pattern}")).expect("static rewrite rule compiles"),
            replacement,
        }
    }
}

/// Text produced by [`SyntaxRewriter::rewrite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// Rewritten text.
    pub text: String,
    /// Names of the rules that changed something, in rule order.
    pub applied: Vec<&'static str>,
}

/// An ordered list of rewrite rules for one source dialect.
#[derive(Debug)]
pub struct SyntaxRewriter {
    /// Rule name and leading word of clauses removed whole, nested
    /// parentheses included.
    clauses: Vec<(&'static str, &'static str)>,
    rules: Vec<RewriteRule>,
}

static ORACLE: LazyLock<SyntaxRewriter> = LazyLock::new(|| SyntaxRewriter {
    clauses: vec![("storage", "STORAGE")],
    rules: vec![
        // Functions
        RewriteRule::new("sysdate", r"\bSYSDATE\b", "CURRENT_DATE"),
        RewriteRule::new("systimestamp", r"\bSYSTIMESTAMP\b", "CURRENT_TIMESTAMP"),
        RewriteRule::new("nvl", r"\bNVL\s*\(", "COALESCE("),
        // Storage clauses
        RewriteRule::new("tablespace", r"\s+TABLESPACE\s+[\w$#]+", ""),
        RewriteRule::new("pctfree", r"\s+PCTFREE\s+\d+", ""),
        RewriteRule::new("pctused", r"\s+PCTUSED\s+\d+", ""),
        RewriteRule::new("initrans", r"\s+INITRANS\s+\d+", ""),
        RewriteRule::new("maxtrans", r"\s+MAXTRANS\s+\d+", ""),
        // Types
        RewriteRule::new("varchar2", r"\bVARCHAR2\b", "VARCHAR"),
        RewriteRule::new("number_10", r"\bNUMBER\s*\(\s*10\s*\)", "INTEGER"),
        RewriteRule::new("number_19", r"\bNUMBER\s*\(\s*19\s*\)", "BIGINT"),
        RewriteRule::new("number_1", r"\bNUMBER\s*\(\s*1\s*\)", "BOOLEAN"),
        RewriteRule::new(
            "number_decimal",
            r"\bNUMBER\s*\(\s*(\d+)\s*,\s*(\d+)\s*\)",
            "DECIMAL($1,$2)",
        ),
        RewriteRule::new("number", r"\bNUMBER\b", "NUMERIC"),
    ],
});

impl SyntaxRewriter {
    /// Returns the Oracle-to-PostgreSQL rewriter.
    #[must_use]
    pub fn oracle() -> &'static Self {
        &ORACLE
    }

    /// Returns the rules in application order.
    #[must_use]
    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Strips the clauses, then applies every rule in order to the code
    /// segments of `sql`.
    #[must_use]
    pub fn rewrite(&self, sql: &str) -> Rewritten {
        let mut text = sql.to_string();
        let mut applied = Vec::new();
        for &(name, word) in &self.clauses {
            let next = strip_clause(&text, word);
            if next != text {
                applied.push(name);
                text = next;
            }
        }
        for rule in &self.rules {
            let next = rewrite_code(&text, |code| {
                rule.pattern
                    .replace_all(code, rule.replacement)
                    .into_owned()
            });
            if next != text {
                applied.push(rule.name);
                text = next;
            }
        }
        Rewritten { text, applied }
    }
}

/// Removes every `word (...)` clause from `sql` together with the whitespace
/// before it. Words inside literals or comments are not clauses; an unclosed
/// group is left as written.
fn strip_clause(sql: &str, word: &str) -> String {
    let tokens = Lexer::new(sql).tokenize();
    let mut cursor = Cursor::new(sql, &tokens);
    let mut out = String::with_capacity(sql.len());
    let mut copied = 0;
    while !cursor.is_eof() {
        let token = cursor.peek().clone();
        let starts_clause = matches!(&token.kind, TokenKind::Identifier(name) if name.eq_ignore_ascii_case(word))
            && cursor.peek_at(1).kind == TokenKind::LeftParen;
        cursor.advance();
        if !starts_clause {
            continue;
        }
        let resume = cursor.position();
        match cursor.skip_group() {
            Ok(group) => {
                let start = sql[..token.span.start].trim_end().len().max(copied);
                out.push_str(&sql[copied..start]);
                copied = group.end;
            }
            Err(_) => cursor.seek(resume),
        }
    }
    out.push_str(&sql[copied..]);
    out
}

/// Oracle constructs that have no mechanical PostgreSQL equivalent.
static ORACLE_CONSTRUCTS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bDECODE\s*\(", "DECODE() has no PostgreSQL equivalent; rewrite as CASE"),
        (r"\bNVL2\s*\(", "NVL2() has no PostgreSQL equivalent; rewrite as CASE"),
        (r"\bROWNUM\b", "ROWNUM is not supported; use LIMIT or ROW_NUMBER()"),
        (r"\bDUAL\b", "DUAL table reference; PostgreSQL SELECT needs no FROM"),
        (r"\bTO_NUMBER\s*\(", "TO_NUMBER() needs a format-aware cast"),
        (r"\bINSTR\s*\(", "INSTR() should become STRPOS() or POSITION()"),
        (r"\bCONNECT\s+BY\b", "CONNECT BY hierarchy; rewrite as WITH RECURSIVE"),
        (r"\(\s*\+\s*\)", "(+) outer join marker; rewrite as explicit JOIN"),
    ]
    .into_iter()
    .map(|(pattern, message)| {
        let regex = Regex::new(&format!("(?i){pattern}")).expect("static audit rule compiles");
        (regex, message)
    })
    .collect()
});

/// Reports Oracle constructs in the code segments of `sql` that need manual
/// translation. One message per construct, in a fixed order.
#[must_use]
pub fn audit_oracle(sql: &str) -> Vec<String> {
    let code = segments(sql)
        .into_iter()
        .filter(|segment| segment.kind == SegmentKind::Code)
        .map(|segment| segment.text)
        .collect::<Vec<_>>()
        .join("\n");
    ORACLE_CONSTRUCTS
        .iter()
        .filter(|(regex, _)| regex.is_match(&code))
        .map(|(_, message)| (*message).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(sql: &str) -> String {
        SyntaxRewriter::oracle().rewrite(sql).text
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            rewrite("SELECT NVL(a, SYSDATE), systimestamp FROM t"),
            "SELECT COALESCE(a, CURRENT_DATE), CURRENT_TIMESTAMP FROM t"
        );
    }

    #[test]
    fn test_storage_clauses_are_stripped() {
        let sql = "CREATE TABLE t (id NUMBER(10)) TABLESPACE users PCTFREE 10 \
                   INITRANS 2 MAXTRANS 255 STORAGE (INITIAL 64K NEXT 1M);";
        assert_eq!(rewrite(sql), "CREATE TABLE t (id INTEGER);");
    }

    #[test]
    fn test_nested_storage_clause_is_stripped_whole() {
        assert_eq!(
            rewrite("CREATE TABLE t (x NUMBER(10,2)) STORAGE (INITIAL 1 NEXT (2));"),
            "CREATE TABLE t (x DECIMAL(10,2));"
        );
        assert_eq!(rewrite("x STORAGE (INITIAL 1"), "x STORAGE (INITIAL 1");
        assert_eq!(rewrite("SELECT 'STORAGE (1)' FROM t"), "SELECT 'STORAGE (1)' FROM t");
        let out = SyntaxRewriter::oracle().rewrite("t (a INT) STORAGE (NEXT 1M)");
        assert_eq!(out.applied, vec!["storage"]);
    }

    #[test]
    fn test_precision_rules_run_before_generic_number() {
        assert_eq!(
            rewrite("a NUMBER(10), b NUMBER(19), c NUMBER(1), d NUMBER(8, 3), e NUMBER"),
            "a INTEGER, b BIGINT, c BOOLEAN, d DECIMAL(8,3), e NUMERIC"
        );
        assert_eq!(rewrite("x NUMBER(5)"), "x NUMERIC(5)");
        assert_eq!(rewrite("name VARCHAR2(40)"), "name VARCHAR(40)");
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let once = rewrite("CREATE TABLE t (a NUMBER(10,2), b VARCHAR2(5), c DATE DEFAULT SYSDATE)");
        assert_eq!(rewrite(&once), once);
        let already = "CREATE TABLE t (a NUMERIC, b VARCHAR(5))";
        assert_eq!(rewrite(already), already);
    }

    #[test]
    fn test_literals_and_comments_are_untouched() {
        assert_eq!(
            rewrite("x NUMBER DEFAULT 'NUMBER' -- SYSDATE"),
            "x NUMERIC DEFAULT 'NUMBER' -- SYSDATE"
        );
    }

    #[test]
    fn test_applied_rule_names() {
        let out = SyntaxRewriter::oracle().rewrite("a VARCHAR2(1) DEFAULT SYSDATE");
        assert_eq!(out.applied, vec!["sysdate", "varchar2"]);
    }

    #[test]
    fn test_audit_reports_manual_constructs() {
        let warnings =
            audit_oracle("SELECT DECODE(a, 1, 'x') FROM dual WHERE ROWNUM < 2 AND t.a = r.b(+)");
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].starts_with("DECODE()"));
        assert!(warnings.iter().any(|w| w.starts_with("ROWNUM")));
        assert!(warnings.iter().any(|w| w.starts_with("DUAL")));
        assert!(warnings.iter().any(|w| w.starts_with("(+)")));
    }

    #[test]
    fn test_audit_ignores_literals() {
        assert!(audit_oracle("SELECT 'DECODE(' FROM t -- ROWNUM").is_empty());
        assert!(audit_oracle("SELECT nvl(a, b) FROM t").is_empty());
    }
}
