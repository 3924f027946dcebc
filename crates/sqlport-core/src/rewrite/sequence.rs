//! Sequence-backed identity columns.
//!
//! Oracle has no auto-increment column type; identity columns are written as
//! `id NUMBER DEFAULT orders_seq.NEXTVAL`. Those become `id SERIAL`. The
//! sequence itself is not checked and `CREATE SEQUENCE` statements are kept.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::source::rewrite_code;

static NEXTVAL_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b([\w$#]+)\s+(?:NUMBER|NUMERIC|INTEGER|INT|BIGINT|DECIMAL)(?:\s*\(\s*\d+\s*(?:,\s*\d+\s*)?\))?\s+DEFAULT\s+((?:[\w$#]+\.)?[\w$#]+)\.NEXTVAL\b",
    )
    .expect("static sequence pattern compiles")
});

/// A column rewritten to `SERIAL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceColumn {
    /// Column name.
    pub column: String,
    /// Sequence that fed it.
    pub sequence: String,
}

/// Rewrites every `col <numeric type> DEFAULT seq.NEXTVAL` to `col SERIAL`.
#[must_use]
pub fn convert_sequences(sql: &str) -> (String, Vec<SequenceColumn>) {
    let mut converted = Vec::new();
    let text = rewrite_code(sql, |code| {
        NEXTVAL_COLUMN
            .replace_all(code, |caps: &Captures<'_>| {
                let column = caps[1].to_string();
                let sequence = caps[2].to_string();
                debug!(%column, %sequence, "sequence column to SERIAL");
                let replacement = format!("{column} SERIAL");
                converted.push(SequenceColumn { column, sequence });
                replacement
            })
            .into_owned()
    });
    (text, converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nextval_default_becomes_serial() {
        let (sql, columns) =
            convert_sequences("CREATE TABLE t (id NUMBER DEFAULT t_seq.NEXTVAL PRIMARY KEY)");
        assert_eq!(sql, "CREATE TABLE t (id SERIAL PRIMARY KEY)");
        assert_eq!(
            columns,
            vec![SequenceColumn {
                column: "id".into(),
                sequence: "t_seq".into()
            }]
        );
    }

    #[test]
    fn test_mapped_types_and_schema_qualified_sequences() {
        let (sql, columns) = convert_sequences(
            "a NUMERIC default hr.a_seq.nextval,\n b INTEGER DEFAULT b_seq.NEXTVAL NOT NULL",
        );
        assert_eq!(sql, "a SERIAL,\n b SERIAL NOT NULL");
        assert_eq!(columns[0].sequence, "hr.a_seq");
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn test_sized_number_before_default() {
        let (sql, _) = convert_sequences("id NUMBER(10, 0) DEFAULT s.NEXTVAL");
        assert_eq!(sql, "id SERIAL");
    }

    #[test]
    fn test_other_defaults_are_kept() {
        let input = "id NUMBER DEFAULT 0, code VARCHAR(10) DEFAULT s.NEXTVAL";
        let (sql, columns) = convert_sequences(input);
        assert_eq!(sql, input);
        assert!(columns.is_empty());
    }
}
