//! MySQL type vocabulary.

use super::TypeRule;

/// MySQL to PostgreSQL.
///
/// Integer display widths (`INT(11)`) carry no meaning in PostgreSQL and are
/// dropped; `TINYINT(1)` is MySQL's boolean idiom.
pub(super) const TO_POSTGRES: &[TypeRule] = &[
    // Numeric
    TypeRule::fixed("TINYINT(1)", "BOOLEAN"),
    TypeRule::fixed("TINYINT", "SMALLINT"),
    TypeRule::fixed("SMALLINT", "SMALLINT"),
    TypeRule::fixed("MEDIUMINT", "INTEGER"),
    TypeRule::fixed("INT", "INTEGER"),
    TypeRule::fixed("INTEGER", "INTEGER"),
    TypeRule::fixed("BIGINT", "BIGINT"),
    TypeRule::sized("DECIMAL", "DECIMAL"),
    TypeRule::sized("NUMERIC", "NUMERIC"),
    TypeRule::fixed("FLOAT", "REAL"),
    TypeRule::fixed("DOUBLE", "DOUBLE PRECISION"),
    TypeRule::fixed("DOUBLE PRECISION", "DOUBLE PRECISION"),
    // String
    TypeRule::sized("VARCHAR", "VARCHAR"),
    TypeRule::sized("CHAR", "CHAR"),
    TypeRule::fixed("TINYTEXT", "TEXT"),
    TypeRule::fixed("TEXT", "TEXT"),
    TypeRule::fixed("MEDIUMTEXT", "TEXT"),
    TypeRule::fixed("LONGTEXT", "TEXT"),
    TypeRule::with_args("ENUM", "VARCHAR(255)"),
    TypeRule::with_args("SET", "VARCHAR(255)"),
    // Date / time
    TypeRule::fixed("DATE", "DATE"),
    TypeRule::sized("DATETIME", "TIMESTAMP"),
    TypeRule::sized("TIMESTAMP", "TIMESTAMP"),
    TypeRule::sized("TIME", "TIME"),
    TypeRule::fixed("YEAR", "SMALLINT"),
    // Binary
    TypeRule::fixed("TINYBLOB", "BYTEA"),
    TypeRule::fixed("BLOB", "BYTEA"),
    TypeRule::fixed("MEDIUMBLOB", "BYTEA"),
    TypeRule::fixed("LONGBLOB", "BYTEA"),
    TypeRule::fixed("BINARY", "BYTEA"),
    TypeRule::fixed("VARBINARY", "BYTEA"),
    // Boolean
    TypeRule::fixed("BOOL", "BOOLEAN"),
    TypeRule::fixed("BOOLEAN", "BOOLEAN"),
    // JSON
    TypeRule::fixed("JSON", "JSONB"),
];
