//! Oracle type vocabulary.

use super::TypeRule;

/// Oracle to PostgreSQL.
pub(super) const TO_POSTGRES: &[TypeRule] = &[
    // Numeric
    TypeRule::sized("NUMBER", "NUMERIC"),
    TypeRule::scaled("NUMBER", "DECIMAL"),
    TypeRule::fixed("NUMBER(10)", "INTEGER"),
    TypeRule::fixed("NUMBER(19)", "BIGINT"),
    TypeRule::fixed("NUMBER(10,2)", "DECIMAL(10,2)"),
    TypeRule::fixed("NUMBER(19,2)", "DECIMAL(19,2)"),
    TypeRule::fixed("NUMBER(38)", "NUMERIC"),
    TypeRule::fixed("NUMBER(1)", "BOOLEAN"),
    TypeRule::fixed("BINARY_FLOAT", "REAL"),
    TypeRule::fixed("BINARY_DOUBLE", "DOUBLE PRECISION"),
    // String
    TypeRule::sized("VARCHAR2", "VARCHAR"),
    TypeRule::sized("NVARCHAR2", "VARCHAR"),
    TypeRule::sized("CHAR", "CHAR"),
    TypeRule::sized("NCHAR", "CHAR"),
    TypeRule::fixed("CLOB", "TEXT"),
    TypeRule::fixed("NCLOB", "TEXT"),
    TypeRule::fixed("LONG", "TEXT"),
    // Date / time
    TypeRule::fixed("DATE", "TIMESTAMP"),
    TypeRule::sized("TIMESTAMP", "TIMESTAMP"),
    TypeRule::sized("TIMESTAMP WITH TIME ZONE", "TIMESTAMPTZ"),
    TypeRule::sized("TIMESTAMP WITH LOCAL TIME ZONE", "TIMESTAMPTZ"),
    TypeRule::fixed("INTERVAL YEAR TO MONTH", "INTERVAL"),
    TypeRule::fixed("INTERVAL DAY TO SECOND", "INTERVAL"),
    // Binary
    TypeRule::fixed("BLOB", "BYTEA"),
    TypeRule::fixed("RAW", "BYTEA"),
    TypeRule::fixed("LONG RAW", "BYTEA"),
    // Special
    TypeRule::fixed("ROWID", "TEXT"),
    TypeRule::fixed("UROWID", "TEXT"),
    TypeRule::fixed("XMLTYPE", "XML"),
];
