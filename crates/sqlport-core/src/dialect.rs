//! SQL dialects and conversion directions.
//!
//! A conversion is always a (source, target) pair. Type tables and syntax
//! rules hang off the pair itself, so there is no string-keyed lookup; the
//! `"oracle_to_postgresql"` form only exists for display and configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TranspileError;
use crate::typemap::{self, TypeMapper};

/// A named SQL variant with its own type vocabulary and syntax idioms.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Oracle Database SQL and PL/SQL.
    Oracle,
    /// MySQL / MariaDB.
    #[serde(rename = "mysql")]
    MySql,
    /// PostgreSQL.
    #[default]
    #[serde(rename = "postgresql", alias = "postgres")]
    PostgreSql,
}

impl Dialect {
    /// Returns the lowercase dialect name used in tags.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Oracle => "oracle",
            Self::MySql => "mysql",
            Self::PostgreSql => "postgresql",
        }
    }

    /// Returns true if `base` (an upper-case type name without arguments) is
    /// part of this dialect's own type vocabulary.
    #[must_use]
    pub fn is_native_type(&self, base: &str) -> bool {
        let native: &[&str] = match self {
            Self::PostgreSql => &[
                "SMALLINT",
                "INTEGER",
                "INT",
                "BIGINT",
                "SERIAL",
                "BIGSERIAL",
                "SMALLSERIAL",
                "NUMERIC",
                "DECIMAL",
                "REAL",
                "FLOAT",
                "DOUBLE PRECISION",
                "MONEY",
                "TEXT",
                "VARCHAR",
                "CHARACTER VARYING",
                "CHAR",
                "CHARACTER",
                "BOOLEAN",
                "BOOL",
                "DATE",
                "TIME",
                "TIMESTAMP",
                "TIMESTAMPTZ",
                "INTERVAL",
                "BYTEA",
                "JSON",
                "JSONB",
                "UUID",
                "XML",
                "INET",
                "CIDR",
            ],
            Self::Oracle => &[
                "NUMBER",
                "INTEGER",
                "FLOAT",
                "BINARY_FLOAT",
                "BINARY_DOUBLE",
                "VARCHAR2",
                "NVARCHAR2",
                "CHAR",
                "NCHAR",
                "CLOB",
                "NCLOB",
                "BLOB",
                "RAW",
                "LONG",
                "DATE",
                "TIMESTAMP",
                "ROWID",
                "XMLTYPE",
            ],
            Self::MySql => &[
                "TINYINT",
                "SMALLINT",
                "MEDIUMINT",
                "INT",
                "INTEGER",
                "BIGINT",
                "DECIMAL",
                "FLOAT",
                "DOUBLE",
                "VARCHAR",
                "CHAR",
                "TEXT",
                "BLOB",
                "DATE",
                "DATETIME",
                "TIMESTAMP",
                "JSON",
            ],
        };
        native.contains(&base)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = TranspileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oracle" => Ok(Self::Oracle),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "postgresql" | "postgres" | "pg" => Ok(Self::PostgreSql),
            other => Err(TranspileError::UnknownDialect(other.to_string())),
        }
    }
}

/// A conversion direction: rewrite `source` SQL into `target` SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialectPair {
    /// Dialect of the input text.
    pub source: Dialect,
    /// Dialect of the output text.
    pub target: Dialect,
}

impl DialectPair {
    /// Oracle to PostgreSQL.
    pub const ORACLE_TO_POSTGRES: Self = Self::new(Dialect::Oracle, Dialect::PostgreSql);
    /// MySQL to PostgreSQL.
    pub const MYSQL_TO_POSTGRES: Self = Self::new(Dialect::MySql, Dialect::PostgreSql);

    /// Creates a new pair.
    #[must_use]
    pub const fn new(source: Dialect, target: Dialect) -> Self {
        Self { source, target }
    }

    /// Returns the `source_to_target` tag, e.g. `"oracle_to_postgresql"`.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}_to_{}", self.source.name(), self.target.name())
    }

    /// Returns the type mapper for this direction, if one exists.
    #[must_use]
    pub fn type_mapper(&self) -> Option<&'static TypeMapper> {
        match (self.source, self.target) {
            (Dialect::Oracle, Dialect::PostgreSql) => Some(typemap::oracle_to_postgres()),
            (Dialect::MySql, Dialect::PostgreSql) => Some(typemap::mysql_to_postgres()),
            _ => None,
        }
    }

    /// Returns true if Oracle-specific syntax rewriting applies.
    #[must_use]
    pub const fn rewrites_oracle_syntax(&self) -> bool {
        matches!(self.source, Dialect::Oracle)
    }

    /// Returns true if `DEFAULT seq.NEXTVAL` columns become `SERIAL`.
    #[must_use]
    pub const fn converts_sequences(&self) -> bool {
        matches!(
            (self.source, self.target),
            (Dialect::Oracle, Dialect::PostgreSql)
        )
    }
}

impl fmt::Display for DialectPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl FromStr for DialectPair {
    type Err = TranspileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let (source, target) = lowered
            .split_once("_to_")
            .ok_or_else(|| TranspileError::UnknownDialect(s.to_string()))?;
        Ok(Self::new(source.parse()?, target.parse()?))
    }
}
