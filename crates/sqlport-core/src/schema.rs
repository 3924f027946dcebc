//! Schema model produced by the DDL parser and the schema converter.
//!
//! These are plain data records. Everything derives serde so that callers can
//! persist parsed tables and conversion logs as JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;

/// A column definition from a `CREATE TABLE` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name as written (quotes removed).
    pub name: String,
    /// Declared type as written, e.g. `NUMBER(10,2)`.
    pub data_type: String,
    /// False only when `NOT NULL` is declared.
    pub nullable: bool,
    /// Declared `PRIMARY KEY` inline.
    pub is_primary_key: bool,
    /// Declared `UNIQUE` inline.
    pub is_unique: bool,
    /// `DEFAULT` expression as written.
    pub default: Option<String>,
}

impl Column {
    /// Creates a nullable column with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            is_primary_key: false,
            is_unique: false,
            default: None,
        }
    }

    /// Returns the upper-case type name without its argument list, e.g.
    /// `NUMBER` for `number(10, 2)`.
    #[must_use]
    pub fn base_type(&self) -> String {
        let base = self
            .data_type
            .split('(')
            .next()
            .unwrap_or_default()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        base.to_ascii_uppercase()
    }
}

/// A foreign key reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Referencing column in this table.
    pub column: String,
    /// Referenced table.
    pub references_table: String,
    /// Referenced column.
    pub references_column: String,
}

/// A table extracted from one `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlTable {
    /// Table name. Qualified names keep their schema prefix (`hr.orders`).
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Primary key column.
    pub primary_key: Option<String>,
    /// Foreign keys, table-level and inline.
    pub foreign_keys: Vec<ForeignKey>,
    /// Names of indexes created on this table.
    pub indexes: Vec<String>,
    /// The matched statement, verbatim.
    #[serde(skip_serializing, default)]
    pub original_sql: String,
    /// Dialect the statement was parsed as.
    pub dialect: Dialect,
}

impl SqlTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
            original_sql: String::new(),
            dialect,
        }
    }

    /// Looks up a column by name, ignoring case.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Returns true if `self` names `other`, ignoring case.
    #[must_use]
    pub fn is_named(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other)
    }
}

/// Audit record for one renamed table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlTransformation {
    /// Name before renaming.
    pub original_table: String,
    /// Name after renaming.
    pub new_table: String,
    /// Column renames applied for this table.
    pub column_mappings: BTreeMap<String, String>,
    /// Column name to `declared -> converted` type.
    pub type_conversions: BTreeMap<String, String>,
    /// Dialect pair tag, e.g. `oracle_to_postgresql`.
    pub dialect_conversion: String,
}

impl SqlTransformation {
    /// Creates a transformation with empty audit maps.
    #[must_use]
    pub fn new(
        original_table: impl Into<String>,
        new_table: impl Into<String>,
        dialect_conversion: impl Into<String>,
    ) -> Self {
        Self {
            original_table: original_table.into(),
            new_table: new_table.into(),
            column_mappings: BTreeMap::new(),
            type_conversions: BTreeMap::new(),
            dialect_conversion: dialect_conversion.into(),
        }
    }
}

/// Outcome of one schema conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// False if any error was recorded.
    pub success: bool,
    /// Converted text. Partial when `success` is false.
    pub converted_sql: String,
    /// One record per renamed table.
    pub transformations: Vec<SqlTransformation>,
    /// `old -> new` labels.
    pub tables_converted: Vec<String>,
    /// Non-fatal findings.
    pub warnings: Vec<String>,
    /// Fatal findings.
    pub errors: Vec<String>,
}

impl ConversionResult {
    /// Returns the transformation for `table`, matched on either name.
    #[must_use]
    pub fn transformation(&self, table: &str) -> Option<&SqlTransformation> {
        self.transformations.iter().find(|t| {
            t.original_table.eq_ignore_ascii_case(table) || t.new_table.eq_ignore_ascii_case(table)
        })
    }
}
