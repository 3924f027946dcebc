//! DDL Parser.
//!
//! Extracts [`SqlTable`] records from `CREATE TABLE` statements in a script.
//! This is a best-effort model, not a SQL grammar: statements that cannot be
//! parsed are skipped, column fragments of unexpected shape are dropped, and
//! everything that is not `CREATE TABLE` or `CREATE INDEX` is ignored.
//!
//! ```
//! use sqlport_core::ddl::parse_create_table;
//!
//! let tables = parse_create_table(
//!     "CREATE TABLE orders (order_id NUMBER PRIMARY KEY, total NUMBER(10,2) DEFAULT 0)",
//! );
//! assert_eq!(tables[0].name, "orders");
//! assert_eq!(tables[0].primary_key.as_deref(), Some("order_id"));
//! assert_eq!(tables[0].columns[1].default.as_deref(), Some("0"));
//! ```

mod parser;

pub use parser::DdlParser;

use crate::dialect::Dialect;
use crate::schema::SqlTable;

/// Parses every `CREATE TABLE` statement in `sql`, tagging tables as
/// PostgreSQL.
#[must_use]
pub fn parse_create_table(sql: &str) -> Vec<SqlTable> {
    parse_create_table_with_dialect(sql, Dialect::PostgreSql)
}

/// Parses every `CREATE TABLE` statement in `sql`, tagging tables with
/// `dialect`.
#[must_use]
pub fn parse_create_table_with_dialect(sql: &str, dialect: Dialect) -> Vec<SqlTable> {
    DdlParser::new(sql, dialect).parse()
}
