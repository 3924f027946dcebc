//! # sqlport-core
//!
//! A SQL dialect transpiler for moving schemas between Oracle, MySQL and
//! PostgreSQL.
//!
//! This crate provides:
//! - A hand-written lexer and recursive descent parsers for `CREATE TABLE`
//!   statements and stored procedure signatures
//! - Longest-match type mapping per dialect pair
//! - Oracle syntax rewriting and sequence column conversion
//! - Entity-driven table and column renaming with an audit trail
//! - Python method stubs generated from PL/SQL procedure signatures
//! - Table-level migration diffs
//!
//! ## Converting a schema
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use sqlport_core::{convert_schema, DialectPair};
//!
//! let mut tables = BTreeMap::new();
//! tables.insert("users".to_string(), "customers".to_string());
//!
//! let result = convert_schema(
//!     "CREATE TABLE users (id NUMBER(10) PRIMARY KEY, name VARCHAR2(100))",
//!     &tables,
//!     &BTreeMap::new(),
//!     DialectPair::ORACLE_TO_POSTGRES,
//! );
//!
//! assert!(result.success);
//! assert_eq!(
//!     result.converted_sql,
//!     "CREATE TABLE customers (id INTEGER PRIMARY KEY, name VARCHAR(100))"
//! );
//! ```
//!
//! ## Procedure stubs
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use sqlport_core::convert_to_python;
//!
//! let stub = convert_to_python(
//!     "CREATE OR REPLACE PROCEDURE SP_GET_USER(p_user_id IN NUMBER, p_name OUT VARCHAR2)",
//!     &BTreeMap::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(stub.name, "get_user");
//! assert!(stub.to_python().contains("user_id: int"));
//! ```

pub mod config;
pub mod converter;
pub mod ddl;
pub mod dialect;
pub mod error;
pub mod lexer;
pub mod migration;
pub mod procedure;
pub mod rewrite;
pub mod schema;
pub mod source;
pub mod typemap;

pub use config::ConversionConfig;
pub use converter::{convert_oracle_to_postgres, convert_schema, ConverterOptions, SchemaConverter};
pub use ddl::{parse_create_table, parse_create_table_with_dialect};
pub use dialect::{Dialect, DialectPair};
pub use error::{ParseError, Result, TranspileError};
pub use migration::{generate_migration, MigrationPlan, MigrationStep};
pub use procedure::{convert_to_python, MethodStub, ProcedureParameter, ProcedureTranspiler};
pub use schema::{Column, ConversionResult, ForeignKey, SqlTable, SqlTransformation};
pub use typemap::TypeMapper;

/// Common imports.
pub mod prelude {
    pub use crate::config::ConversionConfig;
    pub use crate::converter::{convert_schema, ConverterOptions, SchemaConverter};
    pub use crate::ddl::parse_create_table;
    pub use crate::dialect::{Dialect, DialectPair};
    pub use crate::error::{Result, TranspileError};
    pub use crate::migration::generate_migration;
    pub use crate::procedure::convert_to_python;
    pub use crate::schema::{Column, ConversionResult, SqlTable, SqlTransformation};
}
