//! Schema Converter.
//!
//! Runs the rewrite stages in order over one SQL script:
//!
//! 1. type mapping for the dialect pair,
//! 2. Oracle syntax rewriting (Oracle sources only),
//! 3. table then column renaming,
//! 4. sequence columns to `SERIAL` (Oracle to PostgreSQL only),
//! 5. whitespace cleanup.
//!
//! Conversion never fails outright. Problems land in
//! [`ConversionResult::errors`] with `success` cleared, and the text converted
//! so far is kept.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::ddl::parse_create_table_with_dialect;
use crate::dialect::DialectPair;
use crate::error::{Result, TranspileError};
use crate::rewrite::{audit_oracle, cleanup, convert_sequences, IdentifierRewriter, SyntaxRewriter};
use crate::schema::{ConversionResult, SqlTable, SqlTransformation};
use crate::typemap::TypeMapper;

/// Behaviour switches for [`SchemaConverter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Report unmapped column types as errors instead of warnings.
    pub strict_types: bool,
}

/// The conversion pipeline.
#[derive(Debug, Clone, Default)]
pub struct SchemaConverter {
    options: ConverterOptions,
}

impl SchemaConverter {
    /// Creates a converter.
    #[must_use]
    pub const fn new(options: ConverterOptions) -> Self {
        Self { options }
    }

    /// Converts `sql` along `pair`, renaming tables and columns on the way.
    ///
    /// `columns` is keyed by original table name.
    #[must_use]
    pub fn convert(
        &self,
        sql: &str,
        tables: &BTreeMap<String, String>,
        columns: &BTreeMap<String, BTreeMap<String, String>>,
        pair: DialectPair,
    ) -> ConversionResult {
        let mut result = ConversionResult {
            converted_sql: sql.to_string(),
            ..ConversionResult::default()
        };
        let parsed = parse_create_table_with_dialect(sql, pair.source);
        let mapper = pair.type_mapper();

        match mapper {
            Some(mapper) => {
                self.check_types(&parsed, mapper, pair, &mut result);
                let mapped = mapper.convert(&result.converted_sql);
                debug!(
                    stage = "types",
                    pair = %pair,
                    conversions = mapped.conversions.len(),
                    "mapped types"
                );
                result.converted_sql = mapped.text;
            }
            None if pair.source == pair.target => {}
            None => {
                let message = TranspileError::UnsupportedPair {
                    from: pair.source,
                    to: pair.target,
                }
                .to_string();
                record_warning(&mut result, format!("{message}; types left unchanged"));
            }
        }

        if pair.rewrites_oracle_syntax() {
            let rewritten = SyntaxRewriter::oracle().rewrite(&result.converted_sql);
            debug!(stage = "syntax", rules = ?rewritten.applied, "rewrote Oracle syntax");
            result.converted_sql = rewritten.text;
            for message in audit_oracle(&result.converted_sql) {
                record_warning(&mut result, message);
            }
        }

        match IdentifierRewriter::new(tables, columns).rewrite(&result.converted_sql, pair) {
            Ok(renamed) => {
                result.converted_sql = renamed.text;
                result.transformations = renamed.transformations;
                result.tables_converted = renamed.tables_converted;
                result.warnings.extend(renamed.warnings);
            }
            Err(err) => record_error(&mut result, &err),
        }

        if let Some(mapper) = mapper {
            record_type_conversions(&parsed, mapper, &mut result.transformations);
        }

        if pair.converts_sequences() {
            let (text, sequences) = convert_sequences(&result.converted_sql);
            debug!(stage = "sequences", columns = sequences.len(), "converted sequences");
            result.converted_sql = text;
        }

        result.converted_sql = cleanup(&result.converted_sql);
        result.success = result.errors.is_empty();
        debug!(
            success = result.success,
            tables = parsed.len(),
            warnings = result.warnings.len(),
            errors = result.errors.len(),
            "conversion finished"
        );
        result
    }

    /// Reports every column whose declared type is neither mapped by
    /// `mapper` nor native to the target dialect.
    fn check_types(
        &self,
        tables: &[SqlTable],
        mapper: &TypeMapper,
        pair: DialectPair,
        result: &mut ConversionResult,
    ) {
        for table in tables {
            for column in &table.columns {
                if mapper.map_type(&column.data_type).is_some()
                    || pair.target.is_native_type(&column.base_type())
                {
                    continue;
                }
                let err = TranspileError::UnmappedType {
                    table: table.name.clone(),
                    column: column.name.clone(),
                    type_name: column.data_type.clone(),
                };
                if self.options.strict_types {
                    record_error(result, &err);
                } else {
                    record_warning(result, err.to_string());
                }
            }
        }
    }
}

/// Converts with default options.
#[must_use]
pub fn convert_schema(
    sql: &str,
    tables: &BTreeMap<String, String>,
    columns: &BTreeMap<String, BTreeMap<String, String>>,
    pair: DialectPair,
) -> ConversionResult {
    SchemaConverter::default().convert(sql, tables, columns, pair)
}

/// Converts Oracle SQL to PostgreSQL.
///
/// # Errors
///
/// Returns [`TranspileError::Conversion`] with every recorded error if the
/// conversion did not succeed.
pub fn convert_oracle_to_postgres(
    sql: &str,
    tables: &BTreeMap<String, String>,
    columns: &BTreeMap<String, BTreeMap<String, String>>,
) -> Result<(String, Vec<SqlTransformation>)> {
    let result = convert_schema(sql, tables, columns, DialectPair::ORACLE_TO_POSTGRES);
    if !result.success {
        return Err(TranspileError::Conversion(result.errors));
    }
    Ok((result.converted_sql, result.transformations))
}

fn record_type_conversions(
    tables: &[SqlTable],
    mapper: &TypeMapper,
    transformations: &mut [SqlTransformation],
) {
    for transformation in transformations.iter_mut() {
        let Some(table) = tables.iter().find(|t| t.is_named(&transformation.original_table)) else {
            continue;
        };
        for column in &table.columns {
            if let Some(converted) = mapper.map_type(&column.data_type) {
                transformation.type_conversions.insert(
                    column.name.clone(),
                    format!("{} -> {converted}", column.data_type),
                );
            }
        }
    }
}

fn record_warning(result: &mut ConversionResult, message: String) {
    warn!("{message}");
    result.warnings.push(message);
}

fn record_error(result: &mut ConversionResult, err: &TranspileError) {
    let message = format!("Conversion failed: {err}");
    warn!("{message}");
    result.errors.push(message);
}
