//! Migration diff generation.
//!
//! Compares two table sets by lower-cased name. Only table existence is
//! diffed: tables present in both sets are left untouched, whatever their
//! columns.

use std::collections::HashSet;

use serde::Serialize;

use crate::schema::SqlTable;

/// One migration statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MigrationStep {
    /// A table only in the target set.
    CreateTable {
        /// Table name.
        name: String,
        /// `CREATE TABLE` statement, terminated with `;`.
        sql: String,
    },
    /// A table only in the source set.
    DropTable {
        /// Table name.
        name: String,
    },
}

impl MigrationStep {
    /// Returns the table the step applies to.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            Self::CreateTable { name, .. } | Self::DropTable { name } => name,
        }
    }

    /// Renders the step with its comment line.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::CreateTable { name, sql } => format!("-- Create new table: {name}\n{sql}"),
            Self::DropTable { name } => {
                format!("-- Drop table: {name}\nDROP TABLE IF EXISTS {name} CASCADE;")
            }
        }
    }
}

/// The structural delta between two table sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    /// Creates in target order, then drops in source order.
    pub steps: Vec<MigrationStep>,
    /// Tables present in both sets, in target order.
    pub unchanged: Vec<String>,
}

impl MigrationPlan {
    /// Diffs `from` against `to`.
    ///
    /// Names compare case-insensitively. When a set names a table twice, the
    /// first occurrence is used.
    #[must_use]
    pub fn between(from: &[SqlTable], to: &[SqlTable]) -> Self {
        let from = dedup(from);
        let to = dedup(to);
        let from_names: HashSet<String> = from.iter().map(|t| t.name.to_lowercase()).collect();
        let to_names: HashSet<String> = to.iter().map(|t| t.name.to_lowercase()).collect();

        let mut plan = Self::default();
        for table in &to {
            if from_names.contains(&table.name.to_lowercase()) {
                plan.unchanged.push(table.name.clone());
            } else {
                plan.steps.push(MigrationStep::CreateTable {
                    name: table.name.clone(),
                    sql: create_statement(table),
                });
            }
        }
        for table in &from {
            if !to_names.contains(&table.name.to_lowercase()) {
                plan.steps.push(MigrationStep::DropTable {
                    name: table.name.clone(),
                });
            }
        }
        plan
    }

    /// Returns true if no statement is needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Renders the migration script.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut lines = vec![
            "-- Migration Script".to_string(),
            format!("-- Generated by sqlport {}", env!("CARGO_PKG_VERSION")),
            String::new(),
        ];
        for step in &self.steps {
            lines.push(step.to_sql());
            lines.push(String::new());
        }
        lines.join("\n")
    }
}

/// Generates the migration script turning `from` into `to`.
#[must_use]
pub fn generate_migration(from: &[SqlTable], to: &[SqlTable]) -> String {
    MigrationPlan::between(from, to).to_sql()
}

fn dedup(tables: &[SqlTable]) -> Vec<&SqlTable> {
    let mut seen = HashSet::new();
    tables
        .iter()
        .filter(|table| seen.insert(table.name.to_lowercase()))
        .collect()
}

/// Returns the captured statement, or one rebuilt from the column model when
/// none was captured (tables loaded from JSON).
fn create_statement(table: &SqlTable) -> String {
    let captured = table.original_sql.trim();
    if !captured.is_empty() {
        return if captured.ends_with(';') {
            captured.to_string()
        } else {
            format!("{captured};")
        };
    }

    let mut definitions: Vec<String> = table
        .columns
        .iter()
        .map(|column| {
            let mut definition = format!("    {} {}", column.name, column.data_type);
            if let Some(default) = &column.default {
                definition.push_str(" DEFAULT ");
                definition.push_str(default);
            }
            if !column.nullable {
                definition.push_str(" NOT NULL");
            }
            if column.is_unique {
                definition.push_str(" UNIQUE");
            }
            definition
        })
        .collect();
    if let Some(pk) = &table.primary_key {
        definitions.push(format!("    PRIMARY KEY ({pk})"));
    }
    for fk in &table.foreign_keys {
        let target = if fk.references_column.is_empty() {
            fk.references_table.clone()
        } else {
            format!("{} ({})", fk.references_table, fk.references_column)
        };
        definitions.push(format!("    FOREIGN KEY ({}) REFERENCES {target}", fk.column));
    }
    format!(
        "CREATE TABLE {} (\n{}\n);",
        table.name,
        definitions.join(",\n")
    )
}
