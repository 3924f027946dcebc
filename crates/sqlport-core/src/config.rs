//! Conversion configuration.
//!
//! A JSON document carrying the dialect pair and the entity mapping:
//!
//! ```json
//! {
//!   "source": "oracle",
//!   "target": "postgresql",
//!   "tables": { "users": "customers" },
//!   "columns": { "users": { "email": "contact_email" } },
//!   "entities": { "User": "Customer" },
//!   "strict": false
//! }
//! ```
//!
//! Every field is optional.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::converter::ConverterOptions;
use crate::dialect::{Dialect, DialectPair};
use crate::error::Result;

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Dialect of the input.
    pub source: Dialect,
    /// Dialect of the output.
    pub target: Dialect,
    /// Table renames, old to new.
    pub tables: BTreeMap<String, String>,
    /// Column renames per original table name, old to new.
    pub columns: BTreeMap<String, BTreeMap<String, String>>,
    /// Entity renames applied to procedure and parameter names.
    pub entities: BTreeMap<String, String>,
    /// Treat unmapped column types as errors.
    pub strict: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            source: Dialect::Oracle,
            target: Dialect::PostgreSql,
            tables: BTreeMap::new(),
            columns: BTreeMap::new(),
            entities: BTreeMap::new(),
            strict: false,
        }
    }
}

impl ConversionConfig {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TranspileError::Config`] if the document is not valid
    /// JSON or names an unknown dialect.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the configured conversion direction.
    #[must_use]
    pub const fn pair(&self) -> DialectPair {
        DialectPair::new(self.source, self.target)
    }

    /// Returns the converter options.
    #[must_use]
    pub const fn options(&self) -> ConverterOptions {
        ConverterOptions {
            strict_types: self.strict,
        }
    }
}
