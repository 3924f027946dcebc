//! Procedure Transpiler.
//!
//! Turns the signature of a PL/SQL stored procedure into a Python async
//! method stub. Only the interface is transpiled: IN and IN OUT parameters
//! become arguments, OUT and IN OUT parameters become the return value, and
//! the body is a placeholder.
//!
//! ```
//! use std::collections::BTreeMap;
//! use sqlport_core::procedure::convert_to_python;
//!
//! let stub = convert_to_python(
//!     "CREATE PROCEDURE SP_CREATE_ORDER(p_customer_id IN NUMBER, p_order_id OUT NUMBER)",
//!     &BTreeMap::new(),
//! )
//! .unwrap();
//! assert_eq!(stub.name, "create_order");
//! assert!(stub.to_python().contains("customer_id: int,"));
//! assert!(stub.to_python().contains(") -> int:"));
//! ```

mod parser;
mod python;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use parser::{parse_signature, DeclaredParameter, Signature};
pub use python::{apply_entity_mapping, method_name, parameter_name, snake_case};

use crate::error::{Result, TranspileError};

/// Text returned by [`MethodStub::render_or_sentinel`] when no procedure
/// header was found.
pub const UNPARSED_SENTINEL: &str = "# Could not parse procedure";

/// Parameter passing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParameterDirection {
    /// Input only. The default when no mode is written.
    #[default]
    In,
    /// Output only.
    Out,
    /// Input and output.
    InOut,
}

impl ParameterDirection {
    /// Returns true if the caller passes a value.
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::In | Self::InOut)
    }

    /// Returns true if the procedure hands a value back.
    #[must_use]
    pub const fn is_output(self) -> bool {
        matches!(self, Self::Out | Self::InOut)
    }
}

/// Target-language type a PL/SQL type is classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// `NUMBER`, `INTEGER`, `PLS_INTEGER`, ...
    Integer,
    /// `VARCHAR2`, `CHAR`, `NVARCHAR2`, ...
    String,
    /// `DATE`, `TIMESTAMP`, ...
    DateTime,
    /// `CLOB`, `BLOB`, `NCLOB`.
    Bytes,
    /// `SYS_REFCURSOR` and other cursor types.
    Records,
    /// `BOOLEAN`.
    Boolean,
    /// Anything else, including anchored `%TYPE` declarations.
    Any,
}

impl TargetType {
    /// Classifies a declared PL/SQL type.
    #[must_use]
    pub fn classify(source_type: &str) -> Self {
        if source_type.contains('%') {
            return Self::Any;
        }
        let base = source_type
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_uppercase();

        if base.contains("CURSOR") {
            Self::Records
        } else if base.contains("NUMBER") || (base.contains("INT") && !base.contains("INTERVAL")) {
            Self::Integer
        } else if base.contains("CHAR") {
            Self::String
        } else if base.contains("DATE") || base.contains("TIMESTAMP") {
            Self::DateTime
        } else if base.contains("CLOB") || base.contains("BLOB") {
            Self::Bytes
        } else if base.contains("BOOLEAN") {
            Self::Boolean
        } else {
            Self::Any
        }
    }

    /// Returns the Python type hint.
    #[must_use]
    pub const fn python(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::String => "str",
            Self::DateTime => "datetime",
            Self::Bytes => "bytes",
            Self::Records => "list[dict[str, Any]]",
            Self::Boolean => "bool",
            Self::Any => "Any",
        }
    }
}

/// A classified procedure parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureParameter {
    /// Target-language name (`p_` stripped, entity mapping applied).
    pub name: String,
    /// Passing mode.
    pub direction: ParameterDirection,
    /// Declared PL/SQL type.
    pub source_type: String,
    /// Classified target type.
    pub target_type: TargetType,
}

/// What the stub returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnShape<'a> {
    /// No OUT parameters.
    None,
    /// Exactly one OUT parameter.
    Single(&'a ProcedureParameter),
    /// Several OUT parameters, returned as a record.
    Record(Vec<&'a ProcedureParameter>),
}

/// A transpiled method interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodStub {
    /// Method name.
    pub name: String,
    /// Procedure name as declared.
    pub procedure_name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<ProcedureParameter>,
    /// Parameters that could not be parsed.
    pub warnings: Vec<String>,
}

impl MethodStub {
    /// IN and IN OUT parameters, in order.
    pub fn inputs(&self) -> impl Iterator<Item = &ProcedureParameter> {
        self.parameters.iter().filter(|p| p.direction.is_input())
    }

    /// OUT and IN OUT parameters, in order.
    pub fn outputs(&self) -> impl Iterator<Item = &ProcedureParameter> {
        self.parameters.iter().filter(|p| p.direction.is_output())
    }

    /// Returns the return shape.
    #[must_use]
    pub fn return_shape(&self) -> ReturnShape<'_> {
        let mut outputs: Vec<_> = self.outputs().collect();
        match outputs.len() {
            0 => ReturnShape::None,
            1 => ReturnShape::Single(outputs.remove(0)),
            _ => ReturnShape::Record(outputs),
        }
    }

    /// Renders the Python method.
    #[must_use]
    pub fn to_python(&self) -> String {
        python::render(self)
    }

    /// Renders a transpilation result, using [`UNPARSED_SENTINEL`] for
    /// failures.
    #[must_use]
    pub fn render_or_sentinel(result: &Result<Self>) -> String {
        match result {
            Ok(stub) => stub.to_python(),
            Err(_) => UNPARSED_SENTINEL.to_string(),
        }
    }
}

impl fmt::Display for MethodStub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_python())
    }
}

/// Transpiles procedure signatures with a fixed entity mapping.
#[derive(Debug, Clone, Default)]
pub struct ProcedureTranspiler {
    entities: Vec<(String, String)>,
}

impl ProcedureTranspiler {
    /// Creates a transpiler. Entity pairs are applied longest old name first.
    #[must_use]
    pub fn new(entity_mapping: &BTreeMap<String, String>) -> Self {
        let mut entities: Vec<(String, String)> = entity_mapping
            .iter()
            .filter(|(old, _)| !old.is_empty())
            .map(|(old, new)| (old.clone(), new.clone()))
            .collect();
        entities.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { entities }
    }

    /// Transpiles the first procedure header in `sql`.
    ///
    /// # Errors
    ///
    /// Returns [`TranspileError::NoProcedure`] if there is no
    /// `CREATE [OR REPLACE] PROCEDURE name (...)` header.
    pub fn transpile(&self, sql: &str) -> Result<MethodStub> {
        let Some(signature) = parse_signature(sql) else {
            let excerpt: String = sql.trim().chars().take(60).collect();
            return Err(TranspileError::NoProcedure(excerpt));
        };

        let parameters = signature
            .parameters
            .iter()
            .map(|declared| ProcedureParameter {
                name: parameter_name(&declared.name, &self.entities),
                direction: declared.direction,
                source_type: declared.source_type.clone(),
                target_type: TargetType::classify(&declared.source_type),
            })
            .collect();

        let warnings: Vec<String> = signature
            .skipped
            .iter()
            .map(|text| format!("Could not parse parameter '{text}' of {}", signature.name))
            .collect();
        for warning in &warnings {
            warn!("{warning}");
        }

        let stub = MethodStub {
            name: method_name(&signature.name, &self.entities),
            procedure_name: signature.name,
            parameters,
            warnings,
        };
        debug!(
            procedure = %stub.procedure_name,
            method = %stub.name,
            parameters = stub.parameters.len(),
            "transpiled procedure"
        );
        Ok(stub)
    }
}

/// Transpiles the first procedure header in `sql` to a Python method stub.
///
/// # Errors
///
/// Returns [`TranspileError::NoProcedure`] if there is no procedure header.
pub fn convert_to_python(sql: &str, entity_mapping: &BTreeMap<String, String>) -> Result<MethodStub> {
    ProcedureTranspiler::new(entity_mapping).transpile(sql)
}
