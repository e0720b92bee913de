//! Procedure registry and execution.

mod teacher;

use std::collections::HashMap;

use serde::Serialize;

use crate::error::DbError;
use crate::value::{Params, Value};

pub use teacher::{TEACHER_CREATE, TEACHER_DESTROY};

/// Return code signalling success.
pub const RETURN_SUCCESS: i64 = 0;

/// Procedure function signature.
///
/// Procedures receive a connection already inside a transaction and the
/// caller's parameters. Returning an error rolls the transaction back.
pub type ProcedureFn =
    fn(conn: &rusqlite::Connection, params: &Params) -> Result<ProcedureOutcome, DbError>;

/// Result of a procedure call: its return code plus any output parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcedureOutcome {
    pub return_code: i64,
    #[serde(skip)]
    pub outputs: Params,
}

impl ProcedureOutcome {
    /// A successful outcome with no outputs.
    pub fn success() -> Self {
        Self::with_code(RETURN_SUCCESS)
    }

    pub fn with_code(return_code: i64) -> Self {
        Self {
            return_code,
            outputs: Params::new(),
        }
    }

    /// Adds an output parameter.
    pub fn output(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.outputs = self.outputs.with(name, value);
        self
    }

    /// Reads an output parameter, `None` if the procedure did not set it.
    pub fn get_output(&self, name: &str) -> Option<&Value> {
        self.outputs.get(name)
    }

    pub fn is_success(&self) -> bool {
        self.return_code == RETURN_SUCCESS
    }
}

/// Parameter type for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Integer,
    Any,
}

impl ParamType {
    fn name(self) -> &'static str {
        match self {
            ParamType::Text => "text",
            ParamType::Integer => "integer",
            ParamType::Any => "any",
        }
    }
}

/// Parameter requirement for procedure validation.
#[derive(Debug, Clone)]
pub struct ParamRequirement {
    /// Parameter name.
    pub name: &'static str,
    /// Expected type.
    pub param_type: ParamType,
    /// Whether the parameter is required.
    pub required: bool,
}

impl ParamRequirement {
    pub const fn required(name: &'static str, param_type: ParamType) -> Self {
        Self {
            name,
            param_type,
            required: true,
        }
    }
}

/// Schema for procedure parameter validation.
#[derive(Debug, Clone, Default)]
pub struct ProcedureSchema {
    /// List of parameter requirements.
    pub params: Vec<ParamRequirement>,
}

impl ProcedureSchema {
    /// Validates parameters against this schema.
    pub fn validate(&self, procedure: &str, params: &Params) -> Result<(), DbError> {
        for req in &self.params {
            match params.get(req.name) {
                Some(Value::Null) | None => {
                    if req.required {
                        return Err(DbError::MissingParameter {
                            procedure: procedure.to_string(),
                            param: req.name.to_string(),
                        });
                    }
                }
                Some(v) => {
                    let ok = match req.param_type {
                        ParamType::Text => v.as_text().is_some(),
                        ParamType::Integer => v.as_int().is_some(),
                        ParamType::Any => true,
                    };
                    if !ok {
                        return Err(DbError::TypeMismatch {
                            expected: format!(
                                "{} for parameter '{}'",
                                req.param_type.name(),
                                req.name
                            ),
                            got: v.type_name().to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Internal representation of a registered procedure.
#[derive(Clone)]
struct ProcedureDef {
    /// Function pointer.
    func: ProcedureFn,
    /// Optional schema for parameter validation.
    schema: Option<ProcedureSchema>,
}

/// Registry of available procedures.
///
/// Each connection owns its registry; cloning copies the registrations.
#[derive(Default, Clone)]
pub struct ProcedureRegistry {
    procedures: HashMap<String, ProcedureDef>,
}

impl ProcedureRegistry {
    /// Creates a new empty procedure registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the `ps` schema procedures.
    pub fn with_school_procedures() -> Self {
        let mut registry = Self::new();
        teacher::register(&mut registry);
        registry
    }

    /// Registers a procedure with the given name.
    pub fn register(&mut self, name: &str, func: ProcedureFn) {
        self.procedures
            .insert(name.to_string(), ProcedureDef { func, schema: None });
    }

    /// Registers a procedure with a schema for parameter validation.
    pub fn register_with_schema(&mut self, name: &str, func: ProcedureFn, schema: ProcedureSchema) {
        self.procedures.insert(
            name.to_string(),
            ProcedureDef {
                func,
                schema: Some(schema),
            },
        );
    }

    /// Gets a procedure function by name.
    pub fn get(&self, name: &str) -> Option<ProcedureFn> {
        self.procedures.get(name).map(|def| def.func)
    }

    /// Looks up a procedure and validates `params` against its schema.
    ///
    /// # Returns
    /// The procedure function, ready to run.
    pub fn resolve(&self, name: &str, params: &Params) -> Result<ProcedureFn, DbError> {
        let def = self
            .procedures
            .get(name)
            .ok_or_else(|| DbError::ProcedureNotFound {
                name: name.to_string(),
            })?;

        if let Some(schema) = &def.schema {
            schema.validate(name, params)?;
        }
        Ok(def.func)
    }

    /// Lists registered procedure names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.procedures.keys().cloned().collect();
        names.sort();
        names
    }
}
