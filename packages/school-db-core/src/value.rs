//! Scalar values, statement parameters, and result rows.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::DbError;

/// A single column value exchanged with the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
}

impl Value {
    /// Returns a string representation of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "integer",
            Value::Text(_) => "text",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::from(rusqlite::types::Null),
            Value::Int(v) => ToSqlOutput::from(*v),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Value::Null),
            ValueRef::Integer(v) => Ok(Value::Int(v)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|s| Value::Text(s.to_string()))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Real(_) | ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// Strips the `@`, `:` or `$` sigil so `@TeacherId` and `TeacherId` name
/// the same parameter.
fn bare_name(name: &str) -> &str {
    name.trim_start_matches(['@', ':', '$'])
}

/// Prefixes `@` when the caller left the sigil off.
fn with_sigil(name: &str) -> String {
    if name.starts_with(['@', ':', '$']) {
        name.to_string()
    } else {
        format!("@{name}")
    }
}

/// Statement parameters, either named (`@Name`) or positional (`?1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    Named(Vec<(String, Value)>),
    Positional(Vec<Value>),
}

impl Default for Params {
    fn default() -> Self {
        Params::Named(Vec::new())
    }
}

impl Params {
    /// Creates an empty named parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a positional parameter list bound to `?1`, `?2`, ...
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Params::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Adds a named parameter. Replaces an existing one with the same name.
    ///
    /// Calling this on a positional list appends the value positionally.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match &mut self {
            Params::Named(pairs) => {
                match pairs
                    .iter_mut()
                    .find(|(existing, _)| bare_name(existing) == bare_name(name))
                {
                    Some(slot) => slot.1 = value,
                    None => pairs.push((with_sigil(name), value)),
                }
            }
            Params::Positional(values) => values.push(value),
        }
        self
    }

    /// Looks up a named parameter, ignoring the sigil.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Params::Named(pairs) => pairs
                .iter()
                .find(|(existing, _)| bare_name(existing) == bare_name(name))
                .map(|(_, v)| v),
            Params::Positional(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Params::Named(pairs) => pairs.len(),
            Params::Positional(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One row of a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the value of a column by name (case-insensitive).
    pub fn get(&self, column: &str) -> Result<&Value, DbError> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| DbError::ColumnNotFound {
                column: column.to_string(),
            })
    }

    pub fn get_int(&self, column: &str) -> Result<i64, DbError> {
        let value = self.get(column)?;
        value.as_int().ok_or_else(|| DbError::TypeMismatch {
            expected: format!("integer for column '{column}'"),
            got: value.type_name().to_string(),
        })
    }

    pub fn get_text(&self, column: &str) -> Result<&str, DbError> {
        let value = self.get(column)?;
        value.as_text().ok_or_else(|| DbError::TypeMismatch {
            expected: format!("text for column '{column}'"),
            got: value.type_name().to_string(),
        })
    }
}
