//! Untyped result rows with typed accessors.

use crate::query::error::{QueryError, QueryResult};
use rusqlite::types::Value;
use std::rc::Rc;
use uuid::Uuid;

/// One result row: values in projection order plus the column labels the
/// engine reported for them.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    labels: Rc<[String]>,
    values: Vec<Value>,
}

impl Tuple {
    pub fn new(labels: Rc<[String]>, values: Vec<Value>) -> Self {
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn value(&self, index: usize) -> QueryResult<&Value> {
        self.values.get(index).ok_or(QueryError::ColumnOutOfRange {
            index,
            len: self.values.len(),
        })
    }

    pub fn get<T: FromValue>(&self, index: usize) -> QueryResult<T> {
        T::from_value(self.value(index)?, index)
    }

    /// Reads the first column whose label equals `label`.
    pub fn get_named<T: FromValue>(&self, label: &str) -> QueryResult<T> {
        let index = self
            .labels
            .iter()
            .position(|candidate| candidate == label)
            .ok_or_else(|| QueryError::UnknownLabel(label.to_string()))?;
        self.get(index)
    }
}

/// Conversion from one stored value.
pub trait FromValue: Sized {
    fn from_value(value: &Value, index: usize) -> QueryResult<Self>;
}

fn mismatch(index: usize, expected: &'static str, value: &Value) -> QueryError {
    QueryError::TypeMismatch {
        index,
        expected,
        found: type_name(value),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Integer(_) => "integer",
        Value::Real(_) => "real",
        Value::Text(_) => "text",
        Value::Blob(_) => "blob",
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value, index: usize) -> QueryResult<Self> {
        match value {
            Value::Integer(number) => Ok(*number),
            other => Err(mismatch(index, "integer", other)),
        }
    }
}

/// Accepts integers too, since SQLite returns whole-number aggregates
/// either way.
impl FromValue for f64 {
    fn from_value(value: &Value, index: usize) -> QueryResult<Self> {
        match value {
            Value::Real(number) => Ok(*number),
            Value::Integer(number) => Ok(*number as f64),
            other => Err(mismatch(index, "real", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value, index: usize) -> QueryResult<Self> {
        match value {
            Value::Text(text) => Ok(text.clone()),
            other => Err(mismatch(index, "text", other)),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(value: &Value, index: usize) -> QueryResult<Self> {
        match value {
            Value::Text(text) => {
                Uuid::parse_str(text).map_err(|_| mismatch(index, "uuid", value))
            }
            other => Err(mismatch(index, "uuid", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value, index: usize) -> QueryResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, index).map(Some),
        }
    }
}
