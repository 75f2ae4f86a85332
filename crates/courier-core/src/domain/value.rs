//! Tagged argument / result values.
//!
//! Envelopes carry arbitrary JSON in `args` and `result`. Handlers never see raw
//! JSON: they get a [`Value`] tree and pull typed fields out of [`Args`] with
//! accessors that fail explicitly when a field is absent or has the wrong shape.

use std::fmt;

use thiserror::Error;

/// A dynamically typed value carried inside an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Args),
}

impl Value {
    /// Short type name used in diagnostics.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Mapping(_) => ValueKind::Mapping,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Args> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

/// Type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Sequence,
    Mapping,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

/// Failure to extract a typed argument.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgError {
    #[error("missing argument '{0}'")]
    Missing(String),

    #[error("argument '{name}' must be {expected}, found {found}")]
    WrongType {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("argument '{0}' is outside the 64-bit integer range")]
    OutOfRange(String),
}

/// Ordered `name -> value` mapping.
///
/// Insertion order is kept so a decoded envelope re-encodes with the caller's
/// key order. Lookups are linear; argument lists are small.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    entries: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace `name`. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder-style [`Args::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn require(&self, name: &str) -> Result<&Value, ArgError> {
        self.get(name)
            .ok_or_else(|| ArgError::Missing(name.to_string()))
    }

    /// Whole-number argument.
    ///
    /// Floats are rejected even when they have no fractional part; a float
    /// holding an integral value beyond `i64` is reported as out of range.
    pub fn int(&self, name: &str) -> Result<i64, ArgError> {
        match self.require(name)? {
            Value::Integer(i) => Ok(*i),
            Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() >= I64_BOUND => {
                Err(ArgError::OutOfRange(name.to_string()))
            }
            other => Err(wrong_type(name, ValueKind::Integer, other)),
        }
    }

    pub fn float(&self, name: &str) -> Result<f64, ArgError> {
        let value = self.require(name)?;
        value
            .as_f64()
            .ok_or_else(|| wrong_type(name, ValueKind::Float, value))
    }

    pub fn string(&self, name: &str) -> Result<&str, ArgError> {
        let value = self.require(name)?;
        value
            .as_str()
            .ok_or_else(|| wrong_type(name, ValueKind::String, value))
    }

    pub fn bool(&self, name: &str) -> Result<bool, ArgError> {
        let value = self.require(name)?;
        value
            .as_bool()
            .ok_or_else(|| wrong_type(name, ValueKind::Bool, value))
    }

    pub fn mapping(&self, name: &str) -> Result<&Args, ArgError> {
        let value = self.require(name)?;
        value
            .as_mapping()
            .ok_or_else(|| wrong_type(name, ValueKind::Mapping, value))
    }
}

impl FromIterator<(String, Value)> for Args {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut args = Args::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

// 2^63 as f64; every integral float at or above this magnitude overflows i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn wrong_type(name: &str, expected: ValueKind, found: &Value) -> ArgError {
    ArgError::WrongType {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}
