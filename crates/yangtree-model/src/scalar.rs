//! Scalar payloads carried by leaves, leaf-list entries and list keys.

use crate::error::{value_type_name, ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A leaf value as produced by a codec layer.
///
/// Scalars are hashable and totally ordered so they can identify list
/// entries and leaf-list entries. Decimal and binary types are expected to
/// arrive in their canonical string form.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// The YANG `empty` type.
    Empty,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value that does not fit in `i64`.
    Uint(u64),
    /// String value (also canonical decimal, binary, identityref text).
    String(String),
}

impl Scalar {
    /// Convert into a JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Empty => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Int(i) => Value::from(*i),
            Scalar::Uint(u) => Value::from(*u),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }

    /// Get the string if this is a string scalar.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as `i64` if it is an integer that fits.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }
}

impl TryFrom<Value> for Scalar {
    type Error = ModelError;

    fn try_from(value: Value) -> ModelResult<Self> {
        match value {
            Value::Null => Ok(Scalar::Empty),
            Value::Bool(b) => Ok(Scalar::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Scalar::Uint(u))
                } else {
                    Err(ModelError::unsupported_value("integer", "float"))
                }
            }
            Value::String(s) => Ok(Scalar::String(s)),
            other => Err(ModelError::unsupported_value(
                "scalar",
                value_type_name(&other),
            )),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Scalar::Int(i),
            Err(_) => Scalar::Uint(v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Empty => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Uint(u) => write!(f, "{}", u),
            Scalar::String(s) => write!(f, "{}", s),
        }
    }
}
