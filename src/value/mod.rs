//! The generic configuration value type.
//!
//! [`Value`] is a closed sum over the six JSON shapes: null, bool, number,
//! string, array, and object. It is the payload type for [`Context`]
//! metadata and for every entry of a fetched configuration. Trees are
//! immutable once built; there is no interior mutability and no shape
//! outside the six variants is representable.

mod de;
mod from;
mod native;
mod ser;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ValueError;

/// A JSON-compatible value.
///
/// Numbers are normalized to `f64` regardless of whether the source literal
/// was an integer or a float, so precision beyond the `f64` mantissa is not
/// preserved.
///
/// ## Example
///
/// ```
/// use confetch::Value;
///
/// let metadata: Value = [
///     ("name".to_string(), Value::from("testName")),
///     ("age".to_string(), Value::from(22)),
/// ]
/// .into_iter()
/// .collect();
///
/// let bytes = metadata.to_vec()?;
/// assert_eq!(Value::from_slice(&bytes)?, metadata);
/// # Ok::<(), confetch::ValueError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Decodes a value from raw JSON bytes.
    ///
    /// The decoder commits to the first shape the document structurally
    /// matches, checked in a fixed order: object, array, string, bool,
    /// number, null. Any document containing a non-JSON shape fails.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValueError> {
        serde_json::from_slice(bytes).map_err(ValueError::Decode)
    }

    /// Encodes the value to JSON bytes.
    ///
    /// Each variant serializes to its direct JSON form; the variant tag is
    /// implicit in the JSON shape, no wrapper object is emitted.
    pub fn to_vec(&self) -> Result<Vec<u8>, ValueError> {
        serde_json::to_vec(self).map_err(ValueError::Encode)
    }

    /// Converts any serializable native value into a `Value` tree.
    ///
    /// Containers are walked recursively; the conversion fails as soon as a
    /// leaf cannot be expressed as one of the six shapes (for example a map
    /// with non-string keys, or a non-finite float).
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, ValueError> {
        value
            .serialize(native::ValueSerializer)
            .map_err(|e| ValueError::Unrepresentable(e.to_string()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The stored number as an exact integer: whole-valued and inside the
    /// `i64` range.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_f64().and_then(exact_i64)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
}

/// Exact f64-to-i64 projection. `i64::MAX as f64` rounds up to 2^63, so the
/// upper bound must be strict or the saturating cast would admit 2^63 as
/// `i64::MAX`.
pub(crate) fn exact_i64(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < 9_223_372_036_854_775_808.0 {
        Some(n as i64)
    } else {
        None
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = ValueError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => {
                let n = n
                    .as_f64()
                    .ok_or_else(|| ValueError::Unrepresentable(format!("number {n}")))?;
                Ok(Value::Number(n))
            }
            serde_json::Value::String(s) => Ok(Value::String(s)),
            serde_json::Value::Array(items) => {
                let items = items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?;
                Ok(Value::Array(items))
            }
            serde_json::Value::Object(map) => {
                let map = map
                    .into_iter()
                    .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                    .collect::<Result<_, ValueError>>()?;
                Ok(Value::Object(map))
            }
        }
    }
}
