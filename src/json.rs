//! JSON text bridge.
//!
//! Converts between [`BinsonObject`] trees and JSON text through
//! `serde_json`. The mapping is lossy in both directions:
//!
//! - Bytes have no JSON type and are written as a `"0x..."` hex string. They
//!   read back as a string, not as bytes.
//! - NaN and infinite doubles cannot be written at all.
//! - JSON `null` has no Binson counterpart. Null fields and array elements
//!   are dropped on input.
//! - JSON numbers that fit an `i64` become integers; all others become doubles.
//!
//! ## Examples
//!
//! ```rust
//! use binson::json::{from_json_str, to_json_string};
//! use binson::BinsonObject;
//!
//! let obj = BinsonObject::new()
//!     .with("z", 1)
//!     .with("a", vec![0xcau8, 0xfe]);
//! assert_eq!(to_json_string(&obj).unwrap(), r#"{"a":"0xcafe","z":1}"#);
//!
//! let back = from_json_str(r#"{"n": 2.5, "gone": null}"#).unwrap();
//! assert_eq!(back.get_double("n").unwrap(), 2.5);
//! assert!(!back.contains("gone"));
//! ```

use crate::{BinsonObject, Error, Result, Value};
use serde_json::{Map, Number};

/// Renders bytes as `0x` followed by lower-case hex digits.
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn to_json_value(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number(Number::from(*i)),
        Value::Double(d) => match Number::from_f64(*d) {
            Some(n) => serde_json::Value::Number(n),
            None => {
                return Err(Error::unsupported_type(&format!(
                    "double {} has no JSON representation",
                    d
                )))
            }
        },
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(b) => serde_json::Value::String(bytes_to_hex(b)),
        Value::Array(arr) => serde_json::Value::Array(
            arr.iter().map(to_json_value).collect::<Result<Vec<_>>>()?,
        ),
        Value::Object(obj) => serde_json::Value::Object(to_json_map(obj)?),
    })
}

fn to_json_map(obj: &BinsonObject) -> Result<Map<String, serde_json::Value>> {
    let mut map = Map::new();
    for (name, value) in obj.sorted_fields() {
        map.insert(name.clone(), to_json_value(value)?);
    }
    Ok(map)
}

/// `None` for JSON null, which is dropped by the caller.
fn from_json_value(value: serde_json::Value) -> Option<Value> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(Value::Boolean(b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Value::Integer(i)),
            None => n.as_f64().map(Value::Double),
        },
        serde_json::Value::String(s) => Some(Value::String(s)),
        serde_json::Value::Array(arr) => Some(Value::Array(
            arr.into_iter().filter_map(from_json_value).collect(),
        )),
        serde_json::Value::Object(map) => Some(Value::Object(from_json_map(map))),
    }
}

fn from_json_map(map: Map<String, serde_json::Value>) -> BinsonObject {
    map.into_iter()
        .filter_map(|(name, value)| from_json_value(value).map(|v| (name, v)))
        .collect()
}

/// Writes `obj` as compact JSON with fields in canonical order.
///
/// # Errors
///
/// Fails if the tree holds a NaN or infinite double.
pub fn to_json_string(obj: &BinsonObject) -> Result<String> {
    let map = to_json_map(obj)?;
    Ok(serde_json::to_string(&map)?)
}

/// Writes `obj` as indented JSON with fields in canonical order.
pub fn to_json_string_pretty(obj: &BinsonObject) -> Result<String> {
    let map = to_json_map(obj)?;
    Ok(serde_json::to_string_pretty(&map)?)
}

/// Parses JSON text whose root is an object.
///
/// # Errors
///
/// Returns [`Error::Json`] with the text position for malformed JSON or a
/// non-object root.
///
/// # Examples
///
/// ```rust
/// use binson::json::from_json_str;
///
/// let err = from_json_str("{\n  \"a\": x\n}").unwrap_err();
/// assert!(matches!(err, binson::Error::Json { line: 2, .. }));
///
/// assert!(from_json_str("[1, 2]").is_err());
/// ```
pub fn from_json_str(text: &str) -> Result<BinsonObject> {
    match serde_json::from_str::<serde_json::Value>(text)? {
        serde_json::Value::Object(map) => Ok(from_json_map(map)),
        _ => Err(Error::Json {
            line: 1,
            col: 1,
            msg: "expected a JSON object at the root".to_string(),
        }),
    }
}

impl BinsonObject {
    /// Shorthand for [`to_json_string`].
    pub fn to_json(&self) -> Result<String> {
        to_json_string(self)
    }

    /// Shorthand for [`from_json_str`].
    pub fn from_json(text: &str) -> Result<Self> {
        from_json_str(text)
    }
}
