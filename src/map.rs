//! The Binson object type.
//!
//! This module provides [`BinsonObject`], a wrapper around [`IndexMap`] from
//! field name to [`Value`]. A field name appears at most once; writing an
//! existing name replaces its value.
//!
//! ## Field Order
//!
//! The map remembers insertion order so that iteration is predictable, but
//! insertion order never reaches the wire: the encoder always emits fields in
//! canonical order (see [`crate::order`]), and two objects with the same
//! fields compare equal however they were built. An object produced by the
//! decoder iterates in canonical order.
//!
//! ## Examples
//!
//! ```rust
//! use binson::BinsonObject;
//!
//! let obj = BinsonObject::new()
//!     .with("name", "Alice")
//!     .with("age", 30)
//!     .with("key", vec![0x01u8, 0x02]);
//!
//! assert_eq!(obj.len(), 3);
//! assert_eq!(obj.get_string("name").unwrap(), "Alice");
//! assert_eq!(obj.get_integer("age").unwrap(), 30);
//! assert!(obj.has_bytes("key"));
//! assert!(!obj.has_string("key"));
//! ```

use crate::de::Deserializer as BinaryDeserializer;
use crate::error::{Error, Result};
use crate::options::DecodeOptions;
use crate::order::compare_field_names;
use crate::ser::Serializer as BinarySerializer;
use crate::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;

/// An object: a set of uniquely named [`Value`] fields.
///
/// # Examples
///
/// ```rust
/// use binson::{BinsonObject, Value};
///
/// let mut obj = BinsonObject::new();
/// obj.put("b", 2);
/// obj.put("a", 1);
///
/// // Iteration follows insertion order...
/// let keys: Vec<_> = obj.keys().cloned().collect();
/// assert_eq!(keys, vec!["b", "a"]);
///
/// // ...but encoding is canonical
/// let bytes = obj.to_bytes().unwrap();
/// assert_eq!(bytes, vec![0x40, 0x14, 0x01, b'a', 0x10, 0x01, 0x14, 0x01, b'b', 0x10, 0x02, 0x41]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinsonObject(IndexMap<String, Value>);

macro_rules! typed_accessors {
    ($(($has:ident, $get:ident, $variant:ident, $name:literal, $ret:ty, |$v:ident| $conv:expr)),* $(,)?) => {
        $(
            #[doc = concat!("Returns `true` if the object has a field `name` holding ", $name, ".")]
            #[must_use]
            pub fn $has(&self, name: &str) -> bool {
                matches!(self.0.get(name), Some(Value::$variant(_)))
            }

            #[doc = concat!("Returns the ", $name, " stored under `name`.")]
            ///
            /// # Errors
            ///
            /// Returns [`Error::MissingField`] if there is no such field and
            /// [`Error::FieldType`] if the field holds another type.
            pub fn $get(&self, name: &str) -> Result<$ret> {
                match self.0.get(name) {
                    Some(Value::$variant($v)) => Ok($conv),
                    Some(other) => Err(Error::field_type(name, $name, other.type_name())),
                    None => Err(Error::missing_field(name)),
                }
            }
        )*
    };
}

impl BinsonObject {
    /// Creates an empty object.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binson::BinsonObject;
    ///
    /// let obj = BinsonObject::new();
    /// assert!(obj.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        BinsonObject(IndexMap::new())
    }

    /// Creates an empty object with room for `capacity` fields.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        BinsonObject(IndexMap::with_capacity(capacity))
    }

    /// Sets field `name` to `value`.
    ///
    /// If the object already had this field, the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binson::BinsonObject;
    ///
    /// let mut obj = BinsonObject::new();
    /// assert!(obj.put("key", 42).is_none());
    /// assert!(obj.put("key", "text").is_some());
    /// assert_eq!(obj.get_string("key").unwrap(), "text");
    /// ```
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Builder form of [`put`](Self::put).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(name, value);
        self
    }

    /// Returns a reference to the value of field `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns a mutable reference to the value of field `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.0.get_mut(name)
    }

    /// Returns `true` if the object has a field `name` of any type.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Removes field `name`, returning its value. Remaining fields keep their order.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the object has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes all fields.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns an iterator over the field names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the field values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the fields, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Returns the fields in canonical order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binson::BinsonObject;
    ///
    /// let obj = BinsonObject::new().with("b", 1).with("B", 2).with("", 3);
    /// let names: Vec<_> = obj.sorted_fields().into_iter().map(|(k, _)| k.as_str()).collect();
    /// assert_eq!(names, vec!["", "B", "b"]);
    /// ```
    #[must_use]
    pub fn sorted_fields(&self) -> Vec<(&String, &Value)> {
        let mut fields: Vec<_> = self.0.iter().collect();
        fields.sort_by(|(a, _), (b, _)| compare_field_names(a, b));
        fields
    }

    /// Name of the most recently inserted field.
    pub(crate) fn last_name(&self) -> Option<&str> {
        self.0.last().map(|(k, _)| k.as_str())
    }

    /// Returns an independent deep copy.
    ///
    /// Modifying the copy, at any nesting level, never affects `self`.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    typed_accessors! {
        (has_boolean, get_boolean, Boolean, "boolean", bool, |b| *b),
        (has_integer, get_integer, Integer, "integer", i64, |i| *i),
        (has_double, get_double, Double, "double", f64, |d| *d),
        (has_string, get_string, String, "string", &str, |s| s.as_str()),
        (has_bytes, get_bytes, Bytes, "bytes", &[u8], |b| b.as_slice()),
        (has_array, get_array, Array, "array", &[Value], |a| a.as_slice()),
        (has_object, get_object, Object, "object", &BinsonObject, |o| o),
    }

    /// Encodes the object in canonical Binson form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if a string or byte blob is too long
    /// for a 4-byte length prefix.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::encode(self)
    }

    /// Encodes the object to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the writer fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut serializer = BinarySerializer::new(writer);
        serializer.write_object(self)?;
        serializer.flush()
    }

    /// Decodes an object from canonical Binson bytes with default limits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binson::BinsonObject;
    ///
    /// let obj = BinsonObject::from_bytes(&[0x40, 0x41]).unwrap();
    /// assert!(obj.is_empty());
    /// assert!(BinsonObject::from_bytes(&[0x40]).is_err());
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(bytes, DecodeOptions::default())
    }

    /// Decodes an object from canonical Binson bytes with the given limits.
    pub fn from_bytes_with_options(bytes: &[u8], options: DecodeOptions) -> Result<Self> {
        BinaryDeserializer::with_options(bytes, options).parse()
    }

    /// Decodes one object from `reader`, leaving any later bytes unread.
    pub fn from_reader<R: io::Read>(reader: R, options: DecodeOptions) -> Result<Self> {
        BinaryDeserializer::with_options(reader, options).parse()
    }

    /// Checks that this object conforms to `schema`. See [`crate::schema`].
    pub fn validate(&self, schema: &BinsonObject) -> Result<()> {
        crate::schema::validate(self, schema)
    }
}

impl Hash for BinsonObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let fields = self.sorted_fields();
        fields.len().hash(state);
        for (name, value) in fields {
            name.hash(state);
            value.hash(state);
        }
    }
}

impl fmt::Display for BinsonObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.sorted_fields().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            crate::value::write_quoted(f, name)?;
            write!(f, ": {}", value)?;
        }
        f.write_str("}")
    }
}

impl Serialize for BinsonObject {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.sorted_fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BinsonObject {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error as _;
        match Value::deserialize(deserializer)? {
            Value::Object(obj) => Ok(obj),
            other => Err(D::Error::custom(format!(
                "expected object, found {}",
                other.type_name()
            ))),
        }
    }
}

impl From<HashMap<String, Value>> for BinsonObject {
    fn from(map: HashMap<String, Value>) -> Self {
        BinsonObject(map.into_iter().collect())
    }
}

impl From<BinsonObject> for HashMap<String, Value> {
    fn from(obj: BinsonObject) -> Self {
        obj.0.into_iter().collect()
    }
}

impl IntoIterator for BinsonObject {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a BinsonObject {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for BinsonObject {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        BinsonObject(IndexMap::from_iter(iter))
    }
}

impl Extend<(String, Value)> for BinsonObject {
    fn extend<T: IntoIterator<Item = (String, Value)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}
