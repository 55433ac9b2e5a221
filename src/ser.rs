//! Binson serialization.
//!
//! This module has two halves:
//!
//! - [`Serializer`]: the low-level binary writer. It emits one Binson token per
//!   call and always writes integers and length prefixes in their narrowest
//!   width. [`Serializer::write_object`] encodes a whole [`BinsonObject`] with
//!   its fields in canonical order.
//! - A serde bridge that turns any `Serialize` type into a [`Value`], used by
//!   [`crate::to_value`] and [`crate::to_vec`].
//!
//! ## Direct Serializer Usage
//!
//! The token writer does not track nesting or field order; callers driving it
//! by hand are responsible for producing a well-formed, canonical stream.
//!
//! ```rust
//! use binson::Serializer;
//!
//! let mut ser = Serializer::new(Vec::new());
//! ser.write_begin().unwrap();
//! ser.write_name("a").unwrap();
//! ser.write_integer(300).unwrap();
//! ser.write_end().unwrap();
//!
//! assert_eq!(ser.into_inner(), vec![0x40, 0x14, 0x01, b'a', 0x11, 0x2c, 0x01, 0x41]);
//! ```
//!
//! ## Mapping Rust data
//!
//! | Rust | Binson |
//! |------|--------|
//! | `bool` | boolean |
//! | `i8`..`i64`, `u8`..`u32`, `u64` up to `i64::MAX` | integer |
//! | `f32`, `f64` | double |
//! | `char`, `String`, unit enum variant | string |
//! | `serialize_bytes` (e.g. `#[serde(with = "serde_bytes")]`) | bytes |
//! | sequences, tuples | array |
//! | structs, maps with string keys | object |
//! | `Variant(x)`, `Variant { .. }` | object with the single field `"Variant"` |
//! | `()`, unit structs | empty object |
//!
//! `None` fields are left out of their object. Binson has no null, so `None`
//! as an array element or a top-level value is an error.

use crate::constants::*;
use crate::{BinsonObject, Error, Result, Value};
use log::trace;
use serde::{ser, Serialize};
use std::io;

/// The Binson token writer.
///
/// Wraps any [`io::Write`]. Writing to a `Vec<u8>` never fails except for
/// strings or byte blobs longer than `i32::MAX` bytes.
pub struct Serializer<W> {
    writer: W,
}

impl<W: io::Write> Serializer<W> {
    /// Creates a token writer over `writer`.
    pub fn new(writer: W) -> Self {
        Serializer { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.writer.write_all(&[byte])?;
        Ok(())
    }

    /// Writes `value` with type byte `base | width`, using the narrowest width.
    fn write_integer_or_length(&mut self, base: u8, value: i64) -> Result<()> {
        let code = width_code(value);
        let bytes = value.to_le_bytes();
        self.write_byte(base | code)?;
        self.writer.write_all(&bytes[..width_len(code)])?;
        Ok(())
    }

    fn write_length(&mut self, base: u8, len: usize, what: &str) -> Result<()> {
        match i32::try_from(len) {
            Ok(len) => self.write_integer_or_length(base, i64::from(len)),
            Err(_) => Err(Error::unsupported_type(&format!(
                "{} of {} bytes exceeds the 4-byte length prefix",
                what, len
            ))),
        }
    }

    /// Opens an object. Fields must follow in ascending name order.
    pub fn write_begin(&mut self) -> Result<()> {
        self.write_byte(BEGIN)
    }

    /// Closes the innermost object.
    pub fn write_end(&mut self) -> Result<()> {
        self.write_byte(END)
    }

    /// Opens an array.
    pub fn write_begin_array(&mut self) -> Result<()> {
        self.write_byte(BEGIN_ARRAY)
    }

    /// Closes the innermost array.
    pub fn write_end_array(&mut self) -> Result<()> {
        self.write_byte(END_ARRAY)
    }

    /// Writes a boolean as a single marker byte.
    pub fn write_boolean(&mut self, value: bool) -> Result<()> {
        self.write_byte(if value { TRUE } else { FALSE })
    }

    /// Writes an integer in 1, 2, 4 or 8 bytes, whichever is narrowest.
    pub fn write_integer(&mut self, value: i64) -> Result<()> {
        self.write_integer_or_length(INTEGER, value)
    }

    /// Writes a double as 8 little-endian bytes. All bit patterns, NaN
    /// payloads included, are written unchanged.
    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.write_byte(DOUBLE)?;
        self.writer.write_all(&value.to_bits().to_le_bytes())?;
        Ok(())
    }

    /// Writes a UTF-8 string behind its narrowest length prefix.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, or if the string is longer than `i32::MAX` bytes.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_length(STRING, value.len(), "string")?;
        self.writer.write_all(value.as_bytes())?;
        Ok(())
    }

    /// Writes a byte blob behind its narrowest length prefix.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.write_length(BYTES, value.len(), "byte blob")?;
        self.writer.write_all(value)?;
        Ok(())
    }

    /// Writes a field name. Names share the string encoding.
    pub fn write_name(&mut self, name: &str) -> Result<()> {
        self.write_string(name)
    }

    /// Writes any value, recursing into arrays and objects.
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Boolean(b) => self.write_boolean(*b),
            Value::Integer(i) => self.write_integer(*i),
            Value::Double(d) => self.write_double(*d),
            Value::String(s) => self.write_string(s),
            Value::Bytes(b) => self.write_bytes(b),
            Value::Array(arr) => {
                self.write_begin_array()?;
                for element in arr {
                    self.write_value(element)?;
                }
                self.write_end_array()
            }
            Value::Object(obj) => self.write_object(obj),
        }
    }

    /// Writes a complete object with its fields in canonical order.
    pub fn write_object(&mut self, object: &BinsonObject) -> Result<()> {
        trace!("encoding object with {} fields", object.len());
        self.write_begin()?;
        for (name, value) in object.sorted_fields() {
            self.write_name(name)?;
            self.write_value(value)?;
        }
        self.write_end()
    }
}

/// Serde serializer producing a [`Value`] tree.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: BinsonObject,
    current_key: Option<String>,
}

pub struct SerializeStructVariant {
    variant: &'static str,
    map: BinsonObject,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| Error::unsupported_type(&format!("u64 value {} above i64::MAX", v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Double(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Double(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Err(Error::NullValue)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Object(BinsonObject::new()))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let inner = to_value(value).map_err(|e| nested_null(e, "enum variant payload"))?;
        Ok(Value::Object(BinsonObject::new().with(variant, inner)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::with_capacity(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: BinsonObject::with_capacity(len),
        })
    }
}

impl SerializeVec {
    fn with_capacity(len: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(len),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let element = to_value(value).map_err(|e| nested_null(e, "array element"))?;
        self.vec.push(element);
        Ok(())
    }
}

impl SerializeMap {
    fn with_capacity(len: usize) -> Self {
        SerializeMap {
            map: BinsonObject::with_capacity(len),
            current_key: None,
        }
    }
}

/// Null can be skipped in an object, but nowhere else. Once it is wrapped in
/// another container it must stop being [`Error::NullValue`] so the enclosing
/// object does not silently drop the whole container.
fn nested_null(err: Error, position: &str) -> Error {
    match err {
        Error::NullValue => Error::unsupported_type(&format!("null {}", position)),
        other => other,
    }
}

/// Adds a field to `map`, leaving it out if the value is null.
fn put_field<T: ?Sized + Serialize>(map: &mut BinsonObject, key: String, value: &T) -> Result<()> {
    match to_value(value) {
        Ok(v) => {
            map.put(key, v);
            Ok(())
        }
        Err(Error::NullValue) => Ok(()),
        Err(e) => Err(e),
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let element = to_value(value).map_err(|e| nested_null(e, "array element"))?;
        self.vec.push(element);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let obj = BinsonObject::new().with(self.variant, Value::Array(self.vec));
        Ok(Value::Object(obj))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::unsupported_type(&format!(
                "map key of type {}, field names must be strings",
                other.type_name()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        put_field(&mut self.map, key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        put_field(&mut self.map, key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        put_field(&mut self.map, key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        let obj = BinsonObject::new().with(self.variant, Value::Object(self.map));
        Ok(Value::Object(obj))
    }
}

pub(crate) fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    fn encode_value(value: &Value) -> Vec<u8> {
        let mut ser = Serializer::new(Vec::new());
        ser.write_value(value).unwrap();
        ser.into_inner()
    }

    #[test]
    fn test_integer_widths() {
        assert_eq!(encode_value(&Value::Integer(0)), vec![0x10, 0x00]);
        assert_eq!(encode_value(&Value::Integer(-1)), vec![0x10, 0xff]);
        assert_eq!(encode_value(&Value::Integer(127)), vec![0x10, 0x7f]);
        assert_eq!(encode_value(&Value::Integer(128)), vec![0x11, 0x80, 0x00]);
        assert_eq!(encode_value(&Value::Integer(-129)), vec![0x11, 0x7f, 0xff]);
        assert_eq!(
            encode_value(&Value::Integer(32768)),
            vec![0x12, 0x00, 0x80, 0x00, 0x00]
        );
        assert_eq!(
            encode_value(&Value::Integer(i64::MIN)),
            vec![0x13, 0, 0, 0, 0, 0, 0, 0, 0x80]
        );
    }

    #[test]
    fn test_double_bits_preserved() {
        let nan = f64::from_bits(0x7ff8_0000_0000_0001);
        let bytes = encode_value(&Value::Double(nan));
        assert_eq!(bytes[0], DOUBLE);
        assert_eq!(&bytes[1..], &0x7ff8_0000_0000_0001u64.to_le_bytes());
    }

    #[test]
    fn test_string_and_bytes() {
        assert_eq!(encode_value(&Value::from("")), vec![0x14, 0x00]);
        assert_eq!(encode_value(&Value::from(vec![1u8, 2])), vec![0x18, 0x02, 1, 2]);

        let long = "x".repeat(200);
        let bytes = encode_value(&Value::from(long.as_str()));
        assert_eq!(&bytes[..3], &[0x15, 200, 0]);
        assert_eq!(bytes.len(), 203);
    }

    #[test]
    fn test_fields_sorted_on_write() {
        let obj = BinsonObject::new().with("b", true).with("a", false);
        let mut ser = Serializer::new(Vec::new());
        ser.write_object(&obj).unwrap();
        assert_eq!(
            ser.into_inner(),
            vec![0x40, 0x14, 0x01, b'a', 0x45, 0x14, 0x01, b'b', 0x44, 0x41]
        );
    }

    #[derive(Serialize)]
    struct Record {
        id: u32,
        note: Option<String>,
        tags: Vec<String>,
    }

    #[test]
    fn test_none_field_omitted() {
        let value = to_value(&Record {
            id: 1,
            note: None,
            tags: vec![],
        })
        .unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains("note"));
        assert_eq!(obj.get_integer("id").unwrap(), 1);
        assert!(obj.get_array("tags").unwrap().is_empty());
    }

    #[test]
    fn test_none_in_array_rejected() {
        let err = to_value(&vec![Some(1), None]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));

        let err = to_value(&Option::<i32>::None).unwrap_err();
        assert_eq!(err, Error::NullValue);
    }

    #[derive(Serialize)]
    struct Marker;

    #[test]
    fn test_unit_is_empty_object() {
        let empty = Value::Object(BinsonObject::new());
        assert_eq!(to_value(&()).unwrap(), empty);
        assert_eq!(to_value(&Marker).unwrap(), empty);
        assert_eq!(to_value(&vec![(), ()]).unwrap(), Value::Array(vec![empty.clone(), empty]));
    }

    #[test]
    fn test_u64_out_of_range() {
        assert!(to_value(&u64::MAX).is_err());
        assert_eq!(to_value(&(i64::MAX as u64)).unwrap(), Value::Integer(i64::MAX));
    }

    #[derive(Serialize)]
    enum Shape {
        Empty,
        Circle(f64),
        Point(i32, i32),
        Rect { w: i32, h: i32 },
    }

    #[test]
    fn test_enum_variants() {
        assert_eq!(to_value(&Shape::Empty).unwrap(), Value::from("Empty"));

        let circle = to_value(&Shape::Circle(1.5)).unwrap();
        assert_eq!(circle.as_object().unwrap().get_double("Circle").unwrap(), 1.5);

        let point = to_value(&Shape::Point(1, 2)).unwrap();
        assert_eq!(point.as_object().unwrap().get_array("Point").unwrap().len(), 2);

        let rect = to_value(&Shape::Rect { w: 3, h: 4 }).unwrap();
        let inner = rect.as_object().unwrap().get_object("Rect").unwrap();
        assert_eq!(inner.get_integer("h").unwrap(), 4);
    }
}
