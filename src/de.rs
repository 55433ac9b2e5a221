//! Binson deserialization.
//!
//! This module has two halves:
//!
//! - [`Deserializer`]: the strict binary parser. It accepts exactly the
//!   canonical encoding of an object and nothing else, and enforces the
//!   resource ceilings in [`DecodeOptions`] while reading.
//! - A serde bridge that drives any `Deserialize` type from a [`Value`], used
//!   by [`crate::from_value`] and [`crate::from_slice`].
//!
//! ## What the parser rejects
//!
//! - a first byte other than BEGIN, or input ending before the root END
//! - a non-string token where a field name belongs
//! - a field name not strictly after the previous one (this covers duplicates)
//! - an integer or length prefix wider than its value needs
//! - invalid UTF-8 in strings and field names
//! - unknown type bytes, END inside an array and END_ARRAY inside an object
//! - input beyond `max_size` bytes, objects with more than `max_field_count`
//!   fields and nesting deeper than `max_depth`
//!
//! Bytes after the root END are not read.
//!
//! ## Direct Deserializer Usage
//!
//! A [`Deserializer`] over a stream can read several objects in a row:
//!
//! ```rust
//! use binson::Deserializer;
//!
//! let stream: &[u8] = &[0x40, 0x41, 0x40, 0x14, 0x01, b'a', 0x44, 0x41];
//! let mut de = Deserializer::new(stream);
//!
//! assert!(de.parse().unwrap().is_empty());
//! assert!(de.parse().unwrap().get_boolean("a").unwrap());
//! ```

use crate::constants::*;
use crate::order::compare_field_names;
use crate::{BinsonObject, DecodeOptions, Error, Result, Value};
use log::{debug, trace};
use serde::de::value::StringDeserializer;
use serde::de::{self, DeserializeOwned};
use serde::forward_to_deserialize_any;
use std::cmp::Ordering;
use std::io::{self, Read};

/// The strict Binson parser.
///
/// Reads one object per [`parse`](Self::parse) call. Byte offsets in errors
/// and the size budget both count from the start of the current call.
///
/// Markers and length prefixes are read with small `read_exact` calls, so an
/// unbuffered source such as a `File` or `TcpStream` should be wrapped in a
/// [`std::io::BufReader`] first. Slices and `Cursor`s need no wrapping.
pub struct Deserializer<R> {
    reader: R,
    options: DecodeOptions,
    consumed: usize,
    depth: usize,
}

impl<R: Read> Deserializer<R> {
    /// Creates a parser with the default limits.
    ///
    /// Pass a buffered reader; see the type docs.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecodeOptions::default())
    }

    /// Creates a parser with the given limits.
    pub fn with_options(reader: R, options: DecodeOptions) -> Self {
        Deserializer {
            reader,
            options,
            consumed: 0,
            depth: 0,
        }
    }

    /// Bytes consumed by the current or most recent [`parse`](Self::parse) call.
    pub fn bytes_consumed(&self) -> usize {
        self.consumed
    }

    /// Returns the underlying reader, positioned after the last parsed object.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Parses one complete object.
    pub fn parse(&mut self) -> Result<BinsonObject> {
        self.consumed = 0;
        self.depth = 0;

        let offset = self.consumed;
        let t = self.read_type("BEGIN")?;
        if t != BEGIN {
            return Err(Error::invalid_format(
                offset,
                &format!("expected BEGIN (0x40), got 0x{:02x}", t),
            ));
        }
        self.parse_fields(offset)
    }

    /// Charges `n` bytes against the size budget.
    fn charge(&mut self, n: usize) -> Result<()> {
        let end = self.consumed.saturating_add(n);
        if end > self.options.max_size {
            debug!(
                "rejecting input: {} bytes needed, max_size is {}",
                end, self.options.max_size
            );
            return Err(Error::MaxSizeExceeded {
                offset: self.consumed,
                max_size: self.options.max_size,
            });
        }
        self.consumed = end;
        Ok(())
    }

    fn read_error(err: io::Error, offset: usize, expected: &str) -> Error {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::unexpected_eof(offset, expected)
        } else {
            Error::from(err)
        }
    }

    fn read_exact(&mut self, buf: &mut [u8], expected: &str) -> Result<()> {
        let offset = self.consumed;
        self.charge(buf.len())?;
        self.reader
            .read_exact(buf)
            .map_err(|e| Self::read_error(e, offset, expected))
    }

    fn read_type(&mut self, expected: &str) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf, expected)?;
        Ok(buf[0])
    }

    /// Reads a `len`-byte payload without trusting `len` for allocation.
    fn read_payload(&mut self, len: usize, expected: &str) -> Result<Vec<u8>> {
        let offset = self.consumed;
        self.charge(len)?;
        let mut buf = Vec::new();
        let read = (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| Self::read_error(e, offset, expected))?;
        if read < len {
            return Err(Error::unexpected_eof(offset + read, expected));
        }
        Ok(buf)
    }

    fn enter(&mut self, offset: usize) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            debug!(
                "rejecting input: nesting depth {} exceeds max_depth {}",
                self.depth, self.options.max_depth
            );
            return Err(Error::MaxDepthExceeded {
                offset,
                max_depth: self.options.max_depth,
            });
        }
        Ok(())
    }

    /// Reads an integer whose type byte `t` has already been consumed at `offset`.
    fn read_integer(&mut self, t: u8, offset: usize) -> Result<i64> {
        let code = t & INT_LENGTH_MASK;
        let len = width_len(code);
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf[..len], "integer")?;

        let value = match code {
            ONE_BYTE => i64::from(buf[0] as i8),
            TWO_BYTES => i64::from(i16::from_le_bytes([buf[0], buf[1]])),
            FOUR_BYTES => i64::from(i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])),
            _ => i64::from_le_bytes(buf),
        };

        if width_code(value) != code {
            return Err(Error::NonCanonicalInteger {
                offset,
                value,
                width: len,
            });
        }
        Ok(value)
    }

    fn read_length(&mut self, t: u8, offset: usize) -> Result<usize> {
        let len = self.read_integer(t, offset)?;
        usize::try_from(len)
            .map_err(|_| Error::invalid_format(offset, &format!("negative length {}", len)))
    }

    fn read_string(&mut self, t: u8, offset: usize) -> Result<String> {
        let len = self.read_length(t, offset)?;
        let bytes = self.read_payload(len, "string bytes")?;
        String::from_utf8(bytes)
            .map_err(|e| Error::invalid_format(offset, &format!("invalid UTF-8 in string: {}", e)))
    }

    fn read_bytes(&mut self, t: u8, offset: usize) -> Result<Vec<u8>> {
        let len = self.read_length(t, offset)?;
        self.read_payload(len, "bytes")
    }

    fn read_double(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf, "double")?;
        Ok(f64::from_bits(u64::from_le_bytes(buf)))
    }

    /// Parses the fields of an object whose BEGIN was read at `begin`.
    fn parse_fields(&mut self, begin: usize) -> Result<BinsonObject> {
        self.enter(begin)?;
        trace!("object at byte {}, depth {}", begin, self.depth);

        let mut object = BinsonObject::new();
        loop {
            let offset = self.consumed;
            match self.read_type("field name or END")? {
                t @ (STRING1 | STRING2 | STRING4) => {
                    if object.len() >= self.options.max_field_count {
                        debug!(
                            "rejecting input: object at byte {} has more than {} fields",
                            begin, self.options.max_field_count
                        );
                        return Err(Error::MaxFieldCountExceeded {
                            offset,
                            max_field_count: self.options.max_field_count,
                        });
                    }

                    let name = self.read_string(t, offset)?;
                    if let Some(previous) = object.last_name() {
                        if compare_field_names(previous, &name) != Ordering::Less {
                            return Err(Error::field_order(offset, previous, &name));
                        }
                    }

                    let value_offset = self.consumed;
                    let vt = self.read_type("field value")?;
                    let value = self.parse_value(vt, value_offset)?;
                    object.put(name, value);
                }
                END => {
                    trace!("object end at byte {}, {} fields", offset, object.len());
                    self.depth -= 1;
                    return Ok(object);
                }
                other => {
                    return Err(Error::invalid_format(
                        offset,
                        &format!("expected field name or END, got 0x{:02x}", other),
                    ));
                }
            }
        }
    }

    fn parse_array(&mut self, begin: usize) -> Result<Vec<Value>> {
        self.enter(begin)?;
        trace!("array at byte {}, depth {}", begin, self.depth);

        let mut elements = Vec::new();
        loop {
            let offset = self.consumed;
            let t = self.read_type("array element or END_ARRAY")?;
            if t == END_ARRAY {
                break;
            }
            elements.push(self.parse_value(t, offset)?);
        }
        self.depth -= 1;
        Ok(elements)
    }

    /// Parses a value whose type byte `t` was read at `offset`.
    fn parse_value(&mut self, t: u8, offset: usize) -> Result<Value> {
        match t {
            BEGIN => self.parse_fields(offset).map(Value::Object),
            BEGIN_ARRAY => self.parse_array(offset).map(Value::Array),
            TRUE => Ok(Value::Boolean(true)),
            FALSE => Ok(Value::Boolean(false)),
            DOUBLE => self.read_double().map(Value::Double),
            INTEGER1 | INTEGER2 | INTEGER4 | INTEGER8 => {
                self.read_integer(t, offset).map(Value::Integer)
            }
            STRING1 | STRING2 | STRING4 => self.read_string(t, offset).map(Value::String),
            BYTES1 | BYTES2 | BYTES4 => self.read_bytes(t, offset).map(Value::Bytes),
            other => Err(Error::invalid_format(
                offset,
                &format!("unexpected type byte 0x{:02x}", other),
            )),
        }
    }
}

pub(crate) fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(ValueDeserializer::new(value))
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: BinsonObject) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(StringDeserializer::<Error>::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(StringDeserializer::<Error>::new(self.variant))?;
        let visitor = VariantDeserializer { value: self.value };
        Ok((variant, visitor))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None => Ok(()),
            Some(_) => Err(Error::custom("expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(arr)) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(obj)) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Double(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Bytes(b) => visitor.visit_byte_buf(b),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
        }
    }

    // A present value is always `Some`; absent fields never reach here.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    // Lets a bytes value fill a `Vec<u8>` or `[u8; N]`.
    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Bytes(b) => {
                let elements = b.into_iter().map(Value::from).collect();
                visitor.visit_seq(SeqDeserializer::new(elements))
            }
            other => de::Deserializer::deserialize_any(ValueDeserializer::new(other), visitor),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            Value::Object(obj) if obj.len() == 1 => {
                let mut iter = obj.into_iter();
                match iter.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumDeserializer {
                        variant,
                        value: Some(value),
                    }),
                    None => Err(Error::custom("expected enum variant")),
                }
            }
            other => Err(Error::custom(format!(
                "expected string or single-field object for enum, found {}",
                other.type_name()
            ))),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(obj) if obj.is_empty() => visitor.visit_unit(),
            other => Err(Error::custom(format!(
                "expected empty object for unit, found {}",
                other.type_name()
            ))),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        de::Deserializer::deserialize_unit(self, visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf tuple_struct map struct identifier ignored_any
    }
}
