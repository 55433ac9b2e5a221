//! # binson
//!
//! A strict, canonical codec for the [Binson](https://binson.org) binary
//! serialization format, with a Serde bridge.
//!
//! ## What is Binson?
//!
//! Binson is a small binary format with a JSON-like data model: booleans,
//! 64-bit integers, doubles, strings, byte blobs, arrays and objects. Each
//! value tree has exactly one valid encoding, so equal trees always produce
//! equal bytes. That makes encoded messages safe to hash, sign and compare
//! byte-for-byte.
//!
//! ## Key Features
//!
//! - **Canonical**: the encoder sorts fields and picks minimal integer widths;
//!   the decoder rejects any input that is not already canonical
//! - **Bounded**: decoding untrusted input is capped in bytes, fields per
//!   object and nesting depth, see [`DecodeOptions`]
//! - **Serde Compatible**: works with `#[derive(Serialize, Deserialize)]` types
//! - **Schema Validation**: check decoded objects against an exemplar object
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! binson = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use binson::{from_slice, to_vec};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let bytes = to_vec(&user).unwrap();
//! let user_back: User = from_slice(&bytes).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Dynamic objects
//!
//! ```rust
//! use binson::{decode, encode, BinsonObject};
//!
//! let obj = BinsonObject::new()
//!     .with("name", "Alice")
//!     .with("key", vec![0x01u8, 0x02, 0x03]);
//!
//! let bytes = encode(&obj).unwrap();
//! let back = decode(&bytes).unwrap();
//! assert_eq!(back, obj);
//! assert_eq!(back.get_bytes("key").unwrap(), &[1, 2, 3]);
//! ```
//!
//! ### Untrusted input
//!
//! ```rust
//! use binson::{decode_with_options, DecodeOptions};
//!
//! let options = DecodeOptions::new().with_max_size(64).with_max_field_count(8);
//! let err = decode_with_options(&[0x40, 0x14, 0x01, b'a'], options).unwrap_err();
//! assert!(err.is_format());
//! assert!(!err.is_resource_limit());
//! ```
//!
//! ## Modules
//!
//! - [`format`]: description of the wire format
//! - [`schema`]: exemplar-based validation
//! - [`json`]: lossy JSON text bridge
//! - [`order`]: the canonical field-name order
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - encoding and decoding a struct
//! - **`schema_validation.rs`** - checking input against a schema
//! - **`untrusted_input.rs`** - decoding with resource limits
//!
//! Run any example with: `cargo run --example <name>`

pub mod constants;
pub mod de;
pub mod error;
pub mod format;
pub mod json;
pub mod macros;
pub mod map;
pub mod options;
pub mod order;
pub mod schema;
pub mod ser;
pub mod value;

pub use de::Deserializer;
pub use error::{Error, ErrorKind, Result};
pub use map::BinsonObject;
pub use options::DecodeOptions;
pub use schema::validate;
pub use ser::{Serializer, ValueSerializer};
pub use value::Value;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Encodes `obj` in canonical form.
///
/// # Examples
///
/// ```rust
/// use binson::{encode, BinsonObject};
///
/// assert_eq!(encode(&BinsonObject::new()).unwrap(), vec![0x40, 0x41]);
///
/// let nested = BinsonObject::new().with("", BinsonObject::new());
/// assert_eq!(encode(&nested).unwrap(), vec![0x40, 0x14, 0x00, 0x40, 0x41, 0x41]);
/// ```
///
/// # Errors
///
/// Fails only for strings or byte blobs longer than `i32::MAX` bytes.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(obj: &BinsonObject) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new(Vec::new());
    serializer.write_object(obj)?;
    Ok(serializer.into_inner())
}

/// Encodes `obj` in canonical form to `writer`.
///
/// # Errors
///
/// Returns an I/O error if the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_to_writer<W: io::Write>(writer: W, obj: &BinsonObject) -> Result<()> {
    obj.write_to(writer)
}

/// Decodes one object from canonical bytes with the default limits.
///
/// Bytes after the object's END are ignored.
///
/// # Errors
///
/// Returns a format error for non-canonical or malformed input, and a
/// resource-limit error if the input exceeds the default ceilings.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(bytes: &[u8]) -> Result<BinsonObject> {
    BinsonObject::from_bytes(bytes)
}

/// Decodes one object from canonical bytes with the given limits.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_with_options(bytes: &[u8], options: DecodeOptions) -> Result<BinsonObject> {
    BinsonObject::from_bytes_with_options(bytes, options)
}

/// Decodes one object from `reader` with the default limits.
///
/// Reading stops at the object's END; later bytes stay in the reader.
/// The parser issues one small read per marker, so wrap files and sockets
/// in a [`std::io::BufReader`].
///
/// # Examples
///
/// ```rust
/// use binson::decode_from_reader;
/// use std::io::Cursor;
///
/// let mut cursor = Cursor::new(vec![0x40, 0x41, 0x99]);
/// assert!(decode_from_reader(&mut cursor).unwrap().is_empty());
/// assert_eq!(cursor.position(), 2);
/// ```
///
/// ```rust,no_run
/// use binson::decode_from_reader;
/// use std::fs::File;
/// use std::io::BufReader;
///
/// let file = File::open("message.binson").unwrap();
/// let obj = decode_from_reader(BufReader::new(file)).unwrap();
/// println!("{}", obj);
/// ```
///
/// # Errors
///
/// I/O failures other than end-of-input are returned as [`Error::Io`];
/// end-of-input before the object completes is a format error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_from_reader<R: io::Read>(reader: R) -> Result<BinsonObject> {
    decode_from_reader_with_options(reader, DecodeOptions::default())
}

/// Decodes one object from `reader` with the given limits.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_from_reader_with_options<R: io::Read>(
    reader: R,
    options: DecodeOptions,
) -> Result<BinsonObject> {
    BinsonObject::from_reader(reader, options)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use binson::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns [`Error::NullValue`] for a top-level `None`, and
/// [`Error::UnsupportedType`] for values with no Binson form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    ser::to_value(value)
}

/// Convert a [`Value`] into any `T: Deserialize`.
///
/// # Examples
///
/// ```rust
/// use binson::{from_value, Value};
///
/// let n: i32 = from_value(Value::Integer(-4)).unwrap();
/// assert_eq!(n, -4);
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    de::from_value(value)
}

fn to_object<T: ?Sized + Serialize>(value: &T) -> Result<BinsonObject> {
    match to_value(value)? {
        Value::Object(obj) => Ok(obj),
        other => Err(Error::unsupported_type(&format!(
            "a Binson message must be an object, found {}",
            other.type_name()
        ))),
    }
}

/// Serialize any `T: Serialize` to canonical Binson bytes.
///
/// The value must serialize as an object: a struct, a map with string keys
/// or a non-unit enum variant.
///
/// # Examples
///
/// ```rust
/// use binson::to_vec;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let bytes = to_vec(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(bytes, vec![0x40, 0x14, 0x01, b'x', 0x10, 0x01, 0x14, 0x01, b'y', 0x10, 0x02, 0x41]);
///
/// assert!(to_vec(&42).is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the value is not an object or cannot be represented.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    encode(&to_object(value)?)
}

/// Serialize any `T: Serialize` to a writer as canonical Binson.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_object(value)?.write_to(writer)
}

/// Deserialize an instance of type `T` from canonical Binson bytes.
///
/// # Examples
///
/// ```rust
/// use binson::from_slice;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let bytes = [0x40, 0x14, 0x01, b'x', 0x10, 0x01, 0x14, 0x01, b'y', 0x10, 0x02, 0x41];
/// let point: Point = from_slice(&bytes).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not canonical Binson or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice_with_options(bytes, DecodeOptions::default())
}

/// Deserialize an instance of type `T` from canonical Binson bytes, with limits.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<T>(bytes: &[u8], options: DecodeOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(Value::Object(decode_with_options(bytes, options)?))
}

/// Deserialize an instance of type `T` from an I/O stream of Binson.
///
/// # Examples
///
/// ```rust
/// use binson::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Flag { on: bool }
///
/// let cursor = Cursor::new(vec![0x40, 0x14, 0x02, b'o', b'n', 0x44, 0x41]);
/// let flag: Flag = from_reader(cursor).unwrap();
/// assert!(flag.on);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not canonical Binson,
/// or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    from_reader_with_options(reader, DecodeOptions::default())
}

/// Deserialize an instance of type `T` from an I/O stream of Binson, with limits.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R, T>(reader: R, options: DecodeOptions) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    from_value(Value::Object(decode_from_reader_with_options(reader, options)?))
}
