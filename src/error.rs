//! Error types for Binson encoding, decoding and validation.
//!
//! ## Error Categories
//!
//! - **Format errors**: the bytes do not follow the canonical Binson grammar
//!   (bad marker, unordered or duplicate field, over-wide integer, truncated
//!   input, invalid UTF-8), or a value tree fails schema validation.
//! - **Resource-limit errors**: a format error raised only because the input
//!   exceeds a configured ceiling (total size, fields per object or nesting depth). These are
//!   a subtype of format errors; use [`Error::is_resource_limit`] to tell them
//!   apart when deciding retry or rate-limit policy.
//! - **I/O errors**: the underlying reader or writer failed. These say nothing
//!   about the bytes seen so far.
//! - **Data errors**: a Rust type could not be mapped onto the Binson value
//!   model through serde.
//!
//! Misconfiguration such as a zero size limit is a caller bug, not an input
//! problem, and panics instead of returning an [`Error`].
//!
//! ## Examples
//!
//! ```rust
//! use binson::decode;
//!
//! // {"B": "B", "A": "A"} is not in canonical field order
//! let bytes = [
//!     0x40, 0x14, 0x01, b'B', 0x14, 0x01, b'B', 0x14, 0x01, b'A', 0x14, 0x01, b'A', 0x41,
//! ];
//! let err = decode(&bytes).unwrap_err();
//! assert!(err.is_format());
//! assert!(!err.is_resource_limit());
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The byte source or sink failed.
    Io,
    /// Malformed or non-canonical input, or a schema violation.
    Format,
    /// Input rejected for exceeding a configured ceiling.
    ResourceLimit,
    /// A Rust value could not be mapped to or from a Binson value.
    Data,
}

/// Represents all possible errors that can occur while handling Binson data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Grammar violation at a byte offset
    #[error("Invalid Binson format at byte {offset}: {msg}")]
    InvalidFormat { offset: usize, msg: String },

    /// Input ended before the value being read was complete
    #[error("Unexpected end of input at byte {offset}, expected {expected}")]
    UnexpectedEof { offset: usize, expected: String },

    /// Field name not strictly greater than the previous one at the same level
    #[error("Field '{name}' at byte {offset} is not ordered after field '{previous}'")]
    FieldOrder {
        offset: usize,
        previous: String,
        name: String,
    },

    /// Integer or length prefix wider than its value requires
    #[error("Non-canonical integer at byte {offset}: {value} encoded in {width} bytes")]
    NonCanonicalInteger {
        offset: usize,
        value: i64,
        width: usize,
    },

    /// Total bytes consumed passed the configured maximum
    #[error("Maximum size of {max_size} bytes exceeded at byte {offset}")]
    MaxSizeExceeded { offset: usize, max_size: usize },

    /// An object level holds more fields than the configured maximum
    #[error("Maximum field count of {max_field_count} exceeded at byte {offset}")]
    MaxFieldCountExceeded {
        offset: usize,
        max_field_count: usize,
    },

    /// Containers nested deeper than the configured maximum
    #[error("Maximum nesting depth of {max_depth} exceeded at byte {offset}")]
    MaxDepthExceeded { offset: usize, max_depth: usize },

    /// Schema requires a field the value lacks
    #[error("missing mandatory field '{field}'")]
    MissingField { field: String },

    /// Field holds a different Binson type than the schema or accessor expects
    #[error("bad field type of field '{field}', expected {expected}, got {found}")]
    FieldType {
        field: String,
        expected: String,
        found: String,
    },

    /// JSON text bridge failure, with text position when known
    #[error("JSON error at line {line}, column {col}: {msg}")]
    Json { line: usize, col: usize, msg: String },

    /// A null or `None` value where Binson needs a value
    #[error("Binson has no null value")]
    NullValue,

    /// The value has no Binson representation (e.g. u64 above i64::MAX)
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a grammar error at `offset`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binson::Error;
    ///
    /// let err = Error::invalid_format(3, "expected BEGIN");
    /// assert!(err.to_string().contains("byte 3"));
    /// assert_eq!(err.offset(), Some(3));
    /// ```
    pub fn invalid_format(offset: usize, msg: &str) -> Self {
        Error::InvalidFormat {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(offset: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            offset,
            expected: expected.to_string(),
        }
    }

    /// Creates a field-order error for `name` following `previous`.
    pub fn field_order(offset: usize, previous: &str, name: &str) -> Self {
        Error::FieldOrder {
            offset,
            previous: previous.to_string(),
            name: name.to_string(),
        }
    }

    /// Creates a missing-field error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binson::Error;
    ///
    /// let err = Error::missing_field("born");
    /// assert_eq!(err.to_string(), "missing mandatory field 'born'");
    /// ```
    pub fn missing_field(field: &str) -> Self {
        Error::MissingField {
            field: field.to_string(),
        }
    }

    /// Creates a type-mismatch error for `field`.
    pub fn field_type(field: &str, expected: &str, found: &str) -> Self {
        Error::FieldType {
            field: field.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error for values Binson cannot represent.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::MaxSizeExceeded { .. }
            | Error::MaxFieldCountExceeded { .. }
            | Error::MaxDepthExceeded { .. } => ErrorKind::ResourceLimit,
            Error::InvalidFormat { .. }
            | Error::UnexpectedEof { .. }
            | Error::FieldOrder { .. }
            | Error::NonCanonicalInteger { .. }
            | Error::MissingField { .. }
            | Error::FieldType { .. }
            | Error::Json { .. } => ErrorKind::Format,
            Error::NullValue | Error::UnsupportedType(_) | Error::Custom(_) => ErrorKind::Data,
        }
    }

    /// Returns `true` for format errors, including resource-limit errors.
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self.kind(), ErrorKind::Format | ErrorKind::ResourceLimit)
    }

    /// Returns `true` if the input was rejected only for exceeding a ceiling.
    #[must_use]
    pub fn is_resource_limit(&self) -> bool {
        self.kind() == ErrorKind::ResourceLimit
    }

    /// Returns `true` if the byte source or sink failed.
    #[must_use]
    pub fn is_io(&self) -> bool {
        self.kind() == ErrorKind::Io
    }

    /// Byte offset into the binary input, for errors raised by the decoder.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::InvalidFormat { offset, .. }
            | Error::UnexpectedEof { offset, .. }
            | Error::FieldOrder { offset, .. }
            | Error::NonCanonicalInteger { offset, .. }
            | Error::MaxSizeExceeded { offset, .. }
            | Error::MaxFieldCountExceeded { offset, .. }
            | Error::MaxDepthExceeded { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            line: err.line(),
            col: err.column(),
            msg: err.to_string(),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
