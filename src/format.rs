//! Binson Wire Format
//!
//! This module documents the binary format as implemented by this library.
//! It contains no code.
//!
//! # Overview
//!
//! Binson is a compact binary format for key/value data. A message is always
//! one object. Every value tree has exactly one valid encoding, its
//! *canonical form*, and the decoder accepts nothing else. Two trees are
//! therefore equal exactly when their encodings are equal, so encoded bytes can
//! be hashed or signed directly.
//!
//! # Data Model
//!
//! | Type | Payload |
//! |------|---------|
//! | boolean | `true` or `false` |
//! | integer | signed 64-bit |
//! | double | IEEE-754 binary64, any bit pattern |
//! | string | UTF-8 text |
//! | bytes | raw octets |
//! | array | ordered list of values |
//! | object | set of uniquely named values |
//!
//! There is no null.
//!
//! # Markers
//!
//! | Marker | Byte | Followed by |
//! |--------|------|-------------|
//! | BEGIN | `0x40` | fields, then END |
//! | END | `0x41` | |
//! | BEGIN_ARRAY | `0x42` | values, then END_ARRAY |
//! | END_ARRAY | `0x43` | |
//! | TRUE | `0x44` | |
//! | FALSE | `0x45` | |
//! | DOUBLE | `0x46` | 8 bytes, little-endian |
//! | INTEGER1/2/4/8 | `0x10`..`0x13` | 1/2/4/8 bytes, little-endian two's complement |
//! | STRING1/2/4 | `0x14`..`0x16` | length, then UTF-8 bytes |
//! | BYTES1/2/4 | `0x18`..`0x1a` | length, then raw bytes |
//!
//! The low two bits of an integer, string or bytes type byte give the width
//! of what follows: `00` is 1 byte, `01` is 2, `10` is 4 and `11` is 8.
//! Strings and bytes have no 8-byte length form, so `0x17` and `0x1b` are
//! invalid.
//!
//! A field is a string (the name) followed by any value.
//!
//! ```text
//! {}                        40 41
//! {"": {}}                  40 14 00 40 41 41
//! {"a": 300}                40 14 01 61 11 2c 01 41
//! {"a": [true, "b"]}        40 14 01 61 42 44 14 01 62 43 41
//! ```
//!
//! # Canonical Form
//!
//! ## Minimal widths
//!
//! Integers, and the length prefixes of strings and bytes, use the narrowest
//! width whose two's-complement range contains the value:
//!
//! | Range | Width |
//! |-------|-------|
//! | -2^7 .. 2^7-1 | 1 |
//! | -2^15 .. 2^15-1 | 2 |
//! | -2^31 .. 2^31-1 | 4 |
//! | otherwise | 8 |
//!
//! So 127 is `10 7f` and 128 is `11 80 00`. The value 3 written as
//! `11 03 00` is rejected.
//!
//! ## Field order
//!
//! Fields are sorted by the unsigned byte order of their UTF-8 names, a
//! prefix sorting first (see [`crate::order`]). Each name must be strictly
//! greater than the one before it, which also rules out duplicates.
//!
//! # Resource Limits
//!
//! Decoding is bounded by [`DecodeOptions`](crate::DecodeOptions): total
//! bytes read (default 40,000,000), fields per object (default 1000) and
//! nesting depth (default 256). Lengths are checked against the remaining
//! byte budget before any payload is read, so a forged length cannot force a
//! large allocation.
//!
//! # Schemas
//!
//! See [`crate::schema`] for validating decoded objects against an exemplar
//! object.
