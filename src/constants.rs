//! Byte markers of the Binson wire grammar.
//!
//! The low two bits of the integer, string and bytes type bytes select the
//! width of the integer (or length prefix) that follows.

/// Opens an object.
pub const BEGIN: u8 = 0x40;
/// Closes an object.
pub const END: u8 = 0x41;
/// Opens an array.
pub const BEGIN_ARRAY: u8 = 0x42;
/// Closes an array.
pub const END_ARRAY: u8 = 0x43;

/// Boolean `true`.
pub const TRUE: u8 = 0x44;
/// Boolean `false`.
pub const FALSE: u8 = 0x45;
/// Followed by 8 bytes, little-endian IEEE-754.
pub const DOUBLE: u8 = 0x46;

/// Base type byte for integers.
pub const INTEGER: u8 = 0x10;
pub const INTEGER1: u8 = 0x10;
pub const INTEGER2: u8 = 0x11;
pub const INTEGER4: u8 = 0x12;
pub const INTEGER8: u8 = 0x13;

/// Base type byte for UTF-8 strings.
pub const STRING: u8 = 0x14;
pub const STRING1: u8 = 0x14;
pub const STRING2: u8 = 0x15;
pub const STRING4: u8 = 0x16;

/// Base type byte for byte blobs.
pub const BYTES: u8 = 0x18;
pub const BYTES1: u8 = 0x18;
pub const BYTES2: u8 = 0x19;
pub const BYTES4: u8 = 0x1a;

/// Last two bits of a type byte hold the width code.
pub const INT_LENGTH_MASK: u8 = 0x03;
pub const ONE_BYTE: u8 = 0x00;
pub const TWO_BYTES: u8 = 0x01;
pub const FOUR_BYTES: u8 = 0x02;
pub const EIGHT_BYTES: u8 = 0x03;

pub const TWO_TO_7: i64 = 1 << 7;
pub const TWO_TO_15: i64 = 1 << 15;
pub const TWO_TO_31: i64 = 1 << 31;

/// Returns the width code (one of [`ONE_BYTE`]..[`EIGHT_BYTES`]) of the
/// narrowest two's-complement field able to hold `value`.
#[inline]
#[must_use]
pub const fn width_code(value: i64) -> u8 {
    if value >= -TWO_TO_7 && value < TWO_TO_7 {
        ONE_BYTE
    } else if value >= -TWO_TO_15 && value < TWO_TO_15 {
        TWO_BYTES
    } else if value >= -TWO_TO_31 && value < TWO_TO_31 {
        FOUR_BYTES
    } else {
        EIGHT_BYTES
    }
}

/// Number of payload bytes selected by a width code.
#[inline]
#[must_use]
pub const fn width_len(code: u8) -> usize {
    1 << (code & INT_LENGTH_MASK)
}
