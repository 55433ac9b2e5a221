//! Field-name ordering.
//!
//! Binson orders object fields by the unsigned, lexicographic order of the
//! UTF-8 bytes of their names. A name that is a byte-prefix of another sorts
//! first. The encoder emits fields in this order and the decoder rejects any
//! input that does not follow it, so this is the single place the order is
//! defined.

use std::cmp::Ordering;

/// Compares two byte strings, treating each byte as unsigned.
///
/// # Examples
///
/// ```rust
/// use binson::order::compare_bytes;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_bytes(&[0x7f], &[0x80]), Ordering::Less);
/// assert_eq!(compare_bytes(b"ab", b"abc"), Ordering::Less);
/// ```
#[inline]
#[must_use]
pub fn compare_bytes(a: &[u8], b: &[u8]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }
    a.len().cmp(&b.len())
}

/// Compares two field names by their UTF-8 encodings.
///
/// Independent of locale and of UTF-16 code-unit order: `"\u{FB6B}"` (UTF-8 `ef ad ab`)
/// sorts before `"\u{D1C27}"` (UTF-8 `f3 ...`) even though UTF-16 would order
/// them the other way.
///
/// # Examples
///
/// ```rust
/// use binson::order::compare_field_names;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_field_names("A", "B"), Ordering::Less);
/// assert_eq!(compare_field_names("", "a"), Ordering::Less);
/// assert_eq!(compare_field_names("b", "b"), Ordering::Equal);
/// ```
#[inline]
#[must_use]
pub fn compare_field_names(a: &str, b: &str) -> Ordering {
    compare_bytes(a.as_bytes(), b.as_bytes())
}
