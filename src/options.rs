//! Decoder configuration.
//!
//! [`DecodeOptions`] holds the resource ceilings the decoder enforces on
//! untrusted input. They are passed per call, so one process can apply loose
//! limits to local files and tight ones to network input.
//!
//! ## Examples
//!
//! ```rust
//! use binson::{decode_with_options, BinsonObject, DecodeOptions};
//!
//! let bytes = BinsonObject::new().with("a", 1).to_bytes().unwrap();
//!
//! let options = DecodeOptions::new()
//!     .with_max_size(4096)
//!     .with_max_field_count(16);
//! let obj = decode_with_options(&bytes, options).unwrap();
//! assert_eq!(obj.get_integer("a").unwrap(), 1);
//! ```

/// Default ceiling on total bytes consumed by one decode call.
pub const DEFAULT_MAX_SIZE: usize = 40_000_000;

/// Default ceiling on fields per object level.
pub const DEFAULT_MAX_FIELD_COUNT: usize = 1000;

/// Default ceiling on container nesting, counting the root object as 1.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Resource ceilings for one decode call.
///
/// # Examples
///
/// ```rust
/// use binson::DecodeOptions;
///
/// let options = DecodeOptions::default();
/// assert_eq!(options.max_size, 40_000_000);
/// assert_eq!(options.max_field_count, 1000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum number of bytes read since the call began.
    pub max_size: usize,
    /// Maximum number of fields in any single object.
    pub max_field_count: usize,
    /// Maximum nesting of objects and arrays.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_size: DEFAULT_MAX_SIZE,
            max_field_count: DEFAULT_MAX_FIELD_COUNT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Creates the default options (40,000,000 bytes, 1000 fields per object,
    /// nesting depth 256).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options without size or field-count ceilings, for input the caller
    /// already trusts.
    ///
    /// Never use these on network input: an unbounded source can then keep
    /// the decoder reading indefinitely. The nesting ceiling stays at its
    /// default since the decoder recurses on the call stack.
    #[must_use]
    pub fn unbounded() -> Self {
        DecodeOptions {
            max_size: usize::MAX,
            max_field_count: usize::MAX,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum total number of bytes a decode call may consume.
    ///
    /// # Panics
    ///
    /// Panics if `max_size` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binson::DecodeOptions;
    ///
    /// let options = DecodeOptions::new().with_max_size(4000);
    /// assert_eq!(options.max_size, 4000);
    /// ```
    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        assert!(max_size > 0, "max_size must be positive");
        self.max_size = max_size;
        self
    }

    /// Sets the maximum number of fields allowed in one object.
    ///
    /// # Panics
    ///
    /// Panics if `max_field_count` is zero.
    #[must_use]
    pub fn with_max_field_count(mut self, max_field_count: usize) -> Self {
        assert!(max_field_count > 0, "max_field_count must be positive");
        self.max_field_count = max_field_count;
        self
    }

    /// Sets the maximum nesting depth of objects and arrays.
    ///
    /// # Panics
    ///
    /// Panics if `max_depth` is zero.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        assert!(max_depth > 0, "max_depth must be positive");
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let options = DecodeOptions::new()
            .with_max_size(10)
            .with_max_field_count(3);
        assert_eq!(options.max_size, 10);
        assert_eq!(options.max_field_count, 3);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_unbounded() {
        let options = DecodeOptions::unbounded();
        assert_eq!(options.max_size, usize::MAX);
        assert_eq!(options.max_field_count, usize::MAX);
    }

    #[test]
    #[should_panic(expected = "max_size must be positive")]
    fn test_zero_max_size_panics() {
        let _ = DecodeOptions::new().with_max_size(0);
    }

    #[test]
    #[should_panic(expected = "max_field_count must be positive")]
    fn test_zero_max_field_count_panics() {
        let _ = DecodeOptions::new().with_max_field_count(0);
    }

    #[test]
    #[should_panic(expected = "max_depth must be positive")]
    fn test_zero_max_depth_panics() {
        let _ = DecodeOptions::new().with_max_depth(0);
    }
}
