/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Objects become [`Value::Object`](crate::Value::Object); use
/// [`binson_object!`](crate::binson_object) when a bare
/// [`BinsonObject`](crate::BinsonObject) is wanted. Leaf expressions go
/// through `Value::from`, so bytes are written as `vec![..]` of `u8` or a
/// byte-string literal. There is no null.
///
/// Array elements and field values must each be a single token tree, so a
/// negative number or any other multi-token expression inside `[..]` or
/// `{..}` needs parentheses: `binson!([(-1), 2])`, `binson!({ "k": (-1) })`.
///
/// # Examples
///
/// ```rust
/// use binson::{binson, Value};
///
/// let value = binson!({
///     "name": "Alice",
///     "tags": ["a", "b"],
///     "key": b"\x01\x02",
///     "active": true,
/// });
///
/// let obj = value.as_object().unwrap();
/// assert_eq!(obj.get_string("name").unwrap(), "Alice");
/// assert_eq!(obj.get_bytes("key").unwrap(), &[1, 2]);
/// assert_eq!(obj.get_array("tags").unwrap().len(), 2);
///
/// let offsets = binson!({ "min": (-40), "steps": [(-1), 0, 1] });
/// assert_eq!(offsets.as_object().unwrap().get_integer("min").unwrap(), -40);
/// ```
#[macro_export]
macro_rules! binson {
    (true) => {
        $crate::Value::Boolean(true)
    };

    (false) => {
        $crate::Value::Boolean(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::binson!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::BinsonObject::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::BinsonObject::new();
        $(
            object.put($key, $crate::binson!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

/// Builds a [`BinsonObject`](crate::BinsonObject) from a JSON-like literal.
///
/// ```rust
/// use binson::binson_object;
///
/// let obj = binson_object!({ "a": 1, "b": { "c": [true] } });
/// assert_eq!(obj.get_integer("a").unwrap(), 1);
/// ```
#[macro_export]
macro_rules! binson_object {
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::BinsonObject::new();
        $(
            object.put($key, $crate::binson!($value));
        )*
        object
    }};
}
