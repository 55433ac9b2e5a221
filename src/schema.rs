//! Schema validation.
//!
//! A schema is itself a [`BinsonObject`] whose fields hold exemplar values:
//! a data object matches when each schema field is present with a value of
//! the same type. Validation stops at the first violation.
//!
//! - Fields named `X-info` describe field `X` and are not data fields. An
//!   `X-info` object with `optional: true` makes `X` optional.
//! - An object exemplar is applied recursively to the nested object.
//! - A one-element array is an exemplar for every element of the data array.
//!   Arrays of any other length accept any contents.
//! - Data fields the schema does not mention are allowed.
//!
//! ## Examples
//!
//! ```rust
//! use binson::{binson_object, validate};
//!
//! let schema = binson_object!({
//!     "name": "Maria",
//!     "born": 1980,
//!     "born-info": { "optional": true },
//! });
//!
//! assert!(validate(&binson_object!({ "name": "Natalia", "born": 2011 }), &schema).is_ok());
//! assert!(validate(&binson_object!({ "name": "Natalia" }), &schema).is_ok());
//! assert!(validate(&binson_object!({ "born": 2011 }), &schema).is_err());
//! ```

use crate::{BinsonObject, Error, Result, Value};

const INFO_SUFFIX: &str = "-info";

/// Checks `value` against `schema`.
///
/// # Errors
///
/// Returns [`Error::MissingField`] for an absent mandatory field and
/// [`Error::FieldType`] when a value's type differs from the exemplar's.
pub fn validate(value: &BinsonObject, schema: &BinsonObject) -> Result<()> {
    for (name, exemplar) in schema.sorted_fields() {
        if name.ends_with(INFO_SUFFIX) {
            continue;
        }

        match value.get(name) {
            Some(actual) => validate_value(name, exemplar, actual)?,
            None if is_optional(schema, name) => {}
            None => return Err(Error::missing_field(name)),
        }
    }
    Ok(())
}

fn is_optional(schema: &BinsonObject, name: &str) -> bool {
    let info_name = format!("{}{}", name, INFO_SUFFIX);
    schema
        .get(&info_name)
        .and_then(Value::as_object)
        .and_then(|info| info.get("optional"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn validate_value(name: &str, exemplar: &Value, actual: &Value) -> Result<()> {
    if !exemplar.same_type(actual) {
        return Err(Error::field_type(
            name,
            exemplar.type_name(),
            actual.type_name(),
        ));
    }

    match (exemplar, actual) {
        (Value::Object(schema), Value::Object(object)) => validate(object, schema),
        (Value::Array(schema), Value::Array(elements)) if schema.len() == 1 => {
            let element_exemplar = &schema[0];
            elements
                .iter()
                .try_for_each(|element| validate_value(name, element_exemplar, element))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch() {
        let schema = BinsonObject::new().with("born", 1980);
        let value = BinsonObject::new().with("born", "2011");
        let err = validate(&value, &schema).unwrap_err();
        assert_eq!(err, Error::field_type("born", "integer", "string"));
        assert!(err.is_format());
    }

    #[test]
    fn test_info_field_not_required() {
        let schema = BinsonObject::new()
            .with("a", 1)
            .with("a-info", BinsonObject::new().with("optional", false));
        let err = validate(&BinsonObject::new(), &schema).unwrap_err();
        assert_eq!(err, Error::missing_field("a"));
    }

    #[test]
    fn test_optional_must_be_boolean_true() {
        let schema = BinsonObject::new()
            .with("a", 1)
            .with("a-info", BinsonObject::new().with("optional", 1));
        assert!(validate(&BinsonObject::new(), &schema).is_err());
    }

    #[test]
    fn test_optional_present_still_type_checked() {
        let schema = BinsonObject::new()
            .with("a", 1)
            .with("a-info", BinsonObject::new().with("optional", true));
        let value = BinsonObject::new().with("a", true);
        assert!(validate(&value, &schema).is_err());
    }

    #[test]
    fn test_extra_fields_allowed() {
        let schema = BinsonObject::new().with("a", 1);
        let value = BinsonObject::new().with("a", 2).with("b", "extra");
        assert!(validate(&value, &schema).is_ok());
    }

    #[test]
    fn test_nested_array_exemplar() {
        let schema = BinsonObject::new().with(
            "matrix",
            vec![Value::Array(vec![Value::from(0)])],
        );
        let good = BinsonObject::new().with(
            "matrix",
            vec![Value::Array(vec![Value::from(1), Value::from(2)])],
        );
        let bad = BinsonObject::new().with(
            "matrix",
            vec![Value::Array(vec![Value::from(1), Value::from(2.0)])],
        );
        assert!(validate(&good, &schema).is_ok());
        assert!(validate(&bad, &schema).is_err());
    }

    #[test]
    fn test_multi_element_array_is_permissive() {
        let schema = BinsonObject::new().with("list", vec![Value::from(1), Value::from(2)]);
        let value = BinsonObject::new().with("list", vec![Value::from("x")]);
        assert!(validate(&value, &schema).is_ok());

        let empty = BinsonObject::new().with("list", Vec::<Value>::new());
        assert!(validate(&value, &empty).is_ok());
    }
}
