use binson::{binson_object, decode, encode, validate, BinsonObject, Error, Value};

fn person_schema() -> BinsonObject {
    BinsonObject::new().with("name", "Maria").with("born", 1980)
}

fn permission(name: &str) -> Value {
    Value::Object(
        BinsonObject::new()
            .with("name", name)
            .with("id", vec![12u8, 12, 12, 12]),
    )
}

fn permissions_schema() -> BinsonObject {
    BinsonObject::new().with("permissions", vec![permission("read")])
}

#[test]
fn test_sanity() {
    let obj = BinsonObject::new().with("name", "Natalia").with("born", 2011);
    obj.validate(&person_schema()).unwrap();
}

#[test]
fn test_missing_mandatory_field() {
    let obj = BinsonObject::new().with("name", "Natalia");
    let err = obj.validate(&person_schema()).unwrap_err();
    assert_eq!(err, Error::missing_field("born"));
    assert_eq!(err.to_string(), "missing mandatory field 'born'");
    assert!(err.is_format());
}

#[test]
fn test_missing_optional_field() {
    let obj = BinsonObject::new().with("name", "Natalia");
    let schema = person_schema()
        .with("name-info", BinsonObject::new())
        .with(
            "born-info",
            BinsonObject::new()
                .with("comment", "The year of birth")
                .with("optional", true),
        );
    validate(&obj, &schema).unwrap();
}

#[test]
fn test_invalid_type() {
    let obj = BinsonObject::new()
        .with("name", "Natalia")
        .with("born", "1980-03-30");
    let err = validate(&obj, &person_schema()).unwrap_err();
    assert!(matches!(err, Error::FieldType { ref field, .. } if field == "born"));
    assert!(err.to_string().contains("expected integer, got string"));
}

#[test]
fn test_additional_field() {
    let obj = BinsonObject::new()
        .with("name", "Lars")
        .with("born", 2011)
        .with("nickName", "Lasse");
    validate(&obj, &person_schema()).unwrap();
}

#[test]
fn test_nested_valid() {
    let schema = binson_object!({
        "companyName": "Example Name",
        "boss": { "name": "Anton Antonsson", "born": 1980 },
        "employees": 10,
    });
    let obj = binson_object!({
        "companyName": "Code Exchange AB",
        "boss": { "name": "Natalia", "born": 2011 },
        "employees": 20,
    });
    validate(&obj, &schema).unwrap();
}

#[test]
fn test_nested_missing_field() {
    let schema = binson_object!({
        "companyName": "Example Name",
        "boss": { "name": "Anton Antonsson", "born": 1980 },
    });
    let obj = binson_object!({
        "companyName": "Code Exchange AB",
        "boss": { "name": "Natalia" },
    });
    assert_eq!(
        validate(&obj, &schema).unwrap_err(),
        Error::missing_field("born")
    );
}

#[test]
fn test_array_of_scalars() {
    let schema = BinsonObject::new().with("permissions", vec![Value::from("permission-example")]);
    let obj = BinsonObject::new().with(
        "permissions",
        vec![Value::from("read"), Value::from("append")],
    );
    validate(&obj, &schema).unwrap();

    let bad = BinsonObject::new().with("permissions", vec![Value::from("read"), Value::from(1)]);
    assert!(validate(&bad, &schema).is_err());
}

#[test]
fn test_empty_schema_array() {
    let schema = BinsonObject::new().with("permissions", Vec::<Value>::new());
    let obj = BinsonObject::new().with(
        "permissions",
        vec![Value::from("read"), Value::from(1234)],
    );
    validate(&obj, &schema).unwrap();
}

#[test]
fn test_array_of_objects() {
    let obj = BinsonObject::new().with(
        "permissions",
        vec![permission("read"), permission("write")],
    );
    validate(&obj, &permissions_schema()).unwrap();
}

#[test]
fn test_array_element_missing_field() {
    let bad = Value::Object(
        BinsonObject::new()
            .with("name", "write")
            .with("MYID", vec![12u8, 12, 12, 12]),
    );
    let obj = BinsonObject::new().with("permissions", vec![permission("read"), bad]);
    assert_eq!(
        validate(&obj, &permissions_schema()).unwrap_err(),
        Error::missing_field("id")
    );
}

#[test]
fn test_array_element_wrong_type() {
    let obj = BinsonObject::new().with("permissions", vec![Value::from("read")]);
    let err = validate(&obj, &permissions_schema()).unwrap_err();
    assert_eq!(err, Error::field_type("permissions", "object", "string"));
}

#[test]
fn test_validate_decoded_input() {
    let bytes = encode(&BinsonObject::new().with("name", "Natalia").with("born", 2011)).unwrap();
    let obj = decode(&bytes).unwrap();
    obj.validate(&person_schema()).unwrap();
}

#[test]
fn test_validation_does_not_mutate() {
    let obj = BinsonObject::new().with("name", "Natalia");
    let before = obj.clone();
    let _ = validate(&obj, &person_schema());
    assert_eq!(obj, before);
}
