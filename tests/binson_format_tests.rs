//! Byte-exact tests of the wire format: what the encoder emits and what the
//! decoder accepts or rejects.

use binson::{
    decode, decode_with_options, encode, BinsonObject, DecodeOptions, Error, ErrorKind, Value,
};

fn from_hex(s: &str) -> Vec<u8> {
    hex::decode(s).unwrap()
}

fn utf8(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

// Encoding

#[test]
fn test_empty_object() {
    assert_eq!(encode(&BinsonObject::new()).unwrap(), vec![0x40, 0x41]);
}

#[test]
fn test_nested_empty_object_under_empty_name() {
    let obj = BinsonObject::new().with("", BinsonObject::new());
    assert_eq!(
        encode(&obj).unwrap(),
        vec![0x40, 0x14, 0x00, 0x40, 0x41, 0x41]
    );
}

#[test]
fn test_integer_minimal_widths() {
    let cases: &[(i64, &str)] = &[
        (0, "1000"),
        (127, "107f"),
        (-128, "1080"),
        (128, "118000"),
        (-129, "117fff"),
        (32767, "11ff7f"),
        (32768, "1200800000"),
        (-32769, "12ff7fffff"),
        (2147483647, "12ffffff7f"),
        (2147483648, "130000008000000000"),
        (i64::MAX, "13ffffffffffffff7f"),
    ];

    for (n, expected) in cases {
        let obj = BinsonObject::new().with("a", *n);
        let mut want = from_hex("40140161");
        want.extend(from_hex(expected));
        want.push(0x41);
        assert_eq!(encode(&obj).unwrap(), want, "encoding {}", n);
        assert_eq!(decode(&want).unwrap().get_integer("a").unwrap(), *n);
    }
}

#[test]
fn test_scalar_encodings() {
    let obj = BinsonObject::new()
        .with("b", true)
        .with("c", false)
        .with("d", 1.0)
        .with("s", "hi")
        .with("y", vec![0xffu8]);
    let expected = from_hex(concat!(
        "40",
        "140162", "44",
        "140163", "45",
        "140164", "46000000000000f03f",
        "140173", "14026869",
        "140179", "1801ff",
        "41"
    ));
    assert_eq!(encode(&obj).unwrap(), expected);
}

#[test]
fn test_array_encoding() {
    let obj = BinsonObject::new().with(
        "a",
        vec![Value::from(true), Value::from("b"), Value::Array(vec![])],
    );
    assert_eq!(encode(&obj).unwrap(), from_hex("40140161424414016242434341"));
}

#[test]
fn test_field_order_ascii() {
    // bbb inserted before aaa, emitted after
    let obj = BinsonObject::new()
        .with("bbb", BinsonObject::new())
        .with("aaa", BinsonObject::new());
    assert_eq!(
        encode(&obj).unwrap(),
        from_hex("40140361616140411403626262404141")
    );

    let obj = BinsonObject::new()
        .with("aqb", BinsonObject::new())
        .with("aqa", BinsonObject::new());
    assert_eq!(
        encode(&obj).unwrap(),
        from_hex("40140361716140411403617162404141")
    );
}

#[test]
fn test_field_order_is_utf8_not_utf16() {
    let s1 = utf8(&[0xf3, 0x91, 0xb0, 0xa7]);
    let s2 = utf8(&[0xef, 0xad, 0xab, 0xe8, 0xb0, 0xa6]);
    let obj = BinsonObject::new()
        .with(s1, BinsonObject::new())
        .with(s2, BinsonObject::new());

    let expected = vec![
        0x40, 0x14, 0x06, 0xef, 0xad, 0xab, 0xe8, 0xb0, 0xa6, 0x40, 0x41, 0x14, 0x04, 0xf3, 0x91,
        0xb0, 0xa7, 0x40, 0x41, 0x41,
    ];
    assert_eq!(encode(&obj).unwrap(), expected);
    assert_eq!(decode(&expected).unwrap(), obj);
}

#[test]
fn test_field_order_multibyte() {
    let s1 = utf8(&[0xec, 0xbe, 0xb6, 0xe9, 0xb0, 0x8a]);
    let s2 = utf8(&[0xec, 0x8c, 0xb7, 0xe9, 0xb4, 0x88]);
    let obj = BinsonObject::new()
        .with(s1, BinsonObject::new())
        .with(s2, BinsonObject::new());

    let expected = vec![
        0x40, 0x14, 0x06, 0xec, 0x8c, 0xb7, 0xe9, 0xb4, 0x88, 0x40, 0x41, 0x14, 0x06, 0xec, 0xbe,
        0xb6, 0xe9, 0xb0, 0x8a, 0x40, 0x41, 0x41,
    ];
    assert_eq!(encode(&obj).unwrap(), expected);
}

#[test]
fn test_string_length_widths() {
    let long = "x".repeat(128);
    let obj = BinsonObject::new().with("s", long.as_str());
    let bytes = encode(&obj).unwrap();
    assert_eq!(&bytes[..6], &[0x40, 0x14, 0x01, b's', 0x15, 0x80]);
    assert_eq!(bytes[6], 0x00);
    assert_eq!(bytes.len(), 4 + 3 + 128 + 1);
}

// Decoding: accepted input

#[test]
fn test_ordered_fields_accepted() {
    // {"A": "A", "B": "B"}
    let bytes = from_hex("4014014114014114014214014241");
    let obj = decode(&bytes).unwrap();
    assert_eq!(obj.get_string("A").unwrap(), "A");
    assert_eq!(obj.get_string("B").unwrap(), "B");
}

#[test]
fn test_decoded_fields_iterate_in_canonical_order() {
    let obj = BinsonObject::new().with("b", 1).with("a", 2).with("", 3);
    let back = decode(&encode(&obj).unwrap()).unwrap();
    let names: Vec<_> = back.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["", "a", "b"]);
}

#[test]
fn test_two_byte_integer_accepted_when_needed() {
    // 259 = 0x0103
    let obj = decode(&from_hex("4014016111030141")).unwrap();
    assert_eq!(obj.get_integer("a").unwrap(), 259);
}

#[test]
fn test_eight_byte_integer_accepted_when_needed() {
    let obj = decode(&from_hex("4014016113030101000100000041")).unwrap();
    assert_eq!(obj.get_integer("a").unwrap(), 0x0000_0001_0001_0103);
}

#[test]
fn test_trailing_bytes_ignored() {
    let obj = decode(&[0x40, 0x41, 0x00, 0x01]).unwrap();
    assert!(obj.is_empty());
}

#[test]
fn test_double_bit_patterns_survive() {
    for bits in [0x7ff8_0000_0000_0001u64, 0x8000_0000_0000_0000, 0x7ff0_0000_0000_0000] {
        let obj = BinsonObject::new().with("d", f64::from_bits(bits));
        let back = decode(&encode(&obj).unwrap()).unwrap();
        assert_eq!(back.get_double("d").unwrap().to_bits(), bits);
    }
}

// Decoding: rejected input

fn assert_format_error(bytes: &[u8]) -> Error {
    let err = decode(bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format, "{:?} for {:02x?}", err, bytes);
    err
}

#[test]
fn test_empty_input() {
    let err = assert_format_error(&[]);
    assert!(matches!(err, Error::UnexpectedEof { offset: 0, .. }));
}

#[test]
fn test_bad_first_byte() {
    assert_format_error(&[0x41]);
    assert_format_error(&[0x42, 0x43]);
}

#[test]
fn test_bad_end_byte() {
    let mut bytes = encode(&BinsonObject::new().with("a", 1)).unwrap();
    let last = bytes.len() - 1;
    bytes[last] -= 1;
    assert_format_error(&bytes);

    assert_format_error(&[0x40, 0x40]);
}

#[test]
fn test_non_string_where_name_expected() {
    assert_format_error(&[0x40, 0x44, 0x01, b'a', 0x44, 0x41]);
    assert_format_error(&[0x40, 0x10, 0x01, 0x44, 0x41]);
    assert_format_error(&[0x40, 0x43, 0x41]);
}

#[test]
fn test_unordered_fields_rejected() {
    // {"B": "B", "A": "A"}
    let err = assert_format_error(&from_hex("4014014214014214014114014141"));
    match err {
        Error::FieldOrder { previous, name, offset } => {
            assert_eq!(previous, "B");
            assert_eq!(name, "A");
            assert_eq!(offset, 7);
        }
        other => panic!("expected FieldOrder, got {:?}", other),
    }
}

#[test]
fn test_duplicate_fields_rejected() {
    // {"a": true, "a": false}
    let err = assert_format_error(&from_hex("40140161441401614541"));
    assert!(matches!(err, Error::FieldOrder { .. }));
}

#[test]
fn test_inflated_integer_rejected() {
    // 3 in the 2-byte form
    let err = assert_format_error(&from_hex("4014016111030041"));
    assert!(matches!(
        err,
        Error::NonCanonicalInteger {
            value: 3,
            width: 2,
            offset: 4
        }
    ));

    // 65795 in the 8-byte form
    assert_format_error(&from_hex("4014016113030101000000000041"));
    // -1 in the 4-byte form
    assert_format_error(&from_hex("4014016112ffffffff41"));
}

#[test]
fn test_inflated_length_rejected() {
    // name "a" with a 2-byte length prefix
    assert_format_error(&from_hex("40150100614441"));
    // bytes value of length 1 with a 4-byte length prefix
    assert_format_error(&from_hex("401401611a010000000041"));
}

#[test]
fn test_negative_length_rejected() {
    assert_format_error(&from_hex("4014016114ff41"));
}

#[test]
fn test_reserved_type_bytes_rejected() {
    // STRING8 and BYTES8 do not exist
    assert_format_error(&from_hex("401401611701000000000000006141"));
    assert_format_error(&from_hex("401401611b01000000000000000041"));
    assert_format_error(&from_hex("401401614741"));
}

#[test]
fn test_end_inside_array_rejected() {
    assert_format_error(&from_hex("40140161424141"));
}

#[test]
fn test_end_array_as_value_rejected() {
    assert_format_error(&from_hex("401401614341"));
}

#[test]
fn test_invalid_utf8_rejected() {
    assert_format_error(&[0x40, 0x14, 0x01, 0xff, 0x44, 0x41]);
    assert_format_error(&[0x40, 0x14, 0x01, b'a', 0x14, 0x02, 0xc3, 0x28, 0x41]);
}

#[test]
fn test_every_truncation_rejected() {
    let obj = BinsonObject::new()
        .with("a", vec![Value::from(1), Value::from("two"), Value::from(3.0)])
        .with("b", BinsonObject::new().with("c", vec![1u8, 2, 3]))
        .with("d", 1_000_000);
    let bytes = encode(&obj).unwrap();

    for end in 0..bytes.len() {
        let err = decode(&bytes[..end]).unwrap_err();
        assert!(err.is_format(), "prefix of {} bytes: {:?}", end, err);
        assert!(!err.is_resource_limit());
    }
    assert_eq!(decode(&bytes).unwrap(), obj);
}

// Resource limits

#[test]
fn test_max_size() {
    let obj = BinsonObject::new().with("blob", vec![0u8; 100_000]);
    let bytes = encode(&obj).unwrap();

    let err = decode_with_options(&bytes, DecodeOptions::new().with_max_size(4000)).unwrap_err();
    assert!(err.is_resource_limit());
    assert!(err.is_format());
    assert!(matches!(err, Error::MaxSizeExceeded { max_size: 4000, .. }));

    let exact = DecodeOptions::new().with_max_size(bytes.len());
    assert_eq!(decode_with_options(&bytes, exact).unwrap(), obj);

    let short = DecodeOptions::new().with_max_size(bytes.len() - 1);
    assert!(decode_with_options(&bytes, short).unwrap_err().is_resource_limit());

    let back = decode(&bytes).unwrap();
    assert_eq!(encode(&back).unwrap(), bytes);
}

#[test]
fn test_max_size_checked_before_payload() {
    // claims a 1,000,000 byte string but is only a few bytes long
    let bytes = from_hex("401401611640420f00");
    let err = decode_with_options(&bytes, DecodeOptions::new().with_max_size(100)).unwrap_err();
    assert!(err.is_resource_limit());
}

fn object_with_fields(n: usize) -> BinsonObject {
    (0..n)
        .map(|i| (format!("f{:03}", i), Value::from(i as i64)))
        .collect()
}

#[test]
fn test_max_field_count() {
    let bytes = encode(&object_with_fields(20)).unwrap();

    let err =
        decode_with_options(&bytes, DecodeOptions::new().with_max_field_count(10)).unwrap_err();
    assert!(err.is_resource_limit());
    assert!(matches!(
        err,
        Error::MaxFieldCountExceeded {
            max_field_count: 10,
            ..
        }
    ));

    let obj = decode_with_options(&bytes, DecodeOptions::new().with_max_field_count(20)).unwrap();
    assert_eq!(obj.len(), 20);
}

#[test]
fn test_field_count_is_per_level() {
    let inner = object_with_fields(8);
    let outer = BinsonObject::new()
        .with("x", inner.clone())
        .with("y", inner);
    let bytes = encode(&outer).unwrap();
    let options = DecodeOptions::new().with_max_field_count(8);
    assert_eq!(decode_with_options(&bytes, options).unwrap(), outer);
}

#[test]
fn test_default_limits_allow_typical_objects() {
    let obj = object_with_fields(100);
    let bytes = encode(&obj).unwrap();
    assert_eq!(decode(&bytes).unwrap(), obj);
}

#[test]
fn test_deep_nesting_rejected_not_overflowed() {
    let mut bytes = vec![0x40, 0x14, 0x01, b'a'];
    bytes.extend(std::iter::repeat(0x42).take(100_000));
    let err = decode(&bytes).unwrap_err();
    assert!(err.is_resource_limit());
    assert!(matches!(err, Error::MaxDepthExceeded { max_depth: 256, .. }));
}
