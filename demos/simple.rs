//! Basic Binson encoding and decoding.
//!
//! Run with: cargo run --example simple

use binson::{decode, encode, from_slice, to_vec, BinsonObject, Value};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
    email: String,
    #[serde(with = "serde_bytes")]
    public_key: Vec<u8>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Build an object by hand
    let obj = BinsonObject::new()
        .with("name", "Alice Johnson")
        .with("id", 42)
        .with("key", vec![0xde_u8, 0xad, 0xbe, 0xef])
        .with("roles", vec![Value::from("admin"), Value::from("dev")]);

    let bytes = encode(&obj)?;
    println!("Binson bytes ({}): {:02x?}\n", bytes.len(), bytes);
    println!("As JSON: {}\n", obj.to_json()?);

    let decoded = decode(&bytes)?;
    assert_eq!(obj, decoded);
    println!("Decoded name: {}", decoded.get_string("name")?);

    // Same bytes for the same fields, whatever the insertion order
    let reordered = BinsonObject::new()
        .with("roles", vec![Value::from("admin"), Value::from("dev")])
        .with("key", vec![0xde_u8, 0xad, 0xbe, 0xef])
        .with("id", 42)
        .with("name", "Alice Johnson");
    assert_eq!(bytes, encode(&reordered)?);

    // Serde path
    let user = User {
        id: 43,
        name: "Bob Smith".to_string(),
        email: "bob@example.com".to_string(),
        public_key: vec![0x04, 0x1f, 0x8b],
    };
    let bytes = to_vec(&user)?;
    assert!(decode(&bytes)?.has_bytes("public_key"));
    let user_back: User = from_slice(&bytes)?;
    assert_eq!(user, user_back);
    println!("✓ Round-trip successful");

    Ok(())
}
