//! Validating decoded objects against an exemplar schema.
//!
//! Run with: cargo run --example schema_validation

use binson::{binson_object, decode, encode, validate};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let schema = binson_object!({
        "name": "Maria",
        "born": 1980,
        "born-info": { "comment": "Year of birth", "optional": true },
        "permissions": [{ "name": "read", "id": b"\x0c\x0c\x0c\x0c" }],
    });

    let good = binson_object!({
        "name": "Natalia",
        "permissions": [
            { "name": "read", "id": b"\x01\x02\x03\x04" },
            { "name": "write", "id": b"\x05\x06\x07\x08" },
        ],
    });
    let decoded = decode(&encode(&good)?)?;
    validate(&decoded, &schema)?;
    println!("✓ {} is valid", decoded);

    let bad = binson_object!({
        "name": "Lars",
        "born": "1980-03-30",
        "permissions": [],
    });
    match validate(&bad, &schema) {
        Ok(()) => println!("unexpectedly valid"),
        Err(e) => println!("✗ rejected: {}", e),
    }

    Ok(())
}
