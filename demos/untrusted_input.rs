//! Decoding untrusted bytes with resource limits.
//!
//! Run with: cargo run --example untrusted_input

use binson::{decode_with_options, encode, BinsonObject, DecodeOptions};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let options = DecodeOptions::new()
        .with_max_size(1024)
        .with_max_field_count(16)
        .with_max_depth(8);

    let small = BinsonObject::new().with("cmd", "ping").with("seq", 7);
    let obj = decode_with_options(&encode(&small)?, options)?;
    println!("✓ accepted {}", obj);

    // A length prefix claiming 1 MiB is rejected before any payload is read
    let mut hostile = vec![0x40, 0x14, 0x01, b'a', 0x1a];
    hostile.extend_from_slice(&(1i32 << 20).to_le_bytes());
    report("oversized bytes", decode_with_options(&hostile, options));

    let wide: BinsonObject = (0..32)
        .map(|i| (format!("f{:02}", i), i.into()))
        .collect();
    report("too many fields", decode_with_options(&encode(&wide)?, options));

    let mut deep = BinsonObject::new();
    for _ in 0..16 {
        deep = BinsonObject::new().with("n", deep);
    }
    report("too deep", decode_with_options(&encode(&deep)?, options));

    // Out of order fields are a format error, not a limit
    let unordered = [
        0x40, 0x14, 0x01, b'b', 0x44, 0x14, 0x01, b'a', 0x44, 0x41,
    ];
    report("unordered", decode_with_options(&unordered, options));

    Ok(())
}

fn report(label: &str, result: binson::Result<BinsonObject>) {
    match result {
        Ok(_) => println!("{}: accepted", label),
        Err(e) if e.is_resource_limit() => println!("{}: limit hit: {}", label, e),
        Err(e) => println!("{}: malformed: {}", label, e),
    }
}
