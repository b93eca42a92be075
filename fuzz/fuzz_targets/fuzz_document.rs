#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for the JSONC document model
//!
//! Tests:
//! - No panics on arbitrary input
//! - Parsed documents render back byte for byte
//! - Formatting never changes the canonical value

use libfuzzer_sys::fuzz_target;
use patchwork_doc::Document;

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 {
        return;
    }

    let Ok(doc) = Document::parse(data) else {
        return;
    };

    // === Contract: untouched documents round-trip exactly ===
    assert_eq!(doc.render().as_bytes(), data, "render must reproduce the input");

    // === Contract: format keeps the value and reparses ===
    let value = doc.standardize();
    let mut formatted = doc.clone();
    formatted.format();
    assert_eq!(formatted.standardize(), value, "format changed the value");

    let reparsed = Document::parse_str(&formatted.render()).expect("formatted output parses");
    assert_eq!(reparsed.standardize(), value, "formatted output reparses differently");
});
