#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for JSON Pointer parsing and escaping
//!
//! Tests:
//! - No panics on arbitrary pointers
//! - Parsed pointers format back to the same text
//! - Escaped segments round-trip

use libfuzzer_sys::fuzz_target;
use patchwork_core::{escape_segment, format_pointer, parse_pointer, unescape_segment};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(tokens) = parse_pointer(text) {
        assert_eq!(format_pointer(&tokens), text, "pointer must round-trip");
    }

    let escaped = escape_segment(text);
    assert!(!escaped.contains('/'), "escaped segment contains a slash");
    let unescaped = unescape_segment(&escaped).expect("escaped segment unescapes");
    assert_eq!(unescaped, text);
});
