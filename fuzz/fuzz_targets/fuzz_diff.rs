#![no_main]
// SPDX-License-Identifier: MIT OR Apache-2.0
//! libFuzzer target for diff strategies against both patch appliers
//!
//! Tests:
//! - Structural diffs reproduce their target
//! - Deep and flat diffs always apply
//! - The document applier agrees with the canonical applier

use libfuzzer_sys::fuzz_target;
use patchwork_diff::{apply_patch, deep_diff, flat_diff, json_diff};
use patchwork_doc::Document;

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 || data.len() < 4 {
        return;
    }

    // Split data into the original document and the patch document
    let mid = data.len() / 2;
    let Ok(mut original) = Document::parse(&data[..mid]) else {
        return;
    };
    let Ok(patch) = Document::parse(&data[mid..]) else {
        return;
    };
    let before = original.standardize();
    let patch = patch.standardize();

    // === Contract: structural diff round trip ===
    let ops = json_diff(&before, &patch);
    let patched = apply_patch(&before, &ops).expect("structural ops apply");
    assert_eq!(patched, patch, "structural diff must reproduce the target");

    // === Contract: deep and flat walks produce applicable operations ===
    let deep = deep_diff(&before, &patch);
    let deep_applied = apply_patch(&before, &deep).expect("deep ops apply");
    assert!(
        deep_diff(&deep_applied, &patch).is_empty(),
        "deep diff must be idempotent"
    );
    let flat = flat_diff(&patch);
    if patch.is_object() {
        let _ = apply_patch(&before, &flat);
    }

    // === Contract: the live document agrees with the canonical tree ===
    original.apply(&deep).expect("document accepts deep ops");
    assert_eq!(original.standardize(), deep_applied);
    original.format();
    assert_eq!(original.standardize(), deep_applied);
});
