// SPDX-License-Identifier: MIT OR Apache-2.0
//! # JSON Diff/Merge
//!
//! Structural operations over canonical JSON trees (`serde_json::Value`).
//!
//! ## Deep Merge
//! Overlay a patch document onto a base document. Nested objects merge
//! recursively and the patch wins everywhere else, arrays included.
//!
//! ## JSON Diff
//! Generate the RFC 6902 operations that turn one tree into another, with a
//! choice of tree walk:
//! - structural: compare both trees, used against a merge result
//! - deep: walk a patch document where `null` means delete
//! - flat: emit an `add` for every non-null leaf of a patch document
//!
//! ## JSON Patch
//! Apply `add`, `remove` and `replace` operations to a canonical tree. Used
//! to check that a diff reproduces its target.

mod compute;
mod equality;
mod merge;
mod patch;

pub use compute::{
    DiffOptions, DiffStrategy, deep_diff, diff_with, flat_diff, json_diff, json_diff_with_options,
    materialize,
};
pub use equality::{Equality, ValueComparator, render, rendered_eq, structural_eq};
pub use merge::{MergeError, Side, merge, merge_json, merge_many};
pub use patch::{ApplyError, apply_patch, apply_patch_mut};
