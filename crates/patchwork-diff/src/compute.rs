// SPDX-License-Identifier: MIT OR Apache-2.0
//! Diff construction.
//!
//! Three tree walks turn a pair of canonical trees into JSON Patch operations:
//!
//! - [`DiffStrategy::Structural`] walks both trees and emits adds, removes
//!   and replaces until the original equals the derived tree. Used to diff a
//!   document against a merge result.
//! - [`DiffStrategy::Deep`] treats the derived tree as a patch document:
//!   only keys present in the patch are visited and `null` means delete.
//! - [`DiffStrategy::Flat`] ignores the original and emits an `add` for every
//!   non-null leaf of the patch.
//!
//! Operations are emitted top-down in the iteration order of the tree that
//! drives the walk. Structural removals follow the adds and replaces of the
//! same level, in the original's key order. Arrays are compared as whole
//! values.

use patchwork_core::{PatchOperation, child_path};
use serde_json::{Map, Value};

use crate::equality::{Equality, ValueComparator};

/// Tree walk used to build a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffStrategy {
    /// Compare both trees key by key
    #[default]
    Structural,
    /// Walk the patch document, comparing against the original
    Deep,
    /// Walk the patch document only, emitting adds
    Flat,
}

/// Options for [`json_diff_with_options`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Tree walk to use
    pub strategy: DiffStrategy,
    /// Leaf comparator
    pub equality: Equality,
}

impl DiffOptions {
    /// Sets the tree walk.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: DiffStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the leaf comparator.
    #[must_use]
    pub const fn with_equality(mut self, equality: Equality) -> Self {
        self.equality = equality;
        self
    }
}

/// Structural diff with the default comparator.
#[must_use]
pub fn json_diff(original: &Value, derived: &Value) -> Vec<PatchOperation> {
    json_diff_with_options(original, derived, &DiffOptions::default())
}

/// Diff with explicit options.
#[must_use]
pub fn json_diff_with_options(
    original: &Value,
    derived: &Value,
    options: &DiffOptions,
) -> Vec<PatchOperation> {
    diff_with(original, derived, options.strategy, &options.equality)
}

/// Diff with a caller-supplied comparator.
pub fn diff_with<C>(
    original: &Value,
    derived: &Value,
    strategy: DiffStrategy,
    comparator: &C,
) -> Vec<PatchOperation>
where
    C: ValueComparator + ?Sized,
{
    let mut walker = Walker {
        comparator,
        operations: Vec::new(),
    };
    match strategy {
        DiffStrategy::Structural => walker.structural("", original, derived),
        DiffStrategy::Deep => walker.deep("", Some(original), derived),
        DiffStrategy::Flat => walker.flat("", derived),
    }
    walker.operations
}

/// Deep diff of a patch document against an original, default comparator.
#[must_use]
pub fn deep_diff(original: &Value, patch: &Value) -> Vec<PatchOperation> {
    diff_with(original, patch, DiffStrategy::Deep, &Equality::default())
}

/// Flat overlay of a patch document.
#[must_use]
pub fn flat_diff(patch: &Value) -> Vec<PatchOperation> {
    diff_with(&Value::Null, patch, DiffStrategy::Flat, &Equality::default())
}

/// The value a patch subtree creates on an empty target.
///
/// Null-valued keys are dropped, and objects left empty vanish.
#[must_use]
pub fn materialize(patch: &Value) -> Option<Value> {
    match patch {
        Value::Null => None,
        Value::Object(map) => {
            let kept: Map<String, Value> = map
                .iter()
                .filter_map(|(key, value)| materialize(value).map(|v| (key.clone(), v)))
                .collect();
            (!kept.is_empty()).then_some(Value::Object(kept))
        }
        other => Some(other.clone()),
    }
}

struct Walker<'c, C: ?Sized> {
    comparator: &'c C,
    operations: Vec<PatchOperation>,
}

impl<C: ValueComparator + ?Sized> Walker<'_, C> {
    fn structural(&mut self, path: &str, original: &Value, derived: &Value) {
        let (Value::Object(before), Value::Object(after)) = (original, derived) else {
            if !self.comparator.values_equal(original, derived) {
                self.operations
                    .push(PatchOperation::replace(path, derived.clone()));
            }
            return;
        };
        for (key, value) in after {
            let child = child_path(path, key);
            match before.get(key) {
                Some(existing) => self.structural(&child, existing, value),
                None => self.operations.push(PatchOperation::add(child, value.clone())),
            }
        }
        for key in before.keys().filter(|key| !after.contains_key(*key)) {
            self.operations
                .push(PatchOperation::remove(child_path(path, key)));
        }
    }

    /// `original` is `None` when the key is absent; absent and `null` are
    /// treated alike.
    fn deep(&mut self, path: &str, original: Option<&Value>, patch: &Value) {
        let original = original.filter(|value| !value.is_null());
        let Value::Object(patch_map) = patch else {
            let unchanged = original.map_or_else(
                || patch.is_null(),
                |existing| self.comparator.values_equal(existing, patch),
            );
            if !unchanged {
                self.operations.push(match original {
                    Some(_) => PatchOperation::replace(path, patch.clone()),
                    None => PatchOperation::add(path, patch.clone()),
                });
            }
            return;
        };

        // Descending would address members of a scalar or array.
        if let Some(existing) = original
            && !existing.is_object()
        {
            if let Some(value) = materialize(patch) {
                self.operations.push(PatchOperation::replace(path, value));
            }
            return;
        }

        let original_map = original.and_then(Value::as_object);
        for (key, patch_value) in patch_map {
            let child = child_path(path, key);
            let original_value = original_map.and_then(|map| map.get(key));
            if patch_value.is_null() {
                if original_value.is_some_and(|value| !value.is_null()) {
                    self.operations.push(PatchOperation::remove(child));
                }
            } else {
                self.deep(&child, original_value, patch_value);
            }
        }
    }

    fn flat(&mut self, path: &str, patch: &Value) {
        match patch {
            Value::Null => {}
            Value::Object(map) => {
                for (key, value) in map {
                    if !value.is_null() {
                        self.flat(&child_path(path, key), value);
                    }
                }
            }
            leaf => self.operations.push(PatchOperation::add(path, leaf.clone())),
        }
    }
}
