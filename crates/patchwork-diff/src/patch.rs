// SPDX-License-Identifier: MIT OR Apache-2.0
//! Applying JSON Patch operations to a canonical tree.
//!
//! Standard RFC 6902 semantics for add, remove and replace, with one
//! extension: `add` creates missing intermediate objects (and turns a `null`
//! intermediate into an object), so that a deep diff against an absent
//! subtree can address leaves directly.

use patchwork_core::{PatchOperation, PointerError, kind_name, parse_pointer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Failures while applying an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The operation path is not a valid pointer.
    #[error(transparent)]
    Pointer(#[from] PointerError),

    /// Nothing exists at the target of a remove or replace.
    #[error("path {path:?} does not exist")]
    NotFound {
        /// Operation path
        path: String,
    },

    /// The path descends into a scalar.
    #[error("cannot address {segment:?} inside a {found} at {path:?}")]
    NotAContainer {
        /// Operation path
        path: String,
        /// The token that could not be resolved
        segment: String,
        /// Kind of value found
        found: &'static str,
    },

    /// An array token is not a valid index.
    #[error("invalid array index {segment:?} at {path:?}")]
    InvalidIndex {
        /// Operation path
        path: String,
        /// The offending token
        segment: String,
    },
}

/// Applies operations to a copy of `doc`.
///
/// # Errors
///
/// Stops at the first operation that cannot be applied.
pub fn apply_patch(doc: &Value, operations: &[PatchOperation]) -> Result<Value, ApplyError> {
    let mut patched = doc.clone();
    apply_patch_mut(&mut patched, operations)?;
    Ok(patched)
}

/// Applies operations in place.
///
/// The document may be partially modified when an error is returned.
///
/// # Errors
///
/// Stops at the first operation that cannot be applied.
pub fn apply_patch_mut(doc: &mut Value, operations: &[PatchOperation]) -> Result<(), ApplyError> {
    operations.iter().try_for_each(|op| apply_operation(doc, op))
}

fn apply_operation(doc: &mut Value, op: &PatchOperation) -> Result<(), ApplyError> {
    let path = op.path();
    let mut tokens = parse_pointer(path)?;
    let Some(last) = tokens.pop() else {
        match op {
            PatchOperation::Add { value, .. } | PatchOperation::Replace { value, .. } => {
                *doc = value.clone();
            }
            PatchOperation::Remove { .. } => *doc = Value::Null,
        }
        return Ok(());
    };

    let create = matches!(op, PatchOperation::Add { .. });
    let parent = resolve(doc, &tokens, path, create)?;
    match (parent, op) {
        (Value::Object(map), PatchOperation::Add { value, .. }) => {
            map.insert(last, value.clone());
        }
        (Value::Object(map), PatchOperation::Replace { value, .. }) => {
            let slot = map
                .get_mut(&last)
                .ok_or_else(|| ApplyError::NotFound { path: path.into() })?;
            *slot = value.clone();
        }
        (Value::Object(map), PatchOperation::Remove { .. }) => {
            map.shift_remove(&last)
                .ok_or_else(|| ApplyError::NotFound { path: path.into() })?;
        }
        (Value::Array(items), PatchOperation::Add { value, .. }) => {
            let index = if last == "-" {
                items.len()
            } else {
                array_index(&last, items.len() + 1, path)?
            };
            items.insert(index, value.clone());
        }
        (Value::Array(items), PatchOperation::Replace { value, .. }) => {
            let index = array_index(&last, items.len(), path)?;
            items[index] = value.clone();
        }
        (Value::Array(items), PatchOperation::Remove { .. }) => {
            let index = array_index(&last, items.len(), path)?;
            items.remove(index);
        }
        (other, _) => {
            return Err(ApplyError::NotAContainer {
                path: path.into(),
                segment: last,
                found: kind_name(other),
            });
        }
    }
    Ok(())
}

fn resolve<'v>(
    doc: &'v mut Value,
    tokens: &[String],
    path: &str,
    create: bool,
) -> Result<&'v mut Value, ApplyError> {
    let mut current = doc;
    for token in tokens {
        if create && current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => {
                if create {
                    map.entry(token.clone())
                        .or_insert_with(|| Value::Object(Map::new()))
                } else {
                    map.get_mut(token)
                        .ok_or_else(|| ApplyError::NotFound { path: path.into() })?
                }
            }
            Value::Array(items) => {
                let index = array_index(token, items.len(), path)?;
                &mut items[index]
            }
            other => {
                return Err(ApplyError::NotAContainer {
                    path: path.into(),
                    segment: token.clone(),
                    found: kind_name(other),
                });
            }
        };
    }
    if create && current.is_null() {
        *current = Value::Object(Map::new());
    }
    Ok(current)
}

/// Parses an array token that must be below `bound`.
fn array_index(token: &str, bound: usize, path: &str) -> Result<usize, ApplyError> {
    let invalid = || ApplyError::InvalidIndex {
        path: path.into(),
        segment: token.into(),
    };
    if token.is_empty()
        || !token.bytes().all(|b| b.is_ascii_digit())
        || (token.len() > 1 && token.starts_with('0'))
    {
        return Err(invalid());
    }
    let index: usize = token.parse().map_err(|_| invalid())?;
    if index < bound { Ok(index) } else { Err(invalid()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ops(raw: Value) -> Vec<PatchOperation> {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_object_operations() {
        let doc = json!({"a": 1, "b": 2, "c": 3});
        let patched = apply_patch(
            &doc,
            &ops(json!([
                {"op": "replace", "path": "/a", "value": 10},
                {"op": "remove", "path": "/b"},
                {"op": "add", "path": "/d", "value": {"e": 4}}
            ])),
        )
        .unwrap();
        assert_eq!(patched, json!({"a": 10, "c": 3, "d": {"e": 4}}));
        let keys: Vec<_> = patched.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_add_creates_intermediate_objects() {
        let patched = apply_patch(&json!({"n": null}), &[
            PatchOperation::add("/x/y/z", json!(1)),
            PatchOperation::add("/n/m", json!(2)),
        ])
        .unwrap();
        assert_eq!(patched, json!({"n": {"m": 2}, "x": {"y": {"z": 1}}}));
    }

    #[test]
    fn test_nested_paths_through_existing_containers() {
        let doc = json!({"a": {"list": [{"k": 1}, {"k": 2}]}, "b": {"c": {}}});
        let patched = apply_patch(&doc, &[
            PatchOperation::replace("/a/list/1/k", json!(20)),
            PatchOperation::add("/b/c/d", json!(true)),
            PatchOperation::add("/a/list/0/j", json!("x")),
            PatchOperation::remove("/a/list/0/k"),
        ])
        .unwrap();
        assert_eq!(
            patched,
            json!({"a": {"list": [{"j": "x"}, {"k": 20}]}, "b": {"c": {"d": true}}})
        );
    }

    #[test]
    fn test_replace_and_remove_require_target() {
        let doc = json!({"a": {}});
        assert_eq!(
            apply_patch(&doc, &[PatchOperation::replace("/a/b", json!(1))]),
            Err(ApplyError::NotFound { path: "/a/b".into() })
        );
        assert!(matches!(
            apply_patch(&doc, &[PatchOperation::remove("/x/y")]),
            Err(ApplyError::NotFound { .. })
        ));
    }

    #[test]
    fn test_array_operations() {
        let doc = json!({"list": [1, 2, 3]});
        let patched = apply_patch(
            &doc,
            &[
                PatchOperation::add("/list/-", json!(4)),
                PatchOperation::add("/list/0", json!(0)),
                PatchOperation::replace("/list/1", json!(10)),
                PatchOperation::remove("/list/2"),
            ],
        )
        .unwrap();
        assert_eq!(patched, json!({"list": [0, 10, 3, 4]}));
    }

    #[test]
    fn test_array_index_errors() {
        let doc = json!([1]);
        for token in ["01", "x", "-", "5", ""] {
            let path = format!("/{token}");
            assert!(
                matches!(
                    apply_patch(&doc, &[PatchOperation::replace(path.clone(), json!(0))]),
                    Err(ApplyError::InvalidIndex { .. })
                ),
                "{path}"
            );
        }
    }

    #[test]
    fn test_scalar_parent() {
        let err = apply_patch(&json!({"a": "s"}), &[PatchOperation::add("/a/b", json!(1))])
            .unwrap_err();
        assert_eq!(
            err,
            ApplyError::NotAContainer {
                path: "/a/b".into(),
                segment: "b".into(),
                found: "string"
            }
        );
    }

    #[test]
    fn test_root_operations() {
        assert_eq!(
            apply_patch(&json!({"a": 1}), &[PatchOperation::replace("", json!([1]))]).unwrap(),
            json!([1])
        );
        assert_eq!(
            apply_patch(&json!({"a": 1}), &[PatchOperation::remove("")]).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_escaped_paths() {
        let patched =
            apply_patch(&json!({}), &[PatchOperation::add("/a~1b~0c", json!(1))]).unwrap();
        assert_eq!(patched, json!({"a/b~c": 1}));
    }

    #[test]
    fn test_invalid_pointer() {
        assert!(matches!(
            apply_patch(&json!({}), &[PatchOperation::add("nope", json!(1))]),
            Err(ApplyError::Pointer(_))
        ));
    }
}
